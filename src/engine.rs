//! Engine façade: one synthesizer instance per audio stream.
//!
//! Owns the voice pool for the stream's lifetime and splits into the two
//! thread-side halves — the router for the MIDI event loop and the renderer
//! for the audio callback. Nothing lives in process-global state.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::synth::pool::VoicePool;
use crate::synth::renderer::Renderer;
use crate::synth::router::NoteRouter;
use crate::{DEFAULT_SAMPLE_RATE, DEFAULT_VOICE_CAPACITY};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    /// Output sample rate in Hz.
    pub sample_rate: f32,
    /// Fixed polyphony limit.
    pub voices: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            voices: DEFAULT_VOICE_CAPACITY,
        }
    }
}

pub struct SynthEngine {
    router: NoteRouter,
    renderer: Renderer,
}

impl SynthEngine {
    pub fn new(config: EngineConfig) -> Self {
        let (allocator, list) = VoicePool::new(config.voices);
        Self {
            router: NoteRouter::new(allocator),
            renderer: Renderer::new(list, config.sample_rate),
        }
    }

    /// Hand the two halves to their threads.
    pub fn split(self) -> (NoteRouter, Renderer) {
        (self.router, self.renderer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_crate_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.sample_rate, DEFAULT_SAMPLE_RATE);
        assert_eq!(config.voices, DEFAULT_VOICE_CAPACITY);
    }
}
