//! The realtime render entry point.

use crate::dsp::oscillator;
use crate::synth::pool::VoiceList;

/// Interleaved output channel count; the mono mix is duplicated to stereo.
pub const CHANNELS: usize = 2;

/// Fills output buffers on the audio subsystem's thread.
///
/// Each buffer must be produced inside its realtime deadline
/// (frames ÷ sample rate), so this path never allocates, locks, or panics;
/// anything unexpected degrades to silence for the affected frame.
pub struct Renderer {
    voices: VoiceList,
    sample_rate: f32,
}

impl Renderer {
    pub fn new(voices: VoiceList, sample_rate: f32) -> Self {
        Self {
            voices,
            sample_rate,
        }
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Fill `out` with interleaved stereo frames.
    ///
    /// Head and voice count are captured once per buffer: a voice released
    /// mid-buffer may sound through the buffer's end, a voice allocated
    /// mid-buffer waits for the next one, and the normalization gain is
    /// constant across the buffer.
    pub fn render(&mut self, out: &mut [f32]) {
        let snapshot = self.voices.snapshot();
        let gain = match snapshot.active_count() {
            0 => 0.0,
            n => 1.0 / n as f32,
        };
        let dt = 1.0 / self.sample_rate as f64;

        let mut frames = out.chunks_exact_mut(CHANNELS);
        for frame in &mut frames {
            let mut sample = 0.0f32;
            for voice in snapshot.iter() {
                sample += gain * oscillator::generate(voice.frequency(), voice.elapsed());
                voice.advance(dt);
            }
            if !sample.is_finite() {
                sample = 0.0;
            }
            frame.fill(sample);
        }
        frames.into_remainder().fill(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::pool::VoicePool;

    #[test]
    fn no_voices_renders_exact_silence() {
        let (_pool, list) = VoicePool::new(8);
        let mut renderer = Renderer::new(list, 44_100.0);

        let mut out = [1.0f32; 8]; // 4 stereo frames, pre-dirtied
        renderer.render(&mut out);
        assert_eq!(out, [0.0; 8]);
    }

    #[test]
    fn one_voice_advances_by_one_frame_per_frame() {
        let sample_rate = 44_100.0f32;
        let (mut pool, list) = VoicePool::new(8);
        pool.allocate(440.0, 69).unwrap();

        let mut renderer = Renderer::new(list, sample_rate);
        let mut out = [0.0f32; 8];
        renderer.render(&mut out);

        let dt = 1.0 / sample_rate as f64;
        let mut expected = 0.0f64;
        for _ in 0..4 {
            expected += dt;
        }

        let snapshot = renderer.voices.snapshot();
        assert_eq!(snapshot.iter().next().unwrap().elapsed(), expected);
    }

    #[test]
    fn one_voice_matches_the_generator() {
        let sample_rate = 48_000.0f32;
        let frequency = 440.0f32;
        let (mut pool, list) = VoicePool::new(4);
        pool.allocate(frequency, 69).unwrap();

        let mut renderer = Renderer::new(list, sample_rate);
        let mut out = [0.0f32; 16];
        renderer.render(&mut out);

        let dt = 1.0 / sample_rate as f64;
        let mut t = 0.0f64;
        for frame in out.chunks_exact(2) {
            let expected = oscillator::generate(frequency, t);
            assert_eq!(frame[0], expected);
            assert_eq!(frame[1], expected); // mono duplicated to stereo
            t += dt;
        }
    }

    #[test]
    fn normalization_divides_by_the_voice_count() {
        // Two voices at the same frequency sum to the same signal one voice
        // produces alone, because each is scaled by 1/2.
        let sample_rate = 48_000.0f32;
        let (mut pool, list) = VoicePool::new(4);
        pool.allocate(330.0, 64).unwrap();
        pool.allocate(330.0, 64).unwrap();

        let mut renderer = Renderer::new(list, sample_rate);
        let mut duo = [0.0f32; 8];
        renderer.render(&mut duo);

        let (mut solo_pool, solo_list) = VoicePool::new(4);
        solo_pool.allocate(330.0, 64).unwrap();
        let mut solo_renderer = Renderer::new(solo_list, sample_rate);
        let mut solo = [0.0f32; 8];
        solo_renderer.render(&mut solo);

        for (a, b) in duo.iter().zip(solo.iter()) {
            assert!((a - b).abs() < 1e-6, "{a} vs {b}");
        }
    }

    #[test]
    fn odd_tail_samples_are_zeroed() {
        let (mut pool, list) = VoicePool::new(4);
        pool.allocate(440.0, 69).unwrap();

        let mut renderer = Renderer::new(list, 44_100.0);
        let mut out = [7.0f32; 5]; // two frames plus one dangling sample
        renderer.render(&mut out);

        assert_eq!(out[4], 0.0);
        assert!(out[0] != 7.0);
    }
}
