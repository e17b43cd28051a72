//! Translates note events into voice pool allocate/release calls.

use crate::dsp::tuning;
use crate::io::midi::{EventSource, MidiEvent};
use crate::synth::pool::VoiceAllocator;

/// Event-thread owner of the note-number → slot map.
///
/// The map and the allocator's free stack are only ever touched here, so
/// neither needs synchronization; all cross-thread publication happens
/// inside the pool.
pub struct NoteRouter {
    voices: VoiceAllocator,
    held: [Option<usize>; 128],
}

impl NoteRouter {
    pub fn new(voices: VoiceAllocator) -> Self {
        Self {
            voices,
            held: [None; 128],
        }
    }

    /// Apply one note event.
    pub fn handle_event(&mut self, event: MidiEvent) {
        match event {
            MidiEvent::NoteOn { key, .. } => self.note_on(key),
            MidiEvent::NoteOff { key, .. } => self.note_off(key),
        }
    }

    /// Drain a queue of pending events in arrival order.
    pub fn drain(&mut self, source: &mut impl EventSource) {
        while let Some(event) = source.pop() {
            self.handle_event(event);
        }
    }

    fn note_on(&mut self, key: u8) {
        let key = key & 0x7F;

        // Retriggering a held key replaces its voice; the map never carries
        // two entries for one key.
        if self.held[key as usize].is_some() {
            self.note_off(key);
        }

        match self.voices.allocate(tuning::note_to_freq(key), key) {
            Ok(slot) => self.held[key as usize] = Some(slot),
            Err(err) => {
                tracing::debug!(key, %err, "dropping note-on");
            }
        }
    }

    fn note_off(&mut self, key: u8) {
        let key = key & 0x7F;

        if self.held[key as usize].take().is_some() {
            let _ = self.voices.release(key);
        }
    }

    /// Currently sounding voices, for diagnostics.
    pub fn active_count(&self) -> usize {
        self.voices.active_count()
    }
}
