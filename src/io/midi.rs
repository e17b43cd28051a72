//! Note events and their classification from raw MIDI status bytes.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Status nibble for a key press.
pub const NOTE_ON: u8 = 0x90;
/// Status nibble for a key release.
pub const NOTE_OFF: u8 = 0x80;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiEvent {
    NoteOn { channel: u8, key: u8, velocity: u8 },
    NoteOff { channel: u8, key: u8 },
}

impl MidiEvent {
    /// Classify a raw channel-voice message, ignoring everything that is not
    /// a note event. A note-on with velocity zero is the running-status
    /// encoding some devices use for note-off and is treated as one.
    pub fn from_raw(status: u8, key: u8, velocity: u8) -> Option<Self> {
        let channel = status & 0x0F;
        let key = key & 0x7F;
        let velocity = velocity & 0x7F;

        match status & 0xF0 {
            NOTE_ON if velocity > 0 => Some(MidiEvent::NoteOn {
                channel,
                key,
                velocity,
            }),
            NOTE_ON | NOTE_OFF => Some(MidiEvent::NoteOff { channel, key }),
            _ => None,
        }
    }

    pub fn channel(&self) -> u8 {
        match *self {
            MidiEvent::NoteOn { channel, .. } | MidiEvent::NoteOff { channel, .. } => channel,
        }
    }

    pub fn key(&self) -> u8 {
        match *self {
            MidiEvent::NoteOn { key, .. } | MidiEvent::NoteOff { key, .. } => key,
        }
    }
}

/// Sources the router can drain one event at a time.
pub trait EventSource {
    fn pop(&mut self) -> Option<MidiEvent>;
}

#[cfg(feature = "rtrb")]
impl EventSource for rtrb::Consumer<MidiEvent> {
    fn pop(&mut self) -> Option<MidiEvent> {
        rtrb::Consumer::pop(self).ok()
    }
}
