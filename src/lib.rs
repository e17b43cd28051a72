pub mod dsp;
pub mod engine;
pub mod io;
pub mod synth; // Voice pool, note routing, rendering

/// Default number of voice slots in the pool (one per MIDI note).
pub const DEFAULT_VOICE_CAPACITY: usize = 128;
/// Default output sample rate in Hz.
pub const DEFAULT_SAMPLE_RATE: f32 = 44_100.0;
