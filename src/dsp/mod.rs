//! Low-level signal math used on the audio thread.
//!
//! Everything here is allocation-free, lock-free, and stateless, making it
//! safe to call from the realtime render callback for any number of voices
//! concurrently.

/// Pulse-derived waveform generator.
pub mod oscillator;
/// Equal-tempered note-number to frequency mapping.
pub mod tuning;
