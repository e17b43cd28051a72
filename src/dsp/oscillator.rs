/*
Tone Generator
==============

One pure function maps (frequency, elapsed time) to a sample value. The
waveform is a square/sawtooth hybrid built from three pieces:

  phase index   a = round(2 · t · f)
                Counts half-periods since t = 0. Increments once every
                1/(2f) seconds.

  sign          +1 while a is even, -1 while a is odd.
                This is the square-wave component: it flips polarity at
                every half-period boundary.

  ramp          t - a/(2f), the signed distance from the center of the
                current half-period, spanning ±1/(4f). Scaled by 4f it
                spans ±1, giving the sawtooth component.

The sample is ramp · sign - 1. The product is bounded in [-1, +1] and the
constant offset shifts the whole waveform down by one; callers that mix
several voices divide the sum by the voice count, so the absolute level
matters less than boundedness and periodicity. Advancing t by one full
period 1/f advances a by exactly 2, preserving both the sign parity and the
ramp, so the function repeats exactly.

Cost is a handful of float ops per call, no state, no allocation.
*/

/// Sample the waveform for one oscillator at `frequency` Hz, `time` seconds
/// after its note-on.
#[inline]
pub fn generate(frequency: f32, time: f64) -> f32 {
    debug_assert!(frequency > 0.0);
    debug_assert!(time >= 0.0);

    let frequency = frequency as f64;
    let a = (2.0 * time * frequency).round();
    let sign = if (a as i64) % 2 == 0 { 1.0 } else { -1.0 };

    (4.0 * frequency * (time - a / (2.0 * frequency)) * sign - 1.0) as f32
}
