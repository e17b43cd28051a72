//! Benchmarks for the tone generator and the realtime render walk.
//!
//! Run with: cargo bench
//!
//! Reference timing at 48kHz sample rate:
//!   - 64 samples  = 1.33ms deadline
//!   - 128 samples = 2.67ms deadline
//!   - 256 samples = 5.33ms deadline
//!   - 512 samples = 10.67ms deadline
//!
//! The render benchmarks cover the polyphony range up to the full pool, the
//! worst case the audio callback can meet.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use polytone::dsp::{oscillator, tuning};
use polytone::synth::pool::VoicePool;
use polytone::synth::renderer::{Renderer, CHANNELS};

/// Common buffer sizes used in audio applications.
pub const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512];

fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");

    for &size in BLOCK_SIZES {
        group.bench_with_input(BenchmarkId::new("generate", size), &size, |b, &size| {
            b.iter(|| {
                let mut acc = 0.0f32;
                for n in 0..size {
                    acc += oscillator::generate(black_box(440.0), n as f64 / 48_000.0);
                }
                acc
            })
        });
    }

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("synth/render");

    for &voices in &[1usize, 8, 32, 128] {
        let (mut pool, list) = VoicePool::new(128);
        for v in 0..voices {
            let key = v as u8;
            pool.allocate(tuning::note_to_freq(key), key).unwrap();
        }

        let mut renderer = Renderer::new(list, 48_000.0);
        let mut out = vec![0.0f32; 256 * CHANNELS];

        group.bench_with_input(BenchmarkId::new("voices", voices), &voices, |b, _| {
            b.iter(|| renderer.render(black_box(&mut out)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_oscillator, bench_render);
criterion_main!(benches);
