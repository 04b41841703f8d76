//! Benchmarks for the smoothed volume envelope.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use keysynth::dsp::{Envelope, EnvelopeParams};

use crate::BLOCK_SIZES;

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");
    let params = EnvelopeParams::default();
    let dx = 1.0 / 44_100.0;

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Attack phase (ramping up)
        let mut env = Envelope::new();
        env.trigger();
        group.bench_with_input(BenchmarkId::new("attack", size), &size, |b, _| {
            b.iter(|| {
                for sample in buffer.iter_mut() {
                    *sample = env.tick(black_box(&params), dx);
                }
                black_box(&buffer);
            })
        });

        // Release phase (ramping down)
        let mut env = Envelope::new();
        env.hold_full();
        env.release();
        group.bench_with_input(BenchmarkId::new("release", size), &size, |b, _| {
            b.iter(|| {
                for sample in buffer.iter_mut() {
                    *sample = env.tick(black_box(&params), dx);
                }
                black_box(&buffer);
            })
        });
    }

    group.finish();
}
