//! Benchmarks for the phase-to-amplitude waveform functions.

use std::{f32::consts::TAU, hint::black_box};

use criterion::{BenchmarkId, Criterion};
use keysynth::dsp::Waveform;

use crate::BLOCK_SIZES;

pub fn bench_waveform(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/waveform");
    let increment = TAU * 440.0 / 44_100.0;

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        for waveform in Waveform::ALL {
            let mut phase = 0.0f32;
            group.bench_with_input(BenchmarkId::new(waveform.name(), size), &size, |b, _| {
                b.iter(|| {
                    for sample in buffer.iter_mut() {
                        *sample = black_box(waveform).generate(phase);
                        phase += increment;
                        if phase >= TAU {
                            phase -= TAU;
                        }
                    }
                    black_box(&buffer);
                })
            });
        }
    }

    group.finish();
}
