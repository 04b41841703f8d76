//! Benchmarks for the voice engine.
//!
//! Run with: cargo bench
//!
//! The audio callback must fill each block well within its deadline.
//!
//! Reference timing at 44.1kHz sample rate:
//!   - 64 samples  = 1.45ms deadline
//!   - 128 samples = 2.90ms deadline
//!   - 256 samples = 5.80ms deadline
//!   - 512 samples = 11.61ms deadline
//!
//! Benchmark groups:
//!   - dsp/*        Waveform and envelope math
//!   - scenarios/*  Full polyphonic renders with chords and key churn

use criterion::{criterion_group, criterion_main};

mod dsp;
mod scenarios;

/// Common buffer sizes used in audio applications.
pub const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512];

criterion_group!(
    benches,
    dsp::bench_waveform,
    dsp::bench_envelope,
    scenarios::bench_polyphony,
);
criterion_main!(benches);
