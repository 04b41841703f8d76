//! Benchmarks for low-level DSP primitives.

mod envelope;
mod waveform;

pub use envelope::bench_envelope;
pub use waveform::bench_waveform;
