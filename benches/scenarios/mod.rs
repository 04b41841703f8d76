//! Real-world scenario benchmarks.
//!
//! These model actual playing: chords held across many callbacks and
//! notes arriving through the intent queue between blocks.

mod polyphony;

pub use polyphony::bench_polyphony;
