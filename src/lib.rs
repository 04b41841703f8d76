pub mod dsp; // Waveforms and envelope math
pub mod error;
pub mod io; // Key sources and event routing
pub mod runtime; // Audio stream and read loop
pub mod synth; // Voice pool and realtime mixing

pub use error::{Result, SynthError};

/// Sample rate every stream is opened at unless configured otherwise.
pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;
