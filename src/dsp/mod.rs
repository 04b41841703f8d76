//! Low-level DSP primitives used by the voice engine.
//!
//! These components are allocation-free and realtime-safe, making them safe to
//! call from inside the audio callback. They stay focused on the signal math;
//! voice bookkeeping lives in [`crate::synth`].

/// Second-order smoothed volume envelope.
pub mod envelope;
/// Pure phase-to-amplitude waveform functions.
pub mod waveform;

pub use envelope::{Envelope, EnvelopeParams, SILENCE_THRESHOLD};
pub use waveform::Waveform;
