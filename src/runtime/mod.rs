//! Runtime for playing the synth from a keyboard.
//!
//! This module provides the `KeySynth` builder that opens the audio stream,
//! runs the blocking key-read loop, and tears everything down again.
//!
//! # Example
//!
//! ```ignore
//! use keysynth::{dsp::Waveform, io::EvdevKeys, runtime::KeySynth};
//!
//! fn main() -> color_eyre::Result<()> {
//!     let keys = EvdevKeys::open("/dev/input/event3")?;
//!     KeySynth::new()
//!         .waveform(Waveform::Triangle)
//!         .amplitude(0.3)
//!         .run(keys)?;
//!     Ok(())
//! }
//! ```

mod app;
mod stream;

pub use app::{drive, tail_duration, KeySynth};
pub use stream::AudioSession;
