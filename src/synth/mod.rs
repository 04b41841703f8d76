// Purpose: voice management, polyphony, intent handling
// This layer sits above the DSP primitives and owns the voice pool

pub mod config;
pub mod message;
pub mod poly;
pub mod pool;
pub mod voice;

pub use config::{EngineConfig, ReleasePolicy, RepeatPolicy};
pub use message::{MessageReceiver, MessageSender, SynthMessage};
pub use poly::PolySynth;
pub use pool::VoicePool;
pub use voice::Voice;
