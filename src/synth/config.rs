#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    dsp::{EnvelopeParams, Waveform},
    error::{Result, SynthError},
};

/// What happens to a voice once its key is released.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReleasePolicy {
    /// Stop mixing the voice immediately.
    Cut,
    /// Keep mixing while the envelope decays, then go idle.
    #[default]
    Tail,
}

/// How a press for a key that is already held is treated.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RepeatPolicy {
    /// Drop the press; the held note keeps sounding.
    #[default]
    Ignore,
    /// Release the held voice and start a fresh one.
    Retrigger,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Output gain applied to the averaged mix (mix headroom).
    pub amplitude: f32,
    pub waveform: Waveform,
    /// Fixed when the stream opens.
    pub sample_rate: u32,
    /// Frames per callback; `None` lets the backend choose.
    pub buffer_frames: Option<u32>,
    /// Voice pool capacity, reserved up front.
    pub max_voices: usize,
    /// `None` disables enveloping: voices play at full volume.
    pub envelope: Option<EnvelopeParams>,
    pub release: ReleasePolicy,
    pub repeat: RepeatPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            amplitude: 0.25,
            waveform: Waveform::Sine,
            sample_rate: crate::DEFAULT_SAMPLE_RATE,
            buffer_frames: Some(512),
            max_voices: 32,
            envelope: Some(EnvelopeParams::default()),
            release: ReleasePolicy::Tail,
            repeat: RepeatPolicy::Ignore,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_amplitude(mut self, amplitude: f32) -> Self {
        self.amplitude = amplitude;
        self
    }

    pub fn with_waveform(mut self, waveform: Waveform) -> Self {
        self.waveform = waveform;
        self
    }

    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn with_buffer_frames(mut self, frames: Option<u32>) -> Self {
        self.buffer_frames = frames;
        self
    }

    pub fn with_max_voices(mut self, max_voices: usize) -> Self {
        self.max_voices = max_voices;
        self
    }

    pub fn with_envelope(mut self, envelope: Option<EnvelopeParams>) -> Self {
        self.envelope = envelope;
        self
    }

    pub fn with_release(mut self, release: ReleasePolicy) -> Self {
        self.release = release;
        self
    }

    pub fn with_repeat(mut self, repeat: RepeatPolicy) -> Self {
        self.repeat = repeat;
        self
    }

    /// Per-sample time step in seconds.
    pub fn dx(&self) -> f32 {
        1.0 / self.sample_rate as f32
    }

    /// Released voices keep sounding only with an envelope to decay them.
    pub fn keeps_tail(&self) -> bool {
        self.release == ReleasePolicy::Tail && self.envelope.is_some()
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.amplitude > 0.0 && self.amplitude <= 1.0) {
            return Err(SynthError::InvalidConfig(format!(
                "amplitude must be in (0, 1], got {}",
                self.amplitude
            )));
        }
        if self.sample_rate == 0 {
            return Err(SynthError::InvalidConfig(
                "sample rate must be non-zero".into(),
            ));
        }
        if self.buffer_frames == Some(0) {
            return Err(SynthError::InvalidConfig(
                "buffer size must be non-zero".into(),
            ));
        }
        if self.max_voices == 0 {
            return Err(SynthError::InvalidConfig(
                "voice pool needs at least one voice".into(),
            ));
        }
        if let Some(env) = &self.envelope {
            let rates = [env.attack_rate, env.decay_rate, env.release_rate];
            if rates.iter().any(|r| !r.is_finite() || *r < 0.0) {
                return Err(SynthError::InvalidConfig(format!(
                    "envelope rates must be finite and non-negative, got {env:?}"
                )));
            }
        }
        Ok(())
    }
}
