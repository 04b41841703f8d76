use std::f32::consts::TAU;

use crate::dsp::{Envelope, EnvelopeParams, Waveform};

/// One oscillator + envelope slot.
///
/// Only the pool changes what a voice plays (`start`/`release`); only the
/// mixer moves it through time (`next_sample`/`advance_phase`). Everything
/// else is read-only from outside this module tree.
#[derive(Debug, Clone)]
pub struct Voice {
    phase: f32,
    frequency: f32,
    phase_increment: f32,
    is_playing: bool,
    envelope: Envelope,
    elapsed_time: f32,
}

impl Voice {
    /// A silent voice at zero phase.
    pub fn new() -> Self {
        Self {
            phase: 0.0,
            frequency: 0.0,
            phase_increment: 0.0,
            is_playing: false,
            envelope: Envelope::new(),
            elapsed_time: 0.0,
        }
    }

    /// Start a note. Frequencies above Nyquist are clamped so one phase step
    /// never exceeds half a turn.
    pub(super) fn start(&mut self, frequency: f32, sample_rate: f32, envelope_enabled: bool) {
        let frequency = frequency.clamp(0.0, sample_rate * 0.5);
        self.phase = 0.0;
        self.frequency = frequency;
        self.phase_increment = TAU * frequency / sample_rate;
        self.is_playing = true;
        self.elapsed_time = 0.0;

        if envelope_enabled {
            self.envelope.trigger();
        } else {
            self.envelope.hold_full();
        }
    }

    /// Key released. With `tail` the envelope decays; otherwise the voice
    /// goes quiet at once.
    pub(super) fn release(&mut self, tail: bool) {
        self.is_playing = false;
        if tail {
            self.envelope.release();
        } else {
            self.envelope.silence();
        }
    }

    /// Produce this voice's contribution for the current sample, or `None`
    /// if it is not sounding. Advances the envelope before reading the
    /// waveform at the current phase.
    #[inline]
    pub(super) fn next_sample(
        &mut self,
        waveform: Waveform,
        envelope: Option<&EnvelopeParams>,
        dx: f32,
    ) -> Option<f32> {
        if !self.is_sounding() {
            return None;
        }

        let volume = match envelope {
            Some(params) => self.envelope.tick(params, dx),
            None => self.envelope.volume(),
        };
        self.elapsed_time += dx;

        let value = waveform.generate(self.phase) * volume;

        if self.envelope.is_finished() {
            self.envelope.silence();
        }

        Some(value)
    }

    /// Move the phase one sample forward, wrapping into [0, 2π).
    #[inline]
    pub(super) fn advance_phase(&mut self) {
        self.phase += self.phase_increment;
        if self.phase >= TAU {
            self.phase -= TAU;
        }
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Whether a key currently holds this voice.
    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    /// Whether the voice contributes to the mix: held, or decaying after
    /// release.
    pub fn is_sounding(&self) -> bool {
        self.is_playing || (self.envelope.is_releasing() && !self.envelope.is_finished())
    }

    pub fn volume(&self) -> f32 {
        self.envelope.volume()
    }

    pub fn volume_velocity(&self) -> f32 {
        self.envelope.velocity()
    }

    /// Seconds since note-on.
    pub fn elapsed_time(&self) -> f32 {
        self.elapsed_time
    }
}

impl Default for Voice {
    fn default() -> Self {
        Self::new()
    }
}
