#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Smoothed Volume Envelope
========================

Not a textbook ADSR. The envelope is a second-order leaky integrator: the
level (`volume`) is driven by a rate (`velocity`), and the rate itself is
nudged every sample.

  gate high, volume < 1    velocity += attack_rate · (1 − volume) · dx
  gate high, volume = 1    velocity -= decay_rate · dx
  gate low                 velocity -= release_rate · dx

  then: volume += velocity · dx, clamped to [0, 1]

With dx = 1 / sample_rate this gives an S-shaped attack (the push toward 1
shrinks as the level approaches it), then a settle where the level hovers just
under full scale: once clamped at 1 the decay term bleeds off the left-over
velocity, the level dips, and the attack term pulls it back.

  Level
    1.0 ┐      ╭──────────────────╮
        │     ╱                    ╲
        │    ╱                      ╲
        │  ╱                          ╲
    0.0 └─╯──────────────────────────────╲──→ Time
          attack   settle / hold    release tail

Release starts from the current level with zero velocity, so the tail is a
parabola: level = start − release_rate · t² / 2.

Defaults at 44.1kHz: attack reaches full scale in ~35ms, a full-scale release
falls below SILENCE_THRESHOLD in ~320ms.
*/

/// Level below which a released voice counts as finished.
pub const SILENCE_THRESHOLD: f32 = 1e-4;

/// Rates that shape the envelope. All are per second².
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvelopeParams {
    pub attack_rate: f32,
    pub decay_rate: f32,
    pub release_rate: f32,
}

impl Default for EnvelopeParams {
    fn default() -> Self {
        Self {
            attack_rate: 2_000.0,
            decay_rate: 2_000.0,
            release_rate: 20.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Envelope {
    volume: f32,
    velocity: f32,
    releasing: bool,
}

impl Envelope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gate high: restart from silence.
    pub fn trigger(&mut self) {
        self.volume = 0.0;
        self.velocity = 0.0;
        self.releasing = false;
    }

    /// Pin the level at full scale. Used when enveloping is disabled.
    pub fn hold_full(&mut self) {
        self.volume = 1.0;
        self.velocity = 0.0;
        self.releasing = false;
    }

    /// Gate low: fall from the current level.
    pub fn release(&mut self) {
        self.releasing = true;
        self.velocity = 0.0;
    }

    /// Advance one sample and return the new level.
    #[inline]
    pub fn tick(&mut self, params: &EnvelopeParams, dx: f32) -> f32 {
        if self.releasing {
            self.velocity -= params.release_rate * dx;
        } else if self.volume < 1.0 {
            self.velocity += params.attack_rate * (1.0 - self.volume) * dx;
        } else {
            self.velocity -= params.decay_rate * dx;
        }

        self.volume = (self.volume + self.velocity * dx).clamp(0.0, 1.0);
        self.volume
    }

    /// Reset to silence without triggering.
    pub fn silence(&mut self) {
        self.volume = 0.0;
        self.velocity = 0.0;
        self.releasing = false;
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn is_releasing(&self) -> bool {
        self.releasing
    }

    /// True once a release has decayed below [`SILENCE_THRESHOLD`].
    pub fn is_finished(&self) -> bool {
        self.releasing && self.volume <= SILENCE_THRESHOLD
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 44_100.0;
    const DX: f32 = 1.0 / SAMPLE_RATE;

    fn run(env: &mut Envelope, params: &EnvelopeParams, samples: usize) {
        for _ in 0..samples {
            env.tick(params, DX);
        }
    }

    #[test]
    fn attack_reaches_full_level() {
        let params = EnvelopeParams::default();
        let mut env = Envelope::new();
        env.trigger();

        run(&mut env, &params, (0.05 * SAMPLE_RATE) as usize);

        assert!(env.volume() > 0.99, "volume was {}", env.volume());
    }

    #[test]
    fn attack_is_monotonic_until_full() {
        let params = EnvelopeParams::default();
        let mut env = Envelope::new();
        env.trigger();

        let mut last = 0.0;
        while env.volume() < 1.0 {
            let level = env.tick(&params, DX);
            assert!(level >= last);
            last = level;
        }
    }

    #[test]
    fn held_note_settles_near_full_scale() {
        let params = EnvelopeParams::default();
        let mut env = Envelope::new();
        env.trigger();

        run(&mut env, &params, SAMPLE_RATE as usize);
        for _ in 0..SAMPLE_RATE as usize {
            let level = env.tick(&params, DX);
            assert!(level > 0.99, "held level sagged to {level}");
        }
    }

    #[test]
    fn release_falls_to_silence() {
        let params = EnvelopeParams::default();
        let mut env = Envelope::new();
        env.trigger();
        run(&mut env, &params, (0.1 * SAMPLE_RATE) as usize);

        env.release();
        assert!(!env.is_finished());
        run(&mut env, &params, (0.5 * SAMPLE_RATE) as usize);

        assert!(env.is_finished());
        assert_eq!(env.volume(), 0.0);
    }

    #[test]
    fn level_stays_clamped() {
        let params = EnvelopeParams {
            attack_rate: 1.0e7,
            decay_rate: 1.0e7,
            release_rate: 1.0e7,
        };
        let mut env = Envelope::new();
        env.trigger();
        for _ in 0..2_000 {
            let level = env.tick(&params, DX);
            assert!((0.0..=1.0).contains(&level));
        }
        env.release();
        for _ in 0..2_000 {
            let level = env.tick(&params, DX);
            assert!((0.0..=1.0).contains(&level));
        }
    }
}
