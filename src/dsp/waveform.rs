#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};

/*
Waveforms
=========

Every waveform is a pure function of the oscillator phase (radians, in
[0, 2π)). No state lives here: the voice owns the phase and advances it, the
generator only maps phase to amplitude.

  Sine       sin(φ)                         fundamental only
  Sawtooth   φ/π − 1                        all harmonics, 1/n falloff
  Square     4/π · Σ sin(kφ)/k, k = 1,3,5,7 odd harmonics, band-limited
  Triangle   2·|2·(φ/2π) − 1| − 1           odd harmonics, 1/n² falloff

Band-limited square
-------------------
A naive ±1 square has infinitely many harmonics and aliases badly at 44.1kHz.
Summing only the first four odd harmonics keeps the top partial at 7× the
fundamental. The truncated series rings (Gibbs) and peaks at φ = π/8:

    4/π · (sin(π/8) + sin(3π/8)/3 + sin(5π/8)/5 + sin(7π/8)/7) ≈ 1.18423

so the sum is divided by that peak to stay inside [-1, 1].
*/

/// Peak of the four-harmonic square series, reached at phase π/8.
pub const SQUARE_PEAK: f32 = 1.184_225_1;

const SQUARE_HARMONICS: [f32; 4] = [1.0, 3.0, 5.0, 7.0];

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Waveform {
    #[default]
    Sine,
    Sawtooth,
    Square,
    Triangle,
}

impl Waveform {
    pub const ALL: [Waveform; 4] = [
        Waveform::Sine,
        Waveform::Sawtooth,
        Waveform::Square,
        Waveform::Triangle,
    ];

    /// Evaluate this waveform at `phase` (radians, expected in [0, 2π)).
    #[inline]
    pub fn generate(self, phase: f32) -> f32 {
        match self {
            Waveform::Sine => sine(phase),
            Waveform::Sawtooth => sawtooth(phase),
            Waveform::Square => square(phase),
            Waveform::Triangle => triangle(phase),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Waveform::Sine => "sine",
            Waveform::Sawtooth => "sawtooth",
            Waveform::Square => "square",
            Waveform::Triangle => "triangle",
        }
    }
}

impl std::fmt::Display for Waveform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Free-function form of [`Waveform::generate`].
#[inline]
pub fn generate(phase: f32, waveform: Waveform) -> f32 {
    waveform.generate(phase)
}

#[inline]
pub fn sine(phase: f32) -> f32 {
    phase.sin()
}

#[inline]
pub fn sawtooth(phase: f32) -> f32 {
    phase / PI - 1.0
}

#[inline]
pub fn square(phase: f32) -> f32 {
    let sum: f32 = SQUARE_HARMONICS
        .iter()
        .map(|&k| (k * phase).sin() / k)
        .sum();
    (4.0 / PI) * sum / SQUARE_PEAK
}

#[inline]
pub fn triangle(phase: f32) -> f32 {
    2.0 * (2.0 * (phase / TAU) - 1.0).abs() - 1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phases(steps: usize) -> impl Iterator<Item = f32> {
        (0..steps).map(move |i| i as f32 * TAU / steps as f32)
    }

    #[test]
    fn every_waveform_stays_in_unit_range() {
        for waveform in Waveform::ALL {
            for phase in phases(100_000) {
                let value = waveform.generate(phase);
                assert!(
                    (-1.0 - 1e-5..=1.0 + 1e-5).contains(&value),
                    "{waveform} out of range at phase {phase}: {value}"
                );
            }
        }
    }

    #[test]
    fn square_peak_is_normalized() {
        let peak = square(PI / 8.0);
        assert!((peak - 1.0).abs() < 1e-5, "peak was {peak}");
        assert!((square(PI + PI / 8.0) + 1.0).abs() < 1e-5);
    }

    #[test]
    fn sawtooth_ramps_from_minus_one() {
        assert_eq!(sawtooth(0.0), -1.0);
        assert!(sawtooth(PI).abs() < 1e-6);
        assert!(sawtooth(TAU - 1e-3) > 0.999);
    }

    #[test]
    fn triangle_corners() {
        assert!((triangle(0.0) - 1.0).abs() < 1e-6);
        assert!((triangle(PI) + 1.0).abs() < 1e-6);
        assert!(triangle(PI / 2.0).abs() < 1e-6);
    }

    #[test]
    fn free_function_matches_method() {
        for waveform in Waveform::ALL {
            assert_eq!(generate(1.234, waveform), waveform.generate(1.234));
        }
    }
}
