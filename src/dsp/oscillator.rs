#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use std::f32::consts::TAU;

/*
Phase-Accumulating Oscillator
=============================

Every voice in the engine is one of these plus two automation curves. The
oscillator only knows its phase; the frequency is supplied per sample so
a voice can glide (600 Hz → 300 Hz for the acknowledge pop, 150 → 100 Hz
for the error buzz) without the oscillator caring where the value came
from.

Phase runs over [0, 1). Each sample:

    phase += frequency / sample_rate
    phase -= floor(phase)

The waveform is a pure function of phase. All four shapes are aligned so
that phase 0 produces 0.0 (square excepted, which has no zero), which
keeps note onsets free of a DC jump before the gain curve takes over.

  Sine      sin(2π·phase)
  Triangle  1 - 4·|((phase + 0.25) mod 1) - 0.5|
  Sawtooth  2·((phase + 0.5) mod 1) - 1
  Square    +1 for the first half cycle, -1 for the second

These are naive (non band-limited) shapes. At the short durations and
modest pitches used for game blips the aliasing is part of the charm.
*/

/// Oscillator shape for a voice.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Waveform {
    Sine,
    Square,
    Triangle,
    Sawtooth,
}

impl Waveform {
    /// Evaluate the waveform at `phase` in [0, 1).
    #[inline]
    pub fn sample(self, phase: f32) -> f32 {
        match self {
            Waveform::Sine => (TAU * phase).sin(),
            Waveform::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Triangle => 1.0 - 4.0 * (((phase + 0.25).fract()) - 0.5).abs(),
            Waveform::Sawtooth => 2.0 * (phase + 0.5).fract() - 1.0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Waveform::Sine => "sine",
            Waveform::Square => "square",
            Waveform::Triangle => "triangle",
            Waveform::Sawtooth => "sawtooth",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Oscillator {
    waveform: Waveform,
    phase: f32,
}

impl Oscillator {
    pub fn new(waveform: Waveform) -> Self {
        Self { waveform, phase: 0.0 }
    }

    /// Produce one sample at `frequency` Hz and advance the phase.
    #[inline]
    pub fn next_sample(&mut self, frequency: f32, sample_rate: f32) -> f32 {
        let out = self.waveform.sample(self.phase);
        self.phase += frequency / sample_rate;
        self.phase -= self.phase.floor();
        out
    }

    /// Fill `out` at a fixed frequency.
    pub fn render(&mut self, out: &mut [f32], frequency: f32, sample_rate: f32) {
        for sample in out.iter_mut() {
            *sample = self.next_sample(frequency, sample_rate);
        }
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_sine() {
        let sample_rate = 48_000.0;
        let frequency = 440.0;
        let mut osc = Oscillator::new(Waveform::Sine);

        let mut buffer = vec![0.0f32; 128];
        osc.render(&mut buffer, frequency, sample_rate);

        // sample n should be sin(2pi f n / sr)
        let sample_index = 12;
        let expected = (TAU * frequency * sample_index as f32 / sample_rate).sin();
        let actual = buffer[sample_index];
        assert!(
            (actual - expected).abs() < 1e-4,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn shapes_start_at_zero_except_square() {
        assert_eq!(Waveform::Sine.sample(0.0), 0.0);
        assert!(Waveform::Triangle.sample(0.0).abs() < 1e-6);
        assert!(Waveform::Sawtooth.sample(0.0).abs() < 1e-6);
        assert_eq!(Waveform::Square.sample(0.0), 1.0);
        assert_eq!(Waveform::Square.sample(0.75), -1.0);
    }

    #[test]
    fn output_stays_in_unit_range() {
        for waveform in [
            Waveform::Sine,
            Waveform::Square,
            Waveform::Triangle,
            Waveform::Sawtooth,
        ] {
            let mut osc = Oscillator::new(waveform);
            let mut buffer = vec![0.0f32; 1024];
            osc.render(&mut buffer, 997.0, 44_100.0);
            assert!(
                buffer.iter().all(|s| (-1.0..=1.0).contains(s)),
                "{} left [-1, 1]",
                waveform.name()
            );
        }
    }

    #[test]
    fn triangle_peaks_a_quarter_cycle_in() {
        assert!((Waveform::Triangle.sample(0.25) - 1.0).abs() < 1e-6);
        assert!((Waveform::Triangle.sample(0.75) + 1.0).abs() < 1e-6);
    }
}
