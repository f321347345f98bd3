//! Error buzz.
//!
//! A low, sagging sawtooth. The saw's full harmonic series makes it the
//! harshest shape available, which is the point.
//!
//! # How It Works
//!
//! 1. Sawtooth oscillator
//! 2. Pitch falls from 150 Hz to 100 Hz over 300 ms
//! 3. Gain decays over the same span

use crate::dsp::{Curve, Waveform};

use super::Tone;

const LENGTH: f32 = 0.3;

pub(super) fn buzz() -> Tone {
    Tone {
        waveform: Waveform::Sawtooth,
        offset: 0.0,
        duration: f64::from(LENGTH),
        frequency: Curve::starting_at(150.0).exponential_to(100.0, LENGTH),
        gain: Curve::starting_at(0.2).exponential_to(0.001, LENGTH),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saw_sags_from_150_to_100_hz() {
        let tone = buzz();
        assert_eq!(tone.waveform, Waveform::Sawtooth);
        assert_eq!(tone.frequency.value_at(0.0), 150.0);
        assert!((tone.frequency.value_at(LENGTH) - 100.0).abs() < 1e-3);
        let mid = tone.frequency.value_at(LENGTH / 2.0);
        assert!(mid < 150.0 && mid > 100.0);
    }

    #[test]
    fn fades_out_over_the_whole_buzz() {
        let tone = buzz();
        assert!((tone.gain.value_at(0.0) - 0.2).abs() < 1e-6);
        assert!(tone.gain.value_at(LENGTH) < 0.01);
        assert!((tone.duration - 0.3).abs() < 1e-6);
    }
}
