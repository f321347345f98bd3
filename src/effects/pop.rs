//! Acknowledge pop.
//!
//! A tiny sine "bloop" confirming that an input landed.
//!
//! # How It Works
//!
//! 1. Sine oscillator, the softest of the four shapes
//! 2. Pitch glides exponentially from 600 Hz down to 300 Hz over 100 ms
//! 3. Gain starts at its peak and decays alongside the pitch
//!
//! The falling octave reads as a drop landing rather than a beep.

use crate::dsp::{Curve, Waveform};

use super::Tone;

const LENGTH: f32 = 0.1;

pub(super) fn acknowledge() -> Tone {
    Tone {
        waveform: Waveform::Sine,
        offset: 0.0,
        duration: f64::from(LENGTH),
        frequency: Curve::starting_at(600.0).exponential_to(300.0, LENGTH),
        gain: Curve::starting_at(0.3).exponential_to(0.01, LENGTH),
    }
}
