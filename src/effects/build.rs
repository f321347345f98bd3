//! Build-item plop.
//!
//! Ten flavors, each with a fixed tone so a player learns to tell them
//! apart by ear.
//!
//! # How It Works
//!
//! 1. The flavor picks a waveform, a base pitch and a length
//! 2. Pitch holds at the base, then sinks to 85% of it over the last 40%
//!    of the note
//! 3. Gain decays exponentially from its peak for the whole note
//!
//! # Profiles
//!
//! | Flavor     | Wave     | Base Hz | Length |
//! |------------|----------|---------|--------|
//! | Vanilla    | sine     | 523.25  | 150 ms |
//! | Chocolate  | triangle | 392.00  | 200 ms |
//! | Strawberry | sine     | 659.25  | 120 ms |
//! | Mint       | triangle | 783.99  | 100 ms |
//! | Caramel    | sine     | 440.00  | 180 ms |
//! | Lemon      | square   | 880.00  |  80 ms |
//! | Blueberry  | triangle | 493.88  | 150 ms |
//! | Matcha     | sine     | 349.23  | 220 ms |
//! | Mango      | square   | 587.33  | 100 ms |
//! | Cookie     | sawtooth | 293.66  | 160 ms |

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::{Curve, Waveform};

use super::Tone;

const PEAK: f32 = 0.25;
/// Final pitch as a fraction of the base.
const GLIDE: f32 = 0.85;
/// Fraction of the note held before the glide begins.
const HOLD: f32 = 0.6;
const TAIL: f32 = 0.001;

/// Item flavor for [`super::Effect::BuildItem`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flavor {
    Vanilla,
    Chocolate,
    Strawberry,
    Mint,
    Caramel,
    Lemon,
    Blueberry,
    Matcha,
    Mango,
    Cookie,
}

/// The fixed tone of one flavor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlavorProfile {
    pub waveform: Waveform,
    /// Base pitch in Hz.
    pub frequency: f32,
    /// Seconds.
    pub length: f32,
}

const fn profile(waveform: Waveform, frequency: f32, length: f32) -> FlavorProfile {
    FlavorProfile {
        waveform,
        frequency,
        length,
    }
}

const PROFILES: [FlavorProfile; 10] = [
    profile(Waveform::Sine, 523.25, 0.15),
    profile(Waveform::Triangle, 392.00, 0.20),
    profile(Waveform::Sine, 659.25, 0.12),
    profile(Waveform::Triangle, 783.99, 0.10),
    profile(Waveform::Sine, 440.00, 0.18),
    profile(Waveform::Square, 880.00, 0.08),
    profile(Waveform::Triangle, 493.88, 0.15),
    profile(Waveform::Sine, 349.23, 0.22),
    profile(Waveform::Square, 587.33, 0.10),
    profile(Waveform::Sawtooth, 293.66, 0.16),
];

impl Flavor {
    pub const ALL: [Flavor; 10] = [
        Flavor::Vanilla,
        Flavor::Chocolate,
        Flavor::Strawberry,
        Flavor::Mint,
        Flavor::Caramel,
        Flavor::Lemon,
        Flavor::Blueberry,
        Flavor::Matcha,
        Flavor::Mango,
        Flavor::Cookie,
    ];

    /// Position in [`Flavor::ALL`], 0 to 9.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Flavor> {
        Self::ALL.get(index).copied()
    }

    pub fn profile(self) -> FlavorProfile {
        PROFILES[self.index()]
    }

    pub fn name(self) -> &'static str {
        match self {
            Flavor::Vanilla => "vanilla",
            Flavor::Chocolate => "chocolate",
            Flavor::Strawberry => "strawberry",
            Flavor::Mint => "mint",
            Flavor::Caramel => "caramel",
            Flavor::Lemon => "lemon",
            Flavor::Blueberry => "blueberry",
            Flavor::Matcha => "matcha",
            Flavor::Mango => "mango",
            Flavor::Cookie => "cookie",
        }
    }
}

pub(super) fn plop(flavor: Flavor) -> Tone {
    let FlavorProfile {
        waveform,
        frequency,
        length,
    } = flavor.profile();

    Tone {
        waveform,
        offset: 0.0,
        duration: f64::from(length),
        frequency: Curve::starting_at(frequency)
            .linear_to(frequency, length * HOLD)
            .exponential_to(frequency * GLIDE, length),
        gain: Curve::starting_at(PEAK).exponential_to(TAIL, length),
    }
}
