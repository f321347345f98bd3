//! Success arpeggio.
//!
//! Four triangle notes climbing a major chord, C5 E5 G5 C6, entering 80 ms
//! apart. Each rings for 400 ms so the notes overlap into a chord.

use crate::{
    dsp::{Curve, Waveform},
    sequencing::notes::{C5, C6, E5, G5},
};

use super::Tone;

const NOTES: [f32; 4] = [C5, E5, G5, C6];
const SPACING: f64 = 0.08;
const RING: f32 = 0.4;

pub(super) fn arpeggio() -> Vec<Tone> {
    NOTES
        .iter()
        .enumerate()
        .map(|(i, &pitch)| Tone {
            waveform: Waveform::Triangle,
            offset: SPACING * i as f64,
            duration: f64::from(RING),
            frequency: Curve::constant(pitch),
            gain: Curve::starting_at(0.2).exponential_to(0.001, RING),
        })
        .collect()
}
