//! Session-end knell.
//!
//! A square wave walking down 200, 150, 100 Hz, then fading out.
//!
//! ```text
//!  Hz   200 ──┐
//!       150   └──┐
//!       100      └───────────────────
//!  gain 0.2 ─────────╲
//!                      ╲______   (linear to 0 over 1 s)
//!       0s    0.2  0.4          1.4s
//! ```

use crate::dsp::{Curve, Waveform};

use super::Tone;

/// Length of each pitch step.
const STEP: f32 = 0.2;
const FADE: f32 = 1.0;

pub(super) fn knell() -> Tone {
    let hold = 2.0 * STEP;
    let length = hold + FADE;
    Tone {
        waveform: Waveform::Square,
        offset: 0.0,
        duration: f64::from(length),
        frequency: Curve::starting_at(200.0)
            .step_to(150.0, STEP)
            .step_to(100.0, hold),
        gain: Curve::starting_at(0.2)
            .linear_to(0.2, hold)
            .linear_to(0.0, length),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pitch_steps_down_then_fades() {
        let tone = knell();
        assert_eq!(tone.frequency.value_at(0.1), 200.0);
        assert_eq!(tone.frequency.value_at(0.3), 150.0);
        assert_eq!(tone.frequency.value_at(0.5), 100.0);

        assert_eq!(tone.gain.value_at(0.3), 0.2);
        assert!((tone.gain.value_at(0.9) - 0.1).abs() < 1e-4);
        assert!(tone.gain.value_at(1.4).abs() < 1e-6);
    }
}
