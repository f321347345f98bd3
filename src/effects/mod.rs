//! One-shot sound effects.
//!
//! Every effect is a short burst of one or more tones, each an oscillator
//! with its own pitch and gain curve. Tones are described relative to the
//! moment of triggering and become absolute voices only when fired, with
//! the effect volume baked into their gain.
//!
//! | Effect       | Tones | Sound                                          |
//! |--------------|-------|------------------------------------------------|
//! | Acknowledge  | 1     | sine pop, 600 to 300 Hz over 100 ms            |
//! | BuildItem    | 1     | one of ten flavor profiles, slight down-glide  |
//! | Success      | 4     | triangle arpeggio, 80 ms apart                 |
//! | Error        | 1     | sawtooth buzz, 150 to 100 Hz over 300 ms       |
//! | SessionEnd   | 1     | stepped square 200/150/100 Hz with a 1 s fade  |

mod build;
mod buzz;
mod pop;
mod session_end;
mod success;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    dsp::{Curve, Waveform},
    error::VoiceError,
    synth::voice::{Bus, Voice},
};

pub use build::{Flavor, FlavorProfile};

/// A sound the caller can fire.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Effect {
    /// Short pop confirming an input.
    Acknowledge,
    /// A new item was built; each flavor has its own tone.
    BuildItem(Flavor),
    Success,
    Error,
    /// Descending farewell at the end of a session.
    SessionEnd,
}

impl Effect {
    pub fn name(self) -> &'static str {
        match self {
            Effect::Acknowledge => "acknowledge",
            Effect::BuildItem(_) => "build-item",
            Effect::Success => "success",
            Effect::Error => "error",
            Effect::SessionEnd => "session-end",
        }
    }

    /// The effect's tones, relative to the trigger time.
    pub fn tones(self) -> Vec<Tone> {
        match self {
            Effect::Acknowledge => vec![pop::acknowledge()],
            Effect::BuildItem(flavor) => vec![build::plop(flavor)],
            Effect::Success => success::arpeggio(),
            Effect::Error => vec![buzz::buzz()],
            Effect::SessionEnd => vec![session_end::knell()],
        }
    }

    /// Voices for firing this effect at clock time `now`.
    pub fn voices(self, now: f64, sfx_volume: f32) -> Vec<Voice> {
        self.tones()
            .iter()
            .filter_map(|tone| match tone.voice(now, sfx_volume) {
                Ok(voice) => Some(voice),
                Err(err) => {
                    warn!(effect = self.name(), %err, "skipping tone");
                    None
                }
            })
            .collect()
    }

    /// Time from trigger until the last tone stops.
    pub fn duration(self) -> f64 {
        self.tones()
            .iter()
            .map(|tone| tone.offset + tone.duration)
            .fold(0.0, f64::max)
    }
}

/// One tone of an effect, timed relative to the trigger.
#[derive(Debug, Clone, PartialEq)]
pub struct Tone {
    pub waveform: Waveform,
    /// Delay after the trigger, in seconds.
    pub offset: f64,
    pub duration: f64,
    pub frequency: Curve,
    /// Gain at full effect volume.
    pub gain: Curve,
}

impl Tone {
    /// Pin the tone to the clock and scale it by the effect volume.
    pub fn voice(&self, now: f64, sfx_volume: f32) -> Result<Voice, VoiceError> {
        let start = now + self.offset;
        Voice::new(
            Bus::Effects,
            self.waveform,
            self.frequency.clone(),
            self.gain.clone().scaled(sfx_volume),
            start,
            start + self.duration,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_effects() -> Vec<Effect> {
        let mut effects = vec![
            Effect::Acknowledge,
            Effect::Success,
            Effect::Error,
            Effect::SessionEnd,
        ];
        effects.extend(Flavor::ALL.into_iter().map(Effect::BuildItem));
        effects
    }

    #[test]
    fn every_effect_builds_effect_bus_voices() {
        for effect in all_effects() {
            let voices = effect.voices(3.0, 0.5);
            assert!(!voices.is_empty(), "{} is silent", effect.name());
            for voice in voices {
                assert_eq!(voice.bus(), Bus::Effects);
                assert!(voice.start() >= 3.0);
                assert!(voice.stop() > voice.start());
            }
        }
    }

    #[test]
    fn zero_volume_voices_are_silent() {
        for effect in all_effects() {
            for voice in effect.voices(0.0, 0.0) {
                assert!(voice.gain().points().iter().all(|p| p.value == 0.0));
            }
        }
    }

    #[test]
    fn volume_scales_the_gain_curve() {
        let full = Effect::Error.voices(0.0, 1.0);
        let half = Effect::Error.voices(0.0, 0.5);
        assert!((half[0].gain().peak() - full[0].gain().peak() * 0.5).abs() < 1e-6);
    }

    #[test]
    fn success_is_four_rising_notes() {
        let voices = Effect::Success.voices(1.0, 1.0);
        assert_eq!(voices.len(), 4);

        for (i, voice) in voices.iter().enumerate() {
            assert_eq!(voice.waveform(), Waveform::Triangle);
            assert!((voice.start() - (1.0 + 0.08 * i as f64)).abs() < 1e-9);
            assert!((voice.duration() - 0.4).abs() < 1e-6);
        }
        let pitches: Vec<f32> = voices.iter().map(|v| v.frequency().value_at(0.0)).collect();
        assert!(pitches.windows(2).all(|p| p[1] > p[0]));
    }

    #[test]
    fn durations_match_their_sounds() {
        assert!((Effect::Acknowledge.duration() - 0.1).abs() < 1e-6);
        assert!((Effect::Error.duration() - 0.3).abs() < 1e-6);
        assert!((Effect::Success.duration() - 0.64).abs() < 1e-6);
        assert!((Effect::SessionEnd.duration() - 1.4).abs() < 1e-6);
    }
}
