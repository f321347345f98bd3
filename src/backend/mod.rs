//! Audio clock and output device abstractions.
//!
//! The engine never talks to a sound card directly. It needs two things:
//!
//! - an [`AudioClock`]: the monotonic clock of the output, plus the ability
//!   to commit a voice (or a music-gain ramp) to an absolute time on it;
//! - an optional [`OutputDevice`]: something that may start out suspended
//!   and must be resumed before sound is produced.
//!
//! [`stream`] provides the lock-free clock used for real output and for
//! offline rendering, [`device`] opens the default cpal output, and
//! [`manual`] is a hand-driven clock for deterministic drivers and tests.

pub mod device;
pub mod manual;
pub mod stream;

use crate::{error::BackendError, synth::voice::Voice};

pub use device::CpalOutput;
pub use manual::{ManualClock, ManualDevice, MusicRamp};
pub use stream::StreamHandle;

/// Outcome of committing a voice to the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    /// The voice will sound over its start/stop window.
    Committed,
    /// Its start already passed; dropped rather than played late.
    Late,
    /// The command queue to the audio thread was full; dropped.
    QueueFull,
}

/// Monotonic output clock that voices are scheduled against.
pub trait AudioClock: Send {
    /// Seconds since the clock's epoch (fixed when the backend came up).
    fn now(&self) -> f64;

    /// Commit a voice. Timing is fixed from here on.
    fn schedule(&mut self, voice: Voice) -> Schedule;

    /// Glide the music bus to `target` over `ramp` seconds from `at`.
    ///
    /// Never [`Schedule::Late`]; a ramp in the past just snaps.
    fn ramp_music_gain(&mut self, target: f32, at: f64, ramp: f64) -> Schedule;
}

/// Output that may need resuming (e.g. a platform that starts audio
/// paused until the user interacts).
pub trait OutputDevice {
    fn is_suspended(&self) -> bool;

    fn resume(&mut self) -> Result<(), BackendError>;
}

/// Whether `voice` has missed its slot at clock time `now`.
///
/// A voice that has already stopped is always late. One that has started
/// is late once it is more than `tolerance` behind; the tolerance absorbs
/// the clock moving between reading `now` and committing.
pub fn is_late(voice: &Voice, now: f64, tolerance: f64) -> bool {
    voice.stop() <= now || voice.start() < now - tolerance
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dsp::{Curve, Waveform},
        synth::voice::Bus,
    };

    fn voice(start: f64, stop: f64) -> Voice {
        Voice::new(
            Bus::Music,
            Waveform::Sine,
            Curve::constant(220.0),
            Curve::constant(0.1),
            start,
            stop,
        )
        .unwrap()
    }

    #[test]
    fn lateness_rules() {
        // in the future
        assert!(!is_late(&voice(1.1, 1.2), 1.0, 0.02));
        // just started, within tolerance
        assert!(!is_late(&voice(0.99, 1.5), 1.0, 0.02));
        // started too long ago
        assert!(is_late(&voice(0.5, 1.5), 1.0, 0.02));
        // already over
        assert!(is_late(&voice(0.99, 1.0), 1.0, 0.02));
    }
}
