use crate::{
    backend::{AudioClock, Schedule},
    error::ParamError,
};

/*
Mixer Buses
===========

Two gain stages feed the output:

  music voices ──► Music Bus (ramped gain) ──┐
                                             ├──► hard limit ──► device
  effect voices ─────────────────────────────┘

Music Bus
---------

One gain governs the whole backing track. A volume change is never applied
as a jump: the render side glides linearly from whatever value it is at to
the new target over a short interval. The control side (`MusicBus`) only
remembers the last target and posts ramp commands; the render side
(`GainRamp`) evaluates the ramp per sample.

    gain
    0.6 ┤        ╱‾‾‾‾‾‾
        │       ╱
    0.2 ┤──────╱
        └──────┬────┬────→ clock
               at   at + ramp

Effects Bus
-----------

Effects are too short to need smoothing, so there is no shared node. Each
effect voice bakes the effect volume into its gain curve when it is
created; later volume changes only affect later effects.
*/

/// Effect and music volume, each within [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeState {
    sfx: f32,
    music: f32,
}

impl VolumeState {
    pub fn new(sfx: f32, music: f32) -> Result<Self, ParamError> {
        Ok(Self {
            sfx: check_volume("sfx", sfx)?,
            music: check_volume("music", music)?,
        })
    }

    /// Replace both volumes, or neither if either is out of range.
    pub fn set(&mut self, sfx: f32, music: f32) -> Result<(), ParamError> {
        *self = Self::new(sfx, music)?;
        Ok(())
    }

    pub fn sfx(&self) -> f32 {
        self.sfx
    }

    pub fn music(&self) -> f32 {
        self.music
    }
}

impl Default for VolumeState {
    fn default() -> Self {
        Self {
            sfx: 0.5,
            music: 0.3,
        }
    }
}

fn check_volume(name: &'static str, value: f32) -> Result<f32, ParamError> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(ParamError::InvalidVolume { name, value })
    }
}

/// Control-side handle to the music gain stage.
///
/// Created on the first transport start; lives for the rest of the engine.
#[derive(Debug)]
pub struct MusicBus {
    /// Last level the audio thread accepted.
    gain: Option<f32>,
}

impl MusicBus {
    /// Install the bus at `gain` without a ramp.
    pub fn create(clock: &mut dyn AudioClock, gain: f32) -> Self {
        let mut bus = Self { gain: None };
        bus.post(clock, gain, 0.0);
        bus
    }

    /// Glide to `gain` over `ramp` seconds starting now. A change the
    /// queue refused is retried by the next call.
    pub fn set_gain(&mut self, clock: &mut dyn AudioClock, gain: f32, ramp: f64) {
        if self.gain == Some(gain) {
            return;
        }
        self.post(clock, gain, ramp);
    }

    fn post(&mut self, clock: &mut dyn AudioClock, gain: f32, ramp: f64) {
        let now = clock.now();
        if clock.ramp_music_gain(gain, now, ramp) == Schedule::Committed {
            self.gain = Some(gain);
        }
    }

    /// `None` until a level has reached the audio thread.
    pub fn gain(&self) -> Option<f32> {
        self.gain
    }
}

/// Render-side music gain as a function of clock time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GainRamp {
    from: f32,
    to: f32,
    start: f64,
    end: f64,
}

impl GainRamp {
    pub fn constant(gain: f32) -> Self {
        Self {
            from: gain,
            to: gain,
            start: 0.0,
            end: 0.0,
        }
    }

    #[inline]
    pub fn value_at(&self, t: f64) -> f32 {
        if t <= self.start {
            self.from
        } else if t >= self.end {
            self.to
        } else {
            let progress = ((t - self.start) / (self.end - self.start)) as f32;
            self.from + (self.to - self.from) * progress
        }
    }

    /// Start a new ramp at `at` from the value the current ramp has there.
    pub fn retarget(&mut self, target: f32, at: f64, ramp: f64) {
        let from = self.value_at(at);
        *self = Self {
            from,
            to: target,
            start: at,
            end: at + ramp.max(0.0),
        };
    }

    pub fn target(&self) -> f32 {
        self.to
    }
}
