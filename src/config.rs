use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    LATE_TOLERANCE, LOOKAHEAD, MAX_VOICES, MUSIC_RAMP, QUEUE_CAPACITY, START_OFFSET,
    TICK_INTERVAL,
};

/// How the sequencer polling tick is driven.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerMode {
    /// A dedicated thread wakes every `tick_interval` while music runs.
    Thread,
    /// The owner calls `Engine::poll` itself (game loops, tests).
    Manual,
}

/// Engine parameters. Times are in seconds on the audio clock unless noted.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Initial tempo in beats per minute.
    pub bpm: f64,
    pub sfx_volume: f32,
    pub music_volume: f32,
    /// How far ahead of the clock notes are committed.
    pub lookahead: f64,
    /// Wall-clock polling cadence, independent of tempo.
    pub tick_interval: Duration,
    /// Delay between starting music and its first note.
    pub start_offset: f64,
    /// Length of the music bus glide on a volume change.
    pub music_ramp: f64,
    /// How far behind the clock a voice may start and still be committed.
    pub late_tolerance: f64,
    /// Slots in the control-to-audio command ring.
    pub queue_capacity: usize,
    /// Voices that may sound at once.
    pub max_voices: usize,
    pub timer: TimerMode,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            bpm: 110.0,
            sfx_volume: 0.5,
            music_volume: 0.3,
            lookahead: LOOKAHEAD,
            tick_interval: TICK_INTERVAL,
            start_offset: START_OFFSET,
            music_ramp: MUSIC_RAMP,
            late_tolerance: LATE_TOLERANCE,
            queue_capacity: QUEUE_CAPACITY,
            max_voices: MAX_VOICES,
            timer: TimerMode::Thread,
        }
    }
}

impl EngineConfig {
    pub fn bpm(mut self, bpm: f64) -> Self {
        self.bpm = bpm;
        self
    }

    pub fn volumes(mut self, sfx: f32, music: f32) -> Self {
        self.sfx_volume = sfx;
        self.music_volume = music;
        self
    }

    pub fn lookahead(mut self, seconds: f64) -> Self {
        self.lookahead = seconds;
        self
    }

    pub fn tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    pub fn queue_capacity(mut self, slots: usize) -> Self {
        self.queue_capacity = slots;
        self
    }

    pub fn max_voices(mut self, voices: usize) -> Self {
        self.max_voices = voices;
        self
    }

    pub fn timer(mut self, timer: TimerMode) -> Self {
        self.timer = timer;
        self
    }

    /// Replace any out-of-range field with its default.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        if !(self.bpm.is_finite() && self.bpm > 0.0) {
            warn!(bpm = self.bpm, "invalid initial tempo, using default");
            self.bpm = defaults.bpm;
        }
        if !(0.0..=1.0).contains(&self.sfx_volume) {
            warn!(volume = self.sfx_volume, "invalid initial sfx volume, using default");
            self.sfx_volume = defaults.sfx_volume;
        }
        if !(0.0..=1.0).contains(&self.music_volume) {
            warn!(volume = self.music_volume, "invalid initial music volume, using default");
            self.music_volume = defaults.music_volume;
        }
        if !(self.lookahead.is_finite() && self.lookahead > 0.0) {
            warn!(lookahead = self.lookahead, "invalid lookahead, using default");
            self.lookahead = defaults.lookahead;
        }
        if self.tick_interval.is_zero() {
            warn!("zero tick interval, using default");
            self.tick_interval = defaults.tick_interval;
        }
        if !(self.start_offset.is_finite() && self.start_offset >= 0.0) {
            self.start_offset = defaults.start_offset;
        }
        if !(self.music_ramp.is_finite() && self.music_ramp >= 0.0) {
            self.music_ramp = defaults.music_ramp;
        }
        if !(self.late_tolerance.is_finite() && self.late_tolerance >= 0.0) {
            self.late_tolerance = defaults.late_tolerance;
        }
        if self.queue_capacity == 0 {
            self.queue_capacity = defaults.queue_capacity;
        }
        if self.max_voices == 0 {
            self.max_voices = defaults.max_voices;
        }

        self
    }
}
