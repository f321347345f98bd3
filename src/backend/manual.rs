use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Arc, Mutex,
};

use crate::{
    backend::{is_late, AudioClock, OutputDevice, Schedule},
    error::BackendError,
    synth::voice::Voice,
    LATE_TOLERANCE,
};

/// A music gain change as posted to the clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MusicRamp {
    pub target: f32,
    pub at: f64,
    pub ramp: f64,
}

#[derive(Debug, Default)]
struct Ledger {
    voices: Vec<Voice>,
    late: usize,
    ramps: Vec<MusicRamp>,
}

/// Hand-driven audio clock that records everything committed to it.
///
/// Clones share the same time and ledger, so one copy can be given to an
/// `Engine` while another advances time and inspects what was scheduled.
/// No audio is produced.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now_bits: Arc<AtomicU64>,
    ledger: Arc<Mutex<Ledger>>,
    late_tolerance: f64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now_bits: Arc::new(AtomicU64::new(0.0f64.to_bits())),
            ledger: Arc::new(Mutex::new(Ledger::default())),
            late_tolerance: LATE_TOLERANCE,
        }
    }

    /// Move the clock forward by `seconds`. Negative values are ignored.
    pub fn advance(&self, seconds: f64) {
        let next = self.now() + seconds.max(0.0);
        self.now_bits.store(next.to_bits(), Ordering::Release);
    }

    /// Every voice committed so far, in commit order.
    pub fn voices(&self) -> Vec<Voice> {
        self.ledger
            .lock()
            .map(|ledger| ledger.voices.clone())
            .unwrap_or_default()
    }

    /// Number of voices dropped for missing their start time.
    pub fn late_count(&self) -> usize {
        self.ledger.lock().map(|ledger| ledger.late).unwrap_or(0)
    }

    pub fn music_ramps(&self) -> Vec<MusicRamp> {
        self.ledger
            .lock()
            .map(|ledger| ledger.ramps.clone())
            .unwrap_or_default()
    }

    /// Forget everything recorded so far. Time is left alone.
    pub fn clear(&self) {
        if let Ok(mut ledger) = self.ledger.lock() {
            *ledger = Ledger::default();
        }
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioClock for ManualClock {
    fn now(&self) -> f64 {
        f64::from_bits(self.now_bits.load(Ordering::Acquire))
    }

    fn schedule(&mut self, voice: Voice) -> Schedule {
        let late = is_late(&voice, self.now(), self.late_tolerance);
        if let Ok(mut ledger) = self.ledger.lock() {
            if late {
                ledger.late += 1;
            } else {
                ledger.voices.push(voice);
            }
        }

        if late {
            Schedule::Late
        } else {
            Schedule::Committed
        }
    }

    fn ramp_music_gain(&mut self, target: f32, at: f64, ramp: f64) -> Schedule {
        if let Ok(mut ledger) = self.ledger.lock() {
            ledger.ramps.push(MusicRamp { target, at, ramp });
        }
        Schedule::Committed
    }
}

/// Output device stand-in that can be told to start suspended or to
/// refuse resuming. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct ManualDevice {
    suspended: Arc<AtomicBool>,
    refuse_resume: Arc<AtomicBool>,
}

impl ManualDevice {
    pub fn suspended() -> Self {
        let device = Self::default();
        device.suspended.store(true, Ordering::Relaxed);
        device
    }

    pub fn refuse_resume(&self, refuse: bool) {
        self.refuse_resume.store(refuse, Ordering::Relaxed);
    }
}

impl OutputDevice for ManualDevice {
    fn is_suspended(&self) -> bool {
        self.suspended.load(Ordering::Relaxed)
    }

    fn resume(&mut self) -> Result<(), BackendError> {
        if self.refuse_resume.load(Ordering::Relaxed) {
            return Err(BackendError::Resume("resume refused".into()));
        }
        self.suspended.store(false, Ordering::Relaxed);
        Ok(())
    }
}
