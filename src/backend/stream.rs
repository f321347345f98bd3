use std::sync::Arc;

use rtrb::{Producer, RingBuffer};
use tracing::{trace, warn};

use crate::{
    backend::{is_late, AudioClock, Schedule},
    config::EngineConfig,
    synth::{
        message::Command,
        renderer::{ClockState, Renderer},
        voice::Voice,
    },
};

/// Control-side half of an output stream.
///
/// Commands cross to the audio thread through a single-producer,
/// single-consumer ring; the clock comes back as an atomic frame count.
/// Neither direction can block the audio thread.
pub struct StreamHandle {
    tx: Producer<Command>,
    clock: Arc<ClockState>,
    late_tolerance: f64,
}

/// Create a connected control half and renderer.
///
/// Move the renderer into a device callback for real-time output, or keep
/// it and call [`Renderer::render`] to bounce offline.
pub fn channel(sample_rate: f32, config: &EngineConfig) -> (StreamHandle, Renderer) {
    let (tx, rx) = RingBuffer::<Command>::new(config.queue_capacity);
    let clock = Arc::new(ClockState::new(sample_rate));

    let handle = StreamHandle {
        tx,
        clock: Arc::clone(&clock),
        late_tolerance: config.late_tolerance,
    };
    let renderer = Renderer::new(rx, clock, config.max_voices);

    (handle, renderer)
}

impl StreamHandle {
    pub fn clock(&self) -> &Arc<ClockState> {
        &self.clock
    }

    pub fn sample_rate(&self) -> f32 {
        self.clock.sample_rate()
    }
}

impl AudioClock for StreamHandle {
    fn now(&self) -> f64 {
        self.clock.now()
    }

    fn schedule(&mut self, voice: Voice) -> Schedule {
        let now = self.now();
        if is_late(&voice, now, self.late_tolerance) {
            trace!(start = voice.start(), now, "dropping late voice");
            return Schedule::Late;
        }

        match self.tx.push(Command::Start(voice)) {
            Ok(()) => Schedule::Committed,
            Err(_) => {
                warn!("command queue full, dropping voice");
                Schedule::QueueFull
            }
        }
    }

    fn ramp_music_gain(&mut self, target: f32, at: f64, ramp: f64) -> Schedule {
        match self.tx.push(Command::MusicGain { target, at, ramp }) {
            Ok(()) => Schedule::Committed,
            Err(_) => {
                warn!(gain = target, "command queue full, dropping music gain change");
                Schedule::QueueFull
            }
        }
    }
}
