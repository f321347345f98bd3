use std::sync::{
    atomic::{AtomicU64, AtomicUsize, Ordering},
    Arc,
};

use rtrb::{Consumer, Producer};

use crate::{
    synth::{
        message::{Command, CommandReceiver},
        mixer::GainRamp,
        voice::{Bus, Voice},
    },
    MAX_BLOCK_SIZE,
};

/// Clock state published by the renderer and read by the control side.
///
/// The rendered frame count *is* the audio clock: `now()` is the time of
/// the next sample the device will be handed.
#[derive(Debug)]
pub struct ClockState {
    sample_rate: f32,
    frames: AtomicU64,
    active_voices: AtomicUsize,
}

impl ClockState {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            frames: AtomicU64::new(0),
            active_voices: AtomicUsize::new(0),
        }
    }

    pub fn now(&self) -> f64 {
        self.frames.load(Ordering::Acquire) as f64 / self.sample_rate as f64
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn active_voices(&self) -> usize {
        self.active_voices.load(Ordering::Relaxed)
    }
}

/// Audio-thread half of the engine: owns every started voice.
///
/// Each block it drains pending commands, mixes the voice arena through
/// the two buses, hard-limits the result, and reaps voices whose stop time
/// has passed. Nothing here allocates after construction.
pub struct Renderer<R: CommandReceiver = Consumer<Command>> {
    rx: R,
    voices: Vec<Voice>,
    max_voices: usize,
    music_gain: GainRamp,
    clock: Arc<ClockState>,
    frame: u64,
    scratch: Vec<f32>,
    scope: Option<Producer<f32>>,
    refused: u64,
}

impl<R: CommandReceiver> Renderer<R> {
    pub fn new(rx: R, clock: Arc<ClockState>, max_voices: usize) -> Self {
        Self {
            rx,
            voices: Vec::with_capacity(max_voices),
            max_voices,
            music_gain: GainRamp::constant(0.0),
            clock,
            frame: 0,
            scratch: vec![0.0; MAX_BLOCK_SIZE],
            scope: None,
            refused: 0,
        }
    }

    /// Mirror the mono mix into `scope` for visualisation.
    pub fn with_scope(mut self, scope: Producer<f32>) -> Self {
        self.scope = Some(scope);
        self
    }

    /// Render mono samples into `out`.
    pub fn render(&mut self, out: &mut [f32]) {
        self.drain();

        let sample_rate = self.clock.sample_rate;
        let dt = 1.0 / sample_rate as f64;

        for (i, sample) in out.iter_mut().enumerate() {
            let t = (self.frame + i as u64) as f64 * dt;
            let music_gain = self.music_gain.value_at(t);

            let mut mix = 0.0;
            for voice in self.voices.iter_mut() {
                let s = voice.next_sample(t, sample_rate);
                mix += match voice.bus() {
                    Bus::Music => s * music_gain,
                    Bus::Effects => s,
                };
            }

            *sample = mix.clamp(-1.0, 1.0);
            if let Some(scope) = self.scope.as_mut() {
                let _ = scope.push(*sample);
            }
        }

        self.frame += out.len() as u64;
        let now = self.frame as f64 * dt;
        self.voices.retain(|v| !v.is_finished(now));

        self.clock
            .active_voices
            .store(self.voices.len(), Ordering::Relaxed);
        self.clock.frames.store(self.frame, Ordering::Release);
    }

    /// Render into an interleaved device buffer, copying mono to every channel.
    pub fn render_interleaved(&mut self, data: &mut [f32], channels: usize) {
        let channels = channels.max(1);
        let total_frames = data.len() / channels;
        let mut frames_written = 0;

        // Take the scratch buffer so `render` can borrow self mutably.
        let mut block = std::mem::take(&mut self.scratch);

        while frames_written < total_frames {
            let frames_to_render = (total_frames - frames_written).min(MAX_BLOCK_SIZE);
            let mono = &mut block[..frames_to_render];
            self.render(mono);

            let out_off = frames_written * channels;
            for (i, &s) in mono.iter().enumerate() {
                for ch in 0..channels {
                    data[out_off + i * channels + ch] = s;
                }
            }

            frames_written += frames_to_render;
        }

        self.scratch = block;
    }

    fn drain(&mut self) {
        while let Some(command) = self.rx.pop() {
            match command {
                Command::Start(voice) => {
                    if self.voices.len() < self.max_voices {
                        self.voices.push(voice);
                    } else {
                        self.refused += 1;
                    }
                }
                Command::MusicGain { target, at, ramp } => {
                    self.music_gain.retarget(target, at, ramp);
                }
            }
        }
    }

    /// Clock time of the next sample to be rendered.
    pub fn now(&self) -> f64 {
        self.frame as f64 / self.clock.sample_rate as f64
    }

    pub fn active_voices(&self) -> usize {
        self.voices.len()
    }

    /// Voices turned away because the arena was full.
    pub fn refused_voices(&self) -> u64 {
        self.refused
    }

    pub fn music_gain(&self) -> &GainRamp {
        &self.music_gain
    }
}
