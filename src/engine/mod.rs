//! The engine facade: what the rest of a program talks to.
//!
//! ```text
//!   caller ──► Engine ──┬─► Core (Mutex) ◄── Ticker thread (every ~25 ms)
//!                       │     ├─ clock (AudioClock) ──► rtrb ring ──► audio thread
//!                       │     ├─ tempo, volumes, music bus
//!                       │     └─ PlaybackSession (cursors)
//!                       └─► OutputDevice (resume on demand)
//! ```
//!
//! The mutex is only ever shared between control-side threads. The audio
//! thread sees nothing but the command ring and the atomic clock.

pub mod sequencer;
pub mod session;
pub mod transport;

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use rtrb::{Consumer, Producer, RingBuffer};
use tracing::{debug, info, trace, warn};

use crate::{
    backend::{AudioClock, CpalOutput, OutputDevice, Schedule, StreamHandle},
    config::{EngineConfig, TimerMode},
    effects::Effect,
    error::ParamError,
    sequencing::{Part, TempoState},
    synth::{mixer::VolumeState, renderer::ClockState, MusicBus},
};

pub use sequencer::{FillReport, Sequencer};
pub use session::{PlaybackSession, SequencerCursor};
pub use transport::{Ticker, TransportState};

/// State the control thread and the polling thread share.
struct Core {
    /// `None` when no audio backend could be opened.
    clock: Option<Box<dyn AudioClock>>,
    tempo: TempoState,
    volumes: VolumeState,
    music_bus: Option<MusicBus>,
    session: Option<PlaybackSession>,
    sequencer: Sequencer,
    state: TransportState,
    start_offset: f64,
    music_ramp: f64,
}

impl Core {
    fn poll(&mut self) -> FillReport {
        match (self.clock.as_deref_mut(), self.session.as_mut()) {
            (Some(clock), Some(session)) => self.sequencer.fill(session, &self.tempo, clock),
            _ => FillReport::default(),
        }
    }

    /// Open a fresh session and fill the first lookahead window.
    fn start(&mut self) -> bool {
        let Some(clock) = self.clock.as_deref_mut() else {
            return false;
        };

        self.state = TransportState::Starting;
        if self.music_bus.is_none() {
            self.music_bus = Some(MusicBus::create(clock, self.volumes.music()));
        }
        let start = clock.now() + self.start_offset;
        self.session = Some(PlaybackSession::new(start));

        let report = self.poll();
        debug!(start, committed = report.committed, "music session opened");
        true
    }

    fn stop(&mut self) {
        self.session = None;
        self.state = TransportState::Stopped;
    }
}

/// Procedural audio engine: continuous music plus on-demand effects.
///
/// Every operation is safe to call at any time. With no audio backend the
/// engine is muted and every call is a no-op.
pub struct Engine {
    config: EngineConfig,
    core: Arc<Mutex<Core>>,
    device: Option<Box<dyn OutputDevice>>,
    ticker: Option<Ticker>,
    live_tickers: Arc<AtomicUsize>,
    render_clock: Option<Arc<ClockState>>,
}

impl Engine {
    /// Build an engine over any clock and optional device.
    pub fn new(
        config: EngineConfig,
        clock: Box<dyn AudioClock>,
        device: Option<Box<dyn OutputDevice>>,
    ) -> Self {
        Self::build(config, Some(clock), device, None)
    }

    /// An engine with no backend. Everything it is asked to do is ignored.
    pub fn muted(config: EngineConfig) -> Self {
        Self::build(config, None, None, None)
    }

    /// Drive the control half of a stream, e.g. one from
    /// [`crate::backend::stream::channel`] for offline rendering.
    pub fn with_stream(
        config: EngineConfig,
        stream: StreamHandle,
        device: Option<Box<dyn OutputDevice>>,
    ) -> Self {
        let render_clock = Arc::clone(stream.clock());
        Self::build(config, Some(Box::new(stream)), device, Some(render_clock))
    }

    /// Open the default output device, or fall back to a muted engine.
    pub fn connect_default(config: EngineConfig) -> Self {
        Self::connect(config, None)
    }

    /// Like [`Engine::connect_default`], also returning a tap of the mono
    /// mix for visualisation. The tap is `None` when muted.
    pub fn connect_default_with_scope(
        config: EngineConfig,
        scope_capacity: usize,
    ) -> (Self, Option<Consumer<f32>>) {
        let (tx, rx) = RingBuffer::<f32>::new(scope_capacity.max(1));
        let engine = Self::connect(config, Some(tx));
        let scope = if engine.is_muted() { None } else { Some(rx) };
        (engine, scope)
    }

    fn connect(config: EngineConfig, scope: Option<Producer<f32>>) -> Self {
        let config = config.sanitized();
        match CpalOutput::connect_default(&config, scope) {
            Ok((stream, output)) => Self::with_stream(config, stream, Some(Box::new(output))),
            Err(err) => {
                warn!(%err, "audio unavailable, running muted");
                Self::muted(config)
            }
        }
    }

    fn build(
        config: EngineConfig,
        clock: Option<Box<dyn AudioClock>>,
        device: Option<Box<dyn OutputDevice>>,
        render_clock: Option<Arc<ClockState>>,
    ) -> Self {
        let config = config.sanitized();
        let tempo = TempoState::new(config.bpm).unwrap_or_default();
        let volumes =
            VolumeState::new(config.sfx_volume, config.music_volume).unwrap_or_default();

        let core = Core {
            clock,
            tempo,
            volumes,
            music_bus: None,
            session: None,
            sequencer: Sequencer::new(config.lookahead),
            state: TransportState::Stopped,
            start_offset: config.start_offset,
            music_ramp: config.music_ramp,
        };

        Self {
            config,
            core: Arc::new(Mutex::new(core)),
            device,
            ticker: None,
            live_tickers: Arc::new(AtomicUsize::new(0)),
            render_clock,
        }
    }

    fn with_core<T>(&self, f: impl FnOnce(&mut Core) -> T) -> Option<T> {
        match self.core.lock() {
            Ok(mut core) => Some(f(&mut *core)),
            Err(_) => {
                warn!("engine state poisoned, ignoring call");
                None
            }
        }
    }

    /// Try to wake a suspended device. `false` means the call should be
    /// dropped.
    fn ensure_resumed(&mut self) -> bool {
        let Some(device) = self.device.as_mut() else {
            return true;
        };
        if !device.is_suspended() {
            return true;
        }
        match device.resume() {
            Ok(()) => {
                info!("audio output resumed");
                true
            }
            Err(err) => {
                debug!(%err, "audio output still suspended, dropping call");
                false
            }
        }
    }

    /// Set effect and music volume, both within [0, 1].
    ///
    /// Music glides to the new level; effects already sounding keep the
    /// volume they were triggered with. On error neither volume changes.
    pub fn set_volumes(&self, sfx: f32, music: f32) -> Result<(), ParamError> {
        let volumes = VolumeState::new(sfx, music)?;
        self.with_core(|core| {
            core.volumes = volumes;
            let ramp = core.music_ramp;
            if let (Some(bus), Some(clock)) = (core.music_bus.as_mut(), core.clock.as_deref_mut()) {
                bus.set_gain(clock, music, ramp);
            }
        });
        debug!(sfx, music, "volumes set");
        Ok(())
    }

    /// Change the tempo for notes not yet committed.
    pub fn set_tempo(&self, bpm: f64) -> Result<(), ParamError> {
        let tempo = TempoState::new(bpm)?;
        self.with_core(|core| core.tempo = tempo);
        debug!(bpm, "tempo set");
        Ok(())
    }

    /// Start continuous music from the top of both tracks.
    ///
    /// Does nothing if music is already playing, if the engine is muted, or
    /// if a suspended device refuses to resume.
    pub fn start_music(&mut self) {
        if self.transport_state().is_playing() {
            trace!("music already playing");
            return;
        }
        if self.is_muted() || !self.ensure_resumed() {
            return;
        }
        if !self.with_core(Core::start).unwrap_or(false) {
            return;
        }

        if self.config.timer == TimerMode::Thread {
            let core = Arc::clone(&self.core);
            let spawned = Ticker::spawn(
                self.config.tick_interval,
                Arc::clone(&self.live_tickers),
                move || {
                    if let Ok(mut core) = core.lock() {
                        core.poll();
                    }
                },
            );
            match spawned {
                Ok(ticker) => self.ticker = Some(ticker),
                Err(err) => {
                    warn!(%err, "could not start sequencer thread");
                    self.with_core(Core::stop);
                    return;
                }
            }
        }

        self.with_core(|core| core.state = TransportState::Running);
        info!("music started");
    }

    /// Stop scheduling music. Notes already committed play out.
    pub fn stop_music(&mut self) {
        // Cancel before taking the lock: the tick itself locks the core.
        if let Some(ticker) = self.ticker.take() {
            ticker.cancel();
        }
        let was_playing = self
            .with_core(|core| {
                let was = core.state.is_playing();
                core.stop();
                was
            })
            .unwrap_or(false);
        if was_playing {
            info!("music stopped");
        }
    }

    /// Fire a one-shot effect now, at the current effect volume.
    pub fn trigger_effect(&mut self, effect: Effect) {
        if self.is_muted() || !self.ensure_resumed() {
            return;
        }
        self.with_core(|core| {
            let sfx = core.volumes.sfx();
            let Some(clock) = core.clock.as_deref_mut() else {
                return;
            };
            let now = clock.now();
            let mut committed = 0;
            for voice in effect.voices(now, sfx) {
                if clock.schedule(voice) == Schedule::Committed {
                    committed += 1;
                }
            }
            trace!(effect = effect.name(), now, committed, "effect triggered");
        });
    }

    /// Run one sequencer pass by hand. Needed with [`TimerMode::Manual`];
    /// harmless otherwise.
    pub fn poll(&self) -> FillReport {
        self.with_core(Core::poll).unwrap_or_default()
    }

    pub fn transport_state(&self) -> TransportState {
        self.with_core(|core| core.state).unwrap_or_default()
    }

    pub fn is_muted(&self) -> bool {
        self.with_core(|core| core.clock.is_none()).unwrap_or(true)
    }

    pub fn tempo(&self) -> f64 {
        self.with_core(|core| core.tempo.bpm())
            .unwrap_or(self.config.bpm)
    }

    pub fn volumes(&self) -> (f32, f32) {
        self.with_core(|core| (core.volumes.sfx(), core.volumes.music()))
            .unwrap_or((self.config.sfx_volume, self.config.music_volume))
    }

    /// Audio clock time, if there is a backend.
    pub fn now(&self) -> Option<f64> {
        self.with_core(|core| core.clock.as_deref().map(|clock| clock.now()))
            .flatten()
    }

    /// Snapshot of one track's cursor while music plays.
    pub fn cursor(&self, part: Part) -> Option<SequencerCursor> {
        self.with_core(|core| core.session.as_ref().map(|s| *s.cursor(part)))
            .flatten()
    }

    /// Sequencer passes run in the current session.
    pub fn session_polls(&self) -> u64 {
        self.with_core(|core| core.session.as_ref().map_or(0, PlaybackSession::polls))
            .unwrap_or(0)
    }

    /// Polling threads currently alive. Never more than one.
    pub fn polling_loops(&self) -> usize {
        self.live_tickers.load(Ordering::SeqCst)
    }

    /// Voices sounding on the audio thread, when rendering through a stream.
    pub fn active_voices(&self) -> Option<usize> {
        self.render_clock.as_ref().map(|clock| clock.active_voices())
    }

    /// Output sample rate, when rendering through a stream.
    pub fn sample_rate(&self) -> Option<f32> {
        self.render_clock.as_ref().map(|clock| clock.sample_rate())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.cancel();
        }
    }
}
