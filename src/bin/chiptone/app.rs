//! Key handling and the UI loop

use std::time::Duration;

use chiptone::{
    engine::SequencerCursor,
    sequencing::Part,
    Effect, Engine, Flavor, TransportState,
};
use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::DefaultTerminal;
use rtrb::Consumer;

use crate::ui::{self, spectrum::SpectrumAnalyzer};

/// Samples shown by the oscilloscope and fed to the FFT.
const VIS_BUFFER_SIZE: usize = 1024;
const TEMPO_STEP: f64 = 5.0;
const VOLUME_STEP: f32 = 0.05;

/// Everything the UI shows, sampled once per frame.
pub struct Status {
    pub transport: TransportState,
    pub muted: bool,
    pub bpm: f64,
    pub sfx: f32,
    pub music: f32,
    pub melody: Option<SequencerCursor>,
    pub active_voices: Option<usize>,
    pub sample_rate: Option<f32>,
    pub flavor: Flavor,
    pub last_effect: Option<Effect>,
    pub message: Option<String>,
}

pub struct App {
    engine: Engine,
    scope: Option<Consumer<f32>>,
    audio_buffer: Vec<f32>,
    spectrum: Option<SpectrumAnalyzer>,
    flavor: Flavor,
    last_effect: Option<Effect>,
    message: Option<String>,
    should_quit: bool,
}

impl App {
    pub fn new(engine: Engine, scope: Option<Consumer<f32>>) -> Self {
        let spectrum = engine
            .sample_rate()
            .map(|rate| SpectrumAnalyzer::new(VIS_BUFFER_SIZE, rate));
        let message = engine
            .is_muted()
            .then(|| "no audio device, running muted".to_string());

        Self {
            engine,
            scope,
            audio_buffer: vec![0.0; VIS_BUFFER_SIZE],
            spectrum,
            flavor: Flavor::Vanilla,
            last_effect: None,
            message,
            should_quit: false,
        }
    }

    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_audio();
            if let Some(spectrum) = self.spectrum.as_mut() {
                spectrum.update(&self.audio_buffer);
            }

            let status = self.status();
            let spectrum = self.spectrum.as_ref().map(SpectrumAnalyzer::data);
            terminal.draw(|frame| ui::render(frame, &status, &self.audio_buffer, spectrum))?;

            // ~60fps
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }

        self.engine.stop_music();
        Ok(())
    }

    /// Drain the scope tap, keeping the newest `VIS_BUFFER_SIZE` samples.
    fn poll_audio(&mut self) {
        let Some(scope) = self.scope.as_mut() else {
            return;
        };
        while let Ok(sample) = scope.pop() {
            self.audio_buffer.push(sample);
        }
        if self.audio_buffer.len() > VIS_BUFFER_SIZE {
            let excess = self.audio_buffer.len() - VIS_BUFFER_SIZE;
            self.audio_buffer.drain(0..excess);
        }
    }

    fn status(&self) -> Status {
        let (sfx, music) = self.engine.volumes();
        Status {
            transport: self.engine.transport_state(),
            muted: self.engine.is_muted(),
            bpm: self.engine.tempo(),
            sfx,
            music,
            melody: self.engine.cursor(Part::Melody),
            active_voices: self.engine.active_voices(),
            sample_rate: self.engine.sample_rate(),
            flavor: self.flavor,
            last_effect: self.last_effect,
            message: self.message.clone(),
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char(' ') => {
                if self.engine.transport_state().is_playing() {
                    self.engine.stop_music();
                } else {
                    self.engine.start_music();
                }
            }
            KeyCode::Char('+') | KeyCode::Char('=') => self.nudge_tempo(TEMPO_STEP),
            KeyCode::Char('-') => self.nudge_tempo(-TEMPO_STEP),
            KeyCode::Char(']') => self.nudge_volumes(0.0, VOLUME_STEP),
            KeyCode::Char('[') => self.nudge_volumes(0.0, -VOLUME_STEP),
            KeyCode::Char('.') => self.nudge_volumes(VOLUME_STEP, 0.0),
            KeyCode::Char(',') => self.nudge_volumes(-VOLUME_STEP, 0.0),
            KeyCode::Char(digit @ '0'..='9') => {
                let index = digit as usize - '0' as usize;
                if let Some(flavor) = Flavor::from_index(index) {
                    self.flavor = flavor;
                    self.fire(Effect::BuildItem(flavor));
                }
            }
            KeyCode::Char('a') => self.fire(Effect::Acknowledge),
            KeyCode::Char('s') => self.fire(Effect::Success),
            KeyCode::Char('e') => self.fire(Effect::Error),
            KeyCode::Char('x') => self.fire(Effect::SessionEnd),
            _ => {}
        }
    }

    fn fire(&mut self, effect: Effect) {
        self.engine.trigger_effect(effect);
        self.last_effect = Some(effect);
    }

    /// Tempo is not clamped, so walking it down to zero shows the rejection.
    fn nudge_tempo(&mut self, delta: f64) {
        let bpm = self.engine.tempo() + delta;
        self.message = self.engine.set_tempo(bpm).err().map(|err| err.to_string());
    }

    fn nudge_volumes(&mut self, sfx_delta: f32, music_delta: f32) {
        let (sfx, music) = self.engine.volumes();
        let sfx = (sfx + sfx_delta).clamp(0.0, 1.0);
        let music = (music + music_delta).clamp(0.0, 1.0);
        self.message = self
            .engine
            .set_volumes(sfx, music)
            .err()
            .map(|err| err.to_string());
    }
}
