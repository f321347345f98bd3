//! Procedural game audio with no recorded assets.
//!
//! A continuous backing track is sequenced ahead of the audio clock from
//! fixed note tables, and one-shot effects are synthesised on demand, all
//! from primitive oscillators and gain curves.
//!
//! ```ignore
//! use chiptone::{Effect, Engine, EngineConfig, Flavor};
//!
//! let mut engine = Engine::connect_default(EngineConfig::default());
//! engine.set_volumes(0.6, 0.3)?;
//! engine.start_music();
//! engine.trigger_effect(Effect::BuildItem(Flavor::Mint));
//! engine.set_tempo(140.0)?;
//! engine.stop_music();
//! ```

pub mod backend;
pub mod config;
pub mod dsp;
pub mod effects;
pub mod engine;
pub mod error;
pub mod sequencing;
pub mod synth;

use std::time::Duration;

pub use config::{EngineConfig, TimerMode};
pub use effects::{Effect, Flavor};
pub use engine::{Engine, TransportState};
pub use error::{BackendError, ParamError, VoiceError};

/// Largest block the renderer processes in one pass.
pub const MAX_BLOCK_SIZE: usize = 2048;

/// Scheduling horizon ahead of the audio clock, in seconds.
pub const LOOKAHEAD: f64 = 0.100;
/// Sequencer polling cadence.
pub const TICK_INTERVAL: Duration = Duration::from_millis(25);
/// Gap between starting music and its first note, in seconds.
pub const START_OFFSET: f64 = 0.050;
/// Music bus glide on volume change, in seconds.
pub const MUSIC_RAMP: f64 = 0.100;
/// How far a voice may trail the clock and still be committed, in seconds.
pub const LATE_TOLERANCE: f64 = 0.020;

/// Slots in the command ring to the audio thread.
pub const QUEUE_CAPACITY: usize = 1024;
/// Voices the renderer mixes at once.
pub const MAX_VOICES: usize = 128;
