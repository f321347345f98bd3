// Purpose: voices, buses, and the audio-thread renderer that mixes them
// This layer sits above the DSP primitives and below the engine

pub mod message;
pub mod mixer;
pub mod renderer;
pub mod voice;

pub use message::{Command, CommandReceiver};
pub use mixer::{GainRamp, MusicBus, VolumeState};
pub use renderer::{ClockState, Renderer};
pub use voice::{Bus, Voice};
