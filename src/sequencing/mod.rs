// Purpose: the static material the sequencer walks, and musical time

pub mod notes;
pub mod tempo;
pub mod track;

pub use tempo::TempoState;
pub use track::{Note, Part, Track, BASS, MELODY};
