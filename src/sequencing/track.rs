//! Track - a fixed cyclic note table and the tone it is played with
//!
//! Two tracks exist for the life of the program: the melody and the bass.
//! Both are written on the same sixteenth-note step grid and span the same
//! 32 steps (two bars of 4/4), so counting steps from a common origin keeps
//! them phase-aligned.

use crate::{
    dsp::{Curve, Waveform},
    error::VoiceError,
    sequencing::notes::*,
    synth::voice::{Bus, Voice},
};

/// Attack of a music note, in seconds.
const ATTACK: f32 = 0.005;
/// Level a music note decays to by the end of its span.
const SILENCE: f32 = 1.0e-4;

/// One entry in a track: a pitch held for a whole number of steps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Note {
    pub frequency: f32,
    /// Length in sixteenth-note steps; always at least 1.
    pub duration_steps: u32,
}

impl Note {
    pub const fn new(frequency: f32, duration_steps: u32) -> Self {
        Self {
            frequency,
            duration_steps,
        }
    }
}

/// A read-only, cyclic sequence of notes plus the tone that plays it.
#[derive(Debug)]
pub struct Track {
    pub name: &'static str,
    pub waveform: Waveform,
    /// Peak gain of each note before the music bus.
    pub level: f32,
    notes: &'static [Note],
}

impl Track {
    /// Note at `index`, wrapping around the end of the table.
    pub fn note(&self, index: usize) -> Note {
        self.notes[index % self.notes.len()]
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn notes(&self) -> &'static [Note] {
        self.notes
    }

    /// Steps in one full cycle of the table.
    pub fn total_steps(&self) -> u32 {
        self.notes.iter().map(|n| n.duration_steps).sum()
    }

    /// Build the music voice for `note`, sounding over `[start, start + span)`.
    ///
    /// Short linear attack to `level`, then exponential decay toward
    /// silence at the end of the span.
    pub fn voice(&self, note: Note, start: f64, span: f64) -> Result<Voice, VoiceError> {
        let length = span as f32;
        let attack = ATTACK.min(length * 0.5);
        let gain = Curve::starting_at(0.0)
            .linear_to(self.level, attack)
            .exponential_to(SILENCE, length);

        Voice::new(
            Bus::Music,
            self.waveform,
            Curve::constant(note.frequency),
            gain,
            start,
            start + span,
        )
    }
}

/// Which of the two tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Part {
    Melody,
    Bass,
}

impl Part {
    pub const ALL: [Part; 2] = [Part::Melody, Part::Bass];

    pub fn track(self) -> &'static Track {
        match self {
            Part::Melody => &MELODY,
            Part::Bass => &BASS,
        }
    }
}

const MELODY_NOTES: [Note; 15] = [
    // bar 1
    Note::new(E5, 2),
    Note::new(G5, 2),
    Note::new(C6, 2),
    Note::new(G5, 2),
    Note::new(A5, 2),
    Note::new(G5, 2),
    Note::new(E5, 4),
    // bar 2
    Note::new(F5, 2),
    Note::new(A5, 2),
    Note::new(G5, 2),
    Note::new(E5, 2),
    Note::new(D5, 2),
    Note::new(E5, 1),
    Note::new(D5, 1),
    Note::new(C5, 4),
];

/// Bass moves once per half bar: I - vi - IV - V.
const BASS_NOTES: [Note; 4] = [
    Note::new(C3, 8),
    Note::new(A2, 8),
    Note::new(F2, 8),
    Note::new(G2, 8),
];

pub static MELODY: Track = Track {
    name: "melody",
    waveform: Waveform::Triangle,
    level: 0.35,
    notes: &MELODY_NOTES,
};

pub static BASS: Track = Track {
    name: "bass",
    waveform: Waveform::Sine,
    level: 0.5,
    notes: &BASS_NOTES,
};
