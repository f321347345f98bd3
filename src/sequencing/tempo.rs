use crate::error::ParamError;

/// Steps per beat: one sequencer step is a sixteenth note.
pub const STEPS_PER_BEAT: f64 = 4.0;

/// Current tempo. Read by the sequencer each time it commits a note, so a
/// change only affects notes that have not been scheduled yet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TempoState {
    bpm: f64,
}

impl TempoState {
    pub fn new(bpm: f64) -> Result<Self, ParamError> {
        if bpm.is_finite() && bpm > 0.0 {
            Ok(Self { bpm })
        } else {
            Err(ParamError::InvalidTempo(bpm))
        }
    }

    /// Replace the tempo; an invalid value leaves the previous one in place.
    pub fn set_bpm(&mut self, bpm: f64) -> Result<(), ParamError> {
        *self = Self::new(bpm)?;
        Ok(())
    }

    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    /// Seconds per sixteenth-note step: `60 / bpm / 4`.
    pub fn step_duration(&self) -> f64 {
        60.0 / self.bpm / STEPS_PER_BEAT
    }
}

impl Default for TempoState {
    fn default() -> Self {
        Self { bpm: 110.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_is_a_sixteenth_note() {
        for bpm in [1.0, 60.0, 110.0, 120.0, 333.3] {
            let tempo = TempoState::new(bpm).unwrap();
            assert_eq!(tempo.step_duration(), 60.0 / bpm / 4.0);
        }
        assert_eq!(TempoState::new(120.0).unwrap().step_duration(), 0.125);
    }

    #[test]
    fn rejects_non_positive_and_keeps_previous() {
        let mut tempo = TempoState::new(110.0).unwrap();
        for bad in [0.0, -10.0, f64::NAN, f64::INFINITY] {
            assert!(tempo.set_bpm(bad).is_err());
            assert_eq!(tempo.bpm(), 110.0);
        }
        assert_eq!(
            TempoState::new(0.0),
            Err(ParamError::InvalidTempo(0.0))
        );
    }
}
