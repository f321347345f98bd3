//! Look-ahead sequencer
//!
//! A coarse, jittery wall-clock tick drives a precise audio clock:
//!
//! ```text
//!   poll        poll        poll        poll
//!    │           │           │           │        (every ~25 ms, jittery)
//!    ▼           ▼           ▼           ▼
//! ───┼───────────┼───────────┼───────────┼──────► audio clock
//!    └─ now ─────┴── now + lookahead ──┘
//!        notes whose start falls in here are committed,
//!        each at its exact start time
//! ```
//!
//! Every poll walks both cursors forward until the next note would start
//! beyond `now + lookahead`. Once committed, a note's timing belongs to the
//! clock, so tick jitter never reaches the output. The lookahead must
//! exceed the tick interval or notes would arrive late.

use tracing::{debug, warn};

use crate::{
    backend::{AudioClock, Schedule},
    engine::session::PlaybackSession,
    sequencing::{Part, TempoState},
};

/// Most notes one cursor commits in a single poll.
const MAX_NOTES_PER_POLL: usize = 512;

/// What one poll did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FillReport {
    /// Voices the clock accepted.
    pub committed: usize,
    /// Notes consumed from the tracks but not played (late, queue full,
    /// or unbuildable).
    pub dropped: usize,
}

impl FillReport {
    pub fn issued(&self) -> usize {
        self.committed + self.dropped
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Sequencer {
    lookahead: f64,
}

impl Sequencer {
    pub fn new(lookahead: f64) -> Self {
        Self { lookahead }
    }

    pub fn lookahead(&self) -> f64 {
        self.lookahead
    }

    /// Commit every note that starts before `now + lookahead`.
    ///
    /// The tempo is read per note, so a tempo change reaches only notes
    /// that had not been committed yet.
    pub fn fill(
        &self,
        session: &mut PlaybackSession,
        tempo: &TempoState,
        clock: &mut dyn AudioClock,
    ) -> FillReport {
        let now = clock.now();
        let horizon = now + self.lookahead;
        let step = tempo.step_duration();
        let mut report = FillReport::default();

        session.record_poll();

        for part in Part::ALL {
            let track = part.track();
            let cursor = session.cursor_mut(part);

            // After a long stall, jump whole cycles rather than dropping
            // every missed note one by one.
            let cycle_steps = track.total_steps();
            let cycle_span = f64::from(cycle_steps) * step;
            let behind = now - cursor.next_schedule_time;
            if behind > cycle_span {
                let cycles = (behind / cycle_span).floor() as u64;
                debug!(part = track.name, cycles, "sequencer fell behind, skipping");
                cursor.skip_cycles(cycles, cycle_span, cycle_steps);
                // cycles too short for f64 to add up
                if now - cursor.next_schedule_time > cycle_span {
                    cursor.skip_to(now);
                }
            }

            let mut issued = 0;
            while cursor.next_schedule_time < horizon {
                if issued == MAX_NOTES_PER_POLL {
                    warn!(part = track.name, "note budget for this poll exhausted");
                    break;
                }

                let note = track.note(cursor.track_index);
                let span = f64::from(note.duration_steps) * step;
                if cursor.next_schedule_time + span <= cursor.next_schedule_time {
                    debug!(part = track.name, span, "note too short to schedule, skipping");
                    cursor.skip_to(horizon);
                    break;
                }

                match track.voice(note, cursor.next_schedule_time, span) {
                    Ok(voice) => match clock.schedule(voice) {
                        Schedule::Committed => report.committed += 1,
                        Schedule::Late | Schedule::QueueFull => report.dropped += 1,
                    },
                    Err(err) => {
                        debug!(part = track.name, %err, "skipping note");
                        report.dropped += 1;
                    }
                }

                cursor.advance(span, note.duration_steps, track.len());
                issued += 1;
            }
        }

        report
    }
}
