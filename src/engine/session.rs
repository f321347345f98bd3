use crate::sequencing::Part;

/// Where one track's sequencer is up to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SequencerCursor {
    /// Index of the next note, always `< track.len()`.
    pub track_index: usize,
    /// Clock time the next note starts at. Never decreases.
    pub next_schedule_time: f64,
    /// Step on the shared sixteenth-note grid the next note starts on.
    pub next_tick: u64,
    /// Notes handed to the clock so far, including ones dropped as late.
    pub notes_issued: u64,
}

impl SequencerCursor {
    pub fn new(start_time: f64) -> Self {
        Self {
            track_index: 0,
            next_schedule_time: start_time,
            next_tick: 0,
            notes_issued: 0,
        }
    }

    /// Move past a note that lasted `steps` steps / `span` seconds.
    pub fn advance(&mut self, span: f64, steps: u32, track_len: usize) {
        self.next_schedule_time += span;
        self.next_tick = self.next_tick.saturating_add(u64::from(steps));
        self.track_index = (self.track_index + 1) % track_len;
        self.notes_issued += 1;
    }

    /// Jump over `cycles` whole passes of the track without issuing notes.
    /// The index is unchanged since a full cycle wraps back to it.
    pub fn skip_cycles(&mut self, cycles: u64, cycle_span: f64, cycle_steps: u32) {
        self.next_schedule_time += cycles as f64 * cycle_span;
        self.next_tick = self
            .next_tick
            .saturating_add(cycles.saturating_mul(u64::from(cycle_steps)));
    }

    /// Move the next note's start forward to `time` without issuing
    /// anything. Earlier times are ignored.
    pub fn skip_to(&mut self, time: f64) {
        self.next_schedule_time = self.next_schedule_time.max(time);
    }
}

/// State of one run of continuous playback, from `start_music` to
/// `stop_music`. Dropping it is the teardown: nothing else needs resetting.
#[derive(Debug, Clone)]
pub struct PlaybackSession {
    melody: SequencerCursor,
    bass: SequencerCursor,
    started_at: f64,
    polls: u64,
}

impl PlaybackSession {
    /// Both cursors at index 0, first notes due at `start_time`.
    pub fn new(start_time: f64) -> Self {
        Self {
            melody: SequencerCursor::new(start_time),
            bass: SequencerCursor::new(start_time),
            started_at: start_time,
            polls: 0,
        }
    }

    pub fn cursor(&self, part: Part) -> &SequencerCursor {
        match part {
            Part::Melody => &self.melody,
            Part::Bass => &self.bass,
        }
    }

    pub fn cursor_mut(&mut self, part: Part) -> &mut SequencerCursor {
        match part {
            Part::Melody => &mut self.melody,
            Part::Bass => &mut self.bass,
        }
    }

    pub fn started_at(&self) -> f64 {
        self.started_at
    }

    /// Sequencer passes run against this session.
    pub fn polls(&self) -> u64 {
        self.polls
    }

    pub(crate) fn record_poll(&mut self) {
        self.polls += 1;
    }
}
