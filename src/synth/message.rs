use std::collections::VecDeque;

use rtrb::Consumer;

use crate::synth::voice::Voice;

/// Control-to-audio messages. Fixed-size, so pushing one never allocates.
#[derive(Debug, Clone)]
pub enum Command {
    /// Take ownership of a committed voice.
    Start(Voice),
    /// Ramp the music bus to `target`, starting at clock time `at`.
    MusicGain { target: f32, at: f64, ramp: f64 },
}

pub trait CommandReceiver {
    fn pop(&mut self) -> Option<Command>;
}

impl CommandReceiver for Consumer<Command> {
    fn pop(&mut self) -> Option<Command> {
        Consumer::pop(self).ok()
    }
}

impl CommandReceiver for VecDeque<Command> {
    fn pop(&mut self) -> Option<Command> {
        self.pop_front()
    }
}
