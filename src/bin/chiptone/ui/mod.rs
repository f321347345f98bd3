//! TUI for chiptone
//!
//! Transport bar on top, oscilloscope and spectrum of the live mix below,
//! key help at the bottom.

mod transport;
mod waveform;
pub mod spectrum;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

use crate::app::Status;

use spectrum::render_spectrum;
use transport::{render_transport, AudioStats};
use waveform::render_waveform;

const HELP: &str = " [Space] Play/Stop  [+/-] Tempo  [[ ]] Music  [, .] Sfx  \
                    [0-9] Build  [A]ck  [S]uccess  [E]rror  [X] End  [Q] Quit";

/// Draw one frame.
pub fn render(
    frame: &mut Frame,
    status: &Status,
    audio_buffer: &[f32],
    spectrum: Option<&[(f64, f64)]>,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Transport bar
            Constraint::Min(6),    // Waveform
            Constraint::Length(10), // Spectrum
            Constraint::Length(1), // Help bar
        ])
        .split(frame.area());

    let stats = AudioStats::from_buffer(audio_buffer);
    render_transport(frame, chunks[0], status, &stats);
    render_waveform(frame, chunks[1], audio_buffer);
    render_spectrum(frame, chunks[2], spectrum.unwrap_or(&[]));

    let help = Paragraph::new(HELP).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, chunks[3]);
}
