//! Transport bar widget - play state, tempo, volumes, position, and audio stats

use chiptone::TransportState;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::Status;

/// Steps per bar of 4/4 on the sixteenth-note grid.
const STEPS_PER_BAR: u64 = 16;

/// Level statistics of the visible window
pub struct AudioStats {
    pub peak: f32,
    pub rms: f32,
}

impl AudioStats {
    pub fn from_buffer(buffer: &[f32]) -> Self {
        if buffer.is_empty() {
            return Self { peak: 0.0, rms: 0.0 };
        }
        let peak = buffer.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
        let rms = (buffer.iter().map(|&x| x * x).sum::<f32>() / buffer.len() as f32).sqrt();
        Self { peak, rms }
    }
}

pub fn render_transport(frame: &mut Frame, area: Rect, status: &Status, stats: &AudioStats) {
    let block = Block::default().title(" chiptone ").borders(Borders::ALL);

    let (symbol, label, color) = match status.transport {
        _ if status.muted => ("×", "Muted", Color::Red),
        TransportState::Running => ("▶", "Playing", Color::Green),
        TransportState::Starting => ("…", "Starting", Color::Yellow),
        TransportState::Stopped => ("■", "Stopped", Color::Yellow),
    };

    let position = match status.melody {
        Some(cursor) => {
            let bar = cursor.next_tick / STEPS_PER_BAR + 1;
            let beat = (cursor.next_tick % STEPS_PER_BAR) / 4 + 1;
            format!("Bar {bar} | Beat {beat}  ")
        }
        None => "Bar - | Beat -  ".to_string(),
    };

    let rate = status
        .sample_rate
        .map_or_else(|| "--".to_string(), |rate| format!("{:.1}kHz", rate / 1000.0));
    let voices = status
        .active_voices
        .map_or_else(|| "-".to_string(), |count| count.to_string());

    let top = Line::from(vec![
        Span::styled(format!(" {symbol} {label}  "), Style::default().fg(color)),
        Span::styled(
            format!("BPM: {:.0}  ", status.bpm),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(position, Style::default().fg(Color::White)),
        Span::styled(
            format!("Music: {:.0}%  Sfx: {:.0}%  ", status.music * 100.0, status.sfx * 100.0),
            Style::default().fg(Color::Blue),
        ),
        Span::styled(
            format!("{rate}  Voices: {voices}  "),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("Peak: {:.2}  RMS: {:.2}", stats.peak, stats.rms),
            Style::default().fg(Color::Magenta),
        ),
    ]);

    let effect = status
        .last_effect
        .map_or("-", |effect| effect.name());
    let mut bottom = vec![Span::styled(
        format!(" Flavor: {}  Last: {effect}  ", status.flavor.name()),
        Style::default().fg(Color::DarkGray),
    )];
    if let Some(message) = &status.message {
        bottom.push(Span::styled(message.clone(), Style::default().fg(Color::Red)));
    }

    let paragraph = Paragraph::new(vec![top, Line::from(bottom)]).block(block);
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_of_a_square() {
        let stats = AudioStats::from_buffer(&[0.5, -0.5, 0.5, -0.5]);
        assert_eq!(stats.peak, 0.5);
        assert!((stats.rms - 0.5).abs() < 1e-6);
    }
}
