//! Spectrum widget
//!
//! Hann-windowed FFT of the visible window, folded into log-spaced bands.
//! Each band shows the loudest FFT bin inside it, and falls back slowly so
//! short effects stay readable for a moment.

use std::sync::Arc;

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};
use rustfft::{num_complex::Complex, Fft, FftPlanner};

const BANDS: usize = 64;
const LOWEST_HZ: f32 = 40.0;
const FLOOR_DB: f64 = -90.0;
/// dB a band may fall per frame.
const FALLBACK_DB: f64 = 1.5;

pub struct SpectrumAnalyzer {
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    scratch: Vec<Complex<f32>>,
    /// FFT bin range `[lo, hi)` of each band.
    bands: Vec<(usize, usize)>,
    /// (log10 of band centre Hz, level in dB)
    levels: Vec<(f64, f64)>,
}

impl SpectrumAnalyzer {
    pub fn new(size: usize, sample_rate: f32) -> Self {
        let size = size.max(4);
        let fft = FftPlanner::new().plan_fft_forward(size);

        let window = (0..size)
            .map(|i| {
                let phase = 2.0 * std::f32::consts::PI * i as f32 / (size - 1) as f32;
                0.5 * (1.0 - phase.cos())
            })
            .collect();

        let nyquist = (sample_rate / 2.0).max(LOWEST_HZ * 2.0);
        let hz_per_bin = sample_rate / size as f32;
        let half = size / 2;
        let edge = |band: usize| LOWEST_HZ * (nyquist / LOWEST_HZ).powf(band as f32 / BANDS as f32);

        let mut bands = Vec::with_capacity(BANDS);
        let mut levels = Vec::with_capacity(BANDS);
        for band in 0..BANDS {
            let (lo_hz, hi_hz) = (edge(band), edge(band + 1));
            let lo = ((lo_hz / hz_per_bin) as usize).clamp(1, half - 1);
            let hi = ((hi_hz / hz_per_bin).ceil() as usize).clamp(lo + 1, half);
            bands.push((lo, hi));
            levels.push((f64::from((lo_hz * hi_hz).sqrt()).log10(), FLOOR_DB));
        }

        Self {
            fft,
            window,
            scratch: vec![Complex::new(0.0, 0.0); size],
            bands,
            levels,
        }
    }

    /// Analyse `buffer`. Ignored unless it is exactly the analysis size.
    pub fn update(&mut self, buffer: &[f32]) {
        if buffer.len() != self.window.len() {
            return;
        }

        for ((slot, &sample), &w) in self.scratch.iter_mut().zip(buffer).zip(&self.window) {
            *slot = Complex::new(sample * w, 0.0);
        }
        self.fft.process(&mut self.scratch);

        let norm = (self.window.len() as f32 / 2.0).powi(2);
        for (&(lo, hi), (_, level)) in self.bands.iter().zip(self.levels.iter_mut()) {
            let power = self.scratch[lo..hi]
                .iter()
                .map(|bin| bin.norm_sqr() / norm)
                .fold(1e-12f32, f32::max);
            let db = (10.0 * f64::from(power).log10()).max(FLOOR_DB);
            *level = db.max(*level - FALLBACK_DB);
        }
    }

    pub fn data(&self) -> &[(f64, f64)] {
        &self.levels
    }
}

fn hz_label(log_hz: f64) -> String {
    let hz = 10f64.powf(log_hz);
    if hz >= 1000.0 {
        format!("{:.1}k", hz / 1000.0)
    } else {
        format!("{hz:.0}")
    }
}

pub fn render_spectrum(frame: &mut Frame, area: Rect, spectrum: &[(f64, f64)]) {
    let block = Block::default().title(" Spectrum ").borders(Borders::ALL);

    let low = spectrum.first().map_or(1.0, |&(f, _)| f);
    let high = spectrum.last().map_or(4.5, |&(f, _)| f).max(low + 0.1);

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Bar)
        .style(Style::default().fg(Color::Green))
        .data(spectrum);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([low, high])
                .labels(vec![hz_label(low), hz_label(high)])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([FLOOR_DB, 0.0])
                .labels(vec!["-90", "-45", "0"])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}
