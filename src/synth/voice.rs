use crate::{
    dsp::{Curve, Oscillator, Waveform},
    error::VoiceError,
};

/// Gain stage a voice is mixed through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bus {
    /// Scaled by the smoothly ramped music gain while rendering.
    Music,
    /// Effect voices carry the effect volume in their own gain curve.
    Effects,
}

/// A single transient tone: one oscillator shaped by a pitch curve and a
/// gain curve, alive over `[start, stop)` on the audio clock.
///
/// Once handed to the audio clock the voice belongs to the audio thread;
/// it is dropped there as soon as the clock passes `stop`.
#[derive(Debug, Clone)]
pub struct Voice {
    bus: Bus,
    osc: Oscillator,
    frequency: Curve,
    gain: Curve,
    start: f64,
    stop: f64,
}

impl Voice {
    pub fn new(
        bus: Bus,
        waveform: Waveform,
        frequency: Curve,
        gain: Curve,
        start: f64,
        stop: f64,
    ) -> Result<Self, VoiceError> {
        if !(start.is_finite() && stop.is_finite() && stop > start) {
            return Err(VoiceError::EmptyLifetime { start, stop });
        }

        Ok(Self {
            bus,
            osc: Oscillator::new(waveform),
            frequency,
            gain,
            start,
            stop,
        })
    }

    /// Render the sample at absolute clock time `t`, advancing the oscillator.
    #[inline]
    pub fn next_sample(&mut self, t: f64, sample_rate: f32) -> f32 {
        if t < self.start || t >= self.stop {
            return 0.0;
        }
        let local = (t - self.start) as f32;
        let frequency = self.frequency.value_at(local);
        self.osc.next_sample(frequency, sample_rate) * self.gain.value_at(local)
    }

    /// True once the clock has reached the stop time.
    pub fn is_finished(&self, t: f64) -> bool {
        t >= self.stop
    }

    pub fn bus(&self) -> Bus {
        self.bus
    }

    pub fn waveform(&self) -> Waveform {
        self.osc.waveform()
    }

    pub fn frequency(&self) -> &Curve {
        &self.frequency
    }

    pub fn gain(&self) -> &Curve {
        &self.gain
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn stop(&self) -> f64 {
        self.stop
    }

    pub fn duration(&self) -> f64 {
        self.stop - self.start
    }
}
