//! Low-level DSP primitives used by voices.
//!
//! These components are allocation-free and realtime-safe, so voices that
//! embed them can be moved to and mixed on the audio thread.

/// Control-point curves for pitch and gain automation.
pub mod automation;
/// Oscillator waveforms.
pub mod oscillator;

pub use automation::{ControlPoint, Curve, Ramp};
pub use oscillator::{Oscillator, Waveform};
