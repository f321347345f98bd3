use arrayvec::ArrayVec;

/*
Parameter Automation Curves
===========================

A voice's pitch and loudness are both described the same way: a short list
of control points, each saying "be at this value at this time, and here is
how to get there from the previous point".

Vocabulary
----------

  control point  (time, value, ramp). Time is seconds relative to the
                 voice's start, so a curve can be built once and placed
                 anywhere on the clock.

  ramp           How the curve travels from the previous point to this
                 one:
                   Step         hold the previous value, jump at `time`
                   Linear       straight line
                   Exponential  constant ratio per unit time

The Shapes
----------

  Typical blip: instant rise, exponential decay.

    value
    0.3 ┤█
        │█╲
        │█ ╲_
        │█   ╲__
    0.0 ┼█──────╲▁▁▁▁▁───→ time
        0          end

  Session-end tone: stepped pitch, held gain, linear fade.

    Hz  200 ┤━━━━┓
        150 ┤    ┗━━━━┓
        100 ┤         ┗━━━━━━━━━━━
            0   0.2  0.4

Exponential Ramps and Zero
--------------------------

An exponential segment is

    v(t) = a · (b / a)^((t - t_a) / (t_b - t_a))

which is undefined when either end is zero or of opposite sign. Effects
are scaled by the effect volume and a volume of 0 must still yield a
valid (silent) voice, so such a segment degrades to a linear one. That
keeps every curve evaluable without special cases at the call site.

Storage
-------

Points live in a fixed-capacity `ArrayVec`. Voices move through the
lock-free command queue to the audio thread and are reaped there, so they
must never own heap memory.
*/

/// Maximum control points per curve.
pub const MAX_POINTS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ramp {
    Step,
    Linear,
    Exponential,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlPoint {
    /// Seconds relative to the owning voice's start.
    pub time: f32,
    pub value: f32,
    /// How the curve arrives at this point from the previous one.
    pub ramp: Ramp,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    points: ArrayVec<ControlPoint, MAX_POINTS>,
}

impl Curve {
    /// A curve sitting at `value` from time 0.
    pub fn starting_at(value: f32) -> Self {
        let mut points = ArrayVec::new();
        points.push(ControlPoint {
            time: 0.0,
            value,
            ramp: Ramp::Step,
        });
        Self { points }
    }

    /// A curve that never moves.
    pub fn constant(value: f32) -> Self {
        Self::starting_at(value)
    }

    /// Jump to `value` at `time`.
    pub fn step_to(self, value: f32, time: f32) -> Self {
        self.push(value, time, Ramp::Step)
    }

    /// Straight line to `value`, arriving at `time`.
    pub fn linear_to(self, value: f32, time: f32) -> Self {
        self.push(value, time, Ramp::Linear)
    }

    /// Constant-ratio glide to `value`, arriving at `time`.
    pub fn exponential_to(self, value: f32, time: f32) -> Self {
        self.push(value, time, Ramp::Exponential)
    }

    fn push(mut self, value: f32, time: f32, ramp: Ramp) -> Self {
        // Points are kept in time order; an out-of-order point lands on the previous time.
        let last_time = self.points.last().map_or(0.0, |p| p.time);
        let point = ControlPoint {
            time: time.max(last_time),
            value,
            ramp,
        };
        let pushed = self.points.try_push(point);
        debug_assert!(pushed.is_ok(), "curve exceeds {MAX_POINTS} points");
        self
    }

    /// Multiply every value by `factor` (volume scaling).
    pub fn scaled(mut self, factor: f32) -> Self {
        for point in self.points.iter_mut() {
            point.value *= factor;
        }
        self
    }

    /// Evaluate the curve `t` seconds after the voice start.
    pub fn value_at(&self, t: f32) -> f32 {
        let first = self.points[0];
        if t <= first.time {
            return first.value;
        }

        for pair in self.points.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t < b.time {
                return interpolate(a, b, t);
            }
        }

        self.points[self.points.len() - 1].value
    }

    /// Time of the final control point.
    pub fn end_time(&self) -> f32 {
        self.points[self.points.len() - 1].time
    }

    /// Largest value the curve reaches.
    pub fn peak(&self) -> f32 {
        self.points
            .iter()
            .map(|p| p.value)
            .fold(f32::NEG_INFINITY, f32::max)
    }

    pub fn points(&self) -> &[ControlPoint] {
        &self.points
    }
}

#[inline]
fn interpolate(a: ControlPoint, b: ControlPoint, t: f32) -> f32 {
    let span = b.time - a.time;
    if span <= 0.0 {
        return b.value;
    }
    let progress = ((t - a.time) / span).clamp(0.0, 1.0);

    match b.ramp {
        Ramp::Step => a.value,
        Ramp::Exponential if a.value > 0.0 && b.value > 0.0 => {
            a.value * (b.value / a.value).powf(progress)
        }
        Ramp::Linear | Ramp::Exponential => a.value + (b.value - a.value) * progress,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_midpoint_is_average() {
        let curve = Curve::starting_at(0.0).linear_to(1.0, 1.0);
        assert!((curve.value_at(0.5) - 0.5).abs() < 1e-6);
        assert_eq!(curve.value_at(2.0), 1.0);
    }

    #[test]
    fn exponential_midpoint_is_geometric_mean() {
        let curve = Curve::starting_at(600.0).exponential_to(300.0, 0.1);
        let mid = curve.value_at(0.05);
        let expected = (600.0f32 * 300.0).sqrt();
        assert!((mid - expected).abs() < 0.01, "expected {expected}, got {mid}");
    }

    #[test]
    fn step_holds_until_its_time() {
        let curve = Curve::starting_at(200.0)
            .step_to(150.0, 0.2)
            .step_to(100.0, 0.4);
        assert_eq!(curve.value_at(0.19), 200.0);
        assert_eq!(curve.value_at(0.2), 150.0);
        assert_eq!(curve.value_at(0.39), 150.0);
        assert_eq!(curve.value_at(1.0), 100.0);
    }

    #[test]
    fn zero_scaled_exponential_stays_silent() {
        let curve = Curve::starting_at(0.3)
            .exponential_to(0.001, 0.1)
            .scaled(0.0);
        assert_eq!(curve.peak(), 0.0);
        for i in 0..20 {
            let v = curve.value_at(i as f32 * 0.01);
            assert!(v.is_finite() && v == 0.0);
        }
    }

    #[test]
    fn out_of_order_points_are_clamped_forward() {
        let curve = Curve::starting_at(1.0).linear_to(0.5, 0.3).linear_to(0.0, 0.1);
        let times: Vec<f32> = curve.points().iter().map(|p| p.time).collect();
        assert_eq!(times, vec![0.0, 0.3, 0.3]);
        assert_eq!(curve.end_time(), 0.3);
    }
}
