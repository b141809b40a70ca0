//! Modulating envelope time series.
//!
//! An [`Envelope`] is a voltage record on its own (possibly much slower) time
//! base. The signal chain resamples it onto the carrier time base with
//! [`Envelope::interpolate`] before modulating.
//!
//! Synthetic shapes are provided for tests and demos:
//!
//! - [`Envelope::rectangular_pulse`] - single flat-topped pulse
//! - [`Envelope::trapezoid`] - single pulse with linear ramps

use crate::error::{Result, SimError};
use crate::math;

/// Voltage samples paired with their time stamps in seconds.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Envelope {
    values: Vec<f64>,
    times: Vec<f64>,
}

/// A contiguous piece cut out of a longer record.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvelopeSlice {
    /// The isolated samples and their time stamps.
    pub envelope: Envelope,
    /// Index of the first isolated sample within the source record.
    pub offset: usize,
}

impl Envelope {
    /// Pair values with time stamps.
    ///
    /// # Errors
    ///
    /// `ShapeMismatch` if the two sequences differ in length.
    pub fn new(values: Vec<f64>, times: Vec<f64>) -> Result<Self> {
        SimError::check_len("envelope times/values", times.len(), values.len())?;
        Ok(Self { values, times })
    }

    /// Uniformly sampled record starting at `t = 0`.
    pub fn from_samples(values: Vec<f64>, sample_rate: f64) -> Self {
        let times = (0..values.len()).map(|i| i as f64 / sample_rate).collect();
        Self { values, times }
    }

    /// Zero everywhere except `height` volts on `[start, start + width)`.
    ///
    /// Sampled at `sample_rate` over `[0, duration)`.
    pub fn rectangular_pulse(
        height: f64,
        start: f64,
        width: f64,
        duration: f64,
        sample_rate: f64,
    ) -> Self {
        Self::sampled(duration, sample_rate, |t| {
            if t >= start && t < start + width { height } else { 0.0 }
        })
    }

    /// Single trapezoidal pulse: ramps up over `rise`, holds `height` for
    /// `hold`, ramps down over `fall`, starting at `start`.
    ///
    /// Sampled at `sample_rate` over `[0, duration)`. Zero-length ramps give
    /// vertical edges.
    pub fn trapezoid(
        height: f64,
        start: f64,
        rise: f64,
        hold: f64,
        fall: f64,
        duration: f64,
        sample_rate: f64,
    ) -> Self {
        let top = start + rise;
        let down = top + hold;
        let end = down + fall;
        Self::sampled(duration, sample_rate, |t| {
            if t < start || t >= end {
                0.0
            } else if t < top {
                height * (t - start) / rise
            } else if t < down {
                height
            } else {
                height * (end - t) / fall
            }
        })
    }

    fn sampled(duration: f64, sample_rate: f64, shape: impl Fn(f64) -> f64) -> Self {
        let n = if duration > 0.0 && sample_rate > 0.0 {
            (duration * sample_rate).round() as usize
        } else {
            0
        };
        let times: Vec<f64> = (0..n).map(|i| i as f64 / sample_rate).collect();
        let values = times.iter().map(|&t| shape(t)).collect();
        Self { values, times }
    }

    /// Voltage samples.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Time stamps in seconds.
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if the record holds no samples.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Largest absolute value.
    pub fn peak(&self) -> f64 {
        math::peak(&self.values)
    }

    /// Largest signed value; zero for an empty record.
    pub fn max(&self) -> f64 {
        math::min_max(&self.values).map_or(0.0, |(_, hi)| hi)
    }

    /// Time spanned from the first to the last stamp.
    pub fn duration(&self) -> f64 {
        match (self.times.first(), self.times.last()) {
            (Some(a), Some(b)) => b - a,
            _ => 0.0,
        }
    }

    /// Linear interpolation onto `t`, holding the end values outside the
    /// recorded range. An empty envelope interpolates to zeros.
    pub fn interpolate(&self, t: &[f64]) -> Vec<f64> {
        math::interp(t, &self.times, &self.values)
    }

    /// Shift time stamps so the first sample sits at `t = 0`.
    pub fn rezeroed(mut self) -> Self {
        if let Some(&t0) = self.times.first() {
            self.times.iter_mut().for_each(|t| *t -= t0);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_checks_lengths() {
        assert!(Envelope::new(vec![1.0, 2.0], vec![0.0, 1.0]).is_ok());
        assert!(matches!(
            Envelope::new(vec![1.0], vec![0.0, 1.0]),
            Err(SimError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn rectangular_pulse_shape() {
        let env = Envelope::rectangular_pulse(0.01, 2e-3, 1e-3, 5e-3, 14_000.0);
        assert_eq!(env.len(), 70);
        assert_eq!(env.max(), 0.01);
        assert_eq!(env.values()[0], 0.0);
        assert_eq!(env.values()[35], 0.01);
        assert_eq!(env.values()[60], 0.0);
        let high = env.values().iter().filter(|&&v| v > 0.0).count();
        assert!((13..=15).contains(&high), "{high} samples high");
    }

    #[test]
    fn trapezoid_ramps() {
        let env = Envelope::trapezoid(1.0, 0.0, 4.0, 2.0, 4.0, 12.0, 1.0);
        assert_eq!(
            env.values(),
            &[0.0, 0.25, 0.5, 0.75, 1.0, 1.0, 1.0, 0.75, 0.5, 0.25, 0.0, 0.0]
        );
    }

    #[test]
    fn interpolate_holds_ends() {
        let env = Envelope::new(vec![1.0, 3.0], vec![1.0, 2.0]).unwrap();
        assert_eq!(env.interpolate(&[0.0, 1.5, 5.0]), vec![1.0, 2.0, 3.0]);
        assert_eq!(Envelope::default().interpolate(&[1.0]), vec![0.0]);
    }

    #[test]
    fn peak_max_duration() {
        let env = Envelope::from_samples(vec![0.1, -0.4, 0.2], 10.0);
        assert_eq!(env.peak(), 0.4);
        assert_eq!(env.max(), 0.2);
        assert!((env.duration() - 0.2).abs() < 1e-12);
        assert_eq!(Envelope::default().max(), 0.0);
    }

    #[test]
    fn rezero_shifts_time() {
        let env = Envelope::new(vec![1.0, 2.0], vec![3.0, 3.5]).unwrap().rezeroed();
        assert_eq!(env.times(), &[0.0, 0.5]);
    }
}
