//! Step-response measurements on demodulated records.
//!
//! Used to check that the recovered envelope settles within the
//! demodulation filter's time constant (about `1 / ENBW`).

use serde::Serialize;
use zlock_core::math;

/// Timing and shape of a single step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StepResponse {
    /// Level before the step.
    pub initial: f64,
    /// Level after the step.
    pub final_value: f64,
    /// `final_value − initial`.
    pub step: f64,
    /// Time from the 10 % to the 90 % crossing, in seconds.
    pub rise_time: f64,
    /// Time from the start of the segment until the signal stays within
    /// the tolerance band around `final_value`, in seconds.
    pub settling_time: f64,
    /// Excursion beyond `final_value` in percent of `|step|`.
    pub overshoot_pct: f64,
}

/// Measure a step contained in `segment`.
///
/// The segment should start on the old level and end on the new one; the
/// levels are the medians of its first and last tenth. Returns `None` for
/// segments shorter than 20 samples or a step smaller than `1e-15`.
pub fn step_response(segment: &[f64], sample_rate: f64, tolerance: f64) -> Option<StepResponse> {
    let n = segment.len();
    if n < 20 {
        return None;
    }
    let edge = n / 10;
    let initial = math::median(&segment[..edge])?;
    let final_value = math::median(&segment[n - edge..])?;
    let step = final_value - initial;
    if step.abs() < 1e-15 {
        return None;
    }

    // normalized progress: 0 at the old level, 1 at the new one
    let progress = |x: f64| (x - initial) / step;
    let crossing = |level: f64| segment.iter().position(|&x| progress(x) >= level);

    let t10 = crossing(0.1)?;
    let t90 = crossing(0.9)?;
    let band = tolerance.abs() * step.abs();
    let settled = segment
        .iter()
        .rposition(|&x| (x - final_value).abs() > band)
        .map_or(0, |i| i + 1);

    let overshoot = segment.iter().map(|&x| progress(x) - 1.0).fold(0.0f64, f64::max);

    Some(StepResponse {
        initial,
        final_value,
        step,
        rise_time: t90.saturating_sub(t10) as f64 / sample_rate,
        settling_time: settled as f64 / sample_rate,
        overshoot_pct: overshoot * 100.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ideal_step() {
        let x: Vec<f64> = (0..100).map(|i| if i < 50 { 1.0 } else { 2.0 }).collect();
        let s = step_response(&x, 1000.0, 0.02).unwrap();
        assert_eq!(s.initial, 1.0);
        assert_eq!(s.final_value, 2.0);
        assert_eq!(s.rise_time, 0.0);
        assert!((s.settling_time - 0.05).abs() < 1e-12);
        assert_eq!(s.overshoot_pct, 0.0);
    }

    #[test]
    fn ramp_rise_time() {
        // linear ramp from 0 to 1 over samples 20..=80
        let x: Vec<f64> = (0..100)
            .map(|i| ((f64::from(i) - 20.0) / 60.0).clamp(0.0, 1.0))
            .collect();
        let s = step_response(&x, 1.0, 0.01).unwrap();
        assert!((s.rise_time - 48.0).abs() <= 1.0, "rise {}", s.rise_time);
    }

    #[test]
    fn falling_step_with_overshoot() {
        let mut x = vec![1.0; 40];
        x.extend([0.5, -0.2, 0.05]);
        x.extend(vec![0.0; 57]);
        let s = step_response(&x, 1.0, 0.01).unwrap();
        assert!(s.step < 0.0);
        assert!((s.overshoot_pct - 20.0).abs() < 1e-9);
        assert_eq!(s.settling_time, 43.0);
    }

    #[test]
    fn flat_and_short_segments() {
        assert!(step_response(&[1.0; 100], 1.0, 0.01).is_none());
        assert!(step_response(&[0.0, 1.0], 1.0, 0.01).is_none());
    }
}
