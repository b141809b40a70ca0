//! Deterministic reference waveforms.
//!
//! All generators take an explicit time axis rather than a sample count, so
//! the same call can evaluate a tone on a uniform grid, on a jittered grid, or
//! on a slice of a longer record.
//!
//! # Example
//!
//! ```rust
//! use zlock_core::waveform::{multifrequency_sine, time_axis};
//!
//! let t = time_axis(1024, 250e6);
//! let y = multifrequency_sine(&t, &[1e6, 3e6], &[0.5, 0.25], None).unwrap();
//! assert_eq!(y.len(), t.len());
//! ```

use core::f64::consts::TAU;

use crate::error::{Result, SimError};

/// Uniform time axis: `t[i] = i / sample_rate`.
pub fn time_axis(num_samples: usize, sample_rate: f64) -> Vec<f64> {
    (0..num_samples).map(|i| i as f64 / sample_rate).collect()
}

/// `amplitude · sin(2π·frequency·t + phase)` evaluated at every time point.
pub fn sine_wave(t: &[f64], frequency: f64, amplitude: f64, phase: f64) -> Vec<f64> {
    t.iter()
        .map(|&ti| amplitude * (TAU * frequency * ti + phase).sin())
        .collect()
}

/// `amplitude · cos(2π·frequency·t + phase)` evaluated at every time point.
pub fn cosine_wave(t: &[f64], frequency: f64, amplitude: f64, phase: f64) -> Vec<f64> {
    t.iter()
        .map(|&ti| amplitude * (TAU * frequency * ti + phase).cos())
        .collect()
}

/// Sum of independent tones.
///
/// `phases` defaults to zero for every tone when `None`.
///
/// # Errors
///
/// `ShapeMismatch` if `amplitudes` (or `phases`, when given) do not have the
/// same length as `frequencies`.
pub fn multifrequency_sine(
    t: &[f64],
    frequencies: &[f64],
    amplitudes: &[f64],
    phases: Option<&[f64]>,
) -> Result<Vec<f64>> {
    SimError::check_len("frequencies/amplitudes", frequencies.len(), amplitudes.len())?;
    if let Some(phases) = phases {
        SimError::check_len("frequencies/phases", frequencies.len(), phases.len())?;
    }

    let mut out = vec![0.0; t.len()];
    for (k, (&f, &a)) in frequencies.iter().zip(amplitudes.iter()).enumerate() {
        let phase = phases.map_or(0.0, |p| p[k]);
        for (y, &ti) in out.iter_mut().zip(t.iter()) {
            *y += a * (TAU * f * ti + phase).sin();
        }
    }
    Ok(out)
}

/// Number of whole samples that realize `phase_delay_rad` at `frequency`.
///
/// `round(phase_delay_rad / (2π·frequency) · sample_rate)`; zero when the
/// frequency is not a positive finite number.
pub fn phase_delay_samples(phase_delay_rad: f64, sample_rate: f64, frequency: f64) -> i64 {
    if !(frequency.is_finite() && frequency > 0.0) {
        return 0;
    }
    let delay = phase_delay_rad / (TAU * frequency) * sample_rate;
    if delay.is_finite() { delay.round() as i64 } else { 0 }
}

/// Shift a single-tone signal by a phase offset.
///
/// The delay is quantized to whole samples (see [`phase_delay_samples`]) and
/// applied as a circular shift: `out[i] = signal[(i − d) mod n]`. This is not
/// a fractional delay; sub-sample phase is lost.
pub fn apply_phase_delay(
    signal: &[f64],
    phase_delay_rad: f64,
    sample_rate: f64,
    frequency: f64,
) -> Vec<f64> {
    let n = signal.len();
    let mut out = signal.to_vec();
    if n == 0 {
        return out;
    }
    let d = phase_delay_samples(phase_delay_rad, sample_rate, frequency);
    let shift = d.rem_euclid(n as i64) as usize;
    out.rotate_right(shift);
    out
}
