//! IQ (lock-in) demodulation.
//!
//! The sampled signal is mixed with a sine and a cosine at the reference
//! frequency, both products are lowpass filtered with a zero-phase 4th-order
//! Butterworth, and the magnitude is taken:
//!
//! ```text
//! X = LPF{ s · sin(ω_ref · t) }      in-phase
//! Y = LPF{ s · cos(ω_ref · t) }      quadrature
//! R = √(X² + Y²)
//! ```
//!
//! The filter is specified by its equivalent noise bandwidth. For a 4th-order
//! Butterworth `ENBW ≈ 1.026 · f_c`, so the cutoff is `ENBW / 1.026`.
//!
//! For a tone `A · sin(ω_ref t + φ)` the output settles to `R = A/2`,
//! `atan2(Y, X) = φ`.
//!
//! # Example
//!
//! ```rust
//! use zlock_analysis::IqDemodulator;
//! use zlock_core::{sine_wave, time_axis};
//!
//! let fs = 10e6;
//! let t = time_axis(50_000, fs);
//! let s = sine_wave(&t, 500e3, 0.8, 0.0);
//! let demod = IqDemodulator::new(fs, 500e3, 10e3).unwrap();
//! let iq = demod.demodulate(&s, &t).unwrap();
//! assert!((iq.magnitude[25_000] - 0.4).abs() < 1e-4);
//! ```

use core::f64::consts::TAU;

use zlock_core::{ButterworthLowpass, Result, SimError};

/// ENBW of a 4th-order Butterworth lowpass relative to its −3 dB cutoff.
pub const ENBW_RATIO: f64 = 1.026;

/// Filtered quadrature components and their magnitude.
#[derive(Debug, Clone, PartialEq)]
pub struct IqOutput {
    /// Lowpass-filtered `s · sin(ω t)`.
    pub in_phase: Vec<f64>,
    /// Lowpass-filtered `s · cos(ω t)`.
    pub quadrature: Vec<f64>,
    /// `√(X² + Y²)`.
    pub magnitude: Vec<f64>,
}

impl IqOutput {
    /// Phase `atan2(Y, X)` in radians.
    pub fn phase(&self) -> Vec<f64> {
        self.in_phase
            .iter()
            .zip(&self.quadrature)
            .map(|(&x, &y)| y.atan2(x))
            .collect()
    }
}

/// Lock-in demodulator for one reference frequency.
#[derive(Debug, Clone)]
pub struct IqDemodulator {
    reference_hz: f64,
    enbw_hz: f64,
    filter: ButterworthLowpass,
}

impl IqDemodulator {
    /// Build a demodulator.
    ///
    /// The cutoff `enbw_hz / 1.026` is clamped to the valid digital range
    /// (see [`ButterworthLowpass::new`]) rather than rejected.
    ///
    /// # Errors
    ///
    /// `ParameterOutOfRange` if `sample_rate` is not positive and finite, or
    /// `reference_hz` or `enbw_hz` is not finite.
    pub fn new(sample_rate: f64, reference_hz: f64, enbw_hz: f64) -> Result<Self> {
        if !reference_hz.is_finite() {
            return Err(SimError::out_of_range("reference_hz", reference_hz, "must be finite"));
        }
        if !enbw_hz.is_finite() {
            return Err(SimError::out_of_range("enbw_hz", enbw_hz, "must be finite"));
        }
        let filter = ButterworthLowpass::new(sample_rate, enbw_hz / ENBW_RATIO)?;
        Ok(Self {
            reference_hz,
            enbw_hz,
            filter,
        })
    }

    /// Reference frequency in Hz.
    pub fn reference_hz(&self) -> f64 {
        self.reference_hz
    }

    /// Requested equivalent noise bandwidth in Hz.
    pub fn enbw_hz(&self) -> f64 {
        self.enbw_hz
    }

    /// Lowpass cutoff actually used, in Hz.
    pub fn cutoff_hz(&self) -> f64 {
        self.filter.cutoff_hz()
    }

    /// Shortest record that can be demodulated.
    pub fn min_len(&self) -> usize {
        self.filter.pad_len() + 1
    }

    /// Mix, filter and take the magnitude.
    ///
    /// # Errors
    ///
    /// `ShapeMismatch` if `signal` and `t` differ in length; `SignalTooShort`
    /// if the record is shorter than [`min_len`](Self::min_len).
    pub fn demodulate(&self, signal: &[f64], t: &[f64]) -> Result<IqOutput> {
        SimError::check_len("t/signal", t.len(), signal.len())?;

        let w = TAU * self.reference_hz;
        let (x_raw, y_raw): (Vec<f64>, Vec<f64>) = signal
            .iter()
            .zip(t)
            .map(|(&s, &ti)| {
                let (sin, cos) = (w * ti).sin_cos();
                (s * sin, s * cos)
            })
            .unzip();

        let in_phase = self.filter.filtfilt(&x_raw)?;
        let quadrature = self.filter.filtfilt(&y_raw)?;
        let magnitude = in_phase
            .iter()
            .zip(&quadrature)
            .map(|(&x, &y)| x.hypot(y))
            .collect();

        Ok(IqOutput {
            in_phase,
            quadrature,
            magnitude,
        })
    }

    /// Magnitude only.
    pub fn magnitude(&self, signal: &[f64], t: &[f64]) -> Result<Vec<f64>> {
        Ok(self.demodulate(signal, t)?.magnitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f64::consts::FRAC_PI_3;
    use zlock_core::{sine_wave, time_axis};

    #[test]
    fn cutoff_follows_enbw() {
        let d = IqDemodulator::new(10e6, 500e3, 10e3).unwrap();
        assert!((d.cutoff_hz() - 10e3 / 1.026).abs() < 1e-6);
        assert_eq!(d.min_len(), 16);
    }

    #[test]
    fn excessive_enbw_is_clamped() {
        let d = IqDemodulator::new(1e6, 100e3, 10e6).unwrap();
        assert!(d.cutoff_hz() < 0.5e6);
    }

    #[test]
    fn recovers_amplitude_and_phase() {
        let fs = 10e6;
        let t = time_axis(40_000, fs);
        let s = sine_wave(&t, 500e3, 0.6, FRAC_PI_3);
        let d = IqDemodulator::new(fs, 500e3, 10e3).unwrap();
        let iq = d.demodulate(&s, &t).unwrap();
        let mid = 20_000;
        assert!((iq.magnitude[mid] - 0.3).abs() < 1e-5);
        assert!((iq.phase()[mid] - FRAC_PI_3).abs() < 1e-4);
    }

    #[test]
    fn off_frequency_tone_is_rejected() {
        let fs = 10e6;
        let t = time_axis(40_000, fs);
        let s = sine_wave(&t, 700e3, 1.0, 0.0);
        let d = IqDemodulator::new(fs, 500e3, 10e3).unwrap();
        let r = d.magnitude(&s, &t).unwrap();
        assert!(r[10_000..30_000].iter().all(|&v| v < 1e-6));
    }

    #[test]
    fn dc_offset_does_not_leak() {
        let fs = 10e6;
        let t = time_axis(40_000, fs);
        let s: Vec<f64> = sine_wave(&t, 500e3, 0.5, 0.0).iter().map(|v| v + 0.5).collect();
        let d = IqDemodulator::new(fs, 500e3, 10e3).unwrap();
        let r = d.magnitude(&s, &t).unwrap();
        assert!((r[20_000] - 0.25).abs() < 1e-5);
    }

    #[test]
    fn shape_and_length_errors() {
        let d = IqDemodulator::new(10e6, 500e3, 10e3).unwrap();
        assert!(matches!(
            d.demodulate(&[0.0; 100], &[0.0; 99]),
            Err(SimError::ShapeMismatch { .. })
        ));
        assert!(matches!(
            d.demodulate(&[0.0; 10], &[0.0; 10]),
            Err(SimError::SignalTooShort { len: 10, .. })
        ));
    }
}
