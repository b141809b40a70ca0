//! Fourth-order Butterworth lowpass with forward-backward (zero-phase) filtering.
//!
//! The filter is realized as two cascaded biquad sections with the Butterworth
//! pole Q values `1/(2·cos(π/8))` and `1/(2·cos(3π/8))`. Running the cascade
//! forward and then backward over the record cancels the phase response, which
//! is what the lock-in demodulator needs: the recovered envelope must line up
//! in time with the injected one.
//!
//! # Edge handling
//!
//! Before filtering, the record is extended at both ends by an odd reflection
//! about its end samples (`2·x[0] − x[k]`), and each pass starts from the DC
//! steady state of its first sample. This keeps the start-up transient small
//! without assuming anything about the signal outside the record. The
//! extension length is `3·(2·sections + 1)` samples; shorter records are
//! rejected with [`SimError::SignalTooShort`].
//!
//! # Example
//!
//! ```rust
//! use zlock_core::ButterworthLowpass;
//!
//! let lp = ButterworthLowpass::new(10e6, 9_746.0).unwrap();
//! let dc = vec![0.5; 1000];
//! let out = lp.filtfilt(&dc).unwrap();
//! assert!(out.iter().all(|y| (y - 0.5).abs() < 1e-9));
//! ```

use crate::biquad::{Biquad, lowpass_coefficients};
use crate::error::{Result, SimError};

/// Pole Q values of a 4th-order Butterworth prototype, one per biquad section.
pub const BUTTERWORTH4_Q: [f64; 2] = [0.541_196_100_146_197, 1.306_562_964_876_376_6];

/// Smallest normalized cutoff (fraction of Nyquist) the designer accepts.
pub const MIN_NORMALIZED_CUTOFF: f64 = 1e-6;

/// Largest normalized cutoff (fraction of Nyquist) the designer accepts.
pub const MAX_NORMALIZED_CUTOFF: f64 = 0.9999;

/// Fourth-order Butterworth lowpass.
#[derive(Debug, Clone)]
pub struct ButterworthLowpass {
    sections: [Biquad; 2],
    sample_rate: f64,
    cutoff_hz: f64,
}

impl ButterworthLowpass {
    /// Design the filter.
    ///
    /// The requested cutoff is normalized to Nyquist and clamped to
    /// [`MIN_NORMALIZED_CUTOFF`, `MAX_NORMALIZED_CUTOFF`] rather than rejected;
    /// [`cutoff_hz`](Self::cutoff_hz) reports the cutoff actually used.
    ///
    /// # Errors
    ///
    /// `ParameterOutOfRange` if `sample_rate` is not a positive finite number
    /// or `cutoff_hz` is not finite.
    pub fn new(sample_rate: f64, cutoff_hz: f64) -> Result<Self> {
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(SimError::out_of_range(
                "sample_rate",
                sample_rate,
                "must be positive and finite",
            ));
        }
        if !cutoff_hz.is_finite() {
            return Err(SimError::out_of_range("cutoff_hz", cutoff_hz, "must be finite"));
        }

        let nyquist = sample_rate / 2.0;
        let wn = (cutoff_hz / nyquist).clamp(MIN_NORMALIZED_CUTOFF, MAX_NORMALIZED_CUTOFF);
        let cutoff_hz = wn * nyquist;

        let sections = BUTTERWORTH4_Q.map(|q| Biquad::new(lowpass_coefficients(cutoff_hz, q, sample_rate)));

        Ok(Self {
            sections,
            sample_rate,
            cutoff_hz,
        })
    }

    /// Cutoff frequency in Hz after clamping.
    pub fn cutoff_hz(&self) -> f64 {
        self.cutoff_hz
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Cutoff as a fraction of Nyquist.
    pub fn normalized_cutoff(&self) -> f64 {
        self.cutoff_hz / (self.sample_rate / 2.0)
    }

    /// Number of samples added at each end before zero-phase filtering.
    pub fn pad_len(&self) -> usize {
        3 * (2 * self.sections.len() + 1)
    }

    /// Causal filtering from rest (single forward pass).
    pub fn filter(&self, input: &[f64]) -> Vec<f64> {
        let mut sections = self.sections.clone();
        sections.iter_mut().for_each(Biquad::clear);
        input
            .iter()
            .map(|&x| sections.iter_mut().fold(x, |acc, s| s.process(acc)))
            .collect()
    }

    /// Zero-phase (forward-backward) filtering.
    ///
    /// The magnitude response is the square of the single-pass response and
    /// the phase response is identically zero.
    ///
    /// # Errors
    ///
    /// `SignalTooShort` if `input.len() <= pad_len()`.
    pub fn filtfilt(&self, input: &[f64]) -> Result<Vec<f64>> {
        let n = input.len();
        let pad = self.pad_len();
        if n <= pad {
            return Err(SimError::SignalTooShort {
                len: n,
                required: pad + 1,
            });
        }

        let extended = odd_extend(input, pad);

        let mut y = self.primed_pass(&extended);
        y.reverse();
        let mut y = self.primed_pass(&y);
        y.reverse();

        y.truncate(pad + n);
        y.drain(..pad);
        Ok(y)
    }

    /// One pass with every section primed at the steady state of `data[0]`.
    fn primed_pass(&self, data: &[f64]) -> Vec<f64> {
        let mut sections = self.sections.clone();
        if let Some(&first) = data.first() {
            sections.iter_mut().fold(first, |v, s| s.prime(v));
        }
        data.iter()
            .map(|&x| sections.iter_mut().fold(x, |acc, s| s.process(acc)))
            .collect()
    }
}

/// Extend `x` by `pad` samples at each end with an odd reflection about the
/// end points. Requires `x.len() > pad`.
fn odd_extend(x: &[f64], pad: usize) -> Vec<f64> {
    let n = x.len();
    let first = x[0];
    let last = x[n - 1];

    let mut out = Vec::with_capacity(n + 2 * pad);
    out.extend((1..=pad).rev().map(|i| 2.0 * first - x[i]));
    out.extend_from_slice(x);
    out.extend((1..=pad).map(|i| 2.0 * last - x[n - 1 - i]));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f64::consts::TAU;

    fn tone(freq: f64, fs: f64, n: usize) -> Vec<f64> {
        (0..n).map(|i| (TAU * freq * i as f64 / fs).sin()).collect()
    }

    fn peak(x: &[f64]) -> f64 {
        x.iter().fold(0.0f64, |m, v| m.max(v.abs()))
    }

    #[test]
    fn odd_extension_layout() {
        let x = [1.0, 2.0, 4.0, 7.0];
        let ext = odd_extend(&x, 2);
        // left: 2*1 - 4, 2*1 - 2 ; right: 2*7 - 4, 2*7 - 2
        assert_eq!(ext, vec![-2.0, 0.0, 1.0, 2.0, 4.0, 7.0, 10.0, 12.0]);
    }

    #[test]
    fn cutoff_is_clamped_not_rejected() {
        let lp = ButterworthLowpass::new(1000.0, 10_000.0).unwrap();
        assert!((lp.normalized_cutoff() - MAX_NORMALIZED_CUTOFF).abs() < 1e-12);

        let lp = ButterworthLowpass::new(1000.0, 0.0).unwrap();
        assert!((lp.normalized_cutoff() - MIN_NORMALIZED_CUTOFF).abs() < 1e-15);
    }

    #[test]
    fn rejects_bad_sample_rate() {
        assert!(matches!(
            ButterworthLowpass::new(0.0, 100.0),
            Err(SimError::ParameterOutOfRange { param: "sample_rate", .. })
        ));
        assert!(ButterworthLowpass::new(f64::NAN, 100.0).is_err());
        assert!(ButterworthLowpass::new(1000.0, f64::INFINITY).is_err());
    }

    #[test]
    fn short_signal_is_reported() {
        let lp = ButterworthLowpass::new(48000.0, 1000.0).unwrap();
        let pad = lp.pad_len();
        assert_eq!(pad, 15);
        let err = lp.filtfilt(&vec![0.0; pad]).unwrap_err();
        assert_eq!(
            err,
            SimError::SignalTooShort {
                len: pad,
                required: pad + 1
            }
        );
        assert!(lp.filtfilt(&vec![0.0; pad + 1]).is_ok());
    }

    #[test]
    fn filtfilt_preserves_length_and_dc() {
        let lp = ButterworthLowpass::new(10e6, 9_746.0).unwrap();
        let x = vec![0.3; 5000];
        let y = lp.filtfilt(&x).unwrap();
        assert_eq!(y.len(), x.len());
        for v in &y {
            assert!((v - 0.3).abs() < 1e-9, "DC not preserved: {v}");
        }
    }

    #[test]
    fn passband_tone_keeps_amplitude() {
        let fs = 48000.0;
        let lp = ButterworthLowpass::new(fs, 4000.0).unwrap();
        let x = tone(200.0, fs, 9600);
        let y = lp.filtfilt(&x).unwrap();
        let p = peak(&y[2000..7600]);
        assert!((p - 1.0).abs() < 0.01, "passband peak {p}");
    }

    #[test]
    fn stopband_tone_is_rejected() {
        let fs = 48000.0;
        let lp = ButterworthLowpass::new(fs, 500.0).unwrap();
        let x = tone(10_000.0, fs, 9600);
        let y = lp.filtfilt(&x).unwrap();
        assert!(peak(&y[2000..7600]) < 1e-4);
    }

    #[test]
    fn zero_phase_keeps_peak_aligned() {
        // A slow tone well inside the passband must not be delayed.
        let fs = 10_000.0;
        let lp = ButterworthLowpass::new(fs, 1000.0).unwrap();
        let x = tone(20.0, fs, 5000);
        let y = lp.filtfilt(&x).unwrap();

        let argmax = |s: &[f64]| {
            s.iter()
                .enumerate()
                .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
                .map(|(i, _)| i)
                .unwrap()
        };
        let ix = argmax(&x[1000..1400]);
        let iy = argmax(&y[1000..1400]);
        assert!(ix.abs_diff(iy) <= 1, "peak moved from {ix} to {iy}");
    }

    #[test]
    fn causal_filter_delays_and_filtfilt_does_not() {
        let fs = 10_000.0;
        let lp = ButterworthLowpass::new(fs, 200.0).unwrap();
        let mut step = vec![0.0; 2000];
        step[1000..].iter_mut().for_each(|v| *v = 1.0);

        let causal = lp.filter(&step);
        let zero_phase = lp.filtfilt(&step).unwrap();

        // Half-amplitude crossing sits at the step for the zero-phase output
        // and after it for the causal one.
        let crossing = |s: &[f64]| s.iter().position(|&v| v >= 0.5).unwrap();
        assert!(crossing(&zero_phase).abs_diff(1000) <= 1);
        assert!(crossing(&causal) > 1002);
    }
}
