//! One-pole lowpass filter for amplifier settling.
//!
//! A single-pole IIR lowpass with the difference equation:
//!
//! ```text
//! y[n] = x[n] + coeff * (y[n-1] - x[n])
//!      = (1 - coeff) * x[n] + coeff * y[n-1]
//! ```
//!
//! where `coeff = exp(-2π * freq / sample_rate)`.
//!
//! 6 dB/octave rolloff, causal, starting from rest. This is the bandwidth
//! model for op-amp stages: unlike the demodulation filter it is not
//! zero-phase, so a settling transient is visible at the start of a record.
//!
//! The pole is matched (impulse-invariant), not bilinear-transformed, so the
//! −3 dB point sits at `freq` only while `freq` is well below Nyquist; it
//! drifts as `freq` approaches `sample_rate / 2`.
//!
//! # Usage
//!
//! ```rust
//! use zlock_core::OnePole;
//!
//! let mut lp = OnePole::new(250e6, 50e6);
//! let filtered = lp.process(1.0);
//! assert!(filtered < 1.0);
//! ```
//!
//! # Reference
//!
//! Julius O. Smith III, "Introduction to Digital Filters with Audio Applications",
//! Section: One-Pole Filter.

use libm::exp;

/// One-pole (6 dB/oct) lowpass filter.
///
/// # Invariants
///
/// - `coeff` is always in [0, 1) for stable operation
#[derive(Debug, Clone)]
pub struct OnePole {
    state: f64,
    coeff: f64,
}

impl OnePole {
    /// Create a new one-pole lowpass filter.
    ///
    /// # Arguments
    ///
    /// * `sample_rate` - Sample rate in Hz
    /// * `freq_hz` - Cutoff (−3 dB) frequency in Hz
    pub fn new(sample_rate: f64, freq_hz: f64) -> Self {
        // higher freq -> lower coeff -> less filtering
        Self {
            state: 0.0,
            coeff: exp(-core::f64::consts::TAU * freq_hz / sample_rate),
        }
    }

    /// Process one sample through the lowpass filter.
    #[inline]
    pub fn process(&mut self, input: f64) -> f64 {
        self.state = input + self.coeff * (self.state - input);
        self.state
    }

    /// Filter a whole sequence, continuing from the current state.
    pub fn process_block(&mut self, input: &[f64]) -> Vec<f64> {
        input.iter().map(|&x| self.process(x)).collect()
    }
}
