//! Second-order IIR section.
//!
//! The building block of the demodulator's Butterworth cascade. Lowpass
//! coefficients follow the RBJ cookbook: the bilinear transform of an analog
//! second-order section with pre-warped cutoff, so sections with Butterworth
//! pole Q values cascade to an exact digital Butterworth response.

use core::f64::consts::TAU;
use libm::{cos, sin};

/// Normalized coefficients (`a0 = 1`) of one section.
///
/// ```text
/// y[n] = b[0]·x[n] + b[1]·x[n-1] + b[2]·x[n-2] − a[0]·y[n-1] − a[1]·y[n-2]
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiquadCoefficients {
    /// Feedforward taps.
    pub b: [f64; 3],
    /// Feedback taps for `y[n-1]` and `y[n-2]`.
    pub a: [f64; 2],
}

impl BiquadCoefficients {
    /// Identity section.
    pub const PASSTHROUGH: Self = Self {
        b: [1.0, 0.0, 0.0],
        a: [0.0, 0.0],
    };

    /// Gain at DC, `Σb / (1 + Σa)`. Zero for a section with a pole at DC.
    pub fn dc_gain(&self) -> f64 {
        let den = 1.0 + self.a[0] + self.a[1];
        if den.abs() < f64::MIN_POSITIVE {
            0.0
        } else {
            self.b.iter().sum::<f64>() / den
        }
    }
}

/// Lowpass section with cutoff `frequency` and pole quality `q`.
pub fn lowpass_coefficients(frequency: f64, q: f64, sample_rate: f64) -> BiquadCoefficients {
    let w0 = TAU * frequency / sample_rate;
    let cw = cos(w0);
    let alpha = sin(w0) / (2.0 * q);
    let norm = 1.0 / (1.0 + alpha);

    let side = (1.0 - cw) / 2.0 * norm;
    BiquadCoefficients {
        b: [side, 2.0 * side, side],
        a: [-2.0 * cw * norm, (1.0 - alpha) * norm],
    }
}

/// Direct Form I section with its delay lines.
#[derive(Debug, Clone)]
pub struct Biquad {
    coefficients: BiquadCoefficients,
    /// x[n-1], x[n-2]
    x: [f64; 2],
    /// y[n-1], y[n-2]
    y: [f64; 2],
}

impl Biquad {
    /// Section at rest.
    pub fn new(coefficients: BiquadCoefficients) -> Self {
        Self {
            coefficients,
            x: [0.0; 2],
            y: [0.0; 2],
        }
    }

    /// Coefficients in use.
    pub fn coefficients(&self) -> &BiquadCoefficients {
        &self.coefficients
    }

    /// Filter one sample.
    #[inline]
    pub fn process(&mut self, input: f64) -> f64 {
        let BiquadCoefficients { b, a } = self.coefficients;
        let output = b[0] * input + b[1] * self.x[0] + b[2] * self.x[1] - a[0] * self.y[0] - a[1] * self.y[1];
        self.x = [input, self.x[0]];
        self.y = [output, self.y[0]];
        output
    }

    /// Load the delay lines with the steady state of a constant input
    /// `value` and return the steady-state output.
    pub fn prime(&mut self, value: f64) -> f64 {
        let out = value * self.coefficients.dc_gain();
        self.x = [value; 2];
        self.y = [out; 2];
        out
    }

    /// Return to rest.
    pub fn clear(&mut self) {
        self.x = [0.0; 2];
        self.y = [0.0; 2];
    }
}

impl Default for Biquad {
    fn default() -> Self {
        Self::new(BiquadCoefficients::PASSTHROUGH)
    }
}
