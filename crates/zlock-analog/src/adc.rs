//! Analog-to-digital converter model.
//!
//! Conversion order:
//!
//! 1. Aperture jitter: each sample is moved along the local slope by
//!    `slope · δt`, `δt ~ N(0, σ_jitter²)`. The slope is a central difference
//!    (one-sided at the ends) scaled by the sample rate.
//! 2. Normalize by `v_ref`, then `x · (1 + gain_error) + offset_error`.
//! 3. Scale to codes and add INL/DNL in LSBs.
//! 4. Round and hard-clamp to `[0, 2^n − 1]`.
//!
//! Non-finite input cannot be represented as a code: NaN maps to code 0 and
//! ±∞ to the rails.

use rand::Rng;
use rand_distr::StandardNormal;

use crate::nonlinearity::Nonlinearity;
use crate::params::AdcParams;
use crate::rng::{SimRng, seeded};
use zlock_core::{Result, SimError};

/// Quantize an analog sequence to codes with ADC non-idealities.
///
/// Draws a fresh INL/DNL profile from `rng`, then one Gaussian per sample
/// when jitter is enabled.
///
/// # Errors
///
/// `ParameterOutOfRange` if `params` fails validation or `sample_rate` is
/// not positive and finite.
pub fn adc_errors<R: Rng + ?Sized>(
    analog: &[f64],
    params: &AdcParams,
    sample_rate: f64,
    rng: &mut R,
) -> Result<Vec<u32>> {
    params.validate()?;
    check_sample_rate(sample_rate)?;
    let mut profile = Nonlinearity::draw(params.n_bits, params.inl_lsb, params.dnl_lsb, rng);
    Ok(apply_adc_errors(analog, params, sample_rate, &mut profile, rng))
}

fn check_sample_rate(sample_rate: f64) -> Result<()> {
    if sample_rate.is_finite() && sample_rate > 0.0 {
        Ok(())
    } else {
        Err(SimError::out_of_range(
            "sample_rate",
            sample_rate,
            "must be positive and finite",
        ))
    }
}

fn apply_adc_errors<R: Rng + ?Sized>(
    analog: &[f64],
    params: &AdcParams,
    sample_rate: f64,
    profile: &mut Nonlinearity,
    rng: &mut R,
) -> Vec<u32> {
    let jittered = apply_jitter(analog, params.aperture_jitter_sec, sample_rate, rng);
    let max_code = params.max_code();
    let max = f64::from(max_code);
    let gain = 1.0 + params.gain_error;

    jittered
        .iter()
        .map(|&v| {
            let x = (v / params.v_ref) * gain + params.offset_error;
            let code = x * max;
            let code = code + profile.error_lsb(code);
            quantize(code, max_code)
        })
        .collect()
}

/// Round to the nearest code and clamp to `[0, max_code]`.
#[inline]
fn quantize(code: f64, max_code: u32) -> u32 {
    if code.is_nan() {
        return 0;
    }
    code.round().clamp(0.0, f64::from(max_code)) as u32
}

/// Local slope in units per second.
fn slope(x: &[f64], i: usize, sample_rate: f64) -> f64 {
    let n = x.len();
    if n < 2 {
        return 0.0;
    }
    let d = if i == 0 {
        x[1] - x[0]
    } else if i == n - 1 {
        x[n - 1] - x[n - 2]
    } else {
        (x[i + 1] - x[i - 1]) / 2.0
    };
    d * sample_rate
}

fn apply_jitter<R: Rng + ?Sized>(x: &[f64], sigma: f64, sample_rate: f64, rng: &mut R) -> Vec<f64> {
    if sigma <= 0.0 {
        return x.to_vec();
    }
    (0..x.len())
        .map(|i| {
            let dt = sigma * rng.sample::<f64, _>(StandardNormal);
            x[i] + slope(x, i, sample_rate) * dt
        })
        .collect()
}

/// ADC with its own seeded generator and a fixed INL/DNL profile.
#[derive(Debug, Clone)]
pub struct AdcSimulator {
    params: AdcParams,
    sample_rate: f64,
    profile: Nonlinearity,
    rng: SimRng,
}

impl AdcSimulator {
    /// Build a simulator.
    ///
    /// # Errors
    ///
    /// `ParameterOutOfRange` if `params` fails validation or `sample_rate` is
    /// not positive and finite.
    pub fn new(params: AdcParams, sample_rate: f64, seed: u64) -> Result<Self> {
        params.validate()?;
        check_sample_rate(sample_rate)?;
        let mut rng = seeded(seed);
        let profile = Nonlinearity::draw(params.n_bits, params.inl_lsb, params.dnl_lsb, &mut rng);
        Ok(Self {
            params,
            sample_rate,
            profile,
            rng,
        })
    }

    /// Error-free converter.
    pub fn ideal(n_bits: u32, v_ref: f64, sample_rate: f64) -> Result<Self> {
        Self::new(AdcParams::ideal(n_bits, v_ref), sample_rate, 0)
    }

    /// Quantize volts to codes in `[0, 2^n − 1]`.
    pub fn analog_to_digital(&mut self, analog: &[f64]) -> Vec<u32> {
        #[cfg(feature = "tracing")]
        tracing::debug!(samples = analog.len(), bits = self.params.n_bits, "adc convert");
        apply_adc_errors(
            analog,
            &self.params,
            self.sample_rate,
            &mut self.profile,
            &mut self.rng,
        )
    }

    /// Codes back to volts: `code / (2^n − 1) · v_ref`.
    pub fn reconstruct(&self, codes: &[u32]) -> Vec<f64> {
        let max = f64::from(self.params.max_code());
        codes
            .iter()
            .map(|&c| f64::from(c) / max * self.params.v_ref)
            .collect()
    }

    /// Parameter set.
    pub fn params(&self) -> &AdcParams {
        &self.params
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }
}
