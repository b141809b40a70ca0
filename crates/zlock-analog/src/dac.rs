//! Digital-to-analog converter model.
//!
//! The error model maps codes (as floats in `[0, 2^n − 1]`) to a normalized
//! output in roughly `[0, 1]`:
//!
//! ```text
//! x      = (code + INL(code) + DNL(round(code))) / max_code
//! y      = x · (1 + gain_error) + offset_error
//! y[i]  += glitch_energy_frac · toggled_bits / n_bits · (±1)   at code transitions
//! ```
//!
//! The output is not clipped, so gain and offset errors can push it slightly
//! outside `[0, 1]`. [`DacSimulator`] scales by `v_ref`.

use rand::Rng;

use crate::nonlinearity::Nonlinearity;
use crate::params::DacParams;
use crate::rng::{SimRng, seeded};
use zlock_core::{Result, SimError};

/// Apply DAC non-idealities to a code sequence.
///
/// Draws a fresh INL/DNL profile from `rng` and then one sign per code
/// transition when glitches are enabled. Calling again with a generator in
/// the same state gives bit-identical output.
///
/// # Errors
///
/// `ParameterOutOfRange` if `params` fails validation.
pub fn dac_errors<R: Rng + ?Sized>(codes: &[f64], params: &DacParams, rng: &mut R) -> Result<Vec<f64>> {
    params.validate()?;
    let mut profile = Nonlinearity::draw(params.n_bits, params.inl_lsb, params.dnl_lsb, rng);
    Ok(apply_dac_errors(codes, params, &mut profile, rng))
}

fn apply_dac_errors<R: Rng + ?Sized>(
    codes: &[f64],
    params: &DacParams,
    profile: &mut Nonlinearity,
    rng: &mut R,
) -> Vec<f64> {
    let max = f64::from(params.max_code());
    let gain = 1.0 + params.gain_error;
    let glitch = params.glitch_energy_frac;
    let bits = f64::from(params.n_bits);

    let mut previous: Option<u32> = None;
    codes
        .iter()
        .map(|&code| {
            let x = (code + profile.error_lsb(code)) / max;
            let mut y = x * gain + params.offset_error;

            if glitch > 0.0 && code.is_finite() {
                let current = code.round().clamp(0.0, max) as u32;
                if let Some(prev) = previous.filter(|&p| p != current) {
                    let toggled = f64::from((prev ^ current).count_ones());
                    let sign = if rng.random::<bool>() { 1.0 } else { -1.0 };
                    y += sign * glitch * toggled / bits;
                }
                previous = Some(current);
            }
            y
        })
        .collect()
}

/// Digital input to a DAC.
#[derive(Debug, Clone, Copy)]
pub enum DigitalInput<'a> {
    /// Fractions of full scale in `[0, 1]`; values outside are clamped.
    Normalized(&'a [f64]),
    /// Integer codes; values above the top code are clamped.
    Codes(&'a [u32]),
}

impl<'a> From<&'a [f64]> for DigitalInput<'a> {
    fn from(v: &'a [f64]) -> Self {
        DigitalInput::Normalized(v)
    }
}

impl<'a> From<&'a Vec<f64>> for DigitalInput<'a> {
    fn from(v: &'a Vec<f64>) -> Self {
        DigitalInput::Normalized(v)
    }
}

impl<'a> From<&'a [u32]> for DigitalInput<'a> {
    fn from(v: &'a [u32]) -> Self {
        DigitalInput::Codes(v)
    }
}

impl<'a> From<&'a Vec<u32>> for DigitalInput<'a> {
    fn from(v: &'a Vec<u32>) -> Self {
        DigitalInput::Codes(v)
    }
}

impl DigitalInput<'_> {
    /// Codes as floats in `[0, max_code]`. NaN stays NaN.
    fn to_codes(self, max_code: u32) -> Vec<f64> {
        let max = f64::from(max_code);
        match self {
            DigitalInput::Normalized(v) => v.iter().map(|&x| x.clamp(0.0, 1.0) * max).collect(),
            DigitalInput::Codes(c) => c.iter().map(|&k| f64::from(k.min(max_code))).collect(),
        }
    }
}

/// DAC with its own seeded generator and a fixed INL/DNL profile.
///
/// The profile is drawn once at construction, so repeated conversions see the
/// same static nonlinearity; only glitch signs advance the generator.
#[derive(Debug, Clone)]
pub struct DacSimulator {
    params: DacParams,
    sample_rate: f64,
    profile: Nonlinearity,
    rng: SimRng,
}

impl DacSimulator {
    /// Build a simulator.
    ///
    /// # Errors
    ///
    /// `ParameterOutOfRange` if `params` fails validation or `sample_rate` is
    /// not positive and finite.
    pub fn new(params: DacParams, sample_rate: f64, seed: u64) -> Result<Self> {
        params.validate()?;
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(SimError::out_of_range(
                "sample_rate",
                sample_rate,
                "must be positive and finite",
            ));
        }
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
        Self::new(DacParams::ideal(n_bits, v_ref), sample_rate, 0)
    }

    /// Convert to volts.
    ///
    /// Accepts normalized floats or integer codes (see [`DigitalInput`]).
    pub fn digital_to_analog<'a>(&mut self, input: impl Into<DigitalInput<'a>>) -> Vec<f64> {
        let codes = input.into().to_codes(self.params.max_code());
        #[cfg(feature = "tracing")]
        tracing::debug!(samples = codes.len(), bits = self.params.n_bits, "dac convert");
        let mut out = apply_dac_errors(&codes, &self.params, &mut self.profile, &mut self.rng);
        let v_ref = self.params.v_ref;
        out.iter_mut().for_each(|v| *v *= v_ref);
        out
    }

    /// Parameter set.
    pub fn params(&self) -> &DacParams {
        &self.params
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }
}
