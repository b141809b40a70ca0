//! Validated non-ideality parameter sets, one per component role.
//!
//! Each set is a plain struct with public fields so callers can build it with
//! struct-update syntax. The simulators call [`validate`](DacParams::validate)
//! once at construction and reject, never clamp, values that violate an
//! invariant.
//!
//! Conventions shared by the converters:
//!
//! - `inl_lsb` / `dnl_lsb` are magnitudes in LSBs (≥ 0)
//! - `gain_error` is fractional (`0.01` = +1 %) and may be signed
//! - `offset_error` is a fraction of full scale and may be signed

use zlock_core::{Result, SimError};

/// Smallest supported converter resolution.
pub const MIN_BITS: u32 = 1;

/// Largest supported converter resolution.
pub const MAX_BITS: u32 = 24;

/// Largest code of an `n_bits` converter: `2^n_bits − 1`.
///
/// Saturates at `u32::MAX` from 32 bits up; zero bits give zero.
#[inline]
pub fn max_code(n_bits: u32) -> u32 {
    match n_bits {
        0 => 0,
        n => u32::MAX >> (32 - n.min(32)),
    }
}

fn check_bits(n_bits: u32) -> Result<()> {
    if (MIN_BITS..=MAX_BITS).contains(&n_bits) {
        Ok(())
    } else {
        Err(SimError::out_of_range(
            "n_bits",
            f64::from(n_bits),
            "must be between 1 and 24",
        ))
    }
}

fn check_positive(param: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SimError::out_of_range(param, value, "must be positive and finite"))
    }
}

fn check_non_negative(param: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SimError::out_of_range(param, value, "must be non-negative and finite"))
    }
}

fn check_finite(param: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SimError::out_of_range(param, value, "must be finite"))
    }
}

/// DAC non-idealities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DacParams {
    /// Resolution in bits.
    pub n_bits: u32,
    /// Full-scale reference voltage.
    pub v_ref: f64,
    /// Integral nonlinearity, peak-to-peak, in LSBs.
    pub inl_lsb: f64,
    /// Differential nonlinearity bound in LSBs.
    pub dnl_lsb: f64,
    /// Fractional gain error.
    pub gain_error: f64,
    /// Offset as a fraction of full scale.
    pub offset_error: f64,
    /// Glitch impulse at a full-scale code transition, as a fraction of full scale.
    pub glitch_energy_frac: f64,
}

impl Default for DacParams {
    /// 16-bit, 1 V, INL 4 LSB, DNL 0.5 LSB.
    fn default() -> Self {
        Self {
            n_bits: 16,
            v_ref: 1.0,
            inl_lsb: 4.0,
            dnl_lsb: 0.5,
            gain_error: 0.0,
            offset_error: 0.0,
            glitch_energy_frac: 0.0,
        }
    }
}

impl DacParams {
    /// Error-free converter.
    pub fn ideal(n_bits: u32, v_ref: f64) -> Self {
        Self {
            n_bits,
            v_ref,
            inl_lsb: 0.0,
            dnl_lsb: 0.0,
            gain_error: 0.0,
            offset_error: 0.0,
            glitch_energy_frac: 0.0,
        }
    }

    /// Largest code.
    pub fn max_code(&self) -> u32 {
        max_code(self.n_bits)
    }

    /// Check every invariant.
    pub fn validate(&self) -> Result<()> {
        check_bits(self.n_bits)?;
        check_positive("v_ref", self.v_ref)?;
        check_non_negative("inl_lsb", self.inl_lsb)?;
        check_non_negative("dnl_lsb", self.dnl_lsb)?;
        check_finite("gain_error", self.gain_error)?;
        check_finite("offset_error", self.offset_error)?;
        check_non_negative("glitch_energy_frac", self.glitch_energy_frac)
    }
}

/// ADC non-idealities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdcParams {
    /// Resolution in bits.
    pub n_bits: u32,
    /// Full-scale reference voltage.
    pub v_ref: f64,
    /// Integral nonlinearity, peak-to-peak, in LSBs.
    pub inl_lsb: f64,
    /// Differential nonlinearity bound in LSBs.
    pub dnl_lsb: f64,
    /// Fractional gain error.
    pub gain_error: f64,
    /// Offset as a fraction of full scale.
    pub offset_error: f64,
    /// RMS aperture jitter in seconds.
    pub aperture_jitter_sec: f64,
}

impl Default for AdcParams {
    /// 16-bit, 1 V, INL 2 LSB, DNL 0.5 LSB, 0.1 ps jitter.
    fn default() -> Self {
        Self {
            n_bits: 16,
            v_ref: 1.0,
            inl_lsb: 2.0,
            dnl_lsb: 0.5,
            gain_error: 0.0,
            offset_error: 0.0,
            aperture_jitter_sec: 0.1e-12,
        }
    }
}

impl AdcParams {
    /// Error-free converter.
    pub fn ideal(n_bits: u32, v_ref: f64) -> Self {
        Self {
            n_bits,
            v_ref,
            inl_lsb: 0.0,
            dnl_lsb: 0.0,
            gain_error: 0.0,
            offset_error: 0.0,
            aperture_jitter_sec: 0.0,
        }
    }

    /// Largest code.
    pub fn max_code(&self) -> u32 {
        max_code(self.n_bits)
    }

    /// Check every invariant.
    pub fn validate(&self) -> Result<()> {
        check_bits(self.n_bits)?;
        check_positive("v_ref", self.v_ref)?;
        check_non_negative("inl_lsb", self.inl_lsb)?;
        check_non_negative("dnl_lsb", self.dnl_lsb)?;
        check_finite("gain_error", self.gain_error)?;
        check_finite("offset_error", self.offset_error)?;
        check_non_negative("aperture_jitter_sec", self.aperture_jitter_sec)
    }
}

/// How the amplifier maps its input to an ideal output voltage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OpAmpTopology {
    /// Current in, `−I·Rf` volts out.
    Transimpedance {
        /// Feedback resistance in ohms.
        ohms: f64,
    },
    /// Unity-gain voltage buffer.
    VoltageFollower,
}

/// Op-amp / TIA non-idealities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpAmpParams {
    /// Ideal transfer.
    pub topology: OpAmpTopology,
    /// −3 dB bandwidth in Hz. Zero disables bandwidth limiting.
    pub bandwidth_hz: f64,
    /// Fractional gain error.
    pub gain_error: f64,
    /// Output offset in volts.
    pub offset_voltage: f64,
    /// Additive Gaussian noise RMS in volts.
    pub noise_rms: f64,
}

impl Default for OpAmpParams {
    /// 10 kΩ transimpedance, 50 MHz, noiseless.
    fn default() -> Self {
        Self {
            topology: OpAmpTopology::Transimpedance { ohms: 10e3 },
            bandwidth_hz: 50e6,
            gain_error: 0.0,
            offset_voltage: 0.0,
            noise_rms: 0.0,
        }
    }
}

impl OpAmpParams {
    /// Unity-gain buffer with no errors and unlimited bandwidth.
    pub fn ideal() -> Self {
        Self {
            topology: OpAmpTopology::VoltageFollower,
            bandwidth_hz: 0.0,
            gain_error: 0.0,
            offset_voltage: 0.0,
            noise_rms: 0.0,
        }
    }

    /// Check every invariant.
    pub fn validate(&self) -> Result<()> {
        if let OpAmpTopology::Transimpedance { ohms } = self.topology {
            check_finite("transimpedance_ohms", ohms)?;
        }
        check_non_negative("bandwidth_hz", self.bandwidth_hz)?;
        check_finite("gain_error", self.gain_error)?;
        check_finite("offset_voltage", self.offset_voltage)?;
        check_non_negative("noise_rms", self.noise_rms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(DacParams::default().validate().is_ok());
        assert!(AdcParams::default().validate().is_ok());
        assert!(OpAmpParams::default().validate().is_ok());
        assert!(OpAmpParams::ideal().validate().is_ok());
    }

    #[test]
    fn max_code_values() {
        assert_eq!(max_code(1), 1);
        assert_eq!(max_code(16), 65_535);
        assert_eq!(max_code(24), 16_777_215);
        assert_eq!(max_code(0), 0);
        assert_eq!(max_code(32), u32::MAX);
        assert_eq!(max_code(64), u32::MAX);
    }

    #[test]
    fn bit_depth_bounds() {
        for bits in [0, 25, 32] {
            let p = DacParams {
                n_bits: bits,
                ..DacParams::default()
            };
            assert!(matches!(
                p.validate(),
                Err(SimError::ParameterOutOfRange { param: "n_bits", .. })
            ));
        }
        assert!(AdcParams::ideal(1, 1.0).validate().is_ok());
        assert!(AdcParams::ideal(24, 1.0).validate().is_ok());
    }

    #[test]
    fn rejects_bad_reference() {
        for v_ref in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let p = AdcParams::ideal(16, v_ref);
            assert!(
                matches!(p.validate(), Err(SimError::ParameterOutOfRange { param: "v_ref", .. })),
                "v_ref {v_ref} accepted"
            );
        }
    }

    #[test]
    fn magnitudes_must_be_non_negative() {
        let p = DacParams {
            inl_lsb: -1.0,
            ..DacParams::default()
        };
        assert!(p.validate().is_err());

        let p = AdcParams {
            aperture_jitter_sec: -1e-12,
            ..AdcParams::default()
        };
        assert!(p.validate().is_err());

        let p = OpAmpParams {
            noise_rms: -1e-6,
            ..OpAmpParams::default()
        };
        assert!(p.validate().is_err());
    }

    #[test]
    fn signed_errors_are_allowed() {
        let p = DacParams {
            gain_error: -0.05,
            offset_error: -0.01,
            ..DacParams::default()
        };
        assert!(p.validate().is_ok());

        let p = OpAmpParams {
            offset_voltage: -0.01,
            gain_error: -0.1,
            ..OpAmpParams::ideal()
        };
        assert!(p.validate().is_ok());
    }
}
