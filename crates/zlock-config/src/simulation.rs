//! Flat simulation configuration in human units.
//!
//! # File Format
//!
//! ```toml
//! carrier_vpp = 1.0
//! lpf_enbw_khz = 10.0
//! seed = 42
//!
//! dac_bits = 16
//! dac_inl_lsb = 4.0
//!
//! adc_bits = 14
//! adc_jitter_sec = 1e-13
//! ```
//!
//! Every key is optional; absent keys take the documented default (see
//! [`KNOBS`](crate::KNOBS)). Unknown keys are rejected.

use std::path::Path;

use serde::{Deserialize, Serialize};
use zlock_analog::{AdcParams, DacParams, OpAmpParams, OpAmpTopology};
use zlock_analysis::{ChainConfig, RecoveryOptions};

use crate::error::ConfigError;
use crate::knobs::{KNOBS, knob};

/// Knob whose requested value was outside its bounds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClampedKnob {
    /// Knob key.
    pub key: &'static str,
    /// Value found in the configuration.
    pub requested: f64,
    /// Value actually used.
    pub applied: f64,
}

/// Every tunable of one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Carrier amplitude at the DAC output, Vpp.
    pub carrier_vpp: f64,
    /// Carrier frequency, kHz.
    pub carrier_freq_khz: f64,
    /// Sample rate, MHz.
    pub sample_rate_mhz: f64,
    /// Demodulation lowpass ENBW, kHz.
    pub lpf_enbw_khz: f64,
    /// Base seed of the component simulators.
    pub seed: u64,

    /// Multiplier applied to the recovered envelope.
    pub graph_scale: f64,
    /// DC bias added to the recovered envelope, µV.
    pub dc_bias_uv: f64,

    /// Op-amp bandwidth, MHz.
    pub opamp_bw_mhz: f64,
    /// Op-amp noise, µV RMS.
    pub opamp_noise_uv: f64,
    /// Op-amp offset, mV.
    pub opamp_offset_mv: f64,
    /// Op-amp gain error, %.
    pub opamp_gain_pct: f64,

    /// DAC resolution, bits.
    pub dac_bits: u32,
    /// DAC reference, V.
    pub dac_v_ref: f64,
    /// DAC INL, LSB.
    pub dac_inl_lsb: f64,
    /// DAC DNL, LSB.
    pub dac_dnl_lsb: f64,
    /// DAC gain error, %FS.
    pub dac_gain_pct_fs: f64,
    /// DAC offset error, %FS.
    pub dac_offset_pct_fs: f64,
    /// DAC glitch energy, fraction of FS.
    pub dac_glitch_frac: f64,

    /// ADC resolution, bits.
    pub adc_bits: u32,
    /// ADC reference, V.
    pub adc_v_ref: f64,
    /// ADC INL, LSB.
    pub adc_inl_lsb: f64,
    /// ADC DNL, LSB.
    pub adc_dnl_lsb: f64,
    /// ADC gain error, %FS.
    pub adc_gain_pct_fs: f64,
    /// ADC offset error, %FS.
    pub adc_offset_pct_fs: f64,
    /// ADC aperture jitter, s.
    pub adc_jitter_sec: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            carrier_vpp: 1.0,
            carrier_freq_khz: 500.0,
            sample_rate_mhz: 10.0,
            lpf_enbw_khz: 10.0,
            seed: 42,
            graph_scale: 1.0,
            dc_bias_uv: 0.0,
            opamp_bw_mhz: 50.0,
            opamp_noise_uv: 0.0,
            opamp_offset_mv: 0.0,
            opamp_gain_pct: 0.0,
            dac_bits: 16,
            dac_v_ref: 1.0,
            dac_inl_lsb: 0.0,
            dac_dnl_lsb: 0.0,
            dac_gain_pct_fs: 0.0,
            dac_offset_pct_fs: 0.0,
            dac_glitch_frac: 0.0,
            adc_bits: 16,
            adc_v_ref: 1.0,
            adc_inl_lsb: 0.0,
            adc_dnl_lsb: 0.0,
            adc_gain_pct_fs: 0.0,
            adc_offset_pct_fs: 0.0,
            adc_jitter_sec: 0.0,
        }
    }
}

impl SimulationConfig {
    /// Load from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Load from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }
        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))
    }

    /// Convert to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Value of a knob in its configured unit.
    pub fn get(&self, key: &str) -> Option<f64> {
        let v = match key {
            "carrier_vpp" => self.carrier_vpp,
            "carrier_freq_khz" => self.carrier_freq_khz,
            "sample_rate_mhz" => self.sample_rate_mhz,
            "lpf_enbw_khz" => self.lpf_enbw_khz,
            "graph_scale" => self.graph_scale,
            "dc_bias_uv" => self.dc_bias_uv,
            "opamp_bw_mhz" => self.opamp_bw_mhz,
            "opamp_noise_uv" => self.opamp_noise_uv,
            "opamp_offset_mv" => self.opamp_offset_mv,
            "opamp_gain_pct" => self.opamp_gain_pct,
            "dac_bits" => f64::from(self.dac_bits),
            "dac_v_ref" => self.dac_v_ref,
            "dac_inl_lsb" => self.dac_inl_lsb,
            "dac_dnl_lsb" => self.dac_dnl_lsb,
            "dac_gain_pct_fs" => self.dac_gain_pct_fs,
            "dac_offset_pct_fs" => self.dac_offset_pct_fs,
            "dac_glitch_frac" => self.dac_glitch_frac,
            "adc_bits" => f64::from(self.adc_bits),
            "adc_v_ref" => self.adc_v_ref,
            "adc_inl_lsb" => self.adc_inl_lsb,
            "adc_dnl_lsb" => self.adc_dnl_lsb,
            "adc_gain_pct_fs" => self.adc_gain_pct_fs,
            "adc_offset_pct_fs" => self.adc_offset_pct_fs,
            "adc_jitter_sec" => self.adc_jitter_sec,
            _ => return None,
        };
        Some(v)
    }

    /// Assign a knob without clamping. Bit depths are rounded.
    ///
    /// `seed` is accepted as well and must be a non-negative integer.
    pub fn set(&mut self, key: &str, value: f64) -> Result<(), ConfigError> {
        let slot = match key {
            "seed" => {
                if !(value.is_finite() && value >= 0.0 && value.fract() == 0.0) {
                    return Err(ConfigError::invalid_value(key, "seed must be a non-negative integer"));
                }
                self.seed = value as u64;
                return Ok(());
            }
            "dac_bits" | "adc_bits" => {
                if !(value.is_finite() && value >= 0.0) {
                    return Err(ConfigError::invalid_value(key, "bit depth must be non-negative"));
                }
                let bits = value.round().min(f64::from(u32::MAX)) as u32;
                if key == "dac_bits" {
                    self.dac_bits = bits;
                } else {
                    self.adc_bits = bits;
                }
                return Ok(());
            }
            "carrier_vpp" => &mut self.carrier_vpp,
            "carrier_freq_khz" => &mut self.carrier_freq_khz,
            "sample_rate_mhz" => &mut self.sample_rate_mhz,
            "lpf_enbw_khz" => &mut self.lpf_enbw_khz,
            "graph_scale" => &mut self.graph_scale,
            "dc_bias_uv" => &mut self.dc_bias_uv,
            "opamp_bw_mhz" => &mut self.opamp_bw_mhz,
            "opamp_noise_uv" => &mut self.opamp_noise_uv,
            "opamp_offset_mv" => &mut self.opamp_offset_mv,
            "opamp_gain_pct" => &mut self.opamp_gain_pct,
            "dac_v_ref" => &mut self.dac_v_ref,
            "dac_inl_lsb" => &mut self.dac_inl_lsb,
            "dac_dnl_lsb" => &mut self.dac_dnl_lsb,
            "dac_gain_pct_fs" => &mut self.dac_gain_pct_fs,
            "dac_offset_pct_fs" => &mut self.dac_offset_pct_fs,
            "dac_glitch_frac" => &mut self.dac_glitch_frac,
            "adc_v_ref" => &mut self.adc_v_ref,
            "adc_inl_lsb" => &mut self.adc_inl_lsb,
            "adc_dnl_lsb" => &mut self.adc_dnl_lsb,
            "adc_gain_pct_fs" => &mut self.adc_gain_pct_fs,
            "adc_offset_pct_fs" => &mut self.adc_offset_pct_fs,
            "adc_jitter_sec" => &mut self.adc_jitter_sec,
            _ => return Err(ConfigError::UnknownKnob(key.to_string())),
        };
        *slot = value;
        Ok(())
    }

    /// Parse and apply a `key=value` assignment.
    pub fn apply_assignment(&mut self, assignment: &str) -> Result<(), ConfigError> {
        let (key, value) = assignment
            .split_once('=')
            .ok_or_else(|| ConfigError::invalid_value(assignment, "expected key=value"))?;
        let key = key.trim();
        let value: f64 = value
            .trim()
            .parse()
            .map_err(|_| ConfigError::invalid_value(key, format!("'{}' is not a number", value.trim())))?;
        self.set(key, value)
    }

    /// Copy with every knob clamped to its bounds, plus the knobs that moved.
    pub fn clamped(&self) -> (Self, Vec<ClampedKnob>) {
        let mut out = self.clone();
        let mut changed = Vec::new();
        for k in KNOBS {
            let Some(requested) = self.get(k.key) else {
                continue;
            };
            let applied = k.clamp(requested);
            if applied.to_bits() != requested.to_bits() {
                // every KNOBS key is settable
                let _ = out.set(k.key, applied);
                changed.push(ClampedKnob {
                    key: k.key,
                    requested,
                    applied,
                });
            }
        }
        (out, changed)
    }

    /// True if every knob is inside its bounds.
    pub fn is_within_bounds(&self) -> bool {
        KNOBS
            .iter()
            .all(|k| self.get(k.key).is_some_and(|v| k.contains(v)))
    }

    /// Convert human units to the chain's SI configuration.
    ///
    /// No clamping or validation happens here; call [`clamped`](Self::clamped)
    /// first and let [`SignalChain::new`](zlock_analysis::SignalChain::new)
    /// validate.
    pub fn to_chain_config(&self) -> ChainConfig {
        ChainConfig {
            sample_rate: self.sample_rate_mhz * 1e6,
            carrier_hz: self.carrier_freq_khz * 1e3,
            carrier_vpp: self.carrier_vpp,
            lpf_enbw_hz: self.lpf_enbw_khz * 1e3,
            seed: self.seed,
            dac: DacParams {
                n_bits: self.dac_bits,
                v_ref: self.dac_v_ref,
                inl_lsb: self.dac_inl_lsb,
                dnl_lsb: self.dac_dnl_lsb,
                gain_error: self.dac_gain_pct_fs / 100.0,
                offset_error: self.dac_offset_pct_fs / 100.0,
                glitch_energy_frac: self.dac_glitch_frac,
            },
            opamp: OpAmpParams {
                topology: OpAmpTopology::VoltageFollower,
                bandwidth_hz: self.opamp_bw_mhz * 1e6,
                gain_error: self.opamp_gain_pct / 100.0,
                offset_voltage: self.opamp_offset_mv * 1e-3,
                noise_rms: self.opamp_noise_uv * 1e-6,
            },
            adc: AdcParams {
                n_bits: self.adc_bits,
                v_ref: self.adc_v_ref,
                inl_lsb: self.adc_inl_lsb,
                dnl_lsb: self.adc_dnl_lsb,
                gain_error: self.adc_gain_pct_fs / 100.0,
                offset_error: self.adc_offset_pct_fs / 100.0,
                aperture_jitter_sec: self.adc_jitter_sec,
            },
        }
    }

    /// Scale and DC bias for envelope recovery.
    pub fn to_recovery_options(&self) -> RecoveryOptions {
        RecoveryOptions {
            scale: self.graph_scale,
            dc_bias: self.dc_bias_uv * 1e-6,
            ..RecoveryOptions::default()
        }
    }

    /// Reset one knob to its documented default.
    pub fn reset(&mut self, key: &str) -> Result<(), ConfigError> {
        let k = knob(key).ok_or_else(|| ConfigError::UnknownKnob(key.to_string()))?;
        self.set(k.key, k.default)
    }
}
