//! Documented bounds of every configuration knob.
//!
//! Knobs are flat and in human units (percent of full scale, µV, mV, MHz,
//! kHz). Out-of-range values are clamped to these bounds by
//! [`SimulationConfig::clamped`](crate::SimulationConfig::clamped) before any
//! simulator is built.

/// One tunable value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Knob {
    /// TOML key.
    pub key: &'static str,
    /// Short description with unit.
    pub label: &'static str,
    /// Smallest accepted value.
    pub min: f64,
    /// Largest accepted value.
    pub max: f64,
    /// Value used when the key is absent.
    pub default: f64,
    /// Rounded to a whole number when applied.
    pub integer: bool,
}

impl Knob {
    const fn real(key: &'static str, label: &'static str, min: f64, max: f64, default: f64) -> Self {
        Self {
            key,
            label,
            min,
            max,
            default,
            integer: false,
        }
    }

    const fn int(key: &'static str, label: &'static str, min: f64, max: f64, default: f64) -> Self {
        Self {
            key,
            label,
            min,
            max,
            default,
            integer: true,
        }
    }

    /// True if `value` is inside `[min, max]`.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Clamp into `[min, max]`, rounding integer knobs. NaN becomes the default.
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            return self.default;
        }
        let v = value.clamp(self.min, self.max);
        if self.integer { v.round() } else { v }
    }
}

/// Every knob of [`SimulationConfig`](crate::SimulationConfig).
pub const KNOBS: &[Knob] = &[
    // signal
    Knob::real("carrier_vpp", "carrier amplitude (Vpp)", 0.1, 2.0, 1.0),
    Knob::real("carrier_freq_khz", "carrier frequency (kHz)", 1.0, 5_000.0, 500.0),
    Knob::real("sample_rate_mhz", "sample rate (MHz)", 1.0, 250.0, 10.0),
    Knob::real("lpf_enbw_khz", "demodulation ENBW (kHz)", 1.0, 100.0, 10.0),
    // recovery
    Knob::real("graph_scale", "recovered envelope scale", 0.1, 10.0, 1.0),
    Knob::real("dc_bias_uv", "recovered envelope DC bias (µV)", -100_000.0, 100_000.0, 0.0),
    // op-amp
    Knob::real("opamp_bw_mhz", "op-amp bandwidth (MHz)", 1.0, 100.0, 50.0),
    Knob::real("opamp_noise_uv", "op-amp noise (µV RMS)", 0.0, 10.0, 0.0),
    Knob::real("opamp_offset_mv", "op-amp offset (mV)", -10.0, 10.0, 0.0),
    Knob::real("opamp_gain_pct", "op-amp gain error (%)", -10.0, 10.0, 0.0),
    // DAC
    Knob::int("dac_bits", "DAC resolution (bits)", 4.0, 24.0, 16.0),
    Knob::real("dac_v_ref", "DAC reference (V)", 0.5, 2.0, 1.0),
    Knob::real("dac_inl_lsb", "DAC INL (LSB)", 0.0, 16.0, 0.0),
    Knob::real("dac_dnl_lsb", "DAC DNL (LSB)", 0.0, 6.0, 0.0),
    Knob::real("dac_gain_pct_fs", "DAC gain error (%FS)", -10.0, 10.0, 0.0),
    Knob::real("dac_offset_pct_fs", "DAC offset error (%FS)", -10.0, 10.0, 0.0),
    Knob::real("dac_glitch_frac", "DAC glitch energy (fraction of FS)", 0.0, 0.01, 0.0),
    // ADC
    Knob::int("adc_bits", "ADC resolution (bits)", 4.0, 24.0, 16.0),
    Knob::real("adc_v_ref", "ADC reference (V)", 0.5, 2.0, 1.0),
    Knob::real("adc_inl_lsb", "ADC INL (LSB)", 0.0, 16.0, 0.0),
    Knob::real("adc_dnl_lsb", "ADC DNL (LSB)", 0.0, 6.0, 0.0),
    Knob::real("adc_gain_pct_fs", "ADC gain error (%FS)", -10.0, 10.0, 0.0),
    Knob::real("adc_offset_pct_fs", "ADC offset error (%FS)", -10.0, 10.0, 0.0),
    Knob::real("adc_jitter_sec", "ADC aperture jitter (s)", 0.0, 5e-12, 0.0),
];

/// Look up a knob by key.
pub fn knob(key: &str) -> Option<&'static Knob> {
    KNOBS.iter().find(|k| k.key == key)
}
