//! Full signal-chain orchestration.
//!
//! ```text
//! carrier ─► DAC ─► × (1 + envelope) ─► op-amp buffer ─► clamp ─► ADC ─► IQ demod
//!             │                                                              │
//!             └────────────── IQ demod (diagnostic) ────────────────────────┘
//! ```
//!
//! Every stage consumes the whole array of the previous one. Simulators are
//! built fresh for each run from the chain seed (`seed`, `seed + 1`,
//! `seed + 2` for DAC, op-amp and ADC), so repeated runs with the same inputs
//! are bit-identical.

use core::f64::consts::TAU;

use serde::Serialize;
use zlock_analog::{
    AdcParams, AdcSimulator, DacParams, DacSimulator, OpAmpParams, OpAmpSimulator, OpAmpTopology,
};
use zlock_core::{Envelope, Result, SimError, math, time_axis};

use crate::demod::IqDemodulator;
use crate::recovery::{StageError, stage_error_pct};

/// Carrier headroom factor above the modulated peak.
pub const HEADROOM: f64 = 1.01;

/// Fewest samples [`SignalChain::run_envelope`] will simulate.
pub const MIN_RUN_SAMPLES: usize = 100;

/// Chain settings in SI units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainConfig {
    /// Sample rate of every stage in Hz.
    pub sample_rate: f64,
    /// Carrier and demodulation reference frequency in Hz.
    pub carrier_hz: f64,
    /// Requested carrier peak-to-peak voltage at the DAC output.
    pub carrier_vpp: f64,
    /// Demodulation lowpass ENBW in Hz.
    pub lpf_enbw_hz: f64,
    /// Base seed for the component simulators.
    pub seed: u64,
    /// DAC non-idealities.
    pub dac: DacParams,
    /// Buffer amplifier non-idealities.
    pub opamp: OpAmpParams,
    /// ADC non-idealities.
    pub adc: AdcParams,
}

impl Default for ChainConfig {
    /// 10 MHz sampling, 500 kHz carrier at 1 Vpp, 10 kHz ENBW, error-free
    /// 16-bit converters and a 50 MHz buffer.
    fn default() -> Self {
        Self {
            sample_rate: 10e6,
            carrier_hz: 500e3,
            carrier_vpp: 1.0,
            lpf_enbw_hz: 10e3,
            seed: 42,
            dac: DacParams::ideal(16, 1.0),
            opamp: OpAmpParams {
                topology: OpAmpTopology::VoltageFollower,
                bandwidth_hz: 50e6,
                ..OpAmpParams::ideal()
            },
            adc: AdcParams::ideal(16, 1.0),
        }
    }
}

impl ChainConfig {
    /// Every stage error-free, for round-trip checks.
    pub fn ideal() -> Self {
        Self {
            opamp: OpAmpParams::ideal(),
            ..Self::default()
        }
    }
}

/// Every intermediate array of one chain run plus scalar diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChainOutput {
    /// Time stamps in seconds.
    pub t: Vec<f64>,
    /// Envelope interpolated onto `t`.
    pub envelope: Vec<f64>,
    /// `max |envelope|`.
    pub envelope_peak: f64,
    /// `envelope_peak · 100`.
    pub modulation_depth_pct: f64,
    /// Factor applied to the carrier to keep the modulated peak below the
    /// reference. `1.0` when no rescaling was needed.
    pub carrier_scale: f64,
    /// Normalized carrier center and amplitude after scaling.
    pub carrier_amp: f64,
    /// `carrier_amp · dac_v_ref`.
    pub carrier_amp_volts: f64,
    /// DAC reference voltage.
    pub dac_v_ref: f64,
    /// Normalized DAC input in `[0, 1]`.
    pub dac_input: Vec<f64>,
    /// DAC output with errors, in volts.
    pub dac_output: Vec<f64>,
    /// Error-free DAC output, in volts.
    pub dac_output_ideal: Vec<f64>,
    /// Buffer output, in volts.
    pub opamp_output: Vec<f64>,
    /// Buffer output clamped to `[0, adc_v_ref]`.
    pub adc_input: Vec<f64>,
    /// ADC codes.
    pub adc_codes: Vec<u32>,
    /// Reconstructed ADC voltage.
    pub adc_output: Vec<f64>,
    /// Demodulated magnitude of `adc_output`.
    pub adc_demod: Vec<f64>,
    /// Demodulated magnitude of `dac_output`.
    pub dac_demod: Vec<f64>,
    /// Demodulated magnitude of `dac_output_ideal`.
    pub dac_demod_ideal: Vec<f64>,
}

impl ChainOutput {
    /// Number of samples.
    pub fn len(&self) -> usize {
        self.t.len()
    }

    /// True for an empty run.
    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    /// Demodulated magnitude of the unmodulated carrier, `carrier_amp · Vref / 2`.
    pub fn theoretical_baseline(&self) -> f64 {
        self.carrier_amp * self.dac_v_ref / 2.0
    }

    /// DAC output error relative to the ideal DAC output.
    pub fn dac_error(&self) -> StageError {
        stage_error_pct(&self.dac_output_ideal, &self.dac_output)
    }

    /// Reconstructed ADC error relative to the ADC input.
    pub fn adc_error(&self) -> StageError {
        stage_error_pct(&self.adc_input, &self.adc_output)
    }
}

/// Validated chain, ready to run.
#[derive(Debug, Clone)]
pub struct SignalChain {
    config: ChainConfig,
    demodulator: IqDemodulator,
}

impl SignalChain {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// `ParameterOutOfRange` for an invalid parameter set, a non-positive
    /// carrier amplitude or frequency, or an unusable sample rate.
    pub fn new(config: ChainConfig) -> Result<Self> {
        config.dac.validate()?;
        config.opamp.validate()?;
        config.adc.validate()?;
        if !(config.carrier_vpp.is_finite() && config.carrier_vpp > 0.0) {
            return Err(SimError::out_of_range(
                "carrier_vpp",
                config.carrier_vpp,
                "must be positive and finite",
            ));
        }
        if !(config.carrier_hz.is_finite() && config.carrier_hz > 0.0) {
            return Err(SimError::out_of_range(
                "carrier_hz",
                config.carrier_hz,
                "must be positive and finite",
            ));
        }
        let demodulator = IqDemodulator::new(config.sample_rate, config.carrier_hz, config.lpf_enbw_hz)?;
        Ok(Self {
            config,
            demodulator,
        })
    }

    /// Configuration in use.
    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    /// Demodulator in use.
    pub fn demodulator(&self) -> &IqDemodulator {
        &self.demodulator
    }

    /// Run the chain over the envelope's own time span at the chain sample
    /// rate. The time base starts at the envelope's first time stamp.
    ///
    /// # Errors
    ///
    /// `SignalTooShort` if the envelope spans fewer than
    /// [`MIN_RUN_SAMPLES`] samples.
    pub fn run_envelope(&self, envelope: &Envelope) -> Result<ChainOutput> {
        let n = (envelope.duration() * self.config.sample_rate) as usize;
        if n < MIN_RUN_SAMPLES {
            return Err(SimError::SignalTooShort {
                len: n,
                required: MIN_RUN_SAMPLES,
            });
        }
        let start = envelope.times().first().copied().unwrap_or(0.0);
        let mut t = time_axis(n, self.config.sample_rate);
        if start != 0.0 {
            t.iter_mut().for_each(|ti| *ti += start);
        }
        self.run(&t, envelope)
    }

    /// Run every stage over the time base `t`.
    ///
    /// # Errors
    ///
    /// `SignalTooShort` if `t` is too short for the demodulation filter.
    pub fn run(&self, t: &[f64], envelope: &Envelope) -> Result<ChainOutput> {
        let cfg = &self.config;
        let n = t.len();
        if n < self.demodulator.min_len() {
            return Err(SimError::SignalTooShort {
                len: n,
                required: self.demodulator.min_len(),
            });
        }

        let env = envelope.interpolate(t);
        let envelope_peak = math::peak(&env);
        let envelope_max = math::min_max(&env).map_or(0.0, |(_, hi)| hi.max(0.0));

        let v_ref = cfg.dac.v_ref;
        let mut carrier_amp = cfg.carrier_vpp / 2.0 / v_ref;
        let carrier_peak = 2.0 * carrier_amp * v_ref;
        let max_carrier_peak = v_ref / (HEADROOM * (1.0 + envelope_max));
        let mut carrier_scale = 1.0;
        if carrier_peak > max_carrier_peak {
            carrier_scale = max_carrier_peak / carrier_peak;
            carrier_amp *= carrier_scale;
            #[cfg(feature = "tracing")]
            tracing::warn!(
                requested_vpp = cfg.carrier_vpp,
                applied_vpp = carrier_peak * carrier_scale,
                scale = carrier_scale,
                "carrier rescaled to avoid clipping"
            );
        }

        let w = TAU * cfg.carrier_hz;
        let dac_input: Vec<f64> = t
            .iter()
            .map(|&ti| (carrier_amp + carrier_amp * (w * ti).sin()).clamp(0.0, 1.0))
            .collect();

        let mut dac = DacSimulator::new(cfg.dac, cfg.sample_rate, cfg.seed)?;
        let dac_output = dac.digital_to_analog(&dac_input);
        let dac_output_ideal: Vec<f64> = dac_input.iter().map(|&x| x * v_ref).collect();

        let modulated: Vec<f64> = dac_output.iter().zip(&env).map(|(&v, &e)| v * (1.0 + e)).collect();

        let mut opamp = OpAmpSimulator::new(cfg.opamp, cfg.sample_rate, cfg.seed.wrapping_add(1))?;
        let opamp_output = opamp.buffer(&modulated);

        let adc_v_ref = cfg.adc.v_ref;
        let adc_input: Vec<f64> = opamp_output.iter().map(|&v| v.clamp(0.0, adc_v_ref)).collect();
        let mut adc = AdcSimulator::new(cfg.adc, cfg.sample_rate, cfg.seed.wrapping_add(2))?;
        let adc_codes = adc.analog_to_digital(&adc_input);
        let adc_output = adc.reconstruct(&adc_codes);

        #[cfg(feature = "tracing")]
        tracing::debug!(samples = n, carrier_amp, envelope_peak, "chain stages done, demodulating");

        let adc_demod = self.demodulator.magnitude(&adc_output, t)?;
        let dac_demod = self.demodulator.magnitude(&dac_output, t)?;
        let dac_demod_ideal = self.demodulator.magnitude(&dac_output_ideal, t)?;

        Ok(ChainOutput {
            t: t.to_vec(),
            envelope: env,
            envelope_peak,
            modulation_depth_pct: envelope_peak * 100.0,
            carrier_scale,
            carrier_amp,
            carrier_amp_volts: carrier_amp * v_ref,
            dac_v_ref: v_ref,
            dac_input,
            dac_output,
            dac_output_ideal,
            opamp_output,
            adc_input,
            adc_codes,
            adc_output,
            adc_demod,
            dac_demod,
            dac_demod_ideal,
        })
    }
}
