//! Operational / transimpedance amplifier model.
//!
//! ```text
//! y = ideal · (1 + gain_error) + offset_voltage
//! y = OnePole(bandwidth_hz)(y)          causal, from rest
//! y = y + N(0, noise_rms²)
//! ```
//!
//! The bandwidth limit is a causal single pole: unlike the demodulation filter
//! it delays the signal and shows a settling transient, as a real amplifier
//! does.

use rand::Rng;
use rand_distr::StandardNormal;

use crate::params::{OpAmpParams, OpAmpTopology};
use crate::rng::{SimRng, seeded};
use zlock_core::{OnePole, Result, SimError};

/// Apply amplifier non-idealities to an ideal output voltage.
///
/// Bandwidth limiting is skipped when `bandwidth_hz` is zero or not below
/// Nyquist. The pole is matched, so the −3 dB point only approximates
/// `bandwidth_hz` as it nears `sample_rate / 2`. Noise draws one Gaussian per sample when `noise_rms > 0`.
pub fn opamp_errors<R: Rng + ?Sized>(
    ideal: &[f64],
    sample_rate: f64,
    gain_error: f64,
    offset_voltage: f64,
    bandwidth_hz: f64,
    noise_rms: f64,
    rng: &mut R,
) -> Vec<f64> {
    let mut out = apply_gain_offset(ideal, gain_error, offset_voltage);
    if bandwidth_hz > 0.0 && bandwidth_hz < sample_rate / 2.0 {
        out = OnePole::new(sample_rate, bandwidth_hz).process_block(&out);
    }
    add_noise(&mut out, noise_rms, rng);
    out
}

fn apply_gain_offset(x: &[f64], gain_error: f64, offset_voltage: f64) -> Vec<f64> {
    let gain = 1.0 + gain_error;
    x.iter().map(|&v| v * gain + offset_voltage).collect()
}

fn add_noise<R: Rng + ?Sized>(x: &mut [f64], noise_rms: f64, rng: &mut R) {
    if noise_rms > 0.0 {
        for v in x.iter_mut() {
            *v += noise_rms * rng.sample::<f64, _>(StandardNormal);
        }
    }
}

/// Amplifier with its own seeded generator.
#[derive(Debug, Clone)]
pub struct OpAmpSimulator {
    params: OpAmpParams,
    sample_rate: f64,
    rng: SimRng,
}

impl OpAmpSimulator {
    /// Build a simulator.
    ///
    /// # Errors
    ///
    /// `ParameterOutOfRange` if `params` fails validation or `sample_rate` is
    /// not positive and finite.
    pub fn new(params: OpAmpParams, sample_rate: f64, seed: u64) -> Result<Self> {
        params.validate()?;
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(SimError::out_of_range(
                "sample_rate",
                sample_rate,
                "must be positive and finite",
            ));
        }
        Ok(Self {
            params,
            sample_rate,
            rng: seeded(seed),
        })
    }

    /// Ideal unity-gain buffer.
    pub fn ideal(sample_rate: f64) -> Result<Self> {
        Self::new(OpAmpParams::ideal(), sample_rate, 0)
    }

    /// Convert the input through the configured topology and error model.
    ///
    /// For a transimpedance stage the input is a current in amperes and the
    /// ideal output is `−I·Rf`; a follower passes voltage straight through.
    pub fn run(&mut self, input: &[f64]) -> Vec<f64> {
        let ideal: Vec<f64> = match self.params.topology {
            OpAmpTopology::Transimpedance { ohms } => input.iter().map(|&i| -i * ohms).collect(),
            OpAmpTopology::VoltageFollower => input.to_vec(),
        };
        #[cfg(feature = "tracing")]
        tracing::debug!(samples = ideal.len(), "opamp run");
        opamp_errors(
            &ideal,
            self.sample_rate,
            self.params.gain_error,
            self.params.offset_voltage,
            self.params.bandwidth_hz,
            self.params.noise_rms,
            &mut self.rng,
        )
    }

    /// Unity-gain buffer stage of the signal chain.
    ///
    /// Applies gain and offset, then noise, then the single-pole limit only
    /// when the bandwidth is below a quarter of the sample rate. The topology
    /// is ignored: the input is always a voltage.
    pub fn buffer(&mut self, input: &[f64]) -> Vec<f64> {
        let mut out = apply_gain_offset(input, self.params.gain_error, self.params.offset_voltage);
        add_noise(&mut out, self.params.noise_rms, &mut self.rng);
        let bw = self.params.bandwidth_hz;
        if bw > 0.0 && bw < self.sample_rate / 4.0 {
            out = OnePole::new(self.sample_rate, bw).process_block(&out);
        }
        out
    }

    /// Parameter set.
    pub fn params(&self) -> &OpAmpParams {
        &self.params
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f64::consts::TAU;
    use zlock_core::math;

    fn tone(freq: f64, fs: f64, n: usize) -> Vec<f64> {
        (0..n).map(|i| (TAU * freq * i as f64 / fs).sin()).collect()
    }

    #[test]
    fn gain_and_offset_without_filter() {
        let y = opamp_errors(&[1.0, -1.0], 1e6, 0.1, 0.01, 0.0, 0.0, &mut seeded(0));
        assert!((y[0] - 1.11).abs() < 1e-12);
        assert!((y[1] + 1.09).abs() < 1e-12);
    }

    #[test]
    fn tone_a_decade_above_bandwidth_is_halved() {
        let fs = 250e6;
        let bw = 1e6;
        let x = tone(10.0 * bw, fs, 20_000);
        let y = opamp_errors(&x, fs, 0.0, 0.0, bw, 0.0, &mut seeded(0));
        let in_peak = math::peak(&x[10_000..]);
        let out_peak = math::peak(&y[10_000..]);
        assert!(out_peak < 0.5 * in_peak, "{out_peak} vs {in_peak}");
    }

    #[test]
    fn bandwidth_at_or_above_nyquist_is_ignored() {
        let x = tone(1e6, 10e6, 100);
        let y = opamp_errors(&x, 10e6, 0.0, 0.0, 5e6, 0.0, &mut seeded(0));
        assert_eq!(x, y);
    }

    #[test]
    fn noise_rms_matches() {
        let y = opamp_errors(&vec![0.0; 50_000], 1e6, 0.0, 0.0, 0.0, 1e-3, &mut seeded(4));
        let r = math::rms(&y);
        assert!((r - 1e-3).abs() < 5e-5, "noise RMS {r}");
        assert!(math::mean(&y).abs() < 5e-5);
    }

    #[test]
    fn transimpedance_inverts_current() {
        let params = OpAmpParams {
            bandwidth_hz: 0.0,
            ..OpAmpParams::default()
        };
        let mut tia = OpAmpSimulator::new(params, 250e6, 0).unwrap();
        let y = tia.run(&[1e-4, -2e-4]);
        assert!((y[0] + 1.0).abs() < 1e-12);
        assert!((y[1] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn buffer_skips_wide_bandwidth() {
        let params = OpAmpParams {
            bandwidth_hz: 3e6,
            ..OpAmpParams::ideal()
        };
        // 3 MHz is above fs/4 at 10 MHz: no filtering in the buffer stage.
        let mut amp = OpAmpSimulator::new(params, 10e6, 0).unwrap();
        let x = tone(500e3, 10e6, 200);
        assert_eq!(amp.buffer(&x), x);

        // run() still filters, since 3 MHz is below Nyquist.
        let mut amp = OpAmpSimulator::new(params, 10e6, 0).unwrap();
        assert_ne!(amp.run(&x), x);
    }

    #[test]
    fn buffer_filters_narrow_bandwidth() {
        let params = OpAmpParams {
            bandwidth_hz: 1e6,
            ..OpAmpParams::ideal()
        };
        let mut amp = OpAmpSimulator::new(params, 10e6, 0).unwrap();
        let y = amp.buffer(&[1.0; 8]);
        assert!(y[0] < 1.0);
        assert!(y.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn simulators_with_same_seed_match() {
        let params = OpAmpParams {
            noise_rms: 1e-5,
            ..OpAmpParams::default()
        };
        let x = tone(1e6, 250e6, 1000);
        let mut a = OpAmpSimulator::new(params, 250e6, 77).unwrap();
        let mut b = OpAmpSimulator::new(params, 250e6, 77).unwrap();
        assert_eq!(a.run(&x), b.run(&x));
    }

    #[test]
    fn rejects_negative_bandwidth() {
        let params = OpAmpParams {
            bandwidth_hz: -1.0,
            ..OpAmpParams::default()
        };
        assert!(OpAmpSimulator::new(params, 1e6, 0).is_err());
    }
}
