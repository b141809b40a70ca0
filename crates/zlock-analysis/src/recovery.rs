//! Envelope recovery from the demodulated magnitude and its error statistics.
//!
//! The demodulated magnitude of an amplitude-modulated carrier is
//! `R = baseline · (1 + envelope)`, so the envelope is recovered as
//! `(R − baseline) / baseline`. The baseline is the theoretical carrier
//! magnitude `carrier_amp · Vref / 2` whenever the measured median agrees
//! with it within a factor of two; otherwise the measured median is used.
//!
//! The first `skip_fraction` of the record is excluded from every statistic
//! to hide the filter's start-up transient.

use serde::Serialize;
use zlock_core::math;

use crate::chain::ChainOutput;

const TINY: f64 = 1e-15;
const MIN_BASELINE: f64 = 1e-10;

/// User adjustments applied to the recovered envelope.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecoveryOptions {
    /// Fraction of the record skipped at the start.
    pub skip_fraction: f64,
    /// Multiplier applied to the recovered envelope.
    pub scale: f64,
    /// Offset added after scaling.
    pub dc_bias: f64,
}

impl Default for RecoveryOptions {
    fn default() -> Self {
        Self {
            skip_fraction: 0.1,
            scale: 1.0,
            dc_bias: 0.0,
        }
    }
}

/// Where the demodulation baseline came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BaselineSource {
    /// `carrier_amp · Vref / 2`.
    Theoretical,
    /// Median of the demodulated magnitude.
    Median,
    /// Both candidates were degenerate; `1.0` was used.
    Fallback,
}

/// Error statistics of a recovered envelope against the injected one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RecoveryStats {
    /// Mean of `recovered − original`.
    pub mean_error: f64,
    /// Population standard deviation of the error.
    pub std_error: f64,
    /// RMS of the error.
    pub rms_error: f64,
    /// Largest signed error.
    pub max_error: f64,
    /// Smallest signed error.
    pub min_error: f64,
    /// Largest absolute error.
    pub max_abs_error: f64,
    /// Peak-to-peak of the original envelope over the analyzed span.
    pub original_peak_to_peak: f64,
    /// `rms_error` as a percentage of `original_peak_to_peak`.
    pub rms_error_pct: f64,
    /// `max_abs_error` as a percentage of `original_peak_to_peak`.
    pub max_abs_error_pct: f64,
    /// Pearson correlation; zero when either side is constant.
    pub correlation: f64,
    /// DC bias that would zero the mean error at the current scale.
    pub optimal_dc_bias: f64,
    /// Ratio of the original to the unscaled recovered peak.
    pub suggested_scale: f64,
    /// Samples in the record.
    pub samples_total: usize,
    /// Samples used for the statistics.
    pub samples_used: usize,
}

/// Recovered envelope plus the statistics describing it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnvelopeRecovery {
    /// Baseline used for normalization.
    pub baseline: f64,
    /// Origin of [`baseline`](Self::baseline).
    pub baseline_source: BaselineSource,
    /// Median of the demodulated magnitude over the analyzed span.
    pub median_magnitude: f64,
    /// Samples skipped at the start.
    pub skip: usize,
    /// Recovered envelope with scale and DC bias applied, full length.
    pub recovered: Vec<f64>,
    /// Error statistics over `[skip..]`.
    pub stats: RecoveryStats,
}

impl EnvelopeRecovery {
    /// Recover the envelope from a chain run's ADC demodulation.
    pub fn analyze(output: &ChainOutput, options: RecoveryOptions) -> Self {
        Self::from_magnitude(
            &output.adc_demod,
            &output.envelope,
            output.theoretical_baseline(),
            options,
        )
    }

    /// Recover from an arbitrary demodulated magnitude.
    ///
    /// `original` is the injected envelope on the same time base.
    pub fn from_magnitude(
        magnitude: &[f64],
        original: &[f64],
        theoretical_baseline: f64,
        options: RecoveryOptions,
    ) -> Self {
        let n = magnitude.len().min(original.len());
        let magnitude = &magnitude[..n];
        let original = &original[..n];
        let skip = skip_count(n, options.skip_fraction);

        let median_magnitude = math::median(&magnitude[skip..]).unwrap_or(0.0);
        let (baseline, baseline_source) = select_baseline(median_magnitude, theoretical_baseline);

        let raw: Vec<f64> = magnitude.iter().map(|&r| (r - baseline) / baseline).collect();
        let recovered: Vec<f64> = raw.iter().map(|&x| x * options.scale + options.dc_bias).collect();

        let orig = &original[skip..];
        let rec = &recovered[skip..];

        let raw_peak = math::peak(&raw[skip..]);
        let suggested_scale = if raw_peak > TINY {
            math::peak(orig) / raw_peak
        } else {
            1.0
        };
        let scaled_mean = math::mean(&raw[skip..]) * options.scale;
        let optimal_dc_bias = math::mean(orig) - scaled_mean;

        let error: Vec<f64> = rec.iter().zip(orig).map(|(&r, &o)| r - o).collect();
        let (min_error, max_error) = math::min_max(&error).unwrap_or((0.0, 0.0));
        let rms_error = math::rms(&error);
        let max_abs_error = math::peak(&error);
        let original_peak_to_peak = math::peak_to_peak(orig);
        let pct = |v: f64| {
            if original_peak_to_peak > TINY {
                v / original_peak_to_peak * 100.0
            } else {
                0.0
            }
        };

        let correlation = if math::std_dev(orig) > TINY && math::std_dev(rec) > TINY {
            math::correlation(orig, rec).unwrap_or(0.0)
        } else {
            0.0
        };

        let stats = RecoveryStats {
            mean_error: math::mean(&error),
            std_error: math::std_dev(&error),
            rms_error,
            max_error,
            min_error,
            max_abs_error,
            original_peak_to_peak,
            rms_error_pct: pct(rms_error),
            max_abs_error_pct: pct(max_abs_error),
            correlation,
            optimal_dc_bias,
            suggested_scale,
            samples_total: n,
            samples_used: n - skip,
        };

        Self {
            baseline,
            baseline_source,
            median_magnitude,
            skip,
            recovered,
            stats,
        }
    }
}

/// At least one sample is skipped, and at least one is kept.
fn skip_count(n: usize, fraction: f64) -> usize {
    let requested = (n as f64 * fraction.clamp(0.0, 1.0)) as usize;
    requested.max(1).min(n.saturating_sub(1))
}

fn select_baseline(median: f64, theoretical: f64) -> (f64, BaselineSource) {
    if theoretical > MIN_BASELINE {
        let ratio = median / theoretical;
        if ratio > 0.5 && ratio < 2.0 {
            return (theoretical, BaselineSource::Theoretical);
        }
    }
    if median > MIN_BASELINE {
        (median, BaselineSource::Median)
    } else {
        (1.0, BaselineSource::Fallback)
    }
}

/// Relative error of one stage against its reference.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StageError {
    /// RMS error in percent of the reference half-span.
    pub rms_pct: f64,
    /// Largest absolute error in percent of the reference half-span.
    pub max_pct: f64,
}

/// Percent error of `actual` against `reference`.
///
/// Errors are expressed relative to `(max(reference) − min(reference)) / 2`;
/// a reference flatter than `1e-10` uses `1.0` instead. Only the common
/// prefix of the two sequences is compared.
pub fn stage_error_pct(reference: &[f64], actual: &[f64]) -> StageError {
    let n = reference.len().min(actual.len());
    let reference = &reference[..n];
    let half_span = math::peak_to_peak(reference) / 2.0;
    let amplitude = if half_span < MIN_BASELINE { 1.0 } else { half_span };

    let pct: Vec<f64> = actual[..n]
        .iter()
        .zip(reference)
        .map(|(&a, &r)| (a - r) / amplitude * 100.0)
        .collect();

    StageError {
        rms_pct: math::rms(&pct),
        max_pct: math::peak(&pct),
    }
}
