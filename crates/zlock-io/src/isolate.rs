//! Isolation of the largest excursion in a long record.

use zlock_core::{Envelope, EnvelopeSlice, SimError, math};

use crate::{Error, Result};

/// Default excursion threshold, as a fraction of the p5–p95 span.
pub const DEFAULT_BASELINE_FRAC: f64 = 0.1;

/// Spans narrower than this are treated as flat.
const FLAT_SPAN: f64 = 1e-30;

/// Padding kept on each side of an isolated excursion: 2 ms of samples.
pub fn padding_samples(sample_rate: f64) -> usize {
    (0.002 * sample_rate) as usize
}

/// Cut the largest excursion away from the baseline out of `signal`.
///
/// The baseline is the median. Starting at the sample furthest from it, the
/// window grows in both directions while samples stay more than
/// `baseline_frac · (p95 − p5)` away from the baseline, then is padded by
/// `pad_samples` on each side. A flat record is returned whole.
///
/// # Errors
///
/// `TooShort` for an empty record, `Sim(ShapeMismatch)` if `times` and
/// `signal` differ in length.
pub fn find_largest_envelope(
    signal: &[f64],
    times: &[f64],
    baseline_frac: f64,
    pad_samples: usize,
) -> Result<EnvelopeSlice> {
    SimError::check_len("envelope times/values", signal.len(), times.len())?;
    let n = signal.len();
    let too_short = || Error::TooShort { len: n, required: 1 };

    let baseline = math::median(signal).ok_or_else(too_short)?;
    let p5 = math::percentile(signal, 5.0).ok_or_else(too_short)?;
    let p95 = math::percentile(signal, 95.0).ok_or_else(too_short)?;
    let span = p95 - p5;

    let (left, right) = if span < FLAT_SPAN {
        tracing::debug!(samples = n, "flat record, keeping all samples");
        (0, n - 1)
    } else {
        let margin = baseline_frac * span;
        let deviation: Vec<f64> = signal.iter().map(|x| (x - baseline).abs()).collect();
        let peak = math::argmax(&deviation).ok_or_else(too_short)?;

        let mut left = peak;
        while left > 0 && deviation[left] > margin {
            left -= 1;
        }
        let mut right = peak;
        while right < n - 1 && deviation[right] > margin {
            right += 1;
        }
        (left.saturating_sub(pad_samples), (right + pad_samples).min(n - 1))
    };

    tracing::debug!(baseline, span, left, right, "isolated envelope window");
    let envelope = Envelope::new(
        signal[left..=right].to_vec(),
        times[left..=right].to_vec(),
    )?;
    Ok(EnvelopeSlice {
        envelope,
        offset: left,
    })
}
