//! Sequence statistics and interpolation helpers.
//!
//! # Interpolation
//!
//! - [`lerp`] - Linear interpolation between two values
//! - [`interp`] - Piecewise-linear resampling of a time series, holding the end
//!   values outside the recorded range
//!
//! # Statistics
//!
//! - [`mean`], [`std_dev`], [`rms`], [`peak`], [`peak_to_peak`]
//! - [`median`] / [`percentile`] - Order statistics with linear interpolation
//!   between ranks
//! - [`correlation`] - Pearson correlation coefficient
//!
//! Empty inputs return `0.0` (or `None` where the statistic is undefined);
//! none of these functions panic.

/// Linear interpolation between two values.
///
/// `lerp(a, b, 0.0) == a`, `lerp(a, b, 1.0) == b`.
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Piecewise-linear interpolation of `(xp, fp)` at every point of `x`.
///
/// `xp` must be non-decreasing. Points left of `xp[0]` take `fp[0]`; points
/// right of the last sample take the last value. An empty table yields zeros.
/// Only the common prefix of `xp` and `fp` is used.
pub fn interp(x: &[f64], xp: &[f64], fp: &[f64]) -> Vec<f64> {
    let n = xp.len().min(fp.len());
    if n == 0 {
        return vec![0.0; x.len()];
    }
    let xp = &xp[..n];
    let fp = &fp[..n];

    x.iter()
        .map(|&xi| {
            if xi <= xp[0] {
                return fp[0];
            }
            if xi >= xp[n - 1] {
                return fp[n - 1];
            }
            // first index with xp[hi] > xi
            let hi = xp.partition_point(|&v| v <= xi);
            let lo = hi - 1;
            let span = xp[hi] - xp[lo];
            if span <= 0.0 {
                fp[hi]
            } else {
                lerp(fp[lo], fp[hi], (xi - xp[lo]) / span)
            }
        })
        .collect()
}

/// Arithmetic mean.
pub fn mean(x: &[f64]) -> f64 {
    if x.is_empty() {
        return 0.0;
    }
    x.iter().sum::<f64>() / x.len() as f64
}

/// Population standard deviation.
pub fn std_dev(x: &[f64]) -> f64 {
    if x.is_empty() {
        return 0.0;
    }
    let m = mean(x);
    let var = x.iter().map(|&v| (v - m) * (v - m)).sum::<f64>() / x.len() as f64;
    var.sqrt()
}

/// Root mean square.
pub fn rms(x: &[f64]) -> f64 {
    if x.is_empty() {
        return 0.0;
    }
    (x.iter().map(|&v| v * v).sum::<f64>() / x.len() as f64).sqrt()
}

/// Largest absolute value.
pub fn peak(x: &[f64]) -> f64 {
    x.iter().fold(0.0f64, |m, v| m.max(v.abs()))
}

/// `max − min`; zero for an empty sequence.
pub fn peak_to_peak(x: &[f64]) -> f64 {
    match min_max(x) {
        Some((lo, hi)) => hi - lo,
        None => 0.0,
    }
}

/// Smallest and largest values, ignoring NaN.
pub fn min_max(x: &[f64]) -> Option<(f64, f64)> {
    let mut it = x.iter().copied().filter(|v| !v.is_nan());
    let first = it.next()?;
    Some(it.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
}

/// Index of the largest value (first occurrence), ignoring NaN.
pub fn argmax(x: &[f64]) -> Option<usize> {
    x.iter()
        .enumerate()
        .filter(|(_, v)| !v.is_nan())
        .fold(None, |best: Option<(usize, f64)>, (i, &v)| match best {
            Some((_, b)) if b >= v => best,
            _ => Some((i, v)),
        })
        .map(|(i, _)| i)
}

/// `q`-th percentile (`0..=100`) with linear interpolation between ranks.
///
/// NaN values are ignored. Returns `None` when no finite-or-infinite values
/// remain.
pub fn percentile(x: &[f64], q: f64) -> Option<f64> {
    let mut sorted: Vec<f64> = x.iter().copied().filter(|v| !v.is_nan()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);

    let rank = (q.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    Some(lerp(sorted[lo], sorted[hi], rank - lo as f64))
}

/// Median (50th percentile).
pub fn median(x: &[f64]) -> Option<f64> {
    percentile(x, 50.0)
}

/// Pearson correlation coefficient of two equally long sequences.
///
/// Returns `None` if the lengths differ, fewer than two samples are given,
/// or either sequence is constant.
pub fn correlation(a: &[f64], b: &[f64]) -> Option<f64> {
    if a.len() != b.len() || a.len() < 2 {
        return None;
    }
    let ma = mean(a);
    let mb = mean(b);
    let mut cov = 0.0;
    let mut va = 0.0;
    let mut vb = 0.0;
    for (&x, &y) in a.iter().zip(b.iter()) {
        let dx = x - ma;
        let dy = y - mb;
        cov += dx * dy;
        va += dx * dx;
        vb += dy * dy;
    }
    let denom = (va * vb).sqrt();
    if denom > 0.0 && denom.is_finite() {
        Some(cov / denom)
    } else {
        None
    }
}
