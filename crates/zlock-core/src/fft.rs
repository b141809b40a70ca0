//! Real-signal FFT helpers on top of `rustfft`.

use rustfft::FftPlanner;
use rustfft::num_complex::Complex;

/// Forward transform of a real sequence, returning the `n/2 + 1`
/// non-negative-frequency bins (unnormalized).
pub fn rfft(signal: &[f64]) -> Vec<Complex<f64>> {
    let n = signal.len();
    if n == 0 {
        return Vec::new();
    }
    let mut buffer: Vec<Complex<f64>> = signal.iter().map(|&x| Complex::new(x, 0.0)).collect();
    let mut planner = FftPlanner::new();
    planner.plan_fft_forward(n).process(&mut buffer);
    buffer.truncate(n / 2 + 1);
    buffer
}

/// Inverse of [`rfft`]: build a length-`n` real sequence from its
/// non-negative-frequency bins.
///
/// The DC bin, and the Nyquist bin when `n` is even, have their imaginary
/// parts discarded so the Hermitian extension is consistent and the result is
/// exactly real. Missing bins are treated as zero and extra bins are ignored.
/// The output is scaled by `1/n`.
pub fn irfft(spectrum: &[Complex<f64>], n: usize) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }
    let half = n / 2;
    let bin = |k: usize| spectrum.get(k).copied().unwrap_or_default();

    let mut full = vec![Complex::new(0.0, 0.0); n];
    full[0] = Complex::new(bin(0).re, 0.0);
    for k in 1..=half {
        let mut v = bin(k);
        if n % 2 == 0 && k == half {
            v.im = 0.0;
        }
        full[k] = v;
        full[n - k] = v.conj();
    }

    let mut planner = FftPlanner::new();
    planner.plan_fft_inverse(n).process(&mut full);

    let norm = 1.0 / n as f64;
    full.iter().map(|c| c.re * norm).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f64::consts::TAU;

    #[test]
    fn rfft_finds_tone_bin() {
        let n = 256;
        let x: Vec<f64> = (0..n).map(|i| (TAU * 8.0 * i as f64 / n as f64).cos()).collect();
        let spec = rfft(&x);
        assert_eq!(spec.len(), n / 2 + 1);
        let peak_bin = spec
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.norm().partial_cmp(&b.1.norm()).unwrap())
            .unwrap()
            .0;
        assert_eq!(peak_bin, 8);
    }

    #[test]
    fn inverse_restores_signal() {
        for n in [15usize, 16] {
            let x: Vec<f64> = (0..n).map(|i| (i as f64 * 0.37).sin() + 0.1).collect();
            let y = irfft(&rfft(&x), n);
            for (a, b) in x.iter().zip(y.iter()) {
                assert!((a - b).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn dc_and_nyquist_forced_real() {
        // Imaginary parts on DC/Nyquist would make the inverse complex.
        let spec = vec![
            Complex::new(4.0, 3.0),
            Complex::new(0.0, 0.0),
            Complex::new(0.0, 0.0),
            Complex::new(0.0, 0.0),
            Complex::new(2.0, -5.0),
        ];
        let y = irfft(&spec, 8);
        for (i, v) in y.iter().enumerate() {
            let expected = 0.5 + if i % 2 == 0 { 0.25 } else { -0.25 };
            assert!((v - expected).abs() < 1e-12, "sample {i}: {v}");
        }
    }

    #[test]
    fn empty_input() {
        assert!(rfft(&[]).is_empty());
        assert!(irfft(&[], 0).is_empty());
    }
}
