//! Stochastic noise in the time and frequency domains.
//!
//! | Kind | PSD | Slope |
//! |------|-----|-------|
//! | [`NoiseKind::White`] | flat | 0 dB/oct |
//! | [`NoiseKind::Pink`] | 1/f | −3 dB/oct |
//! | [`NoiseKind::Brownian`] | 1/f² | −6 dB/oct |
//! | [`NoiseKind::Blue`] | f | +3 dB/oct |
//! | [`NoiseKind::Violet`] | f² | +6 dB/oct |
//!
//! White time-domain noise is drawn sample by sample from `N(0, scale²)`.
//! Colored noise is shaped in the frequency domain, inverse transformed, and
//! renormalized so its RMS equals `scale`.
//!
//! Every function takes the generator explicitly; there is no process-wide
//! random state.

use core::f64::consts::FRAC_1_SQRT_2;
use core::fmt;
use core::str::FromStr;

use rand::Rng;
use rand_distr::StandardNormal;
use rustfft::num_complex::Complex;

use crate::fft::irfft;
use crate::math::rms;

/// Spectral shape of a synthesized noise sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NoiseKind {
    /// Flat power spectral density.
    #[default]
    White,
    /// 1/f power spectral density (flicker).
    Pink,
    /// 1/f² power spectral density (random walk).
    Brownian,
    /// f power spectral density.
    Blue,
    /// f² power spectral density.
    Violet,
}

impl NoiseKind {
    /// All kinds, in slope order.
    pub const ALL: [NoiseKind; 5] = [
        NoiseKind::Brownian,
        NoiseKind::Pink,
        NoiseKind::White,
        NoiseKind::Blue,
        NoiseKind::Violet,
    ];

    /// Exponent `α` of the power spectral density `S(f) ∝ f^α`.
    pub fn psd_exponent(self) -> i32 {
        match self {
            NoiseKind::White => 0,
            NoiseKind::Pink => -1,
            NoiseKind::Brownian => -2,
            NoiseKind::Blue => 1,
            NoiseKind::Violet => 2,
        }
    }

    /// Amplitude weight applied to frequency bin `k`, relative to bin 1.
    ///
    /// The DC bin of a colored spectrum is zero (the 1/f shapes diverge there
    /// and the f shapes vanish).
    pub fn bin_weight(self, k: usize) -> f64 {
        match self {
            NoiseKind::White => 1.0,
            _ if k == 0 => 0.0,
            kind => (k as f64).powf(f64::from(kind.psd_exponent()) / 2.0),
        }
    }

    /// Lowercase name, as accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            NoiseKind::White => "white",
            NoiseKind::Pink => "pink",
            NoiseKind::Brownian => "brownian",
            NoiseKind::Blue => "blue",
            NoiseKind::Violet => "violet",
        }
    }
}

impl fmt::Display for NoiseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown noise kind name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown noise kind '{0}' (expected white, pink, brownian, blue or violet)")]
pub struct ParseNoiseKindError(pub String);

impl FromStr for NoiseKind {
    type Err = ParseNoiseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "white" => Ok(NoiseKind::White),
            "pink" => Ok(NoiseKind::Pink),
            "brownian" | "brown" | "red" => Ok(NoiseKind::Brownian),
            "blue" => Ok(NoiseKind::Blue),
            "violet" | "purple" => Ok(NoiseKind::Violet),
            _ => Err(ParseNoiseKindError(s.to_string())),
        }
    }
}

/// Length-`n` real noise sequence.
///
/// White noise has RMS ≈ `scale` (statistically); colored noise has RMS equal
/// to `scale` exactly, barring a degenerate all-zero draw.
pub fn noise_time_domain<R: Rng + ?Sized>(
    n: usize,
    kind: NoiseKind,
    scale: f64,
    rng: &mut R,
) -> Vec<f64> {
    match kind {
        NoiseKind::White => (0..n)
            .map(|_| scale * rng.sample::<f64, _>(StandardNormal))
            .collect(),
        colored => {
            let spectrum = noise_frequency_domain(n / 2 + 1, colored, 1.0, rng);
            let mut out = irfft(&spectrum, n);
            let r = rms(&out);
            if r > 0.0 {
                let g = scale / r;
                out.iter_mut().for_each(|v| *v *= g);
            }
            out
        }
    }
}

/// Length-`n_bins` complex noise spectrum.
///
/// Each bin is `scale · w(k) · (a + jb)/√2` with `a, b ~ N(0, 1)` and `w`
/// the [`NoiseKind::bin_weight`]. Bin 0 is always purely real so the
/// spectrum can be fed to an inverse real transform.
pub fn noise_frequency_domain<R: Rng + ?Sized>(
    n_bins: usize,
    kind: NoiseKind,
    scale: f64,
    rng: &mut R,
) -> Vec<Complex<f64>> {
    (0..n_bins)
        .map(|k| {
            let w = scale * kind.bin_weight(k);
            let re: f64 = rng.sample(StandardNormal);
            let im: f64 = rng.sample(StandardNormal);
            if k == 0 {
                Complex::new(w * re, 0.0)
            } else {
                Complex::new(w * re * FRAC_1_SQRT_2, w * im * FRAC_1_SQRT_2)
            }
        })
        .collect()
}
