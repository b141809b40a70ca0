//! Static transfer nonlinearity of a converter (INL and DNL).
//!
//! # INL
//!
//! A smooth, code-dependent bow: `0.5 · inl_lsb · sin(2π · code / max_code)`.
//! It is zero at both end points (endpoint-fit convention) and its
//! peak-to-peak magnitude is exactly `inl_lsb`.
//!
//! # DNL
//!
//! Codes are grouped in adjacent pairs `(2p, 2p+1)`. Each pair draws one value
//! `d_p` uniform in `[−dnl_lsb, dnl_lsb)`; the even code receives `+d_p` and the
//! odd code `−d_p`. Every code is bounded by `dnl_lsb` and the mean over the
//! full `2^n`-code range is exactly zero.
//!
//! Pair values come from a ChaCha8 stream keyed by a single draw from the
//! caller's generator and addressed by word position, so a 24-bit converter
//! needs no 16M-entry table and the profile is a pure function of
//! `(key, code)`.

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use core::f64::consts::TAU;

/// INL/DNL profile of one converter instance.
#[derive(Debug, Clone)]
pub struct Nonlinearity {
    max_code: f64,
    inl_lsb: f64,
    dnl_lsb: f64,
    stream: ChaCha8Rng,
}

impl Nonlinearity {
    /// Draw a profile, consuming one `u64` from `rng`.
    pub fn draw<R: Rng + ?Sized>(n_bits: u32, inl_lsb: f64, dnl_lsb: f64, rng: &mut R) -> Self {
        let key: u64 = rng.random();
        Self::from_key(n_bits, inl_lsb, dnl_lsb, key)
    }

    /// Profile for an explicit key.
    pub fn from_key(n_bits: u32, inl_lsb: f64, dnl_lsb: f64, key: u64) -> Self {
        Self {
            max_code: crate::params::max_code(n_bits) as f64,
            inl_lsb,
            dnl_lsb,
            stream: ChaCha8Rng::seed_from_u64(key),
        }
    }

    /// True when both INL and DNL are zero.
    pub fn is_ideal(&self) -> bool {
        self.inl_lsb == 0.0 && self.dnl_lsb == 0.0
    }

    /// INL at a (possibly fractional) code, in LSBs.
    pub fn inl(&self, code: f64) -> f64 {
        if self.inl_lsb == 0.0 {
            return 0.0;
        }
        0.5 * self.inl_lsb * (TAU * code / self.max_code).sin()
    }

    /// DNL of an integer code, in LSBs.
    pub fn dnl(&mut self, code: u32) -> f64 {
        if self.dnl_lsb == 0.0 {
            return 0.0;
        }
        let pair = u128::from(code >> 1);
        self.stream.set_word_pos(pair * 2);
        // 53 high bits -> uniform [0, 1)
        let unit = (self.stream.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64);
        let d = self.dnl_lsb * (2.0 * unit - 1.0);
        if code & 1 == 0 { d } else { -d }
    }

    /// Total static error in LSBs at a fractional code.
    ///
    /// DNL is looked up at the nearest code inside `[0, max_code]`; non-finite
    /// codes get no error so they propagate unchanged.
    pub fn error_lsb(&mut self, code: f64) -> f64 {
        if !code.is_finite() || self.is_ideal() {
            return 0.0;
        }
        let nearest = code.round().clamp(0.0, self.max_code) as u32;
        self.inl(code) + self.dnl(nearest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inl_peak_to_peak_matches_magnitude() {
        let nl = Nonlinearity::from_key(12, 4.0, 0.0, 1);
        let max = 4095.0;
        let values: Vec<f64> = (0..=4095).map(|c| nl.inl(f64::from(c))).collect();
        let hi = values.iter().copied().fold(f64::MIN, f64::max);
        let lo = values.iter().copied().fold(f64::MAX, f64::min);
        assert!((hi - lo - 4.0).abs() < 1e-3, "p-p {}", hi - lo);
        assert!(nl.inl(0.0).abs() < 1e-12);
        assert!(nl.inl(max).abs() < 1e-9);
    }

    #[test]
    fn dnl_bounded_and_zero_mean() {
        let mut nl = Nonlinearity::from_key(10, 0.0, 0.5, 99);
        let values: Vec<f64> = (0..1024).map(|c| nl.dnl(c)).collect();
        assert!(values.iter().all(|d| d.abs() <= 0.5));
        let sum: f64 = values.iter().sum();
        assert!(sum.abs() < 1e-12, "sum {sum}");
        assert!(values.iter().any(|d| d.abs() > 0.1));
    }

    #[test]
    fn dnl_is_random_access() {
        let mut a = Nonlinearity::from_key(16, 0.0, 1.0, 7);
        let mut b = Nonlinearity::from_key(16, 0.0, 1.0, 7);
        let forward: Vec<f64> = (0..64).map(|c| a.dnl(c)).collect();
        let backward: Vec<f64> = (0..64).rev().map(|c| b.dnl(c)).collect();
        let backward: Vec<f64> = backward.into_iter().rev().collect();
        assert_eq!(forward, backward);
    }

    #[test]
    fn different_keys_differ() {
        let mut a = Nonlinearity::from_key(16, 0.0, 1.0, 1);
        let mut b = Nonlinearity::from_key(16, 0.0, 1.0, 2);
        assert_ne!(a.dnl(100), b.dnl(100));
    }

    #[test]
    fn ideal_profile_is_silent() {
        let mut nl = Nonlinearity::from_key(16, 0.0, 0.0, 5);
        assert!(nl.is_ideal());
        assert_eq!(nl.error_lsb(1234.5), 0.0);
    }

    #[test]
    fn non_finite_codes_get_no_error() {
        let mut nl = Nonlinearity::from_key(8, 2.0, 1.0, 5);
        assert_eq!(nl.error_lsb(f64::NAN), 0.0);
        assert_eq!(nl.error_lsb(f64::INFINITY), 0.0);
    }
}
