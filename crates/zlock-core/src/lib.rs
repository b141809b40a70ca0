//! zlock Core - numeric primitives for the impedance-analyzer front-end simulator
//!
//! This crate holds everything the simulator needs that is not specific to a
//! particular analog component: the error taxonomy, the filters, reference
//! waveforms, noise synthesis, and the envelope time series.
//!
//! # Core Abstractions
//!
//! ## Errors
//!
//! - [`SimError`] - Shape, parameter and signal-length failures
//!
//! ## Filters
//!
//! - [`Biquad`] - Second-order IIR section with RBJ cookbook coefficients
//! - [`OnePole`] - Causal single-pole lowpass (amplifier bandwidth model)
//! - [`ButterworthLowpass`] - 4th-order Butterworth with zero-phase `filtfilt`
//!
//! ## Signals
//!
//! - [`waveform`] - Sine/cosine/multi-tone generators and phase delay
//! - [`noise`] - White and colored noise in the time and frequency domains
//! - [`Envelope`] - Modulating voltage record with interpolation
//!
//! ## Utilities
//!
//! - [`math`] - Interpolation and sequence statistics
//! - [`fft`] - Real forward/inverse transforms
//!
//! # Example
//!
//! ```rust
//! use zlock_core::{ButterworthLowpass, time_axis, sine_wave};
//!
//! let fs = 10e6;
//! let t = time_axis(20_000, fs);
//! let x = sine_wave(&t, 500e3, 1.0, 0.0);
//! let lp = ButterworthLowpass::new(fs, 10e3).unwrap();
//! let y = lp.filtfilt(&x).unwrap();
//! assert!(y[5_000..15_000].iter().all(|v| v.abs() < 1e-3));
//! ```
//!
//! # Design Principles
//!
//! - **Batch, not streaming**: every operation maps a whole sequence to a new one
//! - **Explicit randomness**: generators take `&mut impl Rng`, never a global
//! - **Degeneracies absorbed**: only shape and parameter problems are errors

pub mod biquad;
pub mod butterworth;
pub mod envelope;
pub mod error;
pub mod fft;
pub mod math;
pub mod noise;
pub mod one_pole;
pub mod waveform;

// Re-export main types at crate root
pub use biquad::{Biquad, BiquadCoefficients, lowpass_coefficients};
pub use butterworth::ButterworthLowpass;
pub use envelope::{Envelope, EnvelopeSlice};
pub use error::{Result, SimError};
pub use fft::{irfft, rfft};
pub use noise::{NoiseKind, ParseNoiseKindError, noise_frequency_domain, noise_time_domain};
pub use one_pole::OnePole;
pub use waveform::{
    apply_phase_delay, cosine_wave, multifrequency_sine, phase_delay_samples, sine_wave, time_axis,
};

/// Complex sample type used for spectra and impedances.
pub use rustfft::num_complex::Complex;
