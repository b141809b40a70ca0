//! zlock Analysis - demodulation and end-to-end chain simulation
//!
//! This crate composes the analog models into the full excitation and
//! readout chain and measures how well the envelope survives it:
//!
//! - [`demod`] - Lock-in (IQ) demodulator with a zero-phase Butterworth lowpass
//! - [`chain`] - Carrier generation, DAC, modulation, buffer, ADC and demodulation
//! - [`recovery`] - Envelope recovery from the demodulated magnitude and its error statistics
//! - [`dynamics`] - Step-response timing of demodulated records
//!
//! ## Example Workflow
//!
//! ```rust
//! use zlock_analysis::{ChainConfig, EnvelopeRecovery, RecoveryOptions, SignalChain};
//! use zlock_core::Envelope;
//!
//! // 10 mV, 1 ms pulse inside a 5 ms window
//! let envelope = Envelope::rectangular_pulse(0.01, 2e-3, 1e-3, 5e-3, 14e3);
//!
//! let chain = SignalChain::new(ChainConfig::ideal()).unwrap();
//! let output = chain.run_envelope(&envelope).unwrap();
//! let recovery = EnvelopeRecovery::analyze(&output, RecoveryOptions::default());
//!
//! println!("baseline {:.4} V, RMS error {:.3}%", recovery.baseline, recovery.stats.rms_error_pct);
//! ```

pub mod chain;
pub mod demod;
pub mod dynamics;
pub mod recovery;

pub use chain::{ChainConfig, ChainOutput, HEADROOM, MIN_RUN_SAMPLES, SignalChain};
pub use demod::{ENBW_RATIO, IqDemodulator, IqOutput};
pub use dynamics::{StepResponse, step_response};
pub use recovery::{
    BaselineSource, EnvelopeRecovery, RecoveryOptions, RecoveryStats, StageError, stage_error_pct,
};
