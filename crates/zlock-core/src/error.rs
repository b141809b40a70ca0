//! Error taxonomy shared by every stage of the simulator.
//!
//! Only configuration and shape problems surface as errors. Numeric
//! degeneracies (a near-zero impedance, a DC-limit reactance, an empty
//! demodulation baseline) are absorbed where they occur and never reach
//! the caller as an `Err`.

use thiserror::Error;

/// Errors raised by the signal-chain primitives and simulators.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// Two sequences that must have equal length do not.
    #[error("shape mismatch for {what}: expected {expected} samples, found {found}")]
    ShapeMismatch {
        /// Which input pair disagreed.
        what: &'static str,
        /// Length of the reference sequence.
        expected: usize,
        /// Length of the offending sequence.
        found: usize,
    },

    /// A parameter set value violates its invariant.
    #[error("parameter '{param}' = {value} out of range: {reason}")]
    ParameterOutOfRange {
        /// Name of the parameter.
        param: &'static str,
        /// The rejected value.
        value: f64,
        /// Which invariant was violated.
        reason: &'static str,
    },

    /// The input is too short for the requested filter to settle.
    #[error("signal too short: {len} samples, at least {required} required")]
    SignalTooShort {
        /// Number of samples supplied.
        len: usize,
        /// Minimum number of samples accepted.
        required: usize,
    },
}

impl SimError {
    /// Create a shape mismatch error.
    pub fn shape(what: &'static str, expected: usize, found: usize) -> Self {
        SimError::ShapeMismatch {
            what,
            expected,
            found,
        }
    }

    /// Create a parameter-out-of-range error.
    pub fn out_of_range(param: &'static str, value: f64, reason: &'static str) -> Self {
        SimError::ParameterOutOfRange {
            param,
            value,
            reason,
        }
    }

    /// Check that two lengths agree.
    pub fn check_len(what: &'static str, expected: usize, found: usize) -> Result<()> {
        if expected == found {
            Ok(())
        } else {
            Err(Self::shape(what, expected, found))
        }
    }
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = core::result::Result<T, SimError>;
