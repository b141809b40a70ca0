//! Envelope source for the zlock simulator.
//!
//! This crate provides:
//!
//! - **Text loading**: [`load_envelope_file`] reads one voltage per line at a fixed rate
//! - **Isolation**: [`find_largest_envelope`] cuts the largest excursion out of a long record
//! - **Both at once**: [`load_and_isolate_envelope`] with the bench defaults
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use zlock_io::load_and_isolate_envelope;
//!
//! let envelope = load_and_isolate_envelope("Test_Signal.txt")?;
//! println!("{} samples, {:.2} ms", envelope.len(), envelope.duration() * 1e3);
//! # Ok::<(), zlock_io::Error>(())
//! ```

mod isolate;
mod text;

pub use isolate::{DEFAULT_BASELINE_FRAC, find_largest_envelope, padding_samples};
pub use text::{
    MAX_SCAN_SAMPLES, MIN_ENVELOPE_SAMPLES, SOURCE_SAMPLE_RATE, load_and_isolate_envelope,
    load_envelope_file,
};

use std::path::PathBuf;

/// Error types for envelope loading.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The file could not be opened or read.
    #[error("failed to read '{path}': {source}")]
    Io {
        /// File being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A line is not a number.
    #[error("{path}:{line}: cannot parse '{content}' as a number")]
    Parse {
        /// File being read.
        path: PathBuf,
        /// One-based line number.
        line: usize,
        /// Offending text, trimmed.
        content: String,
    },

    /// The record has fewer samples than required.
    #[error("envelope too short: {len} samples, at least {required} required")]
    TooShort {
        /// Samples available.
        len: usize,
        /// Samples required.
        required: usize,
    },

    /// Values and time stamps disagree.
    #[error(transparent)]
    Sim(#[from] zlock_core::SimError),
}

/// Convenience alias for envelope loading results.
pub type Result<T> = std::result::Result<T, Error>;
