//! One-float-per-line envelope files.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use zlock_core::Envelope;

use crate::isolate::{DEFAULT_BASELINE_FRAC, find_largest_envelope, padding_samples};
use crate::{Error, Result};

/// Sample rate of recorded envelope traces, Hz.
pub const SOURCE_SAMPLE_RATE: f64 = 14e3;

/// Samples scanned by [`load_and_isolate_envelope`].
pub const MAX_SCAN_SAMPLES: usize = 800_000;

/// Shortest record [`load_and_isolate_envelope`] accepts.
pub const MIN_ENVELOPE_SAMPLES: usize = 10;

/// Read up to `max_samples` values, one per line, sampled at `sample_rate`.
///
/// Blank lines and lines starting with `#` are skipped. Time starts at zero.
pub fn load_envelope_file(
    path: impl AsRef<Path>,
    max_samples: usize,
    sample_rate: f64,
) -> Result<Envelope> {
    let path = path.as_ref();
    let io_err = |source| Error::Io {
        path: path.to_path_buf(),
        source,
    };
    let reader = BufReader::new(File::open(path).map_err(io_err)?);

    let mut values = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        if values.len() >= max_samples {
            break;
        }
        let line = line.map_err(io_err)?;
        let text = line.trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }
        let value: f64 = text.parse().map_err(|_| Error::Parse {
            path: path.to_path_buf(),
            line: index + 1,
            content: text.to_string(),
        })?;
        values.push(value);
    }

    tracing::debug!(path = %path.display(), samples = values.len(), "loaded envelope file");
    Ok(Envelope::from_samples(values, sample_rate))
}

/// Load a recorded trace at [`SOURCE_SAMPLE_RATE`], isolate its largest
/// excursion and re-zero its time stamps.
pub fn load_and_isolate_envelope(path: impl AsRef<Path>) -> Result<Envelope> {
    let record = load_envelope_file(path, MAX_SCAN_SAMPLES, SOURCE_SAMPLE_RATE)?;
    if record.len() < MIN_ENVELOPE_SAMPLES {
        return Err(Error::TooShort {
            len: record.len(),
            required: MIN_ENVELOPE_SAMPLES,
        });
    }
    let slice = find_largest_envelope(
        record.values(),
        record.times(),
        DEFAULT_BASELINE_FRAC,
        padding_samples(SOURCE_SAMPLE_RATE),
    )?;
    Ok(slice.envelope.rezeroed())
}
