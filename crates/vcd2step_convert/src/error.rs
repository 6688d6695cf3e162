//! Error types for the conversion pipelines.

use std::io;
use std::path::PathBuf;

use vcd2step_trace::TraceError;

/// A bit-string that cannot be re-encoded.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EncodeError {
    /// The value does not start with the binary marker.
    #[error("non-binary value '{0}'")]
    MissingMarker(String),

    /// The digits after the marker are empty or not all `0`/`1`.
    #[error("invalid binary digits in '{0}'")]
    InvalidDigits(String),
}

/// Errors that abort a conversion run.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// A signal value could not be re-encoded.
    #[error("signal '{signal}': {source}")]
    Value {
        /// Canonical name of the offending signal.
        signal: String,
        /// The underlying encoding failure.
        source: EncodeError,
    },

    /// The output directory could not be created (it may already exist).
    #[error("unable to create output directory {}: {source}", path.display())]
    CreateOutputDir {
        /// The directory that was requested.
        path: PathBuf,
        /// The underlying I/O failure.
        source: io::Error,
    },

    /// A per-signal data file or the harness file could not be written.
    #[error("unable to write {}: {source}", path.display())]
    OutputFile {
        /// The file being written.
        path: PathBuf,
        /// The underlying I/O failure.
        source: io::Error,
    },

    /// The trace reader failed.
    #[error("trace error: {0}")]
    Trace(#[from] TraceError),

    /// Writing the step script failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
