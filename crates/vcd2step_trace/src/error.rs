//! Error types for reading VCD traces.

use std::io;

/// Errors that can occur while opening or stepping through a trace.
#[derive(Debug, thiserror::Error)]
pub enum TraceError {
    /// An I/O error occurred while reading.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A parse error at a specific line number.
    #[error("parse error at line {line}: {message}")]
    Parse {
        /// The 1-based line number where the error occurred.
        line: usize,
        /// Description of the error.
        message: String,
    },

    /// The trace has a structural format error.
    #[error("format error: {0}")]
    Format(String),

    /// A signal name was requested that the trace does not declare.
    #[error("unknown signal '{0}'")]
    UnknownSignal(String),

    /// [`Trace::step`](crate::Trace::step) was called after the last cycle.
    #[error("no more cycles in trace")]
    NoMoreCycles,
}
