//! Error types for flo parsing.

/// Errors that can occur when reading a flo netlist.
#[derive(Debug, thiserror::Error)]
pub enum FloError {
    /// An I/O error occurred while reading the netlist file.
    #[error("failed to read netlist: {0}")]
    Io(#[from] std::io::Error),

    /// A line could not be parsed.
    #[error("netlist parse error at line {line}: {message}")]
    Parse {
        /// The 1-based line number where the error occurred.
        line: usize,
        /// Description of the error.
        message: String,
    },
}
