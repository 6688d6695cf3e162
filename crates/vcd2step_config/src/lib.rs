//! Parsing and validation of the optional `vcd2step.toml` configuration.
//!
//! Every setting has a built-in default, so the file is never required.
//! Command-line flags take precedence over values read from the file.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{discover_config, load_config, load_config_from_str, CONFIG_FILE_NAME};
pub use types::*;
