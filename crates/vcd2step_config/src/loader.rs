//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::ToolConfig;
use std::path::Path;

/// File name looked up by [`discover_config`].
pub const CONFIG_FILE_NAME: &str = "vcd2step.toml";

/// Loads and validates a configuration file from an explicit path.
pub fn load_config(path: &Path) -> Result<ToolConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Loads `<dir>/vcd2step.toml` if it exists, otherwise returns the defaults.
pub fn discover_config(dir: &Path) -> Result<ToolConfig, ConfigError> {
    let path = dir.join(CONFIG_FILE_NAME);
    if path.is_file() {
        load_config(&path)
    } else {
        Ok(ToolConfig::default())
    }
}

/// Parses and validates a configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<ToolConfig, ConfigError> {
    let config: ToolConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Rejects values that would produce an unusable harness.
fn validate_config(config: &ToolConfig) -> Result<(), ConfigError> {
    let harness = &config.harness;
    if harness.cycle_max == Some(0) {
        return Err(ConfigError::ValidationError(
            "harness.cycle_max must be positive".to_string(),
        ));
    }
    if harness.top.as_deref().is_some_and(str::is_empty) {
        return Err(ConfigError::ValidationError(
            "harness.top must not be empty".to_string(),
        ));
    }
    if harness.test_base_dir.as_deref().is_some_and(str::is_empty) {
        return Err(ConfigError::ValidationError(
            "harness.test_base_dir must not be empty".to_string(),
        ));
    }
    Ok(())
}
