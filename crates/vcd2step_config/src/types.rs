//! Configuration types deserialized from `vcd2step.toml`.

use serde::Deserialize;

/// Placeholder written into `$readmemh` paths when no base directory is
/// configured; test runners substitute it before simulation.
pub const DEFAULT_TEST_BASE_DIR: &str = "@@TEST_BASE_DIR@@";

/// The top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolConfig {
    /// Settings for the Verilog harness generator.
    #[serde(default)]
    pub harness: HarnessConfig,
}

/// Settings that shape the generated Verilog harness.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HarnessConfig {
    /// Top-level module name; overrides the netlist's class name.
    #[serde(default)]
    pub top: Option<String>,
    /// Default value of the `CYCLE_MAX` macro. Derived from the trace length
    /// when absent.
    #[serde(default)]
    pub cycle_max: Option<u64>,
    /// Directory prefix for the `$readmemh` data file paths.
    #[serde(default)]
    pub test_base_dir: Option<String>,
}

impl HarnessConfig {
    /// Returns the configured test base directory or the placeholder.
    pub fn test_base_dir_or_default(&self) -> &str {
        self.test_base_dir.as_deref().unwrap_or(DEFAULT_TEST_BASE_DIR)
    }
}
