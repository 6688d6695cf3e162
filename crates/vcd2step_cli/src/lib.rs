//! Command-line front ends for the VCD converters.
//!
//! Two binaries share this library. `vcd2step` turns a trace into a step
//! script of `wire_poke`/`step` commands, and `vcd2verilog` turns it into
//! per-signal `.dat` files plus a self-checking Verilog harness.

#![warn(missing_docs)]

pub mod step;
pub mod verilog;

use std::path::Path;

use clap::builder::NonEmptyStringValueParser;
use clap::error::ErrorKind;
use clap::{Args, CommandFactory, Parser};
use vcd2step_config::{ConfigError, ToolConfig};

/// Convert a VCD trace into a step script.
#[derive(Parser, Debug)]
#[command(name = "vcd2step", version, about = "Convert a VCD trace into a step script")]
pub struct StepArgs {
    /// Input VCD trace.
    pub vcd: String,

    /// Flo netlist of the traced design.
    pub flo: String,

    /// Output step script.
    pub output: String,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Convert a VCD trace into `.dat` files and a Verilog harness.
#[derive(Parser, Debug)]
#[command(
    name = "vcd2verilog",
    version,
    about = "Convert a VCD trace into Verilog test vectors"
)]
pub struct VerilogArgs {
    /// Input VCD trace.
    pub vcd: String,

    /// Flo netlist of the traced design.
    pub flo: String,

    /// Output directory. Must not exist yet.
    pub output_dir: String,

    /// Override the top module name (default: the netlist's class name).
    #[arg(long, value_parser = NonEmptyStringValueParser::new())]
    pub top: Option<String>,

    /// Default value of the `CYCLE_MAX` macro in the harness.
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub cycle_max: Option<u64>,

    /// Directory prefix used in the harness's `$readmemh` paths.
    #[arg(long, value_parser = NonEmptyStringValueParser::new())]
    pub test_base_dir: Option<String>,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Flags shared by both tools.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Suppress all output except errors.
    #[arg(short, long)]
    pub quiet: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Path to a `vcd2step.toml` configuration file.
    #[arg(long)]
    pub config: Option<String>,
}

impl GlobalArgs {
    /// Whether detail lines should be printed.
    pub fn detailed(&self) -> bool {
        self.verbose && !self.quiet
    }
}

/// Loads the explicit `--config` file, or `vcd2step.toml` from the current
/// directory when present.
pub fn load_tool_config(global: &GlobalArgs) -> Result<ToolConfig, ConfigError> {
    match &global.config {
        Some(path) => vcd2step_config::load_config(Path::new(path)),
        None => vcd2step_config::discover_config(&std::env::current_dir()?),
    }
}

/// Handles a failed argument parse and returns the process exit code.
///
/// `--help` and `--version` print as usual. Every other argument error
/// prints the usage text instead of the clap diagnostic. All cases exit 0.
pub fn usage_exit_code<C: CommandFactory>(err: &clap::Error) -> i32 {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            let _ = err.print();
        }
        _ => {
            let _ = C::command().print_help();
        }
    }
    0
}
