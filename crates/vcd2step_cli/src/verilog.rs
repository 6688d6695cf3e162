//! `vcd2verilog`: write per-signal data files and a Verilog harness.
//!
//! Settings resolve as command-line flag, then `[harness]` table of the
//! configuration file, then built-in default. The top module name falls
//! back to the netlist's class name.

use std::path::Path;

use vcd2step_config::ToolConfig;
use vcd2step_convert::{Directions, HarnessEmitter, HarnessOptions, NameStyle};
use vcd2step_flo::Flo;
use vcd2step_trace::VcdTrace;

use crate::VerilogArgs;

/// Runs the `vcd2verilog` command. Returns exit code 0 on success.
pub fn run(args: &VerilogArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let global = &args.global;
    let config = crate::load_tool_config(global)?;

    let mut trace =
        VcdTrace::open(Path::new(&args.vcd)).map_err(|e| format!("{}: {e}", args.vcd))?;
    let flo = Flo::parse(Path::new(&args.flo)).map_err(|e| format!("{}: {e}", args.flo))?;

    let options = resolve_options(args, &config, &flo).ok_or_else(|| {
        format!(
            "no top module name: {} has no hierarchical names; pass --top",
            args.flo
        )
    })?;
    let directions = Directions::classify(&flo, NameStyle::Flattened);

    if !global.quiet {
        eprintln!("   Converting {} -> {}/", options.top, args.output_dir);
    }

    let emitter = HarnessEmitter::create(Path::new(&args.output_dir), options)?;
    let summary = emitter.run(&mut trace, &directions)?;

    if global.detailed() {
        for signal in &summary.signals {
            let kind = if directions.should_poke(&signal.name) {
                "input"
            } else {
                "output"
            };
            eprintln!("     {kind} {} [{} bits]", signal.name, signal.width);
        }
        eprintln!(
            "     {} cycles, CYCLE_MAX defaults to {}",
            summary.cycles, summary.cycle_max
        );
    }
    if !global.quiet {
        eprintln!(
            "     Created {} ({} data files)",
            summary.harness_path.display(),
            summary.signals.len()
        );
    }

    Ok(0)
}

/// Merges flags, configuration and netlist into harness options. Returns
/// `None` if no top module name can be determined.
fn resolve_options(args: &VerilogArgs, config: &ToolConfig, flo: &Flo) -> Option<HarnessOptions> {
    let harness = &config.harness;
    let top = args
        .top
        .clone()
        .or_else(|| harness.top.clone())
        .or_else(|| flo.class_name().map(str::to_string))?;

    Some(HarnessOptions {
        top,
        cycle_max: args.cycle_max.or(harness.cycle_max),
        test_base_dir: args
            .test_base_dir
            .clone()
            .unwrap_or_else(|| harness.test_base_dir_or_default().to_string()),
    })
}
