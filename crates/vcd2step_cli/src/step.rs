//! `vcd2step`: write a step script for a VCD trace.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use vcd2step_convert::{Directions, NameStyle, StepEmitter};
use vcd2step_flo::Flo;
use vcd2step_trace::VcdTrace;

use crate::StepArgs;

/// Runs the `vcd2step` command. Returns exit code 0 on success.
pub fn run(args: &StepArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let global = &args.global;

    // No setting applies to step scripts, but a broken file is still fatal.
    crate::load_tool_config(global)?;

    let mut trace =
        VcdTrace::open(Path::new(&args.vcd)).map_err(|e| format!("{}: {e}", args.vcd))?;
    let flo = Flo::parse(Path::new(&args.flo)).map_err(|e| format!("{}: {e}", args.flo))?;
    let directions = Directions::classify(&flo, NameStyle::Dotted);

    if !global.quiet {
        eprintln!("   Converting {} -> {}", args.vcd, args.output);
    }
    if global.detailed() {
        eprintln!(
            "     {} inputs, {} ports in {}",
            directions.poke_count(),
            directions.poke_or_peek_count(),
            args.flo
        );
    }

    let file = File::create(&args.output)
        .map_err(|e| format!("unable to create {}: {e}", args.output))?;
    let mut emitter = StepEmitter::new(BufWriter::new(file));
    let summary = emitter.run(&mut trace, &directions)?;

    if !global.quiet {
        eprintln!("     Wrote {} cycles to {}", summary.cycles, args.output);
    }
    if global.detailed() {
        eprintln!("     {} wire_poke commands", summary.pokes);
    }

    Ok(0)
}
