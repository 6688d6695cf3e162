//! `vcd2step <trace.vcd> <netlist.flo> <output.step>`

use std::process;

use clap::Parser;
use vcd2step_cli::{step, usage_exit_code, StepArgs};

fn main() {
    let args = match StepArgs::try_parse() {
        Ok(args) => args,
        Err(e) => process::exit(usage_exit_code::<StepArgs>(&e)),
    };

    match step::run(&args) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
