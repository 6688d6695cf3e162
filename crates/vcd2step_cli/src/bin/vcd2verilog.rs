//! `vcd2verilog <trace.vcd> <netlist.flo> <output-directory>`

use std::process;

use clap::Parser;
use vcd2step_cli::{usage_exit_code, verilog, VerilogArgs};

fn main() {
    let args = match VerilogArgs::try_parse() {
        Ok(args) => args,
        Err(e) => process::exit(usage_exit_code::<VerilogArgs>(&e)),
    };

    match verilog::run(&args) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
