//! Parser for flo, the flat intermediate netlist emitted by the Chisel
//! toolchain.
//!
//! A flo file is a list of single-assignment operations, one per line:
//!
//! ```text
//! GCD::io_a = in/32
//! T0 = eq/1 GCD::y 0
//! GCD::io_z = out/32 GCD::x
//! ```
//!
//! The converters only care about which signals are top-level inputs and
//! outputs, but the full operation list is exposed so callers can walk it.

#![warn(missing_docs)]

pub mod error;
pub mod flo;
pub mod opcode;

pub use error::FloError;
pub use flo::{Flo, Node, Operation};
pub use opcode::Opcode;
