//! Conversion of VCD traces into test vectors.
//!
//! Two pipelines share the same front half: every trace-form signal name is
//! [canonicalized](names::canonicalize), looked up in the
//! [direction sets](directions::Directions) built from the flo netlist, and
//! its bit-string is [re-encoded](encode::encode_bits) without loss of
//! precision. [`StepEmitter`] then writes a `wire_poke`/`step` script, while
//! [`HarnessEmitter`] writes per-signal `.dat` files plus a Verilog harness
//! that replays them.

#![warn(missing_docs)]

pub mod directions;
pub mod encode;
pub mod error;
pub mod harness;
pub mod names;
pub mod step;

pub use directions::Directions;
pub use encode::{encode_bits, Radix, BINARY_MARKER};
pub use error::{ConvertError, EncodeError};
pub use harness::{
    create_output_dir, write_harness, GenericSignal, HarnessEmitter, HarnessOptions,
    HarnessSummary,
};
pub use names::{canonicalize, NameStyle};
pub use step::{StepEmitter, StepSummary};
