//! Cycle-stepping reader for VCD (IEEE 1364 Value Change Dump) traces.
//!
//! The converters only ever need a narrow view of a waveform: whether more
//! cycles remain, a way to advance by one cycle, the names of the signals
//! that currently carry a value, and the marker-prefixed bit-string of any
//! such signal. That view is the [`Trace`] trait; [`VcdTrace`] implements it
//! on top of a streaming VCD parser.

#![warn(missing_docs)]

pub mod error;
pub mod vcd;

pub use error::TraceError;
pub use vcd::{VcdTrace, VcdVar, LONG_NAME_SEPARATOR};

/// A waveform that can be walked one simulation cycle at a time.
pub trait Trace {
    /// Returns `true` if [`step`](Trace::step) can advance to another cycle.
    fn has_more_cycles(&self) -> bool;

    /// Advances the trace by one cycle, applying every value change that
    /// belongs to it.
    fn step(&mut self) -> Result<(), TraceError>;

    /// Returns the long (trace-form) names of every signal that has a value
    /// in the current cycle, in a stable order.
    fn all_long_names(&self) -> Vec<&str>;

    /// Returns the current value of a signal as a marker-prefixed bit-string
    /// (e.g. `b0101`).
    fn long_name_to_bits(&self, name: &str) -> Result<&str, TraceError>;
}
