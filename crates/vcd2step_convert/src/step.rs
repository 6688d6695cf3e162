//! Step-script emitter.
//!
//! Produces one `wire_poke <name> <decimal>` line per declared input per
//! cycle, a `step 1` line closing each cycle, and a final `quit`.

use std::io::Write;

use vcd2step_trace::Trace;

use crate::directions::Directions;
use crate::encode::{encode_bits, Radix};
use crate::error::ConvertError;

/// Counters reported after a step script has been written.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepSummary {
    /// Number of cycles stepped (and `step 1` lines written).
    pub cycles: usize,
    /// Number of `wire_poke` lines written.
    pub pokes: usize,
}

/// Writes a step script for a trace to any [`Write`] sink.
pub struct StepEmitter<W: Write> {
    writer: W,
}

impl<W: Write> StepEmitter<W> {
    /// Creates an emitter writing to `writer`.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Walks every remaining cycle of `trace` and writes the script,
    /// terminated by `quit`, then flushes the writer.
    ///
    /// Signals are emitted in the trace's enumeration order. Names are
    /// canonicalized in `directions`' style; only declared inputs are poked.
    ///
    /// # Errors
    ///
    /// Stops at the first malformed value, trace error or write error. Lines
    /// already written stay in the sink; nothing is written for the failing
    /// value.
    pub fn run<T: Trace>(
        &mut self,
        trace: &mut T,
        directions: &Directions,
    ) -> Result<StepSummary, ConvertError> {
        let mut summary = StepSummary::default();

        while trace.has_more_cycles() {
            trace.step()?;

            for long_name in trace.all_long_names() {
                let name = directions.canonicalize(long_name);
                if !directions.should_poke(&name) {
                    continue;
                }
                let bits = trace.long_name_to_bits(long_name)?;
                let value = encode_bits(bits, Radix::Decimal).map_err(|source| {
                    ConvertError::Value {
                        signal: name.clone(),
                        source,
                    }
                })?;
                writeln!(self.writer, "wire_poke {name} {value}")?;
                summary.pokes += 1;
            }

            writeln!(self.writer, "step 1")?;
            summary.cycles += 1;
        }

        writeln!(self.writer, "quit")?;
        self.writer.flush()?;
        Ok(summary)
    }

    /// Consumes the emitter and returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}
