//! Flo operation codes.

use std::fmt;

/// A flo operation code.
///
/// Only [`Opcode::In`] and [`Opcode::Out`] mark the circuit's external
/// interface; every other opcode describes internal logic. Mnemonics outside
/// the known table parse as [`Opcode::Other`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Opcode {
    /// Addition.
    Add,
    /// Bitwise AND.
    And,
    /// Concatenation.
    Cat,
    /// Concatenation with a constant.
    Catd,
    /// Equality comparison.
    Eq,
    /// Unsigned greater-than.
    Gt,
    /// Unsigned greater-or-equal.
    Gte,
    /// Top-level input port.
    In,
    /// Memory initialization.
    Init,
    /// Memory load.
    Ld,
    /// Literal constant.
    Lit,
    /// Base-2 logarithm.
    Log2,
    /// Logical shift left.
    Lsh,
    /// Unsigned less-than.
    Lt,
    /// Unsigned less-or-equal.
    Lte,
    /// Memory declaration.
    Mem,
    /// Plain move.
    Mov,
    /// Bit mask.
    Msk,
    /// Multiplication.
    Mul,
    /// Two-way multiplexer.
    Mux,
    /// Arithmetic negation.
    Neg,
    /// Inequality comparison.
    Neq,
    /// No operation.
    Nop,
    /// Bitwise NOT.
    Not,
    /// Bitwise OR.
    Or,
    /// Top-level output port.
    Out,
    /// Memory read.
    Rd,
    /// Register.
    Reg,
    /// Random value.
    Rnd,
    /// Logical shift right.
    Rsh,
    /// Arithmetic shift right.
    Rsha,
    /// Reset input.
    Rst,
    /// Memory store.
    St,
    /// Subtraction.
    Sub,
    /// Memory write.
    Wr,
    /// Bitwise XOR.
    Xor,
    /// Any mnemonic not listed above; the raw text is kept on the
    /// [`Operation`](crate::Operation).
    Other,
}

impl Opcode {
    /// Looks up an opcode by its textual mnemonic (case-insensitive).
    /// Returns `None` for mnemonics outside the known table.
    pub fn from_mnemonic(s: &str) -> Option<Self> {
        let op = match s.to_ascii_lowercase().as_str() {
            "add" => Opcode::Add,
            "and" => Opcode::And,
            "cat" => Opcode::Cat,
            "catd" => Opcode::Catd,
            "eq" => Opcode::Eq,
            "gt" => Opcode::Gt,
            "gte" => Opcode::Gte,
            "in" => Opcode::In,
            "init" => Opcode::Init,
            "ld" => Opcode::Ld,
            "lit" => Opcode::Lit,
            "log2" => Opcode::Log2,
            "lsh" => Opcode::Lsh,
            "lt" => Opcode::Lt,
            "lte" => Opcode::Lte,
            "mem" => Opcode::Mem,
            "mov" => Opcode::Mov,
            "msk" => Opcode::Msk,
            "mul" => Opcode::Mul,
            "mux" => Opcode::Mux,
            "neg" => Opcode::Neg,
            "neq" => Opcode::Neq,
            "nop" => Opcode::Nop,
            "not" => Opcode::Not,
            "or" => Opcode::Or,
            "out" => Opcode::Out,
            "rd" => Opcode::Rd,
            "reg" => Opcode::Reg,
            "rnd" => Opcode::Rnd,
            "rsh" => Opcode::Rsh,
            "rsha" | "arsh" => Opcode::Rsha,
            "rst" => Opcode::Rst,
            "st" => Opcode::St,
            "sub" => Opcode::Sub,
            "wr" => Opcode::Wr,
            "xor" => Opcode::Xor,
            _ => return None,
        };
        Some(op)
    }

    /// Returns the canonical lowercase mnemonic.
    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Add => "add",
            Opcode::And => "and",
            Opcode::Cat => "cat",
            Opcode::Catd => "catd",
            Opcode::Eq => "eq",
            Opcode::Gt => "gt",
            Opcode::Gte => "gte",
            Opcode::In => "in",
            Opcode::Init => "init",
            Opcode::Ld => "ld",
            Opcode::Lit => "lit",
            Opcode::Log2 => "log2",
            Opcode::Lsh => "lsh",
            Opcode::Lt => "lt",
            Opcode::Lte => "lte",
            Opcode::Mem => "mem",
            Opcode::Mov => "mov",
            Opcode::Msk => "msk",
            Opcode::Mul => "mul",
            Opcode::Mux => "mux",
            Opcode::Neg => "neg",
            Opcode::Neq => "neq",
            Opcode::Nop => "nop",
            Opcode::Not => "not",
            Opcode::Or => "or",
            Opcode::Out => "out",
            Opcode::Rd => "rd",
            Opcode::Reg => "reg",
            Opcode::Rnd => "rnd",
            Opcode::Rsh => "rsh",
            Opcode::Rsha => "rsha",
            Opcode::Rst => "rst",
            Opcode::St => "st",
            Opcode::Sub => "sub",
            Opcode::Wr => "wr",
            Opcode::Xor => "xor",
            Opcode::Other => "other",
        }
    }

    /// Returns `true` for the opcodes that define the circuit's ports.
    pub fn is_port(self) -> bool {
        matches!(self, Opcode::In | Opcode::Out)
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}
