//! Classification of netlist signals into poke and peek targets.

use std::collections::HashSet;

use vcd2step_flo::{Flo, Opcode, Operation};

use crate::names::{canonicalize, NameStyle};

/// Canonical names of the circuit's inputs and outputs.
///
/// Built once from the netlist before the trace is read and only queried
/// afterwards. The name style used for classification is kept so that
/// trace names are canonicalized the same way before lookup.
#[derive(Clone, Debug, Default)]
pub struct Directions {
    style: NameStyle,
    poke: HashSet<String>,
    poke_or_peek: HashSet<String>,
}

impl Directions {
    /// Classifies every IN/OUT operation of `flo`.
    pub fn classify(flo: &Flo, style: NameStyle) -> Self {
        Self::from_operations(flo.operations(), style)
    }

    /// Classifies an arbitrary sequence of operations.
    ///
    /// IN destinations go into both sets, OUT destinations only into the
    /// poke-or-peek set. Repeated names are harmless.
    pub fn from_operations<'a>(
        operations: impl IntoIterator<Item = &'a Operation>,
        style: NameStyle,
    ) -> Self {
        let mut directions = Self {
            style,
            ..Self::default()
        };
        for op in operations {
            match op.opcode() {
                Opcode::In => {
                    let name = canonicalize(op.dest().name(), style);
                    directions.poke.insert(name.clone());
                    directions.poke_or_peek.insert(name);
                }
                Opcode::Out => {
                    directions
                        .poke_or_peek
                        .insert(canonicalize(op.dest().name(), style));
                }
                _ => {}
            }
        }
        directions
    }

    /// Canonicalizes a trace-form name in this classification's style.
    pub fn canonicalize(&self, name: &str) -> String {
        canonicalize(name, self.style)
    }

    /// Returns the name style the sets were built with.
    pub fn style(&self) -> NameStyle {
        self.style
    }

    /// Returns `true` if `name` is a declared input.
    pub fn should_poke(&self, name: &str) -> bool {
        self.poke.contains(name)
    }

    /// Returns `true` if `name` is a declared input or output.
    pub fn should_poke_or_peek(&self, name: &str) -> bool {
        self.poke_or_peek.contains(name)
    }

    /// Number of declared inputs.
    pub fn poke_count(&self) -> usize {
        self.poke.len()
    }

    /// Number of declared inputs and outputs.
    pub fn poke_or_peek_count(&self) -> usize {
        self.poke_or_peek.len()
    }
}
