//! The parsed netlist and its line-level parser.

use std::path::Path;

use crate::error::FloError;
use crate::opcode::Opcode;

/// A named signal in the netlist.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    name: String,
    width: Option<u32>,
}

impl Node {
    /// Creates a node with an optional declared width.
    pub fn new(name: impl Into<String>, width: Option<u32>) -> Self {
        Self {
            name: name.into(),
            width,
        }
    }

    /// Returns the node name as written in the netlist (e.g. `GCD::io_a`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared bit width, if the operation carried one.
    pub fn width(&self) -> Option<u32> {
        self.width
    }
}

/// A single flo operation: `dest = opcode[/width] args...`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Operation {
    dest: Node,
    opcode: Opcode,
    mnemonic: String,
    args: Vec<String>,
}

impl Operation {
    /// Creates an operation whose mnemonic is the opcode's own.
    pub fn new(dest: Node, opcode: Opcode, args: Vec<String>) -> Self {
        Self {
            dest,
            opcode,
            mnemonic: opcode.mnemonic().to_string(),
            args,
        }
    }

    /// Returns the operation code.
    pub fn opcode(&self) -> Opcode {
        self.opcode
    }

    /// Returns the mnemonic as written in the netlist, without the width.
    pub fn mnemonic(&self) -> &str {
        &self.mnemonic
    }

    /// Returns the destination node.
    pub fn dest(&self) -> &Node {
        &self.dest
    }

    /// Returns the raw operand tokens.
    pub fn args(&self) -> &[String] {
        &self.args
    }
}

/// A parsed flo netlist.
#[derive(Clone, Debug, Default)]
pub struct Flo {
    operations: Vec<Operation>,
    class_name: Option<String>,
}

impl Flo {
    /// Reads and parses a flo file.
    ///
    /// # Errors
    ///
    /// Returns [`FloError::Io`] if the file cannot be read and
    /// [`FloError::Parse`] on the first malformed line. Unknown mnemonics
    /// are not an error; they parse as [`Opcode::Other`].
    pub fn parse(path: &Path) -> Result<Self, FloError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_str(&content)
    }

    /// Parses flo text. Blank lines are ignored.
    pub fn parse_str(content: &str) -> Result<Self, FloError> {
        let mut operations = Vec::new();
        for (idx, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            operations.push(parse_operation(trimmed, idx + 1)?);
        }

        let class_name = operations
            .iter()
            .find_map(|op| op.dest.name.split_once(':'))
            .map(|(class, _)| class.to_string())
            .filter(|class| !class.is_empty());

        Ok(Self {
            operations,
            class_name,
        })
    }

    /// Returns every operation in file order.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Returns the top-level module name: the prefix before the first `:` of
    /// the first hierarchical destination name. `None` if no destination is
    /// hierarchical.
    pub fn class_name(&self) -> Option<&str> {
        self.class_name.as_deref()
    }
}

fn parse_operation(line: &str, line_num: usize) -> Result<Operation, FloError> {
    let err = |message: String| FloError::Parse {
        line: line_num,
        message,
    };

    let (lhs, rhs) = line
        .split_once('=')
        .ok_or_else(|| err(format!("expected '=' in '{line}'")))?;
    let dest_name = lhs.trim();
    if dest_name.is_empty() || dest_name.contains(char::is_whitespace) {
        return Err(err(format!("invalid destination '{dest_name}'")));
    }

    let mut tokens = rhs.split_whitespace();
    let op_token = tokens
        .next()
        .ok_or_else(|| err(format!("missing opcode for '{dest_name}'")))?;

    let (mnemonic, width) = match op_token.split_once(['/', '\'']) {
        Some((mnemonic, width_str)) => {
            let width = width_str
                .parse::<u32>()
                .map_err(|_| err(format!("invalid width '{width_str}'")))?;
            (mnemonic, Some(width))
        }
        None => (op_token, None),
    };
    if mnemonic.is_empty() {
        return Err(err(format!("missing opcode for '{dest_name}'")));
    }
    let opcode = Opcode::from_mnemonic(mnemonic).unwrap_or(Opcode::Other);

    Ok(Operation {
        dest: Node::new(dest_name, width),
        opcode,
        mnemonic: mnemonic.to_string(),
        args: tokens.map(str::to_string).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const GCD_FLO: &str = "\
GCD::io_a = in/16
GCD::io_b = in/16
GCD::io_e = in/1
GCD::x = reg/16 1 T3
T0 = eq/1 GCD::y 0
GCD::io_v = out/1 T0

GCD::io_z = out/16 GCD::x
";

    #[test]
    fn parses_every_operation() {
        let flo = Flo::parse_str(GCD_FLO).unwrap();
        assert_eq!(flo.operations().len(), 7);
        let first = &flo.operations()[0];
        assert_eq!(first.opcode(), Opcode::In);
        assert_eq!(first.dest().name(), "GCD::io_a");
        assert_eq!(first.dest().width(), Some(16));
        assert!(first.args().is_empty());
    }

    #[test]
    fn keeps_operands() {
        let flo = Flo::parse_str(GCD_FLO).unwrap();
        let reg = &flo.operations()[3];
        assert_eq!(reg.opcode(), Opcode::Reg);
        assert_eq!(reg.args(), ["1", "T3"]);
    }

    #[test]
    fn class_name_from_first_hierarchical_dest() {
        let flo = Flo::parse_str("T0 = lit/1\nTop::io_in = in/8\n").unwrap();
        assert_eq!(flo.class_name(), Some("Top"));
    }

    #[test]
    fn class_name_absent_without_hierarchy() {
        let flo = Flo::parse_str("a = in/1\nb = out/1 a\n").unwrap();
        assert_eq!(flo.class_name(), None);
    }

    #[test]
    fn tick_width_separator() {
        let flo = Flo::parse_str("Top::r = reg'8 0 Top::d\n").unwrap();
        assert_eq!(flo.operations()[0].dest().width(), Some(8));
    }

    #[test]
    fn width_is_optional() {
        let flo = Flo::parse_str("Top::n = nop\n").unwrap();
        assert_eq!(flo.operations()[0].opcode(), Opcode::Nop);
        assert_eq!(flo.operations()[0].dest().width(), None);
    }

    #[test]
    fn literal_operands() {
        let flo = Flo::parse_str("T0 = lit/8 42\n").unwrap();
        let lit = &flo.operations()[0];
        assert_eq!(lit.opcode(), Opcode::Lit);
        assert_eq!(lit.mnemonic(), "lit");
        assert_eq!(lit.args(), ["42"]);
    }

    #[test]
    fn unknown_opcode_is_kept_as_other() {
        let flo = Flo::parse_str("a = in/1\n\nb = frob/1 a\nc = out/1 b\n").unwrap();
        assert_eq!(flo.operations().len(), 3);
        let frob = &flo.operations()[1];
        assert_eq!(frob.opcode(), Opcode::Other);
        assert_eq!(frob.mnemonic(), "frob");
        assert_eq!(frob.args(), ["a"]);
        assert_eq!(flo.operations()[2].opcode(), Opcode::Out);
    }

    #[test]
    fn width_without_mnemonic_errors() {
        let err = Flo::parse_str("a = /4\n").unwrap_err();
        assert!(matches!(err, FloError::Parse { line: 1, .. }));
    }

    #[test]
    fn missing_equals_errors() {
        let err = Flo::parse_str("a in/1\n").unwrap_err();
        assert!(err.to_string().contains("expected '='"));
    }

    #[test]
    fn missing_opcode_errors() {
        let err = Flo::parse_str("a =\n").unwrap_err();
        assert!(err.to_string().contains("missing opcode"));
    }

    #[test]
    fn bad_width_errors() {
        let err = Flo::parse_str("a = in/wide\n").unwrap_err();
        assert!(err.to_string().contains("invalid width 'wide'"));
    }

    #[test]
    fn parse_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("GCD.flo");
        std::fs::write(&path, GCD_FLO).unwrap();
        let flo = Flo::parse(&path).unwrap();
        assert_eq!(flo.class_name(), Some("GCD"));
    }

    #[test]
    fn parse_missing_file() {
        let err = Flo::parse(Path::new("/nonexistent/top.flo")).unwrap_err();
        assert!(matches!(err, FloError::Io(_)));
    }
}
