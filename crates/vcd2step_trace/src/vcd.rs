//! Streaming VCD parser that exposes the trace one cycle at a time.
//!
//! The header (scopes, variables, timescale) is parsed eagerly when the
//! trace is opened. Value changes are read lazily: each `#<time>` section of
//! the file is one cycle, and [`VcdTrace::step`](crate::Trace::step) reads
//! exactly one section. Signal values persist from cycle to cycle, so every
//! cycle sees a complete snapshot of all signals that have been assigned.

use std::collections::{HashMap, VecDeque};
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

use crate::error::TraceError;
use crate::Trace;

/// Separator placed between scope names and the variable reference when
/// building a long name (`top:cpu:clk`).
pub const LONG_NAME_SEPARATOR: char = ':';

/// Metadata for a variable declared in the VCD header.
#[derive(Clone, Debug)]
pub struct VcdVar {
    /// The VCD identifier code of the first declaration (e.g. `!`, `"#`).
    pub id_code: String,
    /// Scope path and reference joined with [`LONG_NAME_SEPARATOR`].
    pub long_name: String,
    /// Declared bit width.
    pub width: u32,
    /// The VCD variable type (e.g. `wire`, `reg`).
    pub var_type: String,
}

/// A VCD file opened for cycle-by-cycle traversal.
pub struct VcdTrace<R: BufRead> {
    lines: Lines<R>,
    line_num: usize,
    timescale: Option<String>,
    vars: Vec<VcdVar>,
    id_to_vars: HashMap<String, Vec<usize>>,
    name_to_var: HashMap<String, usize>,
    values: Vec<Option<String>>,
    /// Timestamp of the next unread cycle, `None` once the file is exhausted.
    pending_time: Option<u64>,
    current_time: Option<u64>,
    cycles: usize,
    /// Unread tokens of the current value-section line.
    tokens: VecDeque<String>,
    in_comment: bool,
}

impl VcdTrace<BufReader<File>> {
    /// Opens a VCD file from a filesystem path and parses its header.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError`] on I/O errors or a malformed header.
    pub fn open(path: &Path) -> Result<Self, TraceError> {
        let file = File::open(path)?;
        Self::new(BufReader::new(file))
    }
}

impl<R: BufRead> VcdTrace<R> {
    /// Parses the VCD header from `reader` and positions the trace before
    /// its first cycle.
    ///
    /// Value changes that precede the first timestamp (such as a leading
    /// `$dumpvars` block) seed the initial signal state.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError`] on I/O errors, parse errors, or a missing
    /// `$enddefinitions` in a file that declares variables.
    pub fn new(reader: R) -> Result<Self, TraceError> {
        let mut trace = Self {
            lines: reader.lines(),
            line_num: 0,
            timescale: None,
            vars: Vec::new(),
            id_to_vars: HashMap::new(),
            name_to_var: HashMap::new(),
            values: Vec::new(),
            pending_time: None,
            current_time: None,
            cycles: 0,
            tokens: VecDeque::new(),
            in_comment: false,
        };

        if trace.read_header()? {
            trace.pending_time = trace.read_changes()?;
        } else if !trace.vars.is_empty() {
            return Err(TraceError::Format("missing $enddefinitions".to_string()));
        }
        Ok(trace)
    }

    /// Returns every declared variable in declaration order.
    pub fn vars(&self) -> &[VcdVar] {
        &self.vars
    }

    /// Returns the raw `$timescale` body, if the header had one.
    pub fn timescale(&self) -> Option<&str> {
        self.timescale.as_deref()
    }

    /// Returns the timestamp of the current cycle, or `None` before the
    /// first [`step`](Trace::step).
    pub fn time(&self) -> Option<u64> {
        self.current_time
    }

    /// Returns the number of cycles stepped so far.
    pub fn cycles_stepped(&self) -> usize {
        self.cycles
    }

    fn next_line(&mut self) -> Result<Option<String>, TraceError> {
        match self.lines.next() {
            Some(line) => {
                self.line_num += 1;
                Ok(Some(line?))
            }
            None => Ok(None),
        }
    }

    /// Reads declarations up to `$enddefinitions`.
    ///
    /// Returns `false` if the input ended before `$enddefinitions`.
    fn read_header(&mut self) -> Result<bool, TraceError> {
        let mut scope_stack: Vec<String> = Vec::new();
        let mut pending_keyword: Option<String> = None;
        let mut pending_body = String::new();

        while let Some(line) = self.next_line()? {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            if let Some(kw) = pending_keyword.take() {
                if let Some(pos) = trimmed.find("$end") {
                    pending_body.push(' ');
                    pending_body.push_str(trimmed[..pos].trim());
                    let body = std::mem::take(&mut pending_body);
                    self.process_keyword(&kw, body.trim(), &mut scope_stack)?;
                } else {
                    pending_body.push(' ');
                    pending_body.push_str(trimmed);
                    pending_keyword = Some(kw);
                }
                continue;
            }

            if trimmed.starts_with("$enddefinitions") {
                return Ok(true);
            }

            if let Some(kw) = extract_keyword(trimmed) {
                pending_body = extract_keyword_body(trimmed);
                if trimmed.contains("$end") {
                    let body = std::mem::take(&mut pending_body);
                    self.process_keyword(&kw, &body, &mut scope_stack)?;
                } else {
                    pending_keyword = Some(kw);
                }
            }
        }
        Ok(false)
    }

    fn process_keyword(
        &mut self,
        keyword: &str,
        body: &str,
        scope_stack: &mut Vec<String>,
    ) -> Result<(), TraceError> {
        match keyword {
            "timescale" => self.timescale = Some(body.to_string()),
            "scope" => {
                // "<kind> <name>", tolerate a bare name
                let parts: Vec<&str> = body.split_whitespace().collect();
                if let Some(name) = parts.get(1).or_else(|| parts.first()) {
                    scope_stack.push((*name).to_string());
                }
            }
            "upscope" => {
                scope_stack.pop();
            }
            "var" => self.declare_var(body, scope_stack)?,
            _ => {}
        }
        Ok(())
    }

    /// Registers a `$var <type> <width> <id_code> <reference> [bit-select]`.
    fn declare_var(&mut self, body: &str, scope_stack: &[String]) -> Result<(), TraceError> {
        let parts: Vec<&str> = body.split_whitespace().collect();
        if parts.len() < 4 {
            return Err(TraceError::Parse {
                line: self.line_num,
                message: format!("invalid $var: {body}"),
            });
        }
        let width: u32 = parts[1].parse().map_err(|_| TraceError::Parse {
            line: self.line_num,
            message: format!("invalid width in $var: {}", parts[1]),
        })?;
        let id_code = parts[2].to_string();

        let mut long_name = String::new();
        for scope in scope_stack {
            long_name.push_str(scope);
            long_name.push(LONG_NAME_SEPARATOR);
        }
        long_name.push_str(parts[3]);

        // A repeated long name aliases the first declaration.
        let idx = match self.name_to_var.get(&long_name) {
            Some(&idx) => idx,
            None => {
                let idx = self.vars.len();
                self.vars.push(VcdVar {
                    id_code: id_code.clone(),
                    long_name: long_name.clone(),
                    width,
                    var_type: parts[0].to_string(),
                });
                self.values.push(None);
                self.name_to_var.insert(long_name, idx);
                idx
            }
        };
        let targets = self.id_to_vars.entry(id_code).or_default();
        if !targets.contains(&idx) {
            targets.push(idx);
        }
        Ok(())
    }

    /// Returns the next whitespace-separated token of the value section.
    ///
    /// The value section is free-form: timestamps, keywords and value
    /// changes may share a line (`#10 1! b01 "`).
    fn next_token(&mut self) -> Result<Option<String>, TraceError> {
        loop {
            if let Some(token) = self.tokens.pop_front() {
                return Ok(Some(token));
            }
            let Some(line) = self.next_line()? else {
                return Ok(None);
            };
            self.tokens
                .extend(line.split_whitespace().map(str::to_string));
        }
    }

    /// Applies value changes until the next timestamp, which is returned.
    /// Returns `None` at end of input.
    fn read_changes(&mut self) -> Result<Option<u64>, TraceError> {
        while let Some(token) = self.next_token()? {
            if self.in_comment {
                self.in_comment = token != "$end";
                continue;
            }

            if let Some(time_str) = token.strip_prefix('#') {
                let time = time_str.parse::<u64>().map_err(|_| TraceError::Parse {
                    line: self.line_num,
                    message: format!("invalid timestamp: {token}"),
                })?;
                return Ok(Some(time));
            }

            match token.as_str() {
                "$comment" => self.in_comment = true,
                // $dumpvars, $dumpall, $dumpon, $dumpoff and $end only
                // bracket ordinary value changes.
                t if t.starts_with('$') => {}
                _ => self.apply_value_change(&token)?,
            }
        }
        Ok(None)
    }

    fn apply_value_change(&mut self, token: &str) -> Result<(), TraceError> {
        let mut chars = token.chars();
        let Some(first) = chars.next() else {
            return Ok(());
        };
        let rest = chars.as_str();
        match first {
            'b' | 'B' | 'r' | 'R' => {
                let id_code = match self.next_token()? {
                    Some(id_code) if !rest.is_empty() => id_code,
                    _ => {
                        return Err(TraceError::Parse {
                            line: self.line_num,
                            message: format!("invalid vector value change: {token}"),
                        })
                    }
                };
                if first == 'r' || first == 'R' {
                    // Reals are kept verbatim; they carry no binary marker.
                    let value = format!("r{rest}");
                    self.assign(&id_code, |_| value.clone());
                } else {
                    self.assign(&id_code, |width| extend_bits(rest, width));
                }
            }
            '0' | '1' | 'x' | 'X' | 'z' | 'Z' => {
                if rest.is_empty() {
                    return Err(TraceError::Parse {
                        line: self.line_num,
                        message: format!("missing identifier in value change: {token}"),
                    });
                }
                let digit = &token[..1];
                self.assign(rest, |width| extend_bits(digit, width));
            }
            // Anything else (e.g. stray tokens) carries no value for us.
            _ => {}
        }
        Ok(())
    }

    /// Stores a new value for every variable bound to `id_code`.
    fn assign(&mut self, id_code: &str, make_value: impl Fn(u32) -> String) {
        if let Some(indices) = self.id_to_vars.get(id_code) {
            for &idx in indices {
                self.values[idx] = Some(make_value(self.vars[idx].width));
            }
        }
    }
}

impl<R: BufRead> Trace for VcdTrace<R> {
    fn has_more_cycles(&self) -> bool {
        self.pending_time.is_some()
    }

    fn step(&mut self) -> Result<(), TraceError> {
        let time = self.pending_time.ok_or(TraceError::NoMoreCycles)?;
        self.current_time = Some(time);
        self.cycles += 1;
        self.pending_time = self.read_changes()?;
        Ok(())
    }

    fn all_long_names(&self) -> Vec<&str> {
        self.vars
            .iter()
            .zip(&self.values)
            .filter(|(_, value)| value.is_some())
            .map(|(var, _)| var.long_name.as_str())
            .collect()
    }

    fn long_name_to_bits(&self, name: &str) -> Result<&str, TraceError> {
        self.name_to_var
            .get(name)
            .and_then(|&idx| self.values[idx].as_deref())
            .ok_or_else(|| TraceError::UnknownSignal(name.to_string()))
    }
}

/// Extracts a VCD keyword name from a line starting with `$`.
fn extract_keyword(line: &str) -> Option<String> {
    let rest = line.strip_prefix('$')?;
    let end = rest
        .find(|c: char| c.is_whitespace() || c == '$')
        .unwrap_or(rest.len());
    let kw = &rest[..end];
    if kw.is_empty() {
        None
    } else {
        Some(kw.to_lowercase())
    }
}

/// Extracts the body text between the keyword and `$end` on a single line.
fn extract_keyword_body(line: &str) -> String {
    let Some(pos) = line.find(|c: char| c.is_whitespace()) else {
        return String::new();
    };
    let after_keyword = &line[pos..];
    let body = match after_keyword.find("$end") {
        Some(end) => &after_keyword[..end],
        None => after_keyword,
    };
    body.trim().to_string()
}

/// Prefixes `digits` with the binary marker, left-extending to `width`.
///
/// Short values are zero-extended, or `x`/`z`-extended when their most
/// significant digit is `x`/`z`. Values already at least `width` digits long
/// are kept as they are.
fn extend_bits(digits: &str, width: u32) -> String {
    let width = width as usize;
    let mut bits = String::with_capacity(width.max(digits.len()) + 1);
    bits.push('b');
    if digits.len() < width {
        let fill = match digits.as_bytes().first() {
            Some(b'x' | b'X') => 'x',
            Some(b'z' | b'Z') => 'z',
            _ => '0',
        };
        bits.extend(std::iter::repeat(fill).take(width - digits.len()));
    }
    bits.push_str(digits);
    bits
}
