//! Mapping of trace-form signal names onto target identifiers.
//!
//! Trace names separate hierarchy levels with `:` or `::`
//! (`GCD::io_a`, `GCD:io_a`). The step format addresses signals by their
//! full dotted path; the Verilog harness needs a single flat identifier per
//! port, so it drops the top-level module and joins the rest with `_`.

/// Target naming convention.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NameStyle {
    /// Full path joined with `.` (`Top.sub.sig`).
    #[default]
    Dotted,
    /// Path below the top-level module joined with `_` (`sub_sig`).
    Flattened,
}

/// Converts a trace-form name into its canonical form for `style`.
///
/// Every run of `:` becomes one `.`. For [`NameStyle::Flattened`] the part
/// before the first `.` is dropped and the remaining `.` become `_`; a name
/// without any `.` is returned unchanged. Already-canonical names map to
/// themselves.
pub fn canonicalize(name: &str, style: NameStyle) -> String {
    let dotted = collapse_separators(name);
    match style {
        NameStyle::Dotted => dotted,
        NameStyle::Flattened => match dotted.split_once('.') {
            Some((_, rest)) => rest.replace('.', "_"),
            None => dotted,
        },
    }
}

fn collapse_separators(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_separator = false;
    for c in name.chars() {
        if c == ':' {
            if !in_separator {
                out.push('.');
            }
            in_separator = true;
        } else {
            out.push(c);
            in_separator = false;
        }
    }
    out
}
