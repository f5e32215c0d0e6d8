//! Indentation depth measurement.
//!
//! One indent unit is four spaces or one tab. Depth is only recognised when
//! the leading spaces are an exact multiple of the unit; anything else is
//! treated as unindented text.

/// Number of spaces in one indent unit.
pub const INDENT_UNIT: usize = 4;

/// Measure the indentation of `text`.
///
/// Returns `(depth, rest)`. When the leading space count is a multiple of
/// [`INDENT_UNIT`], `depth` is `spaces / INDENT_UNIT + tabs` and `rest` is the
/// text after the whole leading whitespace run. Otherwise depth is 0 and
/// `text` comes back unchanged.
///
/// ```rust
/// use mdtree_core::indent::analyze;
///
/// assert_eq!(analyze("        - x"), (2, "- x"));
/// assert_eq!(analyze("\t- x"), (1, "- x"));
/// assert_eq!(analyze("  - x"), (0, "  - x"));
/// ```
pub fn analyze(text: &str) -> (usize, &str) {
    let mut spaces = 0;
    let mut tabs = 0;
    let mut run = 0;

    for b in text.bytes() {
        match b {
            b' ' => spaces += 1,
            b'\t' => tabs += 1,
            _ => break,
        }
        run += 1;
    }

    if spaces % INDENT_UNIT == 0 {
        (spaces / INDENT_UNIT + tabs, &text[run..])
    } else {
        (0, text)
    }
}

/// Remove up to `depth` indent units from the front of `line`.
///
/// Each unit is either one tab or four spaces. Stripping stops early when
/// the line runs out of whole units.
pub fn strip_units(line: &str, depth: usize) -> &str {
    let mut rest = line;
    for _ in 0..depth {
        if let Some(r) = rest.strip_prefix('\t') {
            rest = r;
        } else if let Some(r) = rest.strip_prefix("    ") {
            rest = r;
        } else {
            break;
        }
    }
    rest
}
