//! Recovery notes.
//!
//! Parsing never fails. When the parser has to make a structural decision
//! about malformed input (running a construct to end of input, dropping a
//! line, rejecting a table) it can record a [`ParseError`] so callers may
//! report it. Nothing here is printed by the parser.

use thiserror::Error;

/// Error kinds for categorizing recovery notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    /// Comment opened and never closed; it ran to end of input.
    UnclosedComment,
    /// Code fence opened and never closed; it ran to end of input.
    UnclosedFence,
    /// A quote or list line nested two or more levels deeper than the
    /// previous line; the line was dropped.
    NestingJump,
    /// Table rows disagreed on column count; the lines were reparsed.
    RaggedTable,
}

/// A recovery note tied to a source line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {message}")]
pub struct ParseError {
    /// Human-readable description.
    pub message: String,
    /// 1-based source line.
    pub line: usize,
    pub kind: ParseErrorKind,
}

impl ParseError {
    /// Create a new note.
    pub fn new(kind: ParseErrorKind, line: usize, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            line,
            kind,
        }
    }

    pub fn unclosed_comment(line: usize) -> Self {
        Self::new(
            ParseErrorKind::UnclosedComment,
            line,
            "unclosed comment runs to end of input",
        )
    }

    pub fn unclosed_fence(fence: &str, line: usize) -> Self {
        Self::new(
            ParseErrorKind::UnclosedFence,
            line,
            format!("unclosed {} fence runs to end of input", fence),
        )
    }

    pub fn nesting_jump(from: u32, to: u32, line: usize) -> Self {
        Self::new(
            ParseErrorKind::NestingJump,
            line,
            format!("nesting jumps from level {} to {}; line dropped", from, to),
        )
    }

    pub fn ragged_table(counts: &[usize], line: usize) -> Self {
        let counts: Vec<String> = counts.iter().map(|c| c.to_string()).collect();
        Self::new(
            ParseErrorKind::RaggedTable,
            line,
            format!(
                "table rows have differing column counts ({}); not a table",
                counts.join(", ")
            ),
        )
    }
}

/// A collection of recovery notes in source order of discovery.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseErrors {
    errors: Vec<ParseError>,
}

impl ParseErrors {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn push(&mut self, error: ParseError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParseError> {
        self.errors.iter()
    }

    /// Notes of one kind.
    pub fn of_kind(&self, kind: ParseErrorKind) -> impl Iterator<Item = &ParseError> {
        self.errors.iter().filter(move |e| e.kind == kind)
    }
}
