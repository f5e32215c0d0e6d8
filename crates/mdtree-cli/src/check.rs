//! Tree-shape diagnostics.
//!
//! The target formats this tool feeds cannot express every construct the
//! parser accepts. This pass walks a parsed document and reports each shape
//! that a converter would have to drop or flatten, tagged with its source
//! line.

use std::fmt;

use mdtree_core::{BlockKind, Document, InlineKind, ListKind, ParseErrorKind, ParseErrors};

/// Deepest heading rank the targets support.
pub const MAX_HEADING_LEVEL: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Debug => "Debug",
            Severity::Info => "Info",
            Severity::Warning => "Warn",
            Severity::Error => "Error",
        };
        f.pad(label)
    }
}

/// One report line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub line: usize,
    pub message: String,
}

impl Diagnostic {
    fn new(severity: Severity, line: usize, message: impl Into<String>) -> Self {
        Self {
            severity,
            line,
            message: message.into(),
        }
    }

    fn warning(line: usize, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, line, message)
    }
}

/// Unclosed constructs swallowed the rest of the input; a reparsed table
/// lost nothing.
fn note_severity(kind: ParseErrorKind) -> Severity {
    match kind {
        ParseErrorKind::UnclosedComment | ParseErrorKind::UnclosedFence => Severity::Error,
        ParseErrorKind::NestingJump => Severity::Warning,
        ParseErrorKind::RaggedTable => Severity::Info,
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:5}: [Line={:>4}] {}",
            self.severity, self.line, self.message
        )
    }
}

/// Collect diagnostics for `doc` plus the parser's recovery notes, ordered
/// by source line.
pub fn check(doc: &Document<'_>, notes: &ParseErrors) -> Vec<Diagnostic> {
    let mut out: Vec<Diagnostic> = notes
        .iter()
        .map(|note| Diagnostic::new(note_severity(note.kind), note.line, note.message.clone()))
        .collect();

    for block in doc.blocks() {
        let line = block.linenum();
        match block.kind() {
            BlockKind::Heading if block.level() > MAX_HEADING_LEVEL => {
                out.push(Diagnostic::warning(
                    line,
                    format!(
                        "heading level {} is not supported; rendered as level {}",
                        block.level(),
                        MAX_HEADING_LEVEL
                    ),
                ));
            }
            BlockKind::Code { info } if !info.is_empty() => {
                out.push(Diagnostic::new(
                    Severity::Debug,
                    line,
                    format!("code block language '{}' is dropped", info),
                ));
            }
            BlockKind::Rule => {
                out.push(Diagnostic::warning(
                    line,
                    "horizontal rules are not supported; omitted",
                ));
            }
            BlockKind::Quote if block.level() >= 2 => {
                out.push(Diagnostic::warning(
                    line,
                    "nested quotes are not supported; merged into the outer quote",
                ));
            }
            BlockKind::ListItem(ListKind::Ordered) if block.level() >= 2 => {
                out.push(Diagnostic::warning(
                    line,
                    "nested ordered lists are not supported; omitted",
                ));
            }
            BlockKind::ListItem(ListKind::Check { .. }) => {
                out.push(Diagnostic::warning(
                    line,
                    "check lists are not supported; rendered as a bullet list",
                ));
            }
            _ => {}
        }

        if *block.kind() == BlockKind::Comment {
            continue;
        }
        for inline in block.inlines() {
            let message = match inline.kind {
                InlineKind::Comment => "inline comments are not supported; omitted",
                InlineKind::BoldItalic => "bold italic is not supported; rendered as bold",
                InlineKind::Strike => "strikethrough is not supported; rendered as plain text",
                InlineKind::Emoji => "emoji are not supported; omitted",
                _ => continue,
            };
            out.push(Diagnostic::warning(line, message));
        }
    }

    out.sort_by_key(|d| d.line);
    out
}
