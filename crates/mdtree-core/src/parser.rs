//! Line dispatcher.
//!
//! A single forward pass over the input lines. Blank lines are skipped; for
//! every other line the matchers are tried in a fixed priority order and the
//! first one that accepts commits its consumed line range. A matcher that
//! declines, including one that rejects a construct after looking ahead,
//! leaves the cursor where it was so the next matcher sees the same line.
//! The paragraph matcher accepts any non-blank line, so the pass is total.

use log::trace;

use crate::ast::{Block, BlockKind};
use crate::container::{self, Container};
use crate::document::Document;
use crate::error::{ParseError, ParseErrors};
use crate::leaf;
use crate::lexer::{is_blank, split_lines};
use crate::span::Span;
use crate::table;

/// Result type for parsing that includes recovery notes.
#[derive(Debug)]
pub struct ParseResult<'a> {
    /// The parsed document. Always complete.
    pub document: Document<'a>,
    /// Structural decisions made about malformed input.
    pub errors: ParseErrors,
}

impl<'a> ParseResult<'a> {
    /// Check if the input needed no recovery.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Markdown-to-tree parser.
///
/// Stateless between calls apart from the notes of the last parse; parsing
/// the same lines twice yields equal documents.
#[derive(Debug)]
pub struct Parser {
    /// Notes collected during the last parse.
    errors: ParseErrors,
    /// Whether to collect notes at all.
    recover_on_error: bool,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    /// Create a new parser that collects recovery notes.
    #[inline]
    pub fn new() -> Self {
        Self {
            errors: ParseErrors::new(),
            recover_on_error: true,
        }
    }

    /// Enable or disable collection of recovery notes.
    ///
    /// The tree is the same either way.
    pub fn with_recovery(mut self, recover: bool) -> Self {
        self.recover_on_error = recover;
        self
    }

    /// Parse an already-split line sequence.
    #[inline]
    pub fn parse<'a>(&mut self, lines: &[&'a str]) -> Document<'a> {
        self.parse_internal(lines)
    }

    /// Split `input` into lines and parse them.
    #[inline]
    pub fn parse_str<'a>(&mut self, input: &'a str) -> Document<'a> {
        let lines = split_lines(input);
        self.parse_internal(&lines)
    }

    /// Parse, returning both the document and the recovery notes.
    pub fn parse_with_recovery<'a>(&mut self, lines: &[&'a str]) -> ParseResult<'a> {
        let document = self.parse_internal(lines);
        ParseResult {
            document,
            errors: std::mem::take(&mut self.errors),
        }
    }

    /// Notes from the last [`parse`](Self::parse) or
    /// [`parse_str`](Self::parse_str) call.
    pub fn errors(&self) -> &ParseErrors {
        &self.errors
    }

    fn parse_internal<'a>(&mut self, lines: &[&'a str]) -> Document<'a> {
        let mut cx = Context::new(lines, self.recover_on_error);
        let root = dispatch(&mut cx);
        self.errors = cx.into_errors();
        Document::from_tree(root)
    }
}

/// Run the top-level pass and return the root block.
fn dispatch<'a>(cx: &mut Context<'a, '_>) -> Block<'a> {
    let mut root = Block::new(BlockKind::Document, 0);
    let mut i = 0;

    while i < cx.len() {
        if cx.line(i).map_or(true, is_blank) {
            i += 1;
            continue;
        }

        let Some((matcher, m)) = cx.first_match(TOP_LEVEL, i) else {
            i += 1;
            continue;
        };

        trace!(
            "line {}: {:?} consumed {} line(s)",
            i + 1,
            matcher,
            m.span.len()
        );
        let continues = cx.follows_text(i);
        attach(&mut root, m.block, continues);
        i = m.span.end;
    }

    root
}

/// Append `block` to `parent`, merging a paragraph into a directly preceding
/// sibling paragraph when the previous raw line was not blank.
pub(crate) fn attach<'a>(parent: &mut Block<'a>, mut block: Block<'a>, continues: bool) {
    if continues && block.kind == BlockKind::Paragraph {
        if let Some(prev) = parent.last_block_mut() {
            if prev.kind == BlockKind::Paragraph {
                prev.children.append(&mut block.children);
                return;
            }
        }
    }
    parent.push_block(block);
}

/// A block produced by a matcher and the lines it consumed.
#[derive(Debug)]
pub(crate) struct Matched<'a> {
    pub block: Block<'a>,
    pub span: Span,
}

impl<'a> Matched<'a> {
    #[inline]
    pub fn new(block: Block<'a>, span: Span) -> Self {
        Self { block, span }
    }
}

/// The closed set of block recognisers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Matcher {
    Comment,
    AtxHeading,
    Rule,
    Image,
    Preformatted,
    FencedCode,
    Quote,
    Table,
    List,
    SetextHeading,
    Paragraph,
}

/// Priority order for top-level lines. Later entries see a line only after
/// every earlier entry declined it.
pub(crate) const TOP_LEVEL: &[Matcher] = &[
    Matcher::Comment,
    Matcher::AtxHeading,
    Matcher::Rule,
    Matcher::Image,
    Matcher::Preformatted,
    Matcher::FencedCode,
    Matcher::Quote,
    Matcher::Table,
    Matcher::List,
    Matcher::SetextHeading,
    Matcher::Paragraph,
];

/// What a list accepts between its item lines.
pub(crate) const LIST_CONTINUATION: &[Matcher] = &[
    Matcher::Comment,
    Matcher::Image,
    Matcher::FencedCode,
    Matcher::Quote,
    Matcher::Table,
    Matcher::Paragraph,
];

impl Matcher {
    /// Try this matcher at line `at`.
    pub(crate) fn try_at<'a>(self, cx: &mut Context<'a, '_>, at: usize) -> Option<Matched<'a>> {
        match self {
            Matcher::Comment => leaf::comment(cx, at),
            Matcher::AtxHeading => leaf::atx_heading(cx, at),
            Matcher::Rule => leaf::rule(cx, at),
            Matcher::Image => leaf::image(cx, at),
            Matcher::Preformatted => leaf::preformatted(cx, at),
            Matcher::FencedCode => leaf::fenced_code(cx, at),
            Matcher::Quote => container::build(cx, at, Container::Quote),
            Matcher::Table => table::table(cx, at),
            Matcher::List => container::build(cx, at, Container::List),
            Matcher::SetextHeading => leaf::setext_heading(cx, at),
            Matcher::Paragraph => leaf::paragraph(cx, at),
        }
    }
}

/// Shared state for one parse call: the input lines and the notes.
pub(crate) struct Context<'a, 'p> {
    lines: &'p [&'a str],
    errors: ParseErrors,
    recover: bool,
}

impl<'a, 'p> Context<'a, 'p> {
    pub(crate) fn new(lines: &'p [&'a str], recover: bool) -> Self {
        Self {
            lines,
            errors: ParseErrors::new(),
            recover,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.lines.len()
    }

    #[inline]
    pub(crate) fn line(&self, index: usize) -> Option<&'a str> {
        self.lines.get(index).copied()
    }

    /// Whether the raw line before `index` exists and is not blank.
    #[inline]
    pub(crate) fn follows_text(&self, index: usize) -> bool {
        index
            .checked_sub(1)
            .and_then(|prev| self.line(prev))
            .is_some_and(|l| !is_blank(l))
    }

    /// Record a recovery note.
    pub(crate) fn note(&mut self, error: ParseError) {
        if self.recover {
            self.errors.push(error);
        }
    }

    /// First matcher in `matchers` that accepts line `at`.
    pub(crate) fn first_match(
        &mut self,
        matchers: &[Matcher],
        at: usize,
    ) -> Option<(Matcher, Matched<'a>)> {
        matchers
            .iter()
            .find_map(|&matcher| matcher.try_at(self, at).map(|m| (matcher, m)))
    }

    pub(crate) fn into_errors(self) -> ParseErrors {
        self.errors
    }
}
