//! Leaf block matchers.
//!
//! Each matcher looks at the line at `at` (and possibly the lines after it)
//! and either declines or returns exactly one block plus the span of lines
//! it consumed. None of them nest other blocks.

use std::borrow::Cow;

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::ast::{Block, BlockKind, Inline, InlineKind};
use crate::error::ParseError;
use crate::indent;
use crate::inline::parse_inlines;
use crate::lexer::is_blank;
use crate::parser::{Context, Matched};
use crate::span::Span;

const COMMENT_OPEN: &str = "<!--";
const COMMENT_CLOSE: &str = "-->";

static ATX_HEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^ {0,3}(#+)(?:[ \t]+(.*?))?(?:[ \t]+#+)?[ \t]*$").expect("heading pattern is valid")
});

static RULE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^ {0,3}(?:(?:\*[ \t]*){3,}|(?:-[ \t]*){3,}|(?:_[ \t]*){3,})$")
        .expect("rule pattern is valid")
});

static BLOCK_IMAGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^[ \t]*!\[[^\]]*\]\([^)\s]*(?:\s+"[^"]*")?\)[ \t]*$"#)
        .expect("image pattern is valid")
});

static FENCE_OPEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[ \t]*(`{3,}|~{3,})(.*)$").expect("fence pattern is valid"));

static SETEXT_UNDERLINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^ {0,3}(={3,}|-{3,})[ \t]*$").expect("underline pattern is valid"));

/// `<!--` at the start of a line, running to the first `-->`.
pub(crate) fn comment<'a>(cx: &mut Context<'a, '_>, at: usize) -> Option<Matched<'a>> {
    let first = cx.line(at)?;
    let opened = first.trim_start().strip_prefix(COMMENT_OPEN)?;

    if let Some(close) = opened.find(COMMENT_CLOSE) {
        let text = format!("{}{}", &opened[..close], &opened[close + COMMENT_CLOSE.len()..]);
        return Some(Matched::new(comment_block(text, at), Span::line(at)));
    }

    let mut parts = vec![opened.to_string()];
    let mut end = at + 1;
    let mut closed = false;

    while let Some(line) = cx.line(end) {
        end += 1;
        if let Some(close) = line.find(COMMENT_CLOSE) {
            parts.push(format!(
                "{}{}",
                &line[..close],
                &line[close + COMMENT_CLOSE.len()..]
            ));
            closed = true;
            break;
        }
        parts.push(line.to_string());
    }

    if !closed {
        debug!("comment opened on line {} never closes", at + 1);
        cx.note(ParseError::unclosed_comment(at + 1));
    }

    Some(Matched::new(
        comment_block(parts.join("\n"), at),
        Span::new(at, end),
    ))
}

fn comment_block<'a>(text: String, at: usize) -> Block<'a> {
    Block::new(BlockKind::Comment, at + 1)
        .with_inlines(vec![Inline::new(InlineKind::Comment, text.trim().to_string())])
}

/// `#` marker run followed by whitespace or end of line.
///
/// The marker count is stored as the level without clamping.
pub(crate) fn atx_heading<'a>(cx: &mut Context<'a, '_>, at: usize) -> Option<Matched<'a>> {
    let line = cx.line(at)?;
    let caps = ATX_HEADING.captures(line)?;
    let level = caps.get(1).map_or(0, |m| m.len()) as u32;
    let content = caps.get(2).map_or("", |m| m.as_str());

    Some(Matched::new(
        Block::new(BlockKind::Heading, at + 1)
            .with_level(level)
            .with_inlines(parse_inlines(content, false)),
        Span::line(at),
    ))
}

/// Current line underlined by `===` (level 1) or `---` (level 2).
pub(crate) fn setext_heading<'a>(cx: &mut Context<'a, '_>, at: usize) -> Option<Matched<'a>> {
    let line = cx.line(at)?;
    let underline = cx.line(at + 1)?;
    if is_blank(line) {
        return None;
    }
    let caps = SETEXT_UNDERLINE.captures(underline)?;
    let level = if caps[1].starts_with('=') { 1 } else { 2 };

    Some(Matched::new(
        Block::new(BlockKind::Heading, at + 1)
            .with_level(level)
            .with_inlines(parse_inlines(line.trim(), false)),
        Span::new(at, at + 2),
    ))
}

/// Three or more `*`, `-` or `_` and nothing else.
pub(crate) fn rule<'a>(cx: &mut Context<'a, '_>, at: usize) -> Option<Matched<'a>> {
    let line = cx.line(at)?;
    RULE.is_match(line)
        .then(|| Matched::new(Block::new(BlockKind::Rule, at + 1), Span::line(at)))
}

/// A line that is one image reference and nothing more.
pub(crate) fn image<'a>(cx: &mut Context<'a, '_>, at: usize) -> Option<Matched<'a>> {
    let line = cx.line(at)?;
    if !BLOCK_IMAGE.is_match(line) {
        return None;
    }
    Some(Matched::new(
        Block::new(BlockKind::Image, at + 1).with_inlines(parse_inlines(line.trim(), false)),
        Span::line(at),
    ))
}

/// Contiguous lines indented by at least one unit, each de-indented by one.
pub(crate) fn preformatted<'a>(cx: &mut Context<'a, '_>, at: usize) -> Option<Matched<'a>> {
    let mut end = at;
    while let Some(line) = cx.line(end) {
        if !is_indented(line) {
            break;
        }
        end += 1;
    }
    if end == at {
        return None;
    }

    let text = join_lines((at..end).filter_map(|i| cx.line(i)).map(|l| indent::strip_units(l, 1)));

    Some(Matched::new(
        Block::new(BlockKind::Preformatted, at + 1).with_inlines(vec![Inline::plain(text)]),
        Span::new(at, end),
    ))
}

#[inline]
fn is_indented(line: &str) -> bool {
    line.starts_with('\t') || line.starts_with("    ")
}

/// Backtick or tilde fence, closed by a run of the same character at least
/// as long. Interior lines lose as many indent units as the opening fence has.
pub(crate) fn fenced_code<'a>(cx: &mut Context<'a, '_>, at: usize) -> Option<Matched<'a>> {
    let open = cx.line(at)?;
    let caps = FENCE_OPEN.captures(open)?;
    let fence = caps.get(1)?.as_str();
    let info = caps.get(2).map_or("", |m| m.as_str()).trim();
    let fence_char = fence.as_bytes()[0];

    if fence_char == b'`' && info.contains('`') {
        return None;
    }

    let (depth, _) = indent::analyze(open);
    let mut end = at + 1;
    let mut closed = false;

    while let Some(line) = cx.line(end) {
        end += 1;
        if is_closing_fence(line, fence_char, fence.len()) {
            closed = true;
            break;
        }
    }

    let body_end = if closed { end - 1 } else { end };
    if !closed {
        debug!("code fence opened on line {} never closes", at + 1);
        cx.note(ParseError::unclosed_fence(fence, at + 1));
    }

    let text = join_lines(
        (at + 1..body_end)
            .filter_map(|i| cx.line(i))
            .map(|l| indent::strip_units(l, depth)),
    );

    Some(Matched::new(
        Block::new(
            BlockKind::Code {
                info: info.to_string(),
            },
            at + 1,
        )
        .with_inlines(vec![Inline::plain(text)]),
        Span::new(at, end),
    ))
}

fn is_closing_fence(line: &str, fence_char: u8, min_len: usize) -> bool {
    let trimmed = line.trim();
    trimmed.len() >= min_len && trimmed.bytes().all(|b| b == fence_char)
}

/// Any non-blank line. Leading whitespace is dropped; trailing whitespace is
/// kept so a two-space hard break survives.
pub(crate) fn paragraph<'a>(cx: &mut Context<'a, '_>, at: usize) -> Option<Matched<'a>> {
    let line = cx.line(at)?;
    if is_blank(line) {
        return None;
    }
    Some(Matched::new(
        Block::new(BlockKind::Paragraph, at + 1)
            .with_inlines(parse_inlines(line.trim_start(), true)),
        Span::line(at),
    ))
}

/// Join lines with `\n`, borrowing when there is only one.
fn join_lines<'a>(mut lines: impl Iterator<Item = &'a str>) -> Cow<'a, str> {
    let Some(first) = lines.next() else {
        return Cow::Borrowed("");
    };
    match lines.next() {
        None => Cow::Borrowed(first),
        Some(second) => {
            let mut joined = String::with_capacity(first.len() + second.len() + 1);
            joined.push_str(first);
            joined.push('\n');
            joined.push_str(second);
            for line in lines {
                joined.push('\n');
                joined.push_str(line);
            }
            Cow::Owned(joined)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Node;
    use crate::error::ParseErrorKind;

    fn inline_texts(block: &Block<'_>) -> Vec<String> {
        block
            .children
            .iter()
            .filter_map(|c| match c {
                Node::Inline(i) => Some(i.text().to_string()),
                Node::Block(_) => None,
            })
            .collect()
    }

    #[test]
    fn single_line_comment() {
        let lines = ["<!-- hidden -->"];
        let mut cx = Context::new(&lines, true);
        let m = comment(&mut cx, 0).unwrap();
        assert_eq!(m.block.kind, BlockKind::Comment);
        assert_eq!(m.span, Span::new(0, 1));
        assert_eq!(inline_texts(&m.block), vec!["hidden"]);
    }

    #[test]
    fn multi_line_comment() {
        let lines = ["<!-- one", "two", "three -->", "after"];
        let mut cx = Context::new(&lines, true);
        let m = comment(&mut cx, 0).unwrap();
        assert_eq!(m.span, Span::new(0, 3));
        assert_eq!(inline_texts(&m.block), vec!["one\ntwo\nthree"]);
        match &m.block.children[0] {
            Node::Inline(i) => assert_eq!(i.kind, InlineKind::Comment),
            other => panic!("expected inline, got {:?}", other),
        }
    }

    #[test]
    fn unclosed_comment_runs_to_end() {
        let lines = ["<!-- open", "more", "still"];
        let mut cx = Context::new(&lines, true);
        let m = comment(&mut cx, 0).unwrap();
        assert_eq!(m.span, Span::new(0, 3));
        let errors = cx.into_errors();
        assert_eq!(errors.of_kind(ParseErrorKind::UnclosedComment).count(), 1);
    }

    #[test]
    fn atx_heading_levels_are_raw() {
        let lines = ["####### deep", "# Title #", "#tag", "#"];
        let mut cx = Context::new(&lines, true);
        let deep = atx_heading(&mut cx, 0).unwrap();
        assert_eq!(deep.block.level, 7);
        let closed = atx_heading(&mut cx, 1).unwrap();
        assert_eq!(inline_texts(&closed.block), vec!["Title"]);
        assert!(atx_heading(&mut cx, 2).is_none());
        let empty = atx_heading(&mut cx, 3).unwrap();
        assert!(empty.block.children.is_empty());
    }

    #[test]
    fn setext_consumes_two_lines() {
        let lines = ["Title", "==="];
        let mut cx = Context::new(&lines, true);
        let m = setext_heading(&mut cx, 0).unwrap();
        assert_eq!(m.block.level, 1);
        assert_eq!(m.block.linenum, 1);
        assert_eq!(m.span.end, 2);

        let lines = ["Sub", "-----"];
        let mut cx = Context::new(&lines, true);
        assert_eq!(setext_heading(&mut cx, 0).unwrap().block.level, 2);

        let lines = ["Short", "=="];
        let mut cx = Context::new(&lines, true);
        assert!(setext_heading(&mut cx, 0).is_none());
    }

    #[test]
    fn rules() {
        let lines = ["***", "- - -", "___", "--", "**x"];
        let mut cx = Context::new(&lines, true);
        assert!(rule(&mut cx, 0).is_some());
        assert!(rule(&mut cx, 1).is_some());
        assert!(rule(&mut cx, 2).is_some());
        assert!(rule(&mut cx, 3).is_none());
        assert!(rule(&mut cx, 4).is_none());
    }

    #[test]
    fn block_image_only_when_alone() {
        let lines = ["![fig](a.png \"Caption\")", "see ![fig](a.png)"];
        let mut cx = Context::new(&lines, true);
        let m = image(&mut cx, 0).unwrap();
        match &m.block.children[..] {
            [Node::Inline(i)] => {
                assert_eq!(i.kind, InlineKind::Image);
                assert_eq!(i.title(), Some("Caption"));
            }
            other => panic!("expected one image inline, got {:?}", other),
        }
        assert!(image(&mut cx, 1).is_none());
    }

    #[test]
    fn preformatted_strips_one_unit() {
        let lines = ["    a", "        b", "\tc", "d"];
        let mut cx = Context::new(&lines, true);
        let m = preformatted(&mut cx, 0).unwrap();
        assert_eq!(m.span, Span::new(0, 3));
        assert_eq!(inline_texts(&m.block), vec!["a\n    b\nc"]);
    }

    #[test]
    fn fenced_code_keeps_info_and_body() {
        let lines = ["```rust", "fn main() {}", "", "```", "after"];
        let mut cx = Context::new(&lines, true);
        let m = fenced_code(&mut cx, 0).unwrap();
        assert_eq!(m.span, Span::new(0, 4));
        assert_eq!(
            m.block.kind,
            BlockKind::Code {
                info: "rust".to_string()
            }
        );
        assert_eq!(inline_texts(&m.block), vec!["fn main() {}\n"]);
    }

    #[test]
    fn indented_fence_strips_its_own_depth() {
        let lines = ["    ~~~", "        x = 1", "    y", "    ~~~~"];
        let mut cx = Context::new(&lines, true);
        let m = fenced_code(&mut cx, 0).unwrap();
        assert_eq!(m.span, Span::new(0, 4));
        assert_eq!(inline_texts(&m.block), vec!["    x = 1\ny"]);
    }

    #[test]
    fn fence_needs_matching_character() {
        let lines = ["```", "~~~", "```"];
        let mut cx = Context::new(&lines, true);
        let m = fenced_code(&mut cx, 0).unwrap();
        assert_eq!(m.span, Span::new(0, 3));
        assert_eq!(inline_texts(&m.block), vec!["~~~"]);
    }

    #[test]
    fn unclosed_fence_runs_to_end() {
        let lines = ["```", "a", "b"];
        let mut cx = Context::new(&lines, true);
        let m = fenced_code(&mut cx, 0).unwrap();
        assert_eq!(m.span, Span::new(0, 3));
        assert_eq!(inline_texts(&m.block), vec!["a\nb"]);
        assert_eq!(cx.into_errors().len(), 1);
    }

    #[test]
    fn paragraph_trims_leading_whitespace() {
        let lines = ["   text  ", ""];
        let mut cx = Context::new(&lines, true);
        let m = paragraph(&mut cx, 0).unwrap();
        assert_eq!(inline_texts(&m.block), vec!["text\n"]);
        assert!(paragraph(&mut cx, 1).is_none());
    }
}
