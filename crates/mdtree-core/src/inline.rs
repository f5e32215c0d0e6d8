//! Inline tokenizer.
//!
//! One line of text becomes an ordered run of [`Inline`] spans with no gaps
//! or overlaps. A combined pattern finds candidate spans left to right; each
//! candidate is then re-tested against the anchored per-kind patterns in
//! priority order to pick its kind and pull out its fragments. Text between
//! candidates, and any candidate no kind accepts, is plain text.
//!
//! Inline spans do not nest. Fragments borrow from the input line.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::ast::{Inline, InlineKind, HARD_BREAK};

const COMMENT: &str = r"<!--(.*?)-->";
const BOLD_ITALIC: &str = r"\*\*\*([^*]+)\*\*\*|\b___([^_]+)___\b";
const BOLD: &str = r"\*\*([^*]+)\*\*|\b__([^_]+)__\b";
const ITALIC: &str = r"\*([^*]+)\*|\b_([^_]+)_\b";
const CODE: &str = r"``(.+?)``|`([^`]+)`";
const STRIKE: &str = r"~~([^~]+)~~";
// Shortcodes stand apart from words: `a:b:c` stays plain.
const EMOJI: &str = r"\B:([a-z][a-z0-9_+\-]*):\B";
const LINK: &str = r#"\[([^\]]*)\]\(([^)\s]*)(?:\s+"([^"]*)")?\)|<([a-zA-Z][a-zA-Z0-9+.\-]*://[^>\s]+)>"#;
const IMAGE: &str = r#"!\[([^\]]*)\]\(([^)\s]*)(?:\s+"([^"]*)")?\)"#;

/// Order in which candidates are classified.
const PRIORITY: &[(InlineKind, &str)] = &[
    (InlineKind::Comment, COMMENT),
    (InlineKind::Italic, ITALIC),
    (InlineKind::Bold, BOLD),
    (InlineKind::BoldItalic, BOLD_ITALIC),
    (InlineKind::Code, CODE),
    (InlineKind::Strike, STRIKE),
    (InlineKind::Emoji, EMOJI),
    (InlineKind::Link, LINK),
    (InlineKind::Image, IMAGE),
];

/// Alternation order for the scanner. At a shared start position the first
/// alternative wins, so longer delimiter runs come first.
const SCAN_ORDER: &[&str] = &[
    COMMENT,
    IMAGE,
    LINK,
    CODE,
    BOLD_ITALIC,
    BOLD,
    ITALIC,
    STRIKE,
    EMOJI,
];

struct InlineRule {
    kind: InlineKind,
    pattern: Regex,
}

static SCANNER: Lazy<Regex> = Lazy::new(|| {
    let alternatives: Vec<String> = SCAN_ORDER.iter().map(|p| format!("(?:{})", p)).collect();
    Regex::new(&alternatives.join("|")).expect("inline scanner pattern is valid")
});

static RULES: Lazy<Vec<InlineRule>> = Lazy::new(|| {
    PRIORITY
        .iter()
        .map(|&(kind, p)| InlineRule {
            kind,
            pattern: Regex::new(&format!("^(?:{})$", p)).expect("inline rule pattern is valid"),
        })
        .collect()
});

/// Tokenize one line of text.
///
/// With `hard_break` set, a final plain run ending in exactly two spaces has
/// them replaced by one [`HARD_BREAK`] marker. Headings, table cells and
/// images pass `false`.
///
/// ```rust
/// use mdtree_core::ast::InlineKind;
/// use mdtree_core::inline::parse_inlines;
///
/// let spans = parse_inlines("**bold** and *em*", false);
/// let kinds: Vec<_> = spans.iter().map(|i| i.kind).collect();
/// assert_eq!(kinds, [InlineKind::Bold, InlineKind::Plain, InlineKind::Italic]);
/// ```
pub fn parse_inlines(text: &str, hard_break: bool) -> Vec<Inline<'_>> {
    if text.is_empty() {
        return Vec::new();
    }

    let mut inlines = Vec::with_capacity(4);
    let mut text_start = 0;

    for m in SCANNER.find_iter(text) {
        if text_start < m.start() {
            inlines.push(Inline::plain(&text[text_start..m.start()]));
        }
        inlines.push(classify(m.as_str()));
        text_start = m.end();
    }

    if text_start < text.len() {
        inlines.push(Inline::plain(&text[text_start..]));
    }

    if hard_break {
        apply_hard_break(&mut inlines);
    }

    inlines
}

/// Pick the kind of a candidate span and extract its fragments.
fn classify(span: &str) -> Inline<'_> {
    for rule in RULES.iter() {
        if let Some(caps) = rule.pattern.captures(span) {
            let mut texts: Vec<Cow<'_, str>> = caps
                .iter()
                .skip(1)
                .flatten()
                .map(|m| Cow::Borrowed(m.as_str()))
                .collect();
            if rule.kind == InlineKind::Comment {
                texts = texts
                    .into_iter()
                    .map(|t| match t {
                        Cow::Borrowed(s) => Cow::Borrowed(s.trim()),
                        owned => owned,
                    })
                    .collect();
            }
            return Inline {
                kind: rule.kind,
                texts,
            };
        }
    }
    Inline::plain(span)
}

/// Replace exactly two trailing spaces on a final plain run with a break.
fn apply_hard_break(inlines: &mut [Inline<'_>]) {
    let Some(last) = inlines.last_mut() else {
        return;
    };
    if last.kind != InlineKind::Plain {
        return;
    }
    let Some(text) = last.texts.first_mut() else {
        return;
    };
    let current: &str = text.as_ref();
    if has_hard_break(current) {
        let mut owned = current[..current.len() - 2].to_string();
        owned.push(HARD_BREAK);
        *text = Cow::Owned(owned);
    }
}

/// Exactly two trailing spaces; three or more do not count.
#[inline]
fn has_hard_break(text: &str) -> bool {
    text.ends_with("  ") && !text.ends_with("   ")
}
