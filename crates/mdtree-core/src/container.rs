//! Blockquote and list builders.
//!
//! Both containers share one shape: a wrapper block, then one item per
//! matching line, nested by the depth the line reports. Open items sit on a
//! stack; a deeper line pushes, a shallower line pops the finished items into
//! their parents. A line may go at most one level deeper than the item before
//! it. Deeper jumps drop the line.
//!
//! A blockquote ends at the first line that is not a quote line. A list also
//! accepts a small set of other blocks between its items; a continuation
//! paragraph directly after an item's own text is folded into that item.

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::ast::{Block, BlockKind, ListKind};
use crate::error::ParseError;
use crate::indent;
use crate::inline::parse_inlines;
use crate::parser::{attach, Context, Matched, LIST_CONTINUATION};
use crate::span::Span;

static QUOTE_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[ \t]*((?:>[ \t]?)+)(.*)$").expect("quote pattern is valid"));

static CHECK_ITEM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[ \t]*[-*+][ \t]+\[([ xX])\](?:[ \t]+(.*))?$").expect("check item pattern is valid")
});

static ORDERED_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[ \t]*\d+\.[ \t]+(.*)$").expect("ordered item pattern is valid"));

static UNORDERED_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[ \t]*[-*+][ \t]+(.*)$").expect("unordered item pattern is valid"));

/// Which container to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Container {
    Quote,
    List,
}

/// One recognised item line.
#[derive(Debug, PartialEq, Eq)]
struct Item<'a> {
    kind: BlockKind,
    depth: u32,
    content: &'a str,
}

impl Container {
    fn wrapper(self) -> BlockKind {
        match self {
            Container::Quote => BlockKind::QuoteTop,
            Container::List => BlockKind::ListTop,
        }
    }

    /// Recognise an item line. Check items win over ordered items, which win
    /// over plain bullets.
    fn item(self, line: &str) -> Option<Item<'_>> {
        match self {
            Container::Quote => {
                let caps = QUOTE_ITEM.captures(line)?;
                let markers = caps.get(1)?.as_str();
                let depth = markers.bytes().filter(|&b| b == b'>').count() as u32;
                let content = caps.get(2).map_or("", |m| m.as_str()).trim_start();
                Some(Item {
                    kind: BlockKind::Quote,
                    depth,
                    content,
                })
            }
            Container::List => {
                let depth = indent::analyze(line).0 as u32 + 1;
                let (kind, content) = if let Some(caps) = CHECK_ITEM.captures(line) {
                    let checked = caps.get(1).is_some_and(|m| m.as_str() != " ");
                    (ListKind::Check { checked }, caps.get(2))
                } else if let Some(caps) = ORDERED_ITEM.captures(line) {
                    (ListKind::Ordered, caps.get(1))
                } else {
                    (ListKind::Unordered, UNORDERED_ITEM.captures(line)?.get(1))
                };
                Some(Item {
                    kind: BlockKind::ListItem(kind),
                    depth,
                    content: content.map_or("", |m| m.as_str()),
                })
            }
        }
    }
}

/// Build a blockquote or list starting at line `at`.
///
/// Declines only when the first line is not an item. A first line that is
/// already too deep is dropped like any other jump, which can leave the
/// wrapper empty.
pub(crate) fn build<'a>(
    cx: &mut Context<'a, '_>,
    at: usize,
    container: Container,
) -> Option<Matched<'a>> {
    container.item(cx.line(at)?)?;

    let mut frames = Frames::new(Block::new(container.wrapper(), at + 1));
    let mut i = at;

    while let Some(line) = cx.line(i) {
        if let Some(item) = container.item(line) {
            frames.place(cx, item, i);
            i += 1;
            continue;
        }

        if container == Container::Quote {
            break;
        }

        let continues = cx.follows_text(i);
        let Some((_, m)) = cx.first_match(LIST_CONTINUATION, i) else {
            break;
        };
        frames.splice(m.block, continues);
        i = m.span.end;
    }

    Some(Matched::new(frames.finish(), Span::new(at, i)))
}

/// Open items of one container, outermost first.
struct Frames<'a> {
    top: Block<'a>,
    open: Vec<Block<'a>>,
}

impl<'a> Frames<'a> {
    fn new(top: Block<'a>) -> Self {
        Self {
            top,
            open: Vec::new(),
        }
    }

    /// Depth of the innermost open item; 0 when none is open.
    #[inline]
    fn level(&self) -> usize {
        self.open.len()
    }

    fn current(&mut self) -> &mut Block<'a> {
        match self.open.last_mut() {
            Some(block) => block,
            None => &mut self.top,
        }
    }

    /// Pop items until `depth` remain, attaching each to its parent.
    fn close_to(&mut self, depth: usize) {
        while self.open.len() > depth {
            if let Some(done) = self.open.pop() {
                self.current().push_block(done);
            }
        }
    }

    fn place(&mut self, cx: &mut Context<'a, '_>, item: Item<'a>, index: usize) {
        let depth = item.depth as usize;
        if depth > self.level() + 1 {
            debug!(
                "line {}: nesting jumps from {} to {}, dropping line",
                index + 1,
                self.level(),
                depth
            );
            cx.note(ParseError::nesting_jump(
                self.level() as u32,
                item.depth,
                index + 1,
            ));
            return;
        }

        self.close_to(depth - 1);
        self.open.push(
            Block::new(item.kind, index + 1)
                .with_level(item.depth)
                .with_inlines(parse_inlines(item.content, true)),
        );
    }

    /// Add a block found between list items to the innermost item.
    ///
    /// A paragraph right after the item's own text (or into an empty item)
    /// contributes its inlines to the item directly.
    fn splice(&mut self, mut block: Block<'a>, continues: bool) {
        let current = self.current();
        if block.kind == BlockKind::Paragraph
            && (current.children.is_empty() || current.ends_with_inline())
        {
            current.children.append(&mut block.children);
        } else {
            attach(current, block, continues);
        }
    }

    fn finish(mut self) -> Block<'a> {
        self.close_to(0);
        self.top
    }
}
