//! Node types produced by the parser.
//!
//! Matchers build owned [`Block`] values whose children are an ordered mix of
//! nested blocks and inline runs. A block can wrap nested blocks and still
//! carry its own inline text (a list item with a nested quote, for example),
//! so [`Node`] is a two-way sum rather than separate child lists.
//!
//! The finished tree is moved into a [`Document`](crate::document::Document),
//! which adds parent links.

use std::borrow::Cow;

/// Borrowed or owned string type for zero-copy parsing.
pub type CowStr<'a> = Cow<'a, str>;

/// Marker embedded in plain text where a hard line break was written.
pub const HARD_BREAK: char = '\n';

/// List item flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKind {
    /// Bulleted item (`-`, `*` or `+`).
    Unordered,
    /// Numbered item (`1.`).
    Ordered,
    /// Task item (`- [ ]` or `- [x]`).
    Check { checked: bool },
}

/// Block kinds.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BlockKind {
    /// Root of the tree.
    Document,
    /// `<!-- ... -->` on its own line(s).
    Comment,
    /// ATX or setext heading; `level` holds the rank.
    Heading,
    /// Horizontal rule.
    Rule,
    /// A line holding exactly one image reference.
    Image,
    /// Block indented by one unit or more.
    Preformatted,
    /// Fenced code with its info string.
    Code { info: String },
    /// Wrapper around one run of `>` lines.
    QuoteTop,
    /// One quoted line; `level` is the number of `>` markers.
    Quote,
    /// Wrapper around a validated table.
    TableTop,
    /// The first table row.
    TableHeaderRow,
    /// Any table row after the separator.
    TableRow,
    /// One cell of a row.
    TableCell,
    /// Wrapper around one contiguous list.
    ListTop,
    /// One list item; `level` is its nesting depth.
    ListItem(ListKind),
    /// Paragraph of inline text.
    Paragraph,
}

impl BlockKind {
    /// Short upper-case name, matching the conventional tree dump labels.
    pub fn name(&self) -> &'static str {
        match self {
            BlockKind::Document => "DOCUMENT",
            BlockKind::Comment => "COMMENT",
            BlockKind::Heading => "HEADER",
            BlockKind::Rule => "HR",
            BlockKind::Image => "IMAGE",
            BlockKind::Preformatted => "PRE",
            BlockKind::Code { .. } => "CODE",
            BlockKind::QuoteTop => "QUOTE_TOP",
            BlockKind::Quote => "QUOTE_DATA",
            BlockKind::TableTop => "TABLE_TOP",
            BlockKind::TableHeaderRow => "TABLE_ROW_H",
            BlockKind::TableRow => "TABLE_ROW",
            BlockKind::TableCell => "TABLE_CELL",
            BlockKind::ListTop => "LIST_TOP",
            BlockKind::ListItem(ListKind::Unordered) => "LIST_NORMAL",
            BlockKind::ListItem(ListKind::Ordered) => "LIST_ORDERED",
            BlockKind::ListItem(ListKind::Check { .. }) => "LIST_CHECK",
            BlockKind::Paragraph => "PARA",
        }
    }
}

/// Inline kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InlineKind {
    Plain,
    Comment,
    Italic,
    Bold,
    BoldItalic,
    Code,
    Strike,
    Emoji,
    Link,
    Image,
}

impl InlineKind {
    pub fn name(self) -> &'static str {
        match self {
            InlineKind::Plain => "PLAIN",
            InlineKind::Comment => "COMMENT",
            InlineKind::Italic => "ITALIC",
            InlineKind::Bold => "BOLD",
            InlineKind::BoldItalic => "BOLD_ITALIC",
            InlineKind::Code => "CODE",
            InlineKind::Strike => "STRIKE",
            InlineKind::Emoji => "EMOJI",
            InlineKind::Link => "LINK",
            InlineKind::Image => "IMAGE",
        }
    }
}

/// A styled run of text.
///
/// Most kinds carry one fragment. Links and images carry label, target and
/// an optional title, in that order; an autolink carries only its target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inline<'a> {
    pub kind: InlineKind,
    pub texts: Vec<CowStr<'a>>,
}

impl<'a> Inline<'a> {
    /// Create an inline with a single fragment.
    #[inline]
    pub fn new(kind: InlineKind, text: impl Into<CowStr<'a>>) -> Self {
        Self {
            kind,
            texts: vec![text.into()],
        }
    }

    /// Create a plain text run.
    #[inline]
    pub fn plain(text: impl Into<CowStr<'a>>) -> Self {
        Self::new(InlineKind::Plain, text)
    }

    /// First fragment, or `""` when there is none.
    #[inline]
    pub fn text(&self) -> &str {
        self.texts.first().map(|t| t.as_ref()).unwrap_or("")
    }

    /// Link or image label. Autolinks have no label.
    pub fn label(&self) -> Option<&str> {
        match self.kind {
            InlineKind::Link | InlineKind::Image if self.texts.len() >= 2 => {
                Some(self.texts[0].as_ref())
            }
            _ => None,
        }
    }

    /// Link or image target.
    pub fn target(&self) -> Option<&str> {
        match (self.kind, self.texts.len()) {
            (InlineKind::Link | InlineKind::Image, 1) => Some(self.texts[0].as_ref()),
            (InlineKind::Link | InlineKind::Image, n) if n >= 2 => Some(self.texts[1].as_ref()),
            _ => None,
        }
    }

    /// Optional link or image title.
    pub fn title(&self) -> Option<&str> {
        match self.kind {
            InlineKind::Link | InlineKind::Image => self.texts.get(2).map(|t| t.as_ref()),
            _ => None,
        }
    }
}

/// One child of a block, in serialization order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node<'a> {
    Block(Block<'a>),
    Inline(Inline<'a>),
}

/// An owned block under construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block<'a> {
    pub kind: BlockKind,
    /// Heading rank, or nesting depth for quotes and list items; 0 otherwise.
    pub level: u32,
    /// 1-based source line where the block starts.
    pub linenum: usize,
    pub children: Vec<Node<'a>>,
}

impl<'a> Block<'a> {
    /// Create an empty block.
    #[inline]
    pub fn new(kind: BlockKind, linenum: usize) -> Self {
        Self {
            kind,
            level: 0,
            linenum,
            children: Vec::new(),
        }
    }

    /// Set the level.
    #[inline]
    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    /// Append inline runs as children.
    #[inline]
    pub fn with_inlines(mut self, inlines: Vec<Inline<'a>>) -> Self {
        self.push_inlines(inlines);
        self
    }

    #[inline]
    pub fn push_block(&mut self, block: Block<'a>) {
        self.children.push(Node::Block(block));
    }

    #[inline]
    pub fn push_inlines(&mut self, inlines: Vec<Inline<'a>>) {
        self.children.extend(inlines.into_iter().map(Node::Inline));
    }

    /// Last child if it is a block.
    #[inline]
    pub fn last_block_mut(&mut self) -> Option<&mut Block<'a>> {
        match self.children.last_mut() {
            Some(Node::Block(b)) => Some(b),
            _ => None,
        }
    }

    /// Whether the last child is an inline run.
    #[inline]
    pub fn ends_with_inline(&self) -> bool {
        matches!(self.children.last(), Some(Node::Inline(_)))
    }
}
