//! The finished document tree.
//!
//! Blocks live in a flat arena indexed by [`BlockId`]. Each block records
//! its parent id, so consumers can walk both down and up without shared
//! mutable aliasing. The root is always id 0 and has no parent.

use std::fmt;

use crate::ast::{Block, BlockKind, Inline, InlineKind, Node};

/// Handle to a block inside a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(u32);

impl BlockId {
    /// The document root.
    pub const ROOT: BlockId = BlockId(0);

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A child slot stored in the arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Child<'a> {
    Block(BlockId),
    Inline(Inline<'a>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct BlockNode<'a> {
    kind: BlockKind,
    level: u32,
    linenum: usize,
    parent: Option<BlockId>,
    children: Vec<Child<'a>>,
}

/// A parsed document.
///
/// Two documents compare equal when their trees are structurally identical.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document<'a> {
    nodes: Vec<BlockNode<'a>>,
}

impl<'a> Document<'a> {
    /// Move an owned tree into the arena, assigning parent links.
    ///
    /// Blocks are numbered in pre-order, so ids increase in source order.
    /// The walk keeps its own stack, so nesting depth is bounded only by
    /// memory.
    pub fn from_tree(root: Block<'a>) -> Self {
        let mut doc = Document { nodes: Vec::new() };
        let Block {
            kind,
            level,
            linenum,
            children,
        } = root;
        let root_id = doc.push_node(kind, level, linenum, None, children.len());

        // (block being filled, its remaining owned children)
        let mut pending = vec![(root_id, children.into_iter())];
        loop {
            let (parent, next) = match pending.last_mut() {
                Some((id, rest)) => (*id, rest.next()),
                None => break,
            };
            match next {
                Some(Node::Inline(inline)) => {
                    doc.nodes[parent.index()].children.push(Child::Inline(inline));
                }
                Some(Node::Block(block)) => {
                    let Block {
                        kind,
                        level,
                        linenum,
                        children,
                    } = block;
                    let id = doc.push_node(kind, level, linenum, Some(parent), children.len());
                    doc.nodes[parent.index()].children.push(Child::Block(id));
                    pending.push((id, children.into_iter()));
                }
                None => {
                    pending.pop();
                }
            }
        }
        doc
    }

    fn push_node(
        &mut self,
        kind: BlockKind,
        level: u32,
        linenum: usize,
        parent: Option<BlockId>,
        capacity: usize,
    ) -> BlockId {
        let id = BlockId(self.nodes.len() as u32);
        self.nodes.push(BlockNode {
            kind,
            level,
            linenum,
            parent,
            children: Vec::with_capacity(capacity),
        });
        id
    }

    /// The root block.
    #[inline]
    pub fn root(&self) -> BlockRef<'_, 'a> {
        BlockRef {
            doc: self,
            id: BlockId::ROOT,
        }
    }

    /// Look up a block by id.
    #[inline]
    pub fn get(&self, id: BlockId) -> Option<BlockRef<'_, 'a>> {
        (id.index() < self.nodes.len()).then_some(BlockRef { doc: self, id })
    }

    /// Number of blocks, root included.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// A document always has its root, so this only reports whether
    /// anything hangs below it.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// All blocks in pre-order, root first.
    pub fn blocks(&self) -> impl Iterator<Item = BlockRef<'_, 'a>> + '_ {
        (0..self.nodes.len()).map(move |i| BlockRef {
            doc: self,
            id: BlockId(i as u32),
        })
    }

    /// Top-level blocks.
    pub fn top_level(&self) -> impl Iterator<Item = BlockRef<'_, 'a>> + '_ {
        self.root().child_blocks()
    }
}

/// Borrowed view of one block.
#[derive(Clone, Copy)]
pub struct BlockRef<'d, 'a> {
    doc: &'d Document<'a>,
    id: BlockId,
}

impl<'d, 'a> BlockRef<'d, 'a> {
    #[inline]
    fn node(&self) -> &'d BlockNode<'a> {
        &self.doc.nodes[self.id.index()]
    }

    #[inline]
    pub fn id(&self) -> BlockId {
        self.id
    }

    #[inline]
    pub fn kind(&self) -> &'d BlockKind {
        &self.node().kind
    }

    #[inline]
    pub fn level(&self) -> u32 {
        self.node().level
    }

    /// 1-based source line where the block starts.
    #[inline]
    pub fn linenum(&self) -> usize {
        self.node().linenum
    }

    #[inline]
    pub fn parent(&self) -> Option<BlockRef<'d, 'a>> {
        self.node().parent.map(|id| BlockRef { doc: self.doc, id })
    }

    /// Parent, grandparent and so on up to the root.
    pub fn ancestors(&self) -> impl Iterator<Item = BlockRef<'d, 'a>> {
        let mut current = self.parent();
        std::iter::from_fn(move || {
            let next = current?;
            current = next.parent();
            Some(next)
        })
    }

    /// Number of parent hops to the root.
    pub fn depth(&self) -> usize {
        self.ancestors().count()
    }

    /// Children in order.
    pub fn children(&self) -> impl Iterator<Item = ChildRef<'d, 'a>> {
        let doc = self.doc;
        self.node().children.iter().map(move |child| match child {
            Child::Block(id) => ChildRef::Block(BlockRef { doc, id: *id }),
            Child::Inline(inline) => ChildRef::Inline(inline),
        })
    }

    /// Nested blocks only.
    pub fn child_blocks(&self) -> impl Iterator<Item = BlockRef<'d, 'a>> {
        self.children().filter_map(|c| match c {
            ChildRef::Block(b) => Some(b),
            ChildRef::Inline(_) => None,
        })
    }

    /// The block's own inline runs.
    pub fn inlines(&self) -> impl Iterator<Item = &'d Inline<'a>> {
        self.children().filter_map(|c| match c {
            ChildRef::Inline(i) => Some(i),
            ChildRef::Block(_) => None,
        })
    }

    /// Concatenated first fragments of the block's own inline runs,
    /// skipping comments.
    pub fn plain_text(&self) -> String {
        self.inlines()
            .filter(|i| i.kind != InlineKind::Comment)
            .map(|i| i.text())
            .collect()
    }
}

impl fmt::Debug for BlockRef<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockRef")
            .field("id", &self.id)
            .field("kind", self.kind())
            .field("level", &self.level())
            .field("linenum", &self.linenum())
            .finish()
    }
}

/// Borrowed view of one child.
#[derive(Debug, Clone, Copy)]
pub enum ChildRef<'d, 'a> {
    Block(BlockRef<'d, 'a>),
    Inline(&'d Inline<'a>),
}
