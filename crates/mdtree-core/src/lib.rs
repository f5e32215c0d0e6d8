//! # mdtree core
//!
//! A line-oriented Markdown parser that never fails.
//!
//! Input is a sequence of lines. Each non-blank line is claimed by the first
//! block matcher that accepts it, in a fixed priority order, and every line
//! text is tokenized into styled inline runs. Lists and blockquotes nest by
//! depth; tables are accepted only when every row has the same cell count.
//! Malformed input degrades to simpler blocks instead of producing errors.
//!
//! ## Quick Start
//!
//! ```rust
//! use mdtree_core::{BlockKind, Parser};
//!
//! let input = "# Hello World\n\nThis is a **paragraph**.";
//! let mut parser = Parser::new();
//! let doc = parser.parse_str(input);
//!
//! let kinds: Vec<_> = doc.top_level().map(|b| b.kind().clone()).collect();
//! assert_eq!(kinds, [BlockKind::Heading, BlockKind::Paragraph]);
//! ```
//!
//! ## Recovery notes
//!
//! Structural decisions about malformed input can be collected:
//!
//! ```rust
//! use mdtree_core::{ParseErrorKind, Parser};
//!
//! let lines = ["```rust", "fn main() {}"];
//! let result = Parser::new().parse_with_recovery(&lines);
//!
//! // The fence runs to end of input and is still a code block.
//! assert_eq!(result.document.top_level().count(), 1);
//! assert_eq!(result.errors.of_kind(ParseErrorKind::UnclosedFence).count(), 1);
//! ```

pub mod ast;
mod container;
pub mod document;
pub mod error;
pub mod indent;
pub mod inline;
mod leaf;
pub mod lexer;
pub mod parser;
pub mod span;
mod table;

pub use ast::{Block, BlockKind, Inline, InlineKind, ListKind};
pub use document::{BlockId, BlockRef, ChildRef, Document};
pub use error::{ParseError, ParseErrorKind, ParseErrors};
pub use parser::{ParseResult, Parser};
