//! Source line ranges.
//!
//! Matchers report how many input lines they consumed as a `Span` of
//! 0-based line indices. Blocks themselves carry a 1-based `linenum` for
//! diagnostics; spans are the dispatcher's bookkeeping.

/// A half-open range of 0-based line indices: `[start, end)`.
///
/// # Example
///
/// ```rust
/// use mdtree_core::span::Span;
///
/// let span = Span::new(2, 5);
/// assert_eq!(span.len(), 3);
/// assert!(!span.is_empty());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// First consumed line index (inclusive).
    pub start: usize,
    /// One past the last consumed line index (exclusive).
    pub end: usize,
}

impl Span {
    /// Create a new span from line indices.
    #[inline]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// A span covering exactly one line.
    #[inline]
    pub const fn line(index: usize) -> Self {
        Self {
            start: index,
            end: index + 1,
        }
    }

    /// Number of lines covered.
    #[inline]
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Check if this span covers no lines.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}
