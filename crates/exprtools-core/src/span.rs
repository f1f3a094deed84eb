//! Source location tracking for error reporting.
//!
//! Provides [`Span`] to track where tokens, syntax nodes and build errors
//! occur in the expression text.

use std::fmt;

/// A span of source text.
///
/// Expressions are usually a single line, but hosts may load multi-line
/// formulas from configuration, so we track line and column as well as the
/// byte offset used to slice the source for diagnostics.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Line number (1-indexed).
    pub line: u32,
    /// Column number (1-indexed, byte-based).
    pub col: u32,
    /// Byte offset of the first character.
    pub offset: u32,
    /// Length in bytes.
    pub len: u32,
}

impl Span {
    /// Create a new span.
    #[inline]
    pub fn new(line: u32, col: u32, offset: u32, len: u32) -> Self {
        Self {
            line,
            col,
            offset,
            len,
        }
    }

    /// Create a zero-length span at a position.
    #[inline]
    pub fn point(line: u32, col: u32, offset: u32) -> Self {
        Self {
            line,
            col,
            offset,
            len: 0,
        }
    }

    /// Whether this span is empty (zero length).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Byte offset one past the last character.
    #[inline]
    pub fn end(&self) -> u32 {
        self.offset + self.len
    }

    /// Smallest span covering both `self` and `other`.
    ///
    /// The line and column always come from whichever span starts first.
    pub fn merge(self, other: Span) -> Span {
        let (first, _) = if self.offset <= other.offset {
            (self, other)
        } else {
            (other, self)
        };
        let end = self.end().max(other.end());
        Span {
            line: first.line,
            col: first.col,
            offset: first.offset,
            len: end - first.offset,
        }
    }

    /// The slice of `source` this span covers, if it lies within bounds.
    pub fn slice<'a>(&self, source: &'a str) -> Option<&'a str> {
        source.get(self.offset as usize..self.end() as usize)
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}+{}", self.line, self.col, self.len)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_display() {
        let span = Span::new(3, 15, 40, 5);
        assert_eq!(format!("{}", span), "3:15");
        assert_eq!(format!("{:?}", span), "3:15+5");
    }

    #[test]
    fn span_merge_is_order_independent() {
        let a = Span::new(1, 1, 0, 1); // "x"
        let b = Span::new(1, 6, 5, 5); // "x + 1"
        assert_eq!(a.merge(b), b.merge(a));

        let merged = a.merge(b);
        assert_eq!(merged.offset, 0);
        assert_eq!(merged.len, 10);
        assert_eq!(merged.col, 1);
    }

    #[test]
    fn span_slice() {
        let source = "x => x + 1";
        let span = Span::new(1, 6, 5, 5);
        assert_eq!(span.slice(source), Some("x + 1"));

        let out_of_range = Span::new(1, 1, 8, 10);
        assert_eq!(out_of_range.slice(source), None);
    }

    #[test]
    fn point_is_empty() {
        assert!(Span::point(1, 4, 3).is_empty());
        assert!(!Span::new(1, 4, 3, 1).is_empty());
    }
}
