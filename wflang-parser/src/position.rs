//! Position and span tracking for WFLang source
//!
//! ## Types
//!
//! - [`Position`] - a zero-based line:column position
//! - [`Span`] - an end-inclusive pair of positions
//! - [`SourceLocation`] - converts byte offsets to positions
//!
//! ## Key Design
//!
//! - **Inclusive ends**: a token's `end` is the position of its last byte, so the
//!   keyword `var` at the start of a file spans `0:0..0:2`.
//! - **Byte columns**: columns count bytes within the line, matching the lexer.
//! - **No null spans**: the default span is `0:0..0:0`, never `None`.

use serde::Serialize;
use std::fmt;

/// A line:column position in source text. Both coordinates are zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    /// True when `start <= self <= end`.
    pub fn in_range(&self, start: Position, end: Position) -> bool {
        start <= *self && *self <= end
    }

    /// Shift left by `n` columns, saturating at column zero.
    pub fn left(&self, n: u32) -> Position {
        Position::new(self.line, self.column.saturating_sub(n))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// An end-inclusive source span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Check if a position falls within this span (both ends inclusive)
    pub fn contains(&self, pos: Position) -> bool {
        pos.in_range(self.start, self.end)
    }

    /// Check if `other` lies entirely within this span
    pub fn encloses(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Span from the start of `self` through the end of `other`.
    pub fn to(&self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Line index of a source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    /// Offset of the first byte of every line; always starts with 0.
    line_starts: Vec<usize>,
    len: usize,
}

impl SourceLocation {
    pub fn new(source: &str) -> Self {
        let newlines = source
            .bytes()
            .enumerate()
            .filter(|&(_, byte)| byte == b'\n')
            .map(|(offset, _)| offset + 1);
        Self {
            line_starts: std::iter::once(0).chain(newlines).collect(),
            len: source.len(),
        }
    }

    /// Line and column of `byte_offset`. Offsets past the end land on the last line.
    pub fn byte_to_position(&self, byte_offset: usize) -> Position {
        let line = self
            .line_starts
            .binary_search(&byte_offset)
            .unwrap_or_else(|i| i.saturating_sub(1));
        let column = byte_offset.saturating_sub(self.line_starts[line]);
        Position::new(line as u32, column as u32)
    }

    /// Convert a non-empty byte range into an inclusive span.
    pub fn byte_range_to_span(&self, range: &std::ops::Range<usize>) -> Span {
        let last = if range.end > range.start {
            range.end - 1
        } else {
            range.start
        };
        Span::new(
            self.byte_to_position(range.start),
            self.byte_to_position(last),
        )
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Position one past the final byte, used for EOF tokens.
    pub fn end_position(&self) -> Position {
        self.byte_to_position(self.len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positions_order_by_line_then_column() {
        assert!(Position::new(0, 40) < Position::new(1, 0));
        assert!(Position::new(3, 2) < Position::new(3, 7));
        assert_eq!(Position::default(), Position::new(0, 0));
        assert_eq!(Position::new(0, 2).left(5), Position::new(0, 0));
    }

    #[test]
    fn test_in_range_is_inclusive() {
        let start = Position::new(0, 2);
        let end = Position::new(1, 4);
        assert!(start.in_range(start, end));
        assert!(end.in_range(start, end));
        assert!(Position::new(0, 99).in_range(start, end));
        assert!(!Position::new(0, 1).in_range(start, end));
        assert!(!Position::new(1, 5).in_range(start, end));
    }

    #[test]
    fn test_span_contains_multiline() {
        let span = Span::new(Position::new(1, 5), Position::new(2, 10));

        assert!(!span.contains(Position::new(1, 4)));
        assert!(!span.contains(Position::new(0, 5)));
        assert!(span.contains(Position::new(1, 5)));
        assert!(span.contains(Position::new(2, 0)));
        assert!(span.contains(Position::new(2, 10)));
        assert!(!span.contains(Position::new(2, 11)));
    }

    #[test]
    fn test_span_encloses_and_to() {
        let outer = Span::new(Position::new(0, 0), Position::new(3, 0));
        let inner = Span::new(Position::new(1, 2), Position::new(2, 2));
        assert!(outer.encloses(&inner));
        assert!(outer.encloses(&outer));
        assert!(!inner.encloses(&outer));
        assert_eq!(inner.to(outer), outer);
    }

    #[test]
    fn test_display() {
        let span = Span::new(Position::new(1, 0), Position::new(2, 5));
        assert_eq!(format!("{}", span), "1:0..2:5");
    }

    #[test]
    fn test_offsets_across_formula_lines() {
        // "var x = 1;" is ten bytes, so line 1 starts at 11.
        let loc = SourceLocation::new("var x = 1;\nx * 42\n");

        assert_eq!(loc.byte_to_position(4), Position::new(0, 4));
        assert_eq!(loc.byte_to_position(10), Position::new(0, 10));
        assert_eq!(loc.byte_to_position(11), Position::new(1, 0));
        assert_eq!(loc.byte_to_position(15), Position::new(1, 4));
        assert_eq!(loc.end_position(), Position::new(2, 0));
    }

    #[test]
    fn test_byte_range_to_span_is_inclusive() {
        let loc = SourceLocation::new("var x");
        let span = loc.byte_range_to_span(&(0..3));
        assert_eq!(span.start, Position::new(0, 0));
        assert_eq!(span.end, Position::new(0, 2));
    }

    #[test]
    fn test_line_starts_follow_newlines() {
        let loc = SourceLocation::new("/* a\nb */\nmax(1, 2)");
        assert_eq!(loc.line_count(), 3);
        assert_eq!(loc.byte_to_position(5), Position::new(1, 0));
        assert_eq!(loc.byte_to_position(10), Position::new(2, 0));
        assert_eq!(loc.byte_to_position(18), Position::new(2, 8));
    }
}
