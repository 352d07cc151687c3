//! Source location types
//!
//! Fragments, elements and synthetic nodes all carry a `Span`; the PDG only
//! ever reports line ranges, columns are kept for stable ordering.

use serde::{Deserialize, Serialize};

/// Span in source code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Span {
    pub start_line: u32,
    pub start_col: u32,
    pub end_line: u32,
    pub end_col: u32,
}

impl Span {
    pub fn new(start_line: u32, start_col: u32, end_line: u32, end_col: u32) -> Self {
        Self {
            start_line,
            start_col,
            end_line,
            end_col,
        }
    }

    /// Span covering whole lines (columns zeroed)
    pub fn lines(start_line: u32, end_line: u32) -> Self {
        Self::new(start_line, 0, end_line, 0)
    }

    /// Create a zero span (0:0-0:0)
    pub fn zero() -> Self {
        Self::new(0, 0, 0, 0)
    }

    pub fn contains_line(&self, line: u32) -> bool {
        self.start_line <= line && line <= self.end_line
    }

    pub fn contains(&self, other: &Span) -> bool {
        self.start_line <= other.start_line && other.end_line <= self.end_line
    }

    pub fn line_count(&self) -> u32 {
        if self.end_line >= self.start_line {
            self.end_line - self.start_line + 1
        } else {
            0
        }
    }

    /// `start-end` line range as rendered in the `span` attribute
    pub fn line_range(&self) -> String {
        format!("{}-{}", self.start_line, self.end_line)
    }
}

impl Default for Span {
    fn default() -> Self {
        Self::zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_contains_line() {
        let span = Span::new(10, 0, 20, 0);
        assert!(span.contains_line(10));
        assert!(span.contains_line(15));
        assert!(span.contains_line(20));
        assert!(!span.contains_line(9));
        assert!(!span.contains_line(21));
    }

    #[test]
    fn test_span_line_count() {
        let span = Span::new(10, 0, 20, 0);
        assert_eq!(span.line_count(), 11);
    }

    #[test]
    fn test_line_range() {
        assert_eq!(Span::lines(3, 7).line_range(), "3-7");
        assert_eq!(Span::new(4, 8, 4, 20).line_range(), "4-4");
    }

    #[test]
    fn test_ordering_by_start_position() {
        let a = Span::new(2, 4, 2, 9);
        let b = Span::new(2, 10, 2, 12);
        let c = Span::new(3, 0, 3, 1);
        assert!(a < b && b < c);
    }
}
