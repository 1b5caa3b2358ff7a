//! Byte-offset source spans shared by every token and AST node.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// `true` iff `next_start` sits exactly where this span ends, with
    /// no whitespace or comment byte between them. The parser leans on
    /// this at a handful of call sites that only trigger for a token
    /// glued directly onto the one before it — a called-but-unresolved
    /// identifier is an external reference only if the `(` immediately
    /// follows it, and a function-like macro only expands when its `(`
    /// immediately follows the macro name.
    pub fn touches(self, next_start: usize) -> bool {
        self.end == next_start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_stores_positions() {
        let span = Span::new(5, 10);
        assert_eq!(span.start, 5);
        assert_eq!(span.end, 10);
    }

    #[test]
    fn merge_takes_outer_bounds() {
        let a = Span::new(5, 10);
        let b = Span::new(2, 7);
        let merged = a.merge(b);
        assert_eq!(merged, Span::new(2, 10));
    }

    #[test]
    fn len_and_is_empty() {
        assert_eq!(Span::new(3, 8).len(), 5);
        assert!(Span::new(4, 4).is_empty());
        assert!(!Span::new(4, 5).is_empty());
    }

    #[test]
    fn default_is_zero() {
        let span = Span::default();
        assert_eq!(span, Span::new(0, 0));
    }

    #[test]
    fn touches_is_true_only_with_no_gap() {
        let span = Span::new(0, 3);
        assert!(span.touches(3));
        assert!(!span.touches(4));
        assert!(!span.touches(2));
    }
}
