//! Byte ranges into literal text

/// A span in the text being parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Zero-width span at `pos`, used for end-of-input errors
    pub fn point(pos: usize) -> Self {
        Self { start: pos, end: pos }
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

impl From<Span> for std::ops::Range<usize> {
    fn from(span: Span) -> Self {
        span.start..span.end
    }
}

impl From<std::ops::Range<usize>> for Span {
    fn from(range: std::ops::Range<usize>) -> Self {
        Span::new(range.start, range.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_point() {
        assert_eq!(Span::point(3), Span::new(3, 3));
    }

    #[test]
    fn test_span_display() {
        assert_eq!(Span::new(1, 5).to_string(), "1..5");
    }

    #[test]
    fn test_span_range_conversion() {
        let range: std::ops::Range<usize> = Span::new(2, 7).into();
        assert_eq!(range, 2..7);
        assert_eq!(Span::from(2..7), Span::new(2, 7));
    }
}
