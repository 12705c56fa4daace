/// Byte-offset span in source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn dummy() -> Self {
        Self { start: 0, end: 0 }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Inclusive range of token indices `[start, end]` inside one file's token buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenSpan {
    pub start: usize,
    pub end: usize,
}

impl TokenSpan {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "token span {start}..={end} is inverted");
        Self { start, end }
    }

    /// A span covering exactly one token.
    pub fn single(index: usize) -> Self {
        Self { start: index, end: index }
    }

    /// Number of tokens covered.
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    pub fn contains(&self, index: usize) -> bool {
        self.start <= index && index <= self.end
    }

    pub fn overlaps(&self, other: &TokenSpan) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

/// A value annotated with the token range it was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: TokenSpan,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: TokenSpan) -> Self {
        Self { node, span }
    }
}
