//! Declarative token-sequence patterns.
//!
//! A [`Pattern`] is an ordered list of elements, each a set of allowed token
//! kinds plus a repetition. Matching anchors on the first token accepted by the
//! first element, then consumes every element greedily. A fixed-count element
//! that cannot be satisfied abandons the attempt and the search resumes at the
//! token that failed.

use crate::lexer::{Token, TokenKind};
use crate::span::TokenSpan;

use TokenKind::*;

/// How many tokens an element consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repeat {
    Exactly(usize),
    ZeroOrMore,
}

#[derive(Debug, Clone, Copy)]
pub struct Element {
    kinds: &'static [TokenKind],
    repeat: Repeat,
}

impl Element {
    /// Exactly one token of any of `kinds`.
    pub const fn one(kinds: &'static [TokenKind]) -> Self {
        Self { kinds, repeat: Repeat::Exactly(1) }
    }

    pub const fn exactly(kinds: &'static [TokenKind], count: usize) -> Self {
        Self { kinds, repeat: Repeat::Exactly(count) }
    }

    /// Any number of tokens of `kinds`, including none.
    pub const fn any(kinds: &'static [TokenKind]) -> Self {
        Self { kinds, repeat: Repeat::ZeroOrMore }
    }

    fn accepts(&self, token: &Token<'_>) -> bool {
        self.kinds.contains(&token.kind)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Pattern {
    elements: &'static [Element],
}

/// `namespace Foo\Bar;` plus trailing whitespace.
pub const NAMESPACE_STATEMENT: Pattern = Pattern::new(&[
    Element::one(&[Namespace]),
    Element::any(&[Whitespace, NsSeparator, Identifier]),
    Element::one(&[Semicolon]),
    Element::any(&[Whitespace]),
]);

/// `namespace Foo\Bar {` (or `namespace {`) plus trailing whitespace.
pub const BRACED_NAMESPACE_HEADER: Pattern = Pattern::new(&[
    Element::one(&[Namespace]),
    Element::any(&[Whitespace, NsSeparator, Identifier]),
    Element::one(&[LBrace]),
    Element::any(&[Whitespace]),
]);

/// `use Foo\Bar [as Baz][, ...];` plus trailing whitespace.
pub const IMPORT_STATEMENT: Pattern = Pattern::new(&[
    Element::one(&[Use]),
    Element::any(&[Whitespace, NsSeparator, Identifier, As, Comma]),
    Element::one(&[Semicolon]),
    Element::any(&[Whitespace]),
]);

/// `class|interface|trait <ws>* Name`.
pub const TYPE_DECLARATION: Pattern = Pattern::new(&[
    Element::one(&[Class, Interface, Trait]),
    Element::any(&[Whitespace]),
    Element::one(&[Identifier]),
]);

impl Pattern {
    pub const fn new(elements: &'static [Element]) -> Self {
        Self { elements }
    }

    /// First match starting at or after `from`.
    pub fn find(&self, tokens: &[Token<'_>], from: usize) -> Option<TokenSpan> {
        let first = self.elements.first()?;
        let mut pos = from;

        while pos < tokens.len() {
            let anchor = (pos..tokens.len()).find(|&i| first.accepts(&tokens[i]))?;
            match self.match_at(tokens, anchor) {
                Ok(end) => return Some(TokenSpan::new(anchor, end)),
                Err(failed_at) => pos = failed_at.max(anchor + 1),
            }
        }
        None
    }

    /// Every non-overlapping match, in order, whose end lies before `before`
    /// (when given). Scanning stops at the first match past the bound.
    pub fn find_all(&self, tokens: &[Token<'_>], before: Option<usize>) -> Vec<TokenSpan> {
        let bound = before.unwrap_or(usize::MAX);
        let mut spans = Vec::new();
        let mut from = 0;
        while let Some(span) = self.find(tokens, from) {
            if span.end > bound {
                break;
            }
            spans.push(span);
            from = span.end + 1;
        }
        spans
    }

    /// Try every element from `anchor`. Returns the last consumed index, or the
    /// index of the token that broke a fixed-count element.
    fn match_at(&self, tokens: &[Token<'_>], anchor: usize) -> Result<usize, usize> {
        let mut i = anchor;
        for element in self.elements {
            match element.repeat {
                Repeat::ZeroOrMore => {
                    while i < tokens.len() && element.accepts(&tokens[i]) {
                        i += 1;
                    }
                }
                Repeat::Exactly(count) => {
                    for _ in 0..count {
                        if i < tokens.len() && element.accepts(&tokens[i]) {
                            i += 1;
                        } else {
                            return Err(i);
                        }
                    }
                }
            }
        }
        // The anchor always satisfies the first element, so at least one token
        // was consumed unless the pattern starts with an empty fixed count.
        if i == anchor { Err(anchor + 1) } else { Ok(i - 1) }
    }
}
