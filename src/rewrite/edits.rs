use std::collections::BTreeMap;

use crate::lexer::Token;
use crate::span::TokenSpan;

/// Replace the tokens in `span` with `replacement` (empty to delete).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub span: TokenSpan,
    pub replacement: String,
}

/// Non-overlapping edits against the original token coordinates of one file.
///
/// Edits never shift each other: the final text is produced in a single
/// left-to-right pass over the untouched token buffer.
#[derive(Debug, Default, Clone)]
pub struct EditSet {
    /// Keyed by span start.
    edits: BTreeMap<usize, Edit>,
}

impl EditSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a replacement. Returns false, leaving the set unchanged, if
    /// `span` overlaps an edit already present.
    pub fn replace(&mut self, span: TokenSpan, replacement: impl Into<String>) -> bool {
        if let Some(existing) = self.overlapping(span) {
            tracing::debug!("dropping edit {span:?}, it overlaps {:?}", existing.span);
            return false;
        }
        self.edits.insert(span.start, Edit { span, replacement: replacement.into() });
        true
    }

    pub fn delete(&mut self, span: TokenSpan) -> bool {
        self.replace(span, String::new())
    }

    fn overlapping(&self, span: TokenSpan) -> Option<&Edit> {
        self.edits.range(..=span.end).next_back().map(|(_, edit)| edit).filter(|edit| edit.span.overlaps(&span))
    }

    /// The edit starting exactly at token `index`.
    pub fn get(&self, index: usize) -> Option<&Edit> {
        self.edits.get(&index)
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Materialize the edited text.
    pub fn apply(&self, tokens: &[Token<'_>]) -> String {
        let mut out = String::with_capacity(tokens.iter().map(|t| t.text.len()).sum());
        let mut i = 0;
        while i < tokens.len() {
            match self.edits.get(&i) {
                Some(edit) => {
                    out.push_str(&edit.replacement);
                    i = edit.span.end + 1;
                }
                None => {
                    out.push_str(tokens[i].text);
                    i += 1;
                }
            }
        }
        out
    }
}
