use proptest::prelude::*;
use nsflat::lexer::{lex, serialize};

/// Property: lexing never loses or invents a byte, for any input.
#[test]
fn prop_lexing_is_lossless() {
    proptest!(|(source in "\\PC{0,400}")| {
        prop_assert_eq!(serialize(&lex(&source)), source);
    });
}

/// Property: the same holds once the PHP open tag switches modes.
#[test]
fn prop_php_mode_is_lossless() {
    proptest!(|(body in "\\PC{0,400}")| {
        let source = format!("<?php\n{body}");
        prop_assert_eq!(serialize(&lex(&source)), source);
    });
}

/// Property: token spans tile the source without gaps.
#[test]
fn prop_spans_are_contiguous() {
    proptest!(|(body in "[a-zA-Z0-9_\\\\ ;{}()$:?|,\n'\"/*#-]{0,300}")| {
        let source = format!("<?php {body}");
        let tokens = lex(&source);
        let mut offset = 0;
        for token in &tokens {
            prop_assert_eq!(token.span.start, offset);
            prop_assert_eq!(&source[token.span.start..token.span.end], token.text);
            offset = token.span.end;
        }
        prop_assert_eq!(offset, source.len());
    });
}
