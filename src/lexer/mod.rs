pub mod token;
pub use token::{Token, TokenKind, is_reserved_word};

use logos::Logos;

use crate::span::Span;

/// Lex a PHP source file into a lossless token stream.
///
/// Text outside `<?php`/`<?=` ... `?>` becomes `InlineHtml`. Bytes no rule
/// matches become `Unknown` tokens rather than errors, so concatenating the
/// token texts always reproduces `source`.
pub fn lex(source: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut line = 1u32;
    let mut pos = 0;

    while pos < source.len() {
        let Some((tag_start, tag_len)) = find_open_tag(&source[pos..]) else {
            push(&mut tokens, source, pos, source.len(), TokenKind::InlineHtml, &mut line);
            break;
        };
        let tag_start = pos + tag_start;
        push(&mut tokens, source, pos, tag_start, TokenKind::InlineHtml, &mut line);
        push(&mut tokens, source, tag_start, tag_start + tag_len, TokenKind::OpenTag, &mut line);
        pos = lex_code(source, tag_start + tag_len, &mut tokens, &mut line);
    }

    tokens
}

/// Concatenate token texts back into source.
pub fn serialize(tokens: &[Token<'_>]) -> String {
    let mut out = String::with_capacity(tokens.iter().map(|t| t.text.len()).sum());
    for token in tokens {
        out.push_str(token.text);
    }
    out
}

/// Lex PHP code starting at `start` until a close tag or end of input.
/// Returns the byte offset where inline HTML resumes.
fn lex_code<'src>(source: &'src str, start: usize, tokens: &mut Vec<Token<'src>>, line: &mut u32) -> usize {
    let mut lexer = TokenKind::lexer(&source[start..]);
    let mut cursor = start;

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let (from, to) = (start + span.start, start + span.end);
        if from > cursor {
            push(tokens, source, cursor, from, TokenKind::Unknown, line);
        }
        let kind = result.unwrap_or(TokenKind::Unknown);
        push(tokens, source, from, to, kind, line);
        cursor = to;
        if kind == TokenKind::CloseTag {
            return cursor;
        }
    }

    if cursor < source.len() {
        push(tokens, source, cursor, source.len(), TokenKind::Unknown, line);
    }
    source.len()
}

fn push<'src>(tokens: &mut Vec<Token<'src>>, source: &'src str, start: usize, end: usize, kind: TokenKind, line: &mut u32) {
    if start >= end {
        return;
    }
    let text = &source[start..end];
    tokens.push(Token::new(kind, text, *line, Span::new(start, end)));
    *line += text.bytes().filter(|&b| b == b'\n').count() as u32;
}

/// Finds the next `<?php` (plus one trailing whitespace character) or `<?=`.
fn find_open_tag(text: &str) -> Option<(usize, usize)> {
    let bytes = text.as_bytes();
    let mut from = 0;
    while let Some(rel) = text[from..].find("<?") {
        let at = from + rel;
        let after = &bytes[at + 2..];
        if after.first() == Some(&b'=') {
            return Some((at, 3));
        }
        if after.len() >= 3 && after[..3].eq_ignore_ascii_case(b"php") {
            let tail = &after[3..];
            match tail.first() {
                None => return Some((at, 5)),
                Some(b'\r') if tail.get(1) == Some(&b'\n') => return Some((at, 7)),
                Some(b' ' | b'\t' | b'\n' | b'\r') => return Some((at, 6)),
                _ => {}
            }
        }
        from = at + 2;
    }
    None
}
