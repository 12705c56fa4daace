//! Finds every token range that names a type and needs resolving.
//!
//! Each syntactic context is one extraction rule: a pure function from the
//! token buffer and an anchor index to the references it finds there. `scan`
//! dispatches on the anchor token's kind and returns the references in source
//! order.

use crate::lexer::{Token, TokenKind};
use crate::span::{Spanned, TokenSpan};

use TokenKind::*;

/// A raw type name as written, plus the tokens it occupies.
pub type FoundReference = Spanned<String>;

/// Names that never resolve to a user type: the class-context pseudo names and
/// the builtin types. Compared case-insensitively.
const EXCLUDED_NAMES: &[&str] = &[
    "self", "static", "parent", "array", "bool", "callable", "false", "float", "int", "iterable", "mixed",
    "never", "null", "object", "string", "true", "void",
];

pub fn is_excluded_name(name: &str) -> bool {
    EXCLUDED_NAMES.iter().any(|n| n.eq_ignore_ascii_case(name))
}

/// Scan `tokens` once for type references. `bodies` are the token ranges of
/// the file's type bodies; a `use` inside one composes traits.
pub fn scan(tokens: &[Token<'_>], bodies: &[TokenSpan]) -> Vec<FoundReference> {
    let mut found = Vec::new();
    let in_body = |i: usize| bodies.iter().any(|body| body.contains(i));

    for (i, token) in tokens.iter().enumerate() {
        let refs = match token.kind {
            DoubleColon => scope_qualifier(tokens, i).into_iter().collect(),
            _ if is_member_name(tokens, i) => continue,
            New => instantiation(tokens, i).into_iter().collect(),
            Extends | Implements => inheritance_list(tokens, i),
            Catch => catch_clause(tokens, i),
            Instanceof => type_check(tokens, i).into_iter().collect(),
            Function => signature(tokens, i),
            Use if in_body(i) => trait_use(tokens, i),
            Public | Protected | Private | Static if in_body(i) => property_type(tokens, i),
            Identifier if in_body(i) && ["var", "readonly"].iter().any(|m| token.text.eq_ignore_ascii_case(m)) => {
                property_type(tokens, i)
            }
            _ => continue,
        };
        found.extend(refs);
    }

    found.sort_by_key(|r| (r.span.start, r.span.end));
    found.dedup_by(|a, b| a.span == b.span);
    tracing::trace!("scanner found {} references", found.len());
    found
}

/// `new Foo`
pub fn instantiation(tokens: &[Token<'_>], anchor: usize) -> Option<FoundReference> {
    accept(read_name_forward(tokens, skip_trivia(tokens, anchor + 1)))
}

/// `extends A` / `implements A, B\C`
pub fn inheritance_list(tokens: &[Token<'_>], anchor: usize) -> Vec<FoundReference> {
    name_list(tokens, anchor + 1, Comma).0
}

/// `Foo::bar`, read backwards from the operator.
pub fn scope_qualifier(tokens: &[Token<'_>], anchor: usize) -> Option<FoundReference> {
    let last = anchor.checked_sub(1)?;
    if tokens[last].kind != Identifier {
        return None;
    }
    accept(read_name_backward(tokens, last))
}

/// `catch (A | B $e)`
pub fn catch_clause(tokens: &[Token<'_>], anchor: usize) -> Vec<FoundReference> {
    let open = skip_trivia(tokens, anchor + 1);
    if !is_at(tokens, open, LParen) {
        return Vec::new();
    }
    name_list(tokens, open + 1, Pipe).0
}

/// `$x instanceof Foo`
pub fn type_check(tokens: &[Token<'_>], anchor: usize) -> Option<FoundReference> {
    accept(read_name_forward(tokens, skip_trivia(tokens, anchor + 1)))
}

/// Parameter types and the return type of `function name(...)`, closures and
/// `fn` arrow functions.
pub fn signature(tokens: &[Token<'_>], anchor: usize) -> Vec<FoundReference> {
    let mut found = Vec::new();

    let mut i = skip_trivia(tokens, anchor + 1);
    if is_at(tokens, i, Amp) {
        i = skip_trivia(tokens, i + 1);
    }
    if i < tokens.len() && tokens[i].kind != LParen {
        // Method names may be keywords, so accept any single token here.
        i = skip_trivia(tokens, i + 1);
    }
    if !is_at(tokens, i, LParen) {
        return found;
    }

    let Some(close) = parameter_list(tokens, i, &mut found) else {
        return found;
    };

    let mut j = skip_trivia(tokens, close + 1);
    if is_at(tokens, j, Use) {
        let open = skip_trivia(tokens, j + 1);
        if let Some(closure_close) = is_at(tokens, open, LParen).then(|| matching_close(tokens, open)).flatten() {
            j = skip_trivia(tokens, closure_close + 1);
        }
    }
    if is_at(tokens, j, Colon) {
        type_expression(tokens, j + 1, &mut found);
    }
    found
}

/// `use TraitA, TraitB;` inside a type body, plus the traits named after
/// `insteadof` in an adaptation block.
pub fn trait_use(tokens: &[Token<'_>], anchor: usize) -> Vec<FoundReference> {
    let (mut found, end) = name_list(tokens, anchor + 1, Comma);
    if !is_at(tokens, end, LBrace) {
        return found;
    }
    let Some(close) = matching_close(tokens, end) else {
        return found;
    };
    for k in end + 1..close {
        if tokens[k].kind == Identifier && tokens[k].text.eq_ignore_ascii_case("insteadof") {
            found.extend(name_list(tokens, k + 1, Comma).0);
        }
    }
    found
}

/// The type of a property declaration: `private ?Foo $x;`,
/// `public static A|B $y = null;`. Anything but a typed `$variable` after the
/// modifiers yields nothing.
pub fn property_type(tokens: &[Token<'_>], anchor: usize) -> Vec<FoundReference> {
    let mut i = skip_trivia(tokens, anchor + 1);
    while tokens.get(i).is_some_and(is_modifier) {
        i = skip_trivia(tokens, i + 1);
    }
    let mut found = Vec::new();
    let end = type_expression(tokens, i, &mut found);
    if is_at(tokens, skip_trivia(tokens, end), Variable) { found } else { Vec::new() }
}

fn is_modifier(token: &Token<'_>) -> bool {
    match token.kind {
        Public | Protected | Private | Static => true,
        Identifier => ["var", "readonly", "final", "abstract"].iter().any(|m| token.text.eq_ignore_ascii_case(m)),
        _ => false,
    }
}

/// Walk a parenthesised parameter list starting at `open`, collecting each
/// parameter's type. Returns the index of the closing paren.
fn parameter_list(tokens: &[Token<'_>], open: usize, found: &mut Vec<FoundReference>) -> Option<usize> {
    let mut depth = 0usize;
    let mut i = open;
    while i < tokens.len() {
        match tokens[i].kind {
            LParen | LBracket | LBrace | AttributeStart => {
                depth += 1;
                if i == open {
                    i = parameter(tokens, i + 1, found);
                    continue;
                }
            }
            RParen | RBracket | RBrace => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(i);
                }
            }
            Comma if depth == 1 => {
                i = parameter(tokens, i + 1, found);
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// One parameter's leading attributes, promotion modifiers and type.
fn parameter(tokens: &[Token<'_>], start: usize, found: &mut Vec<FoundReference>) -> usize {
    let mut i = skip_trivia(tokens, start);
    loop {
        match tokens.get(i).map(|t| t.kind) {
            Some(AttributeStart) => match matching_close(tokens, i) {
                Some(close) => i = skip_trivia(tokens, close + 1),
                None => return tokens.len(),
            },
            Some(Public | Protected | Private) => i = skip_trivia(tokens, i + 1),
            Some(Identifier) if tokens[i].text.eq_ignore_ascii_case("readonly") => {
                i = skip_trivia(tokens, i + 1)
            }
            _ => break,
        }
    }
    type_expression(tokens, i, found)
}

/// `?A`, `A|B`, `A&B`: collects every named type, returns the index after the
/// last token consumed.
fn type_expression(tokens: &[Token<'_>], start: usize, found: &mut Vec<FoundReference>) -> usize {
    let mut i = skip_trivia(tokens, start);
    loop {
        if is_at(tokens, i, Question) {
            i = skip_trivia(tokens, i + 1);
        }
        match read_name_forward(tokens, i) {
            Some(name) => {
                i = name.span.end + 1;
                found.extend(accept(Some(name)));
            }
            None if is_at(tokens, i, Static) => i += 1,
            None => return i,
        }

        let next = skip_trivia(tokens, i);
        match tokens.get(next).map(|t| t.kind) {
            Some(Pipe) => i = skip_trivia(tokens, next + 1),
            Some(Amp) if starts_name(tokens, skip_trivia(tokens, next + 1)) => i = skip_trivia(tokens, next + 1),
            _ => return i,
        }
    }
}

/// Names separated by `separator`, starting after trivia at `start`. Returns
/// the accepted names and the index where the list ended.
fn name_list(tokens: &[Token<'_>], start: usize, separator: TokenKind) -> (Vec<FoundReference>, usize) {
    let mut found = Vec::new();
    let mut i = start;
    loop {
        i = skip_trivia(tokens, i);
        let Some(name) = read_name_forward(tokens, i) else {
            return (found, i);
        };
        i = name.span.end + 1;
        found.extend(accept(Some(name)));

        let next = skip_trivia(tokens, i);
        if !is_at(tokens, next, separator) {
            return (found, next);
        }
        i = next + 1;
    }
}

/// The contiguous run of identifier and separator tokens starting at `start`.
pub fn read_name_forward(tokens: &[Token<'_>], start: usize) -> Option<FoundReference> {
    if !starts_name(tokens, start) {
        return None;
    }
    let end = (start..tokens.len()).take_while(|&i| tokens[i].kind.is_name_part()).last()?;
    Some(name_at(tokens, TokenSpan::new(start, end)))
}

/// The contiguous run of identifier and separator tokens ending at `end`.
pub fn read_name_backward(tokens: &[Token<'_>], end: usize) -> Option<FoundReference> {
    if !tokens.get(end)?.kind.is_name_part() {
        return None;
    }
    let mut start = end;
    while start > 0 && tokens[start - 1].kind.is_name_part() {
        start -= 1;
    }
    Some(name_at(tokens, TokenSpan::new(start, end)))
}

fn name_at(tokens: &[Token<'_>], span: TokenSpan) -> FoundReference {
    let text: String = tokens[span.start..=span.end].iter().map(|t| t.text).collect();
    Spanned::new(text, span)
}

fn accept(name: Option<FoundReference>) -> Option<FoundReference> {
    name.filter(|n| !is_excluded_name(&n.node))
}

fn starts_name(tokens: &[Token<'_>], i: usize) -> bool {
    tokens.get(i).is_some_and(|t| t.kind.is_name_part())
}

fn is_at(tokens: &[Token<'_>], i: usize, kind: TokenKind) -> bool {
    tokens.get(i).is_some_and(|t| t.kind == kind)
}

/// First index at or after `i` that is not whitespace or a comment.
pub fn skip_trivia(tokens: &[Token<'_>], mut i: usize) -> usize {
    while i < tokens.len() && (tokens[i].kind.is_trivia() || tokens[i].kind == DocComment) {
        i += 1;
    }
    i
}

/// Last index before `i` that is not whitespace or a comment.
pub fn previous_significant(tokens: &[Token<'_>], i: usize) -> Option<usize> {
    (0..i).rev().find(|&j| !(tokens[j].kind.is_trivia() || tokens[j].kind == DocComment))
}

/// Whether the keyword at `i` is really a member name (`$x->new()`, `A::class`).
pub fn is_member_name(tokens: &[Token<'_>], i: usize) -> bool {
    previous_significant(tokens, i)
        .is_some_and(|j| tokens[j].kind == DoubleColon || (tokens[j].kind == Other && tokens[j].text == "->"))
}

/// Index of the bracket closing the one opened at `open`, counting every
/// bracket kind.
pub fn matching_close(tokens: &[Token<'_>], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, token) in tokens.iter().enumerate().skip(open) {
        match token.kind {
            LParen | LBracket | LBrace | AttributeStart => depth += 1,
            RParen | RBracket | RBrace => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}
