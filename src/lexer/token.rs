use logos::{Lexer, Logos};

use crate::span::Span;

/// Kinds of PHP tokens recognised inside `<?php ... ?>`.
///
/// Only the kinds the rewrite engine pattern-matches on get their own variant;
/// every other operator character is `Other`. Keywords are case-insensitive.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Keywords
    #[token("namespace", ignore(ascii_case))]
    Namespace,
    #[token("use", ignore(ascii_case))]
    Use,
    #[token("class", ignore(ascii_case))]
    Class,
    #[token("interface", ignore(ascii_case))]
    Interface,
    #[token("trait", ignore(ascii_case))]
    Trait,
    #[token("new", ignore(ascii_case))]
    New,
    #[token("extends", ignore(ascii_case))]
    Extends,
    #[token("implements", ignore(ascii_case))]
    Implements,
    #[token("catch", ignore(ascii_case))]
    Catch,
    #[token("instanceof", ignore(ascii_case))]
    Instanceof,
    #[token("function", ignore(ascii_case))]
    #[token("fn", ignore(ascii_case))]
    Function,
    #[token("static", ignore(ascii_case))]
    Static,
    #[token("as", ignore(ascii_case))]
    As,
    #[token("const", ignore(ascii_case))]
    Const,
    #[token("public", ignore(ascii_case))]
    Public,
    #[token("protected", ignore(ascii_case))]
    Protected,
    #[token("private", ignore(ascii_case))]
    Private,

    // Names
    #[regex(r"(?:[a-zA-Z_]|[^\x00-\x7F])(?:[a-zA-Z0-9_]|[^\x00-\x7F])*")]
    Identifier,
    #[regex(r"\$(?:[a-zA-Z_]|[^\x00-\x7F])(?:[a-zA-Z0-9_]|[^\x00-\x7F])*")]
    Variable,
    #[token("\\")]
    NsSeparator,

    // Trivia
    #[regex(r"[ \t\r\n]+")]
    Whitespace,
    #[regex(r"/\*\*([^*]|\*+[^*/])*\*+/", priority = 20)]
    DocComment,
    #[regex(r"/\*([^*]|\*+[^*/])*\*+/")]
    #[regex(r"//|#", line_comment)]
    Comment,

    // Literals
    #[regex(r#"'([^'\\]|\\(.|\n))*'"#)]
    #[regex(r#""([^"\\]|\\(.|\n))*""#)]
    #[regex(r#"`([^`\\]|\\(.|\n))*`"#)]
    StringLit,
    #[regex(r#"<<<[ \t]*("[a-zA-Z_][a-zA-Z0-9_]*"|'[a-zA-Z_][a-zA-Z0-9_]*'|[a-zA-Z_][a-zA-Z0-9_]*)\r?\n"#, heredoc)]
    Heredoc,
    #[regex(r"[0-9][0-9_]*(\.[0-9_]*)?([eE][+-]?[0-9]+)?")]
    #[regex(r"\.[0-9][0-9_]*([eE][+-]?[0-9]+)?")]
    #[regex(r"0[xX][0-9a-fA-F_]+")]
    #[regex(r"0[bB][01_]+")]
    NumberLit,

    // Punctuation
    #[token("::")]
    DoubleColon,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,
    #[token("|")]
    Pipe,
    #[token("?")]
    Question,
    #[token("&")]
    Amp,
    #[token("...")]
    Ellipsis,
    #[token("#[")]
    AttributeStart,
    #[regex(r"\?>(\r?\n)?")]
    CloseTag,
    #[token("->")]
    #[token("=>")]
    #[regex(r"[-+*/%=<>!.^~@$]")]
    Other,

    // Produced by `lex` outside of the logos lexer.
    OpenTag,
    InlineHtml,
    Unknown,
}

/// Consumes a `//` or `#` comment up to (not including) the newline or a `?>`.
fn line_comment(lex: &mut Lexer<TokenKind>) {
    let rest = lex.remainder();
    let mut end = rest.len();
    if let Some(nl) = rest.find('\n') {
        end = nl;
    }
    if let Some(close) = rest[..end].find("?>") {
        end = close;
    }
    lex.bump(end);
}

/// Consumes a heredoc/nowdoc body through its closing label.
///
/// The closing label may be indented and may be followed by any non-identifier
/// character (PHP 7.3 flexible syntax).
fn heredoc(lex: &mut Lexer<TokenKind>) -> bool {
    let label: String = lex
        .slice()
        .trim_start_matches("<<<")
        .trim()
        .trim_matches(|c: char| c == '"' || c == '\'')
        .to_string();
    let rest = lex.remainder();
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        let trimmed = line.trim_start_matches([' ', '\t']);
        if let Some(after) = trimmed.strip_prefix(label.as_str()) {
            let continues_ident = after
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_' || !c.is_ascii());
            if !continues_ident {
                let indent = line.len() - trimmed.len();
                lex.bump(offset + indent + label.len());
                return true;
            }
        }
        offset += line.len();
    }
    false
}

impl TokenKind {
    /// Whitespace and non-documentation comments.
    pub fn is_trivia(self) -> bool {
        matches!(self, TokenKind::Whitespace | TokenKind::Comment)
    }

    /// Tokens that make up a (possibly qualified) type name.
    pub fn is_name_part(self) -> bool {
        matches!(self, TokenKind::Identifier | TokenKind::NsSeparator)
    }
}

/// One lexed token: its kind, the exact source text it covers, the 1-based
/// line it starts on, and its byte span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'src> {
    pub kind: TokenKind,
    pub text: &'src str,
    pub line: u32,
    pub span: Span,
}

impl<'src> Token<'src> {
    pub fn new(kind: TokenKind, text: &'src str, line: u32, span: Span) -> Self {
        Self { kind, text, line, span }
    }
}

/// Returns true if the given string is a reserved PHP word, which can never be
/// used as a class alias.
pub fn is_reserved_word(s: &str) -> bool {
    RESERVED_WORDS.contains(&s.to_ascii_lowercase().as_str())
}

pub const RESERVED_WORDS: &[&str] = &[
    "__halt_compiler", "abstract", "and", "array", "as", "break", "callable", "case", "catch",
    "class", "clone", "const", "continue", "declare", "default", "die", "do", "echo", "else",
    "elseif", "empty", "enddeclare", "endfor", "endforeach", "endif", "endswitch", "endwhile",
    "eval", "exit", "extends", "final", "fn", "for", "foreach", "function", "global", "goto",
    "if", "implements", "include", "include_once", "instanceof", "insteadof", "interface",
    "isset", "list", "match", "namespace", "new", "or", "print", "private", "protected",
    "public", "readonly", "require", "require_once", "return", "static", "switch", "throw",
    "trait", "try", "unset", "use", "var", "while", "xor", "yield",
];
