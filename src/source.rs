//! One candidate file, lexed and analysed just enough to rewrite it.

use crate::diagnostics::FlattenError;
use crate::lexer::{self, Token, TokenKind};
use crate::pattern::{BRACED_NAMESPACE_HEADER, IMPORT_STATEMENT, NAMESPACE_STATEMENT, TYPE_DECLARATION};
use crate::resolve::{self, Classname, ImportTable};
use crate::scanner::{self, FoundReference, is_member_name, matching_close, skip_trivia};
use crate::span::TokenSpan;

/// A `class`, `interface` or `trait` declared in the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Index of the declaring keyword.
    pub keyword: usize,
    /// Index of the name token.
    pub name_index: usize,
    pub name: String,
    /// `{` through the matching `}`.
    pub body: Option<TokenSpan>,
}

#[derive(Debug)]
pub struct SourceFile<'src> {
    tokens: Vec<Token<'src>>,
    namespace: String,
    namespace_spans: Vec<TokenSpan>,
    declarations: Vec<Declaration>,
    imports: ImportTable,
    import_spans: Vec<TokenSpan>,
}

impl<'src> SourceFile<'src> {
    pub fn parse(source: &'src str) -> Result<Self, FlattenError> {
        let tokens = lexer::lex(source);
        let (namespace, namespace_spans) = namespace_of(&tokens)?;
        let declarations = declarations_of(&tokens);

        let bodies: Vec<TokenSpan> = declarations.iter().filter_map(|d| d.body).collect();
        // Inside a type body `use` composes traits.
        let import_spans: Vec<TokenSpan> = IMPORT_STATEMENT
            .find_all(&tokens, None)
            .into_iter()
            .filter(|span| !bodies.iter().any(|body| body.contains(span.start)))
            .collect();

        let mut imports = ImportTable::from_statements(&tokens, &import_spans);
        if let Some(primary) = declarations.first() {
            imports.reserve(&primary.name);
        }

        tracing::trace!(
            "parsed {} tokens: namespace `{}`, {} declarations, {} imports",
            tokens.len(),
            namespace,
            declarations.len(),
            imports.len()
        );

        Ok(Self { tokens, namespace, namespace_spans, declarations, imports, import_spans })
    }

    pub fn tokens(&self) -> &[Token<'src>] {
        &self.tokens
    }

    /// The declared namespace without a leading separator; empty for global code.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    /// The first declared type.
    pub fn primary(&self) -> Result<&Declaration, FlattenError> {
        self.declarations.first().ok_or(FlattenError::NoPrimaryTypeFound)
    }

    pub fn primary_classname(&self) -> Result<Classname, FlattenError> {
        Ok(Classname::build(&self.namespace, &self.primary()?.name))
    }

    /// Whether `name` is a bare name of a type declared in this file.
    pub fn is_declared_locally(&self, name: &str) -> bool {
        self.declarations.iter().any(|d| d.name.eq_ignore_ascii_case(name))
    }

    pub fn is_primary_name(&self, name: &str) -> bool {
        self.declarations.first().is_some_and(|d| d.name.eq_ignore_ascii_case(name))
    }

    pub fn bodies(&self) -> Vec<TokenSpan> {
        self.declarations.iter().filter_map(|d| d.body).collect()
    }

    pub fn imports(&self) -> &ImportTable {
        &self.imports
    }

    pub fn imports_mut(&mut self) -> &mut ImportTable {
        &mut self.imports
    }

    /// File-level `use` statements, excluding trait composition.
    pub fn import_spans(&self) -> &[TokenSpan] {
        &self.import_spans
    }

    /// Namespace statements, braced headers and their closing braces.
    pub fn namespace_spans(&self) -> &[TokenSpan] {
        &self.namespace_spans
    }

    pub fn references(&self) -> Vec<FoundReference> {
        scanner::scan(&self.tokens, &self.bodies())
    }

    pub fn resolve(&self, reference: &FoundReference) -> Classname {
        resolve::resolve(&reference.node, &self.namespace, &self.imports)
    }
}

/// The first declared namespace, plus every namespace statement to strip.
fn namespace_of(tokens: &[Token<'_>]) -> Result<(String, Vec<TokenSpan>), FlattenError> {
    let mut namespace: Option<String> = None;
    let mut spans = Vec::new();

    for (i, token) in tokens.iter().enumerate() {
        if token.kind != TokenKind::Namespace || is_member_name(tokens, i) {
            continue;
        }
        let next = skip_trivia(tokens, i + 1);
        match tokens.get(next).map(|t| t.kind) {
            // `namespace\foo()` names something relative to the current namespace.
            Some(TokenKind::NsSeparator) => continue,
            Some(TokenKind::Identifier | TokenKind::LBrace) => {}
            _ => {
                return Err(FlattenError::unresolvable_namespace(
                    "expected a namespace name or `{` after `namespace`",
                    token.span,
                ));
            }
        }

        let (name, statement) = if let Some(span) = NAMESPACE_STATEMENT.find(tokens, i).filter(|s| s.start == i) {
            (name_within(tokens, span), vec![span])
        } else if let Some(span) = BRACED_NAMESPACE_HEADER.find(tokens, i).filter(|s| s.start == i) {
            let close = (span.start..=span.end)
                .find(|&j| tokens[j].kind == TokenKind::LBrace)
                .and_then(|open| matching_close(tokens, open))
                .ok_or_else(|| FlattenError::unresolvable_namespace("unterminated namespace block", token.span))?;
            (name_within(tokens, span), vec![span, TokenSpan::single(close)])
        } else {
            return Err(FlattenError::unresolvable_namespace(
                "namespace name must be followed by `;` or `{`",
                token.span,
            ));
        };

        match &namespace {
            None => namespace = Some(name),
            Some(first) if *first != name => {
                tracing::debug!("ignoring additional namespace `{name}`, file namespace is `{first}`");
            }
            Some(_) => {}
        }
        spans.extend(statement);
    }

    Ok((namespace.unwrap_or_default(), spans))
}

fn name_within(tokens: &[Token<'_>], span: TokenSpan) -> String {
    tokens[span.start..=span.end]
        .iter()
        .filter(|t| t.kind.is_name_part())
        .map(|t| t.text)
        .collect::<String>()
        .trim_start_matches(resolve::SEPARATOR)
        .to_string()
}

fn declarations_of(tokens: &[Token<'_>]) -> Vec<Declaration> {
    TYPE_DECLARATION
        .find_all(tokens, None)
        .into_iter()
        .filter(|span| !is_member_name(tokens, span.start))
        .map(|span| {
            let body = (span.end + 1..tokens.len())
                .find(|&j| tokens[j].kind == TokenKind::LBrace)
                .and_then(|open| matching_close(tokens, open).map(|close| TokenSpan::new(open, close)));
            Declaration { keyword: span.start, name_index: span.end, name: tokens[span.end].text.to_string(), body }
        })
        .collect()
}
