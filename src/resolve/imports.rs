use std::collections::HashSet;

use super::classname::Classname;
use crate::lexer::token::RESERVED_WORDS;
use crate::lexer::{Token, TokenKind};
use crate::span::TokenSpan;

/// One imported type and the alias it is reachable under in this file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportEntry {
    pub classname: Classname,
    pub alias: String,
}

/// Per-file alias table built from the file's `use` statements.
///
/// Aliases are pairwise distinct ignoring ASCII case and never equal a
/// reserved word; collisions fall back to progressively longer names and
/// finally to a numeric suffix.
#[derive(Debug, Clone)]
pub struct ImportTable {
    entries: Vec<ImportEntry>,
    /// Lowercased.
    reserved: HashSet<String>,
    conflict_counter: u32,
}

impl Default for ImportTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ImportTable {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            reserved: RESERVED_WORDS.iter().map(|w| w.to_string()).collect(),
            conflict_counter: 1,
        }
    }

    /// Build the table from the file-level `use` statements found by
    /// [`IMPORT_STATEMENT`](crate::pattern::IMPORT_STATEMENT), one entry per
    /// comma-separated clause, in source order.
    pub fn from_statements(tokens: &[Token<'_>], statements: &[TokenSpan]) -> Self {
        let mut table = Self::new();
        for statement in statements {
            let clauses = tokens[statement.start + 1..=statement.end]
                .split(|t| matches!(t.kind, TokenKind::Comma | TokenKind::Semicolon));
            for (name, alias) in clauses.filter_map(import_clause) {
                let classname = Classname::new(&name);
                let requested = alias.unwrap_or_else(|| classname.simple().to_string());
                table.register(classname, Some(&requested));
            }
        }
        table
    }

    /// Mark `alias` as unusable for any later registration.
    pub fn reserve(&mut self, alias: &str) {
        self.reserved.insert(alias.to_ascii_lowercase());
    }

    pub fn is_reserved(&self, alias: &str) -> bool {
        self.reserved.contains(&alias.to_ascii_lowercase())
    }

    pub fn has_alias(&self, alias: &str) -> bool {
        self.entries.iter().any(|e| e.alias.eq_ignore_ascii_case(alias))
    }

    fn is_available(&self, alias: &str) -> bool {
        !alias.is_empty() && !self.has_alias(alias) && !self.is_reserved(alias)
    }

    /// Register `classname`, returning the alias it was bound to.
    ///
    /// Tries `requested` first, then the short name, the simple name and the
    /// flattened name; if all are unavailable, appends the conflict counter.
    pub fn register(&mut self, classname: Classname, requested: Option<&str>) -> String {
        let fallbacks = [classname.short().to_string(), classname.simple().to_string(), classname.flattened()];
        let chosen = requested
            .map(str::to_string)
            .into_iter()
            .chain(fallbacks)
            .find(|candidate| self.is_available(candidate));

        let alias = match chosen {
            Some(alias) => alias,
            None => {
                let base = requested.map_or_else(|| classname.flattened(), str::to_string);
                self.suffixed(&base)
            }
        };

        tracing::trace!("import {} bound to alias {}", classname, alias);
        self.entries.push(ImportEntry { classname, alias: alias.clone() });
        alias
    }

    fn suffixed(&mut self, base: &str) -> String {
        loop {
            let candidate = format!("{base}{}", self.conflict_counter);
            self.conflict_counter += 1;
            if self.is_available(&candidate) {
                return candidate;
            }
        }
    }

    /// The classname bound to `alias` (ASCII case-insensitive, like PHP).
    pub fn get(&self, alias: &str) -> Option<&Classname> {
        self.entries.iter().find(|e| e.alias.eq_ignore_ascii_case(alias)).map(|e| &e.classname)
    }

    pub fn contains(&self, classname: &Classname) -> bool {
        self.entries.iter().any(|e| &e.classname == classname)
    }

    /// The text emitted at a reference site for `classname`.
    ///
    /// `use` statements are stripped from the output, so a bare alias would no
    /// longer resolve; registered and unregistered names both emit the
    /// flattened form.
    pub fn alias_for(&self, classname: &Classname) -> String {
        if let Some(entry) = self.entries.iter().find(|e| &e.classname == classname) {
            tracing::trace!("{} is imported as {}", classname, entry.alias);
        }
        classname.flattened()
    }

    pub fn entries(&self) -> &[ImportEntry] {
        &self.entries
    }

    pub fn classnames(&self) -> impl Iterator<Item = &Classname> {
        self.entries.iter().map(|e| &e.classname)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// `Foo\Bar` or `Foo\Bar as Baz`, with any surrounding whitespace.
fn import_clause(clause: &[Token<'_>]) -> Option<(String, Option<String>)> {
    let mut halves = clause.split(|t| t.kind == TokenKind::As);
    let name: String = halves.next()?.iter().filter(|t| t.kind.is_name_part()).map(|t| t.text).collect();
    if name.trim_start_matches('\\').is_empty() {
        return None;
    }
    let alias = halves
        .next()
        .and_then(|rest| rest.iter().find(|t| t.kind == TokenKind::Identifier))
        .map(|t| t.text.to_string());
    Some((name, alias))
}
