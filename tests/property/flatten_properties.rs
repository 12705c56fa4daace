use std::collections::HashSet;

use proptest::prelude::*;

use nsflat::lexer::{is_reserved_word, lex};
use nsflat::resolve::{Classname, ImportTable};
use nsflat::rewrite::EditSet;
use nsflat::span::TokenSpan;

// =============================================================================
// Generators
// =============================================================================

/// A name segment that can never collide with a PHP keyword or builtin type.
fn segment() -> impl Strategy<Value = String> {
    "Q[a-z0-9]{0,6}"
}

fn qualified_name() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(segment(), 1..5)
}

/// A small namespaced class file and the names it mentions.
fn class_file() -> impl Strategy<Value = String> {
    (qualified_name(), segment(), segment(), segment(), segment(), segment()).prop_map(
        |(ns, name, base, param, ret, inst)| {
            format!(
                "<?php\nnamespace {};\n\nclass {name} extends {base}\n{{\n    public function run({param} $x): {ret}\n    {{\n        return new {inst}();\n    }}\n}}\n",
                ns.join("\\")
            )
        },
    )
}

// =============================================================================
// Flattening
// =============================================================================

/// Property: a flattened name never carries a separator or a leading underscore.
#[test]
fn prop_flattened_names_are_plain_identifiers() {
    proptest!(|(segments in qualified_name(), absolute in any::<bool>())| {
        let raw = format!("{}{}", if absolute { "\\" } else { "" }, segments.join("\\"));
        let flattened = Classname::new(&raw).flattened();
        prop_assert!(!flattened.contains('\\'));
        prop_assert!(!flattened.starts_with('_'));
        prop_assert_eq!(flattened, segments.join("_"));
    });
}

/// Property: a global name with no separator flattens to itself.
#[test]
fn prop_global_names_flatten_to_themselves() {
    proptest!(|(name in "Q[A-Za-z0-9_]{0,12}")| {
        prop_assert_eq!(Classname::new(&name).flattened(), name);
    });
}

// =============================================================================
// Aliases
// =============================================================================

/// Property: every registered import gets an alias no other import holds
/// (case-insensitively) and that is never a reserved word.
#[test]
fn prop_aliases_are_unique() {
    let imports = prop::collection::vec((qualified_name(), prop::option::of("Q[a-z]{0,2}")), 0..20);
    proptest!(|(imports in imports)| {
        let mut table = ImportTable::new();
        let mut seen = HashSet::new();
        for (segments, requested) in &imports {
            let alias = table.register(Classname::new(&segments.join("\\")), requested.as_deref());
            prop_assert!(!is_reserved_word(&alias), "{alias}");
            prop_assert!(seen.insert(alias.to_ascii_lowercase()), "duplicate alias {alias}");
        }
        prop_assert_eq!(table.len(), imports.len());
    });
}

// =============================================================================
// Splicing
// =============================================================================

/// Property: applying single-token edits equals replacing those tokens by hand.
#[test]
fn prop_splice_replaces_exactly_the_edited_tokens() {
    let input = (prop::collection::vec("[a-z]{1,5}", 1..30), prop::collection::vec(any::<bool>(), 60));
    proptest!(|((words, picks) in input)| {
        let source = format!("<?php {}", words.join(" "));
        let tokens = lex(&source);

        let mut edits = EditSet::new();
        let mut expected = String::new();
        for (i, token) in tokens.iter().enumerate() {
            if picks[i % picks.len()] {
                let accepted = edits.replace(TokenSpan::single(i), format!("R{i}"));
                prop_assert!(accepted);
                expected.push_str(&format!("R{i}"));
            } else {
                expected.push_str(token.text);
            }
        }
        prop_assert_eq!(edits.apply(&tokens), expected);
    });
}

/// Property: an edit overlapping an accepted one is always rejected.
#[test]
fn prop_overlapping_edits_are_rejected() {
    proptest!(|(start in 0usize..20, len in 1usize..5, probe in 0usize..25)| {
        let mut edits = EditSet::new();
        let span = TokenSpan::new(start, start + len - 1);
        prop_assert!(edits.replace(span, "x"));
        let accepted = edits.replace(TokenSpan::single(probe), "y");
        prop_assert_eq!(accepted, !span.contains(probe));
    });
}

// =============================================================================
// Rewriting
// =============================================================================

/// Property: rewriting an already flattened file changes nothing.
#[test]
fn prop_rewriting_is_idempotent() {
    proptest!(|(source in class_file())| {
        let first = nsflat::flatten_source(&source).unwrap();
        let second = nsflat::flatten_source(&first.text).unwrap();
        prop_assert_eq!(&second.text, &first.text);
        prop_assert_eq!(second.name, first.name);
        prop_assert!(!first.text.contains('\\'));
        prop_assert!(!first.text.contains("namespace"));
    });
}

/// Property: the rewriter returns an error or a file for any input.
#[test]
fn prop_rewriting_never_panics() {
    proptest!(|(body in "\\PC{0,300}")| {
        let _ = nsflat::flatten_source(&format!("<?php\n{body}"));
    });
}
