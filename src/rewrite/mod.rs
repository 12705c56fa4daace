//! Pass 2: turn one namespaced file into its flattened form.
//!
//! Every stage records edits against the original token coordinates; nothing
//! touches the token buffer until the final serialization.

pub mod docblock;
pub mod edits;

use std::path::PathBuf;

use crate::config::Overrides;
use crate::diagnostics::FlattenError;
use crate::index::SymbolIndex;
use crate::lexer::TokenKind;
use crate::resolve::Classname;
use crate::source::SourceFile;
use crate::span::TokenSpan;

pub use docblock::DocblockRewriter;
pub use edits::{Edit, EditSet};

/// Keyword substituted for a file's references to its own primary type.
const SELF_REFERENCE: &str = "self";

pub const OUTPUT_EXTENSION: &str = "php";

/// The flattened output for one candidate file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewrittenFile {
    /// The primary type as originally declared.
    pub original: Classname,
    /// The emitted type name after overrides.
    pub name: String,
    pub text: String,
}

impl RewrittenFile {
    /// `Foo_Bar_Baz` is placed at `Foo/Bar/Baz.php`.
    pub fn relative_path(&self) -> PathBuf {
        let segments: Vec<&str> = self.name.split('_').filter(|s| !s.is_empty()).collect();
        let Some((last, dirs)) = segments.split_last() else {
            return PathBuf::from(format!("{}.{OUTPUT_EXTENSION}", self.name));
        };
        let mut path: PathBuf = dirs.iter().collect();
        path.push(format!("{last}.{OUTPUT_EXTENSION}"));
        path
    }
}

pub struct Rewriter<'a> {
    index: &'a SymbolIndex,
    overrides: &'a Overrides,
}

impl<'a> Rewriter<'a> {
    pub fn new(index: &'a SymbolIndex, overrides: &'a Overrides) -> Self {
        Self { index, overrides }
    }

    pub fn rewrite(&self, source: &str) -> Result<RewrittenFile, FlattenError> {
        let mut file = SourceFile::parse(source)?;
        let mut edits = EditSet::new();

        let (original, name) = self.rename(&mut file, &mut edits)?;
        self.substitute_references(&file, &name, &mut edits);
        self.fix_docblocks(&file, &mut edits);
        strip(file.import_spans(), &mut edits);
        strip(file.namespace_spans(), &mut edits);

        let text = edits.apply(file.tokens());
        tracing::debug!("rewrote {} as {} ({} edits)", original, name, edits.len());
        Ok(RewrittenFile { original, name, text })
    }

    /// Replace the primary declaration's name with the flattened name and
    /// keep it from being used as an alias.
    fn rename(&self, file: &mut SourceFile<'_>, edits: &mut EditSet) -> Result<(Classname, String), FlattenError> {
        let original = file.primary_classname()?;
        let name_index = file.primary()?.name_index;
        let name = self.overrides.apply(&original.flattened());

        edits.replace(TokenSpan::single(name_index), name.as_str());
        file.imports_mut().reserve(&name);
        Ok((original, name))
    }

    fn substitute_references(&self, file: &SourceFile<'_>, name: &str, edits: &mut EditSet) {
        let primary_body = file.primary().ok().and_then(|d| d.body);

        for reference in file.references() {
            if file.is_declared_locally(&reference.node) {
                if file.is_primary_name(&reference.node) {
                    // `self` only means the primary type inside its own body.
                    let inside = primary_body.is_some_and(|body| body.contains(reference.span.start));
                    edits.replace(reference.span, if inside { SELF_REFERENCE } else { name });
                }
                continue;
            }

            let classname = file.resolve(&reference);
            let text = self.overrides.apply(&file.imports().alias_for(&classname));
            tracing::trace!("{} -> {} ({})", reference.node, text, classname);
            edits.replace(reference.span, text);
        }
    }

    fn fix_docblocks(&self, file: &SourceFile<'_>, edits: &mut EditSet) {
        let candidates: Vec<Classname> = file
            .imports()
            .classnames()
            .chain(self.index.namespace(file.namespace()))
            .cloned()
            .collect();
        if candidates.is_empty() {
            return;
        }
        let docs = DocblockRewriter::new(&candidates, self.overrides);

        for (i, token) in file.tokens().iter().enumerate() {
            if token.kind != TokenKind::DocComment {
                continue;
            }
            let fixed = docs.rewrite(token.text);
            if fixed != token.text {
                edits.replace(TokenSpan::single(i), fixed);
            }
        }
    }
}

fn strip(spans: &[TokenSpan], edits: &mut EditSet) {
    for span in spans {
        edits.delete(*span);
    }
}
