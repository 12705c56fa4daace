//! Pass 1: the cross-file map from namespace to the types declared in it.

use std::collections::BTreeMap;
use std::path::Path;

use crate::resolve::Classname;
use crate::source::SourceFile;
use crate::sources::SourceMap;

#[derive(Debug, Default, Clone)]
pub struct SymbolIndex {
    /// Namespace without leading separator (`""` for global) to its types, in
    /// candidate order.
    buckets: BTreeMap<String, Vec<Classname>>,
}

impl SymbolIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build(sources: &SourceMap) -> Self {
        let mut index = Self::new();
        for (path, text) in sources.iter() {
            index.add_source(path, text);
        }
        tracing::info!("indexed {} types in {} namespaces", index.len(), index.buckets.len());
        index
    }

    /// Index the primary type of one file. Files whose namespace or primary
    /// type cannot be determined are skipped with a warning.
    pub fn add_source(&mut self, path: &Path, text: &str) -> bool {
        let file = match SourceFile::parse(text) {
            Ok(file) => file,
            Err(e) => {
                tracing::warn!("not indexing {}: {e}", path.display());
                return false;
            }
        };
        match file.primary_classname() {
            Ok(classname) => {
                tracing::trace!("indexed {} from {}", classname, path.display());
                self.insert(classname);
                true
            }
            Err(e) => {
                tracing::warn!("not indexing {}: {e}", path.display());
                false
            }
        }
    }

    pub fn insert(&mut self, classname: Classname) {
        self.buckets.entry(classname.namespace().to_string()).or_default().push(classname);
    }

    /// Types declared in `namespace`, in candidate order.
    pub fn namespace(&self, namespace: &str) -> &[Classname] {
        let key = namespace.trim_start_matches(crate::resolve::SEPARATOR);
        self.buckets.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn namespaces(&self) -> impl Iterator<Item = &str> {
        self.buckets.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}
