//! Candidate discovery: which files take part in a run, in a fixed order.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::diagnostics::FlattenError;

/// Ordered `(path, source_text)` candidates. Index order is processing order.
#[derive(Debug, Default)]
pub struct SourceMap {
    pub files: Vec<(PathBuf, String)>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&mut self, path: PathBuf, source: String) -> usize {
        let id = self.files.len();
        self.files.push((path, source));
        id
    }

    pub fn get_source(&self, file_id: usize) -> Option<(&Path, &str)> {
        self.files.get(file_id).map(|(p, s)| (p.as_path(), s.as_str()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Path, &str)> {
        self.files.iter().map(|(p, s)| (p.as_path(), s.as_str()))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Discover every candidate under `inputs` and read it.
    pub fn load(inputs: &[PathBuf]) -> Result<Self, FlattenError> {
        let mut map = Self::new();
        for path in discover(inputs)? {
            let source = std::fs::read_to_string(&path).map_err(|e| FlattenError::io(&path, e))?;
            map.add_file(path, source);
        }
        tracing::debug!("loaded {} candidate files", map.len());
        Ok(map)
    }

    /// Keep only the candidates `keep` accepts, preserving order.
    pub fn retain(&mut self, mut keep: impl FnMut(&Path) -> bool) {
        self.files.retain(|(path, _)| keep(path));
    }
}

/// Fail with `MissingInputPath` on the first input that does not exist.
pub fn check_inputs(inputs: &[PathBuf]) -> Result<(), FlattenError> {
    match inputs.iter().find(|p| !p.exists()) {
        Some(missing) => Err(FlattenError::missing_input(missing)),
        None => Ok(()),
    }
}

/// Expand `inputs` into `.php` files: files are taken as given, directories
/// are walked recursively in file-name order. The first occurrence of a path wins.
pub fn discover(inputs: &[PathBuf]) -> Result<Vec<PathBuf>, FlattenError> {
    check_inputs(inputs)?;

    let mut seen = HashSet::new();
    let mut files = Vec::new();
    let mut push = |path: PathBuf| {
        if seen.insert(path.clone()) {
            files.push(path);
        }
    };

    for input in inputs {
        if input.is_file() {
            push(input.clone());
            continue;
        }
        for entry in WalkDir::new(input).follow_links(true).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                let at = e.path().unwrap_or(input).to_path_buf();
                FlattenError::io(at, e.into())
            })?;
            if entry.file_type().is_file() && is_php(entry.path()) {
                push(entry.into_path());
            }
        }
    }

    Ok(files)
}

fn is_php(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("php"))
}
