//! Placing rewritten files under the output root.

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

use crate::diagnostics::FlattenError;
use crate::rewrite::RewrittenFile;

/// Refuse an output root that lies inside an input or contains one, since
/// preparing it deletes everything beneath it.
pub fn check_disjoint(root: &Path, inputs: &[PathBuf]) -> Result<(), FlattenError> {
    let output = comparable(root);
    for input in inputs {
        let resolved = comparable(input);
        if resolved.starts_with(&output) || output.starts_with(&resolved) {
            let reason = format!("output overlaps input path {}", input.display());
            return Err(FlattenError::output_unwritable(root, io::Error::new(io::ErrorKind::InvalidInput, reason)));
        }
    }
    Ok(())
}

/// `path` made absolute, with its longest existing prefix canonicalized.
fn comparable(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    for ancestor in absolute.ancestors() {
        if let Ok(real) = ancestor.canonicalize() {
            return match absolute.strip_prefix(ancestor) {
                Ok(rest) => real.join(rest),
                Err(_) => real,
            };
        }
    }
    absolute
}

/// Remove `root` if present and recreate it empty.
pub fn prepare_output_dir(root: &Path) -> Result<(), FlattenError> {
    if root.exists() {
        tracing::debug!("clearing output directory {}", root.display());
        std::fs::remove_dir_all(root).map_err(|e| FlattenError::output_unwritable(root, e))?;
    }
    std::fs::create_dir_all(root).map_err(|e| FlattenError::output_unwritable(root, e))
}

/// Write one file at `root/<relative_path>`, creating directories as needed.
pub fn write_file(root: &Path, file: &RewrittenFile) -> Result<PathBuf, FlattenError> {
    let target = root.join(file.relative_path());
    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent).map_err(|e| FlattenError::io(parent, e))?;
    }
    std::fs::write(&target, &file.text).map_err(|e| FlattenError::io(&target, e))?;
    tracing::trace!("wrote {} to {}", file.name, target.display());
    Ok(target)
}

pub fn write_all(root: &Path, files: &[RewrittenFile]) -> Result<Vec<PathBuf>, FlattenError> {
    let mut seen = HashSet::new();
    let mut written = Vec::with_capacity(files.len());
    for file in files {
        let target = write_file(root, file)?;
        if !seen.insert(target.clone()) {
            tracing::warn!("{} was written more than once; the last of {} wins", target.display(), file.name);
        }
        written.push(target);
    }
    Ok(written)
}
