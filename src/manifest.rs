//! Composer dependency graph: which installed packages a project requires.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::diagnostics::FlattenError;

/// A node in the package graph.
#[derive(Debug)]
pub struct PackageNode {
    pub name: String,
    pub root_dir: PathBuf,
    pub requires: Vec<String>,
}

/// Every package reachable from the root manifest's `require` section that is
/// installed under `vendor/`.
#[derive(Debug)]
pub struct PackageGraph {
    /// Directory holding the root composer.json.
    pub root_dir: PathBuf,
    /// Keyed by package name (`vendor/name`).
    pub packages: BTreeMap<String, PackageNode>,
}

impl PackageGraph {
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Whether `path` lies inside one of the resolved package directories.
    pub fn contains_path(&self, path: &Path) -> bool {
        let path = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        self.packages.values().any(|node| path.starts_with(&node.root_dir))
    }
}

// ---- JSON deserialization types ----

#[derive(Deserialize)]
struct ComposerManifest {
    name: Option<String>,
    #[serde(default)]
    require: BTreeMap<String, serde_json::Value>,
}

/// `php`, `ext-json`, `lib-icu` and friends have no vendor prefix and are
/// never installed under `vendor/`.
fn is_platform_requirement(name: &str) -> bool {
    !name.contains('/')
}

fn parse_manifest(manifest_path: &Path) -> Result<ComposerManifest, FlattenError> {
    let content = std::fs::read_to_string(manifest_path)
        .map_err(|e| FlattenError::manifest(format!("composer.json: could not read file: {e}"), manifest_path))?;

    serde_json::from_str(&content)
        .map_err(|e| FlattenError::manifest(format!("composer.json: invalid syntax: {e}"), manifest_path))
}

// ---- Package graph resolution ----

/// Parse the root manifest and recursively resolve every installed requirement
/// through `vendor/<package>/composer.json`.
pub fn resolve(manifest_path: &Path) -> Result<PackageGraph, FlattenError> {
    let manifest = parse_manifest(manifest_path)?;
    let root_dir = manifest_path.parent().unwrap_or(Path::new(".")).to_path_buf();
    let vendor_dir = root_dir.join("vendor");

    tracing::info!(
        "resolving dependencies for {}",
        manifest.name.as_deref().unwrap_or("root project")
    );
    if manifest.require.is_empty() {
        tracing::trace!("project has no dependencies");
    }

    let mut visited: HashSet<String> = HashSet::new();
    let mut packages: BTreeMap<String, PackageNode> = BTreeMap::new();
    for requirement in manifest.require.keys() {
        resolve_package_node(requirement, &vendor_dir, &mut visited, &mut packages)?;
    }

    for name in packages.keys() {
        tracing::debug!("project references package {name}");
    }
    tracing::info!("{} dependencies found", packages.len());

    Ok(PackageGraph { root_dir, packages })
}

fn resolve_package_node(
    name: &str,
    vendor_dir: &Path,
    visited: &mut HashSet<String>,
    packages: &mut BTreeMap<String, PackageNode>,
) -> Result<(), FlattenError> {
    if is_platform_requirement(name) {
        return Ok(());
    }
    // Handles diamonds and cycles alike.
    if !visited.insert(name.to_string()) {
        return Ok(());
    }

    let package_dir = vendor_dir.join(name);
    let manifest_path = package_dir.join("composer.json");
    tracing::trace!("reading composer file {}", manifest_path.display());
    if !manifest_path.is_file() {
        tracing::debug!("package {name} is not installed, skipping");
        return Ok(());
    }

    let manifest = parse_manifest(&manifest_path)?;
    let requires: Vec<String> = manifest.require.keys().cloned().collect();
    if requires.is_empty() {
        tracing::trace!("package {name} has no dependencies");
    }

    for requirement in &requires {
        resolve_package_node(requirement, vendor_dir, visited, packages)?;
    }

    let root_dir = package_dir.canonicalize().unwrap_or(package_dir);
    packages.insert(name.to_string(), PackageNode { name: name.to_string(), root_dir, requires });
    Ok(())
}
