#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

pub fn nsflat() -> Command {
    Command::new(env!("CARGO_BIN_EXE_nsflat"))
}

/// A scratch project directory with PHP sources under it.
pub struct Project {
    dir: TempDir,
}

impl Project {
    pub fn new() -> Self {
        Self { dir: tempfile::tempdir().unwrap() }
    }

    /// Write `content` at `rel`, creating parent directories.
    pub fn file(&self, rel: &str, content: &str) -> &Self {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, content).unwrap();
        self
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Options reading `src/`, writing `lib/`, with `nsflat.json` as config.
    pub fn options(&self) -> nsflat::Options {
        nsflat::Options {
            inputs: vec![self.path("src")],
            output: self.path("lib"),
            config: self.path("nsflat.json"),
            manifest: None,
        }
    }

    pub fn run(&self) -> nsflat::Summary {
        nsflat::run(&self.options()).unwrap()
    }

    pub fn output(&self, rel: &str) -> String {
        let path = self.path("lib").join(rel);
        std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("reading {}: {e}", path.display()))
    }

    /// Every file under the output root, relative to it, sorted.
    pub fn output_files(&self) -> Vec<String> {
        let root = self.path("lib");
        let mut files: Vec<String> = walkdir::WalkDir::new(&root)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
            .map(|e| e.path().strip_prefix(&root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect();
        files.sort();
        files
    }
}
