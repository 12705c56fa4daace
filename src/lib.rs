pub mod span;
pub mod diagnostics;
pub mod lexer;
pub mod pattern;
pub mod scanner;
pub mod resolve;
pub mod source;
pub mod index;
pub mod rewrite;
pub mod config;
pub mod manifest;
pub mod sources;
pub mod output;

use std::path::PathBuf;

use rayon::prelude::*;

use config::Overrides;
use diagnostics::FlattenError;
use index::SymbolIndex;
use rewrite::{RewrittenFile, Rewriter};
use sources::SourceMap;

pub const DEFAULT_OUTPUT_DIR: &str = "lib";

/// Everything one `process` run needs.
#[derive(Debug, Clone)]
pub struct Options {
    /// Files and directories to flatten.
    pub inputs: Vec<PathBuf>,
    pub output: PathBuf,
    /// Override rules; a missing file means none.
    pub config: PathBuf,
    /// Restrict candidates to the packages this composer.json requires.
    pub manifest: Option<PathBuf>,
}

impl Options {
    pub fn new(inputs: Vec<PathBuf>) -> Self {
        Self {
            inputs,
            output: PathBuf::from(DEFAULT_OUTPUT_DIR),
            config: PathBuf::from(config::DEFAULT_CONFIG_FILE),
            manifest: None,
        }
    }
}

#[derive(Debug)]
pub struct Summary {
    pub output: PathBuf,
    pub written: Vec<PathBuf>,
}

impl Summary {
    pub fn files(&self) -> usize {
        self.written.len()
    }
}

/// Pass 1: index the primary type of every candidate.
pub fn build_index(sources: &SourceMap) -> SymbolIndex {
    SymbolIndex::build(sources)
}

/// Pass 2: rewrite every candidate against the finished index.
///
/// Files are rewritten in parallel and returned in candidate order. Any
/// failure fails the whole batch.
pub fn flatten_sources(
    sources: &SourceMap,
    index: &SymbolIndex,
    overrides: &Overrides,
) -> Result<Vec<RewrittenFile>, FlattenError> {
    let rewriter = Rewriter::new(index, overrides);
    sources
        .files
        .par_iter()
        .map(|(path, text)| {
            tracing::debug!("processing {}", path.display());
            rewriter.rewrite(text).map_err(|e| e.in_file(path))
        })
        .collect()
}

/// Flatten a single source string with an index built from it alone.
pub fn flatten_source(source: &str) -> Result<RewrittenFile, FlattenError> {
    let mut sources = SourceMap::new();
    sources.add_file(PathBuf::from("<input>"), source.to_string());
    let index = build_index(&sources);
    Rewriter::new(&index, &Overrides::none()).rewrite(source)
}

/// Validate inputs, discover candidates, run both passes and write the output tree.
pub fn run(options: &Options) -> Result<Summary, FlattenError> {
    sources::check_inputs(&options.inputs)?;
    output::check_disjoint(&options.output, &options.inputs)?;

    let overrides = Overrides::load(&options.config);
    let mut sources = SourceMap::load(&options.inputs)?;

    if let Some(manifest_path) = &options.manifest {
        let graph = manifest::resolve(manifest_path)?;
        let before = sources.len();
        sources.retain(|path| graph.contains_path(path));
        tracing::info!("{} of {} candidate files belong to required packages", sources.len(), before);
    }

    output::prepare_output_dir(&options.output)?;

    let index = build_index(&sources);
    let rewritten = flatten_sources(&sources, &index, &overrides)?;
    let written = output::write_all(&options.output, &rewritten)?;

    Ok(Summary { output: options.output.clone(), written })
}
