use crate::span::Span;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlattenError {
    #[error("input path does not exist: {}", path.display())]
    MissingInputPath { path: PathBuf },

    #[error("cannot prepare output directory {}: {source}", path.display())]
    OutputDirectoryUnwritable { path: PathBuf, source: io::Error },

    #[error("unresolvable namespace: {msg}")]
    UnresolvableNamespace { msg: String, span: Span },

    #[error("no class, interface or trait declaration found")]
    NoPrimaryTypeFound,

    #[error("cannot access {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("Manifest error: {msg}")]
    Manifest { msg: String, path: PathBuf },

    #[error("{}: {source}", path.display())]
    InFile { path: PathBuf, source: Box<FlattenError> },
}

impl FlattenError {
    pub fn missing_input(path: impl Into<PathBuf>) -> Self {
        Self::MissingInputPath { path: path.into() }
    }

    pub fn output_unwritable(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::OutputDirectoryUnwritable { path: path.into(), source }
    }

    pub fn unresolvable_namespace(msg: impl Into<String>, span: Span) -> Self {
        Self::UnresolvableNamespace { msg: msg.into(), span }
    }

    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    pub fn manifest(msg: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::Manifest { msg: msg.into(), path: path.into() }
    }

    /// Attach the candidate file a per-file failure came from.
    pub fn in_file(self, path: &Path) -> Self {
        match self {
            already @ Self::InFile { .. } => already,
            other => Self::InFile { path: path.to_path_buf(), source: Box::new(other) },
        }
    }

    /// The innermost error, without file context.
    pub fn root(&self) -> &FlattenError {
        match self {
            Self::InFile { source, .. } => source.root(),
            other => other,
        }
    }
}

/// A configuration problem the run recovers from by ignoring the offending piece.
#[derive(Debug, Error)]
pub enum ConfigIssue {
    #[error("cannot read {}: {source}", path.display())]
    Unreadable { path: PathBuf, source: io::Error },

    #[error("invalid JSON in {}: {source}", path.display())]
    InvalidJson { path: PathBuf, source: serde_json::Error },

    #[error("configuration root must be a JSON object")]
    RootNotObject,

    #[error("`replacements` must be an array")]
    ReplacementsNotArray,

    #[error("replacement #{index} is missing `{field}`")]
    MissingField { index: usize, field: &'static str },

    #[error("replacement #{index} has an invalid pattern: {source}")]
    InvalidPattern { index: usize, source: regex::Error },
}

/// Render a FlattenError with ariadne for nice terminal output.
///
/// `source` is the text of the file the error points into, if any.
pub fn render_error(source: &str, filename: &str, err: &FlattenError) {
    use ariadne::{Label, Report, ReportKind, Source};
    use colored::Colorize;

    match err {
        FlattenError::InFile { path, source: inner } => {
            render_error(source, &path.display().to_string(), inner);
        }
        FlattenError::UnresolvableNamespace { msg, span } if span.end <= source.len() => {
            eprintln!("{} {filename}", "-->".blue().bold());
            let printed = Report::build(ReportKind::Error, (), span.start)
                .with_message("unresolvable namespace")
                .with_label(Label::new(span.start..span.end).with_message(msg))
                .finish()
                .eprint(Source::from(source));
            if printed.is_err() {
                eprintln!("{} {err}", "error:".red().bold());
            }
        }
        FlattenError::Manifest { msg, path } => {
            eprintln!("{} {msg}", "error[manifest]:".red().bold());
            eprintln!("  --> {}", path.display());
        }
        other if filename.is_empty() => {
            eprintln!("{} {other}", "error:".red().bold());
        }
        other => {
            eprintln!("{} {filename}: {other}", "error:".red().bold());
        }
    }
}
