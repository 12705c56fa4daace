use clap::{Parser, Subcommand};
use std::path::PathBuf;

use nsflat::diagnostics::{FlattenError, render_error};

mod logging;

#[derive(Parser)]
#[command(name = "nsflat", version, about = "Flatten namespaced PHP classes into underscore-named classes")]
struct Cli {
    #[command(flatten)]
    verbosity: logging::Verbosity,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite PHP files (or directories of them) into the output tree
    Process {
        /// Files or directories to process
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Output root, cleared before writing
        #[arg(short, long, default_value = nsflat::DEFAULT_OUTPUT_DIR)]
        output: PathBuf,
        /// JSON file with `replacements` override rules
        #[arg(long, default_value = nsflat::config::DEFAULT_CONFIG_FILE)]
        config: PathBuf,
        /// Only process files from packages this composer.json requires
        #[arg(long)]
        manifest: Option<PathBuf>,
    },
}

/// Print `err`, with source context when it points into a candidate file.
fn report(err: &FlattenError) {
    match err {
        FlattenError::InFile { path, .. } => {
            let source = std::fs::read_to_string(path).unwrap_or_default();
            render_error(&source, &path.display().to_string(), err);
        }
        _ => render_error("", "", err),
    }
}

fn main() {
    let cli = Cli::parse();
    logging::init(&cli.verbosity);

    match cli.command {
        Commands::Process { paths, output, config, manifest } => {
            let options = nsflat::Options { inputs: paths, output, config, manifest };
            match nsflat::run(&options) {
                Ok(summary) => {
                    eprintln!("flattened {} file(s) into {}", summary.files(), summary.output.display());
                }
                Err(err) => {
                    report(&err);
                    std::process::exit(1);
                }
            }
        }
    }
}
