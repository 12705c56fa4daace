//! Subscriber setup for the command-line binary. The library only emits events.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

/// Overrides `-v`/`-q` with a full filter directive when set.
pub const LOG_ENV: &str = "NSFLAT_LOG";

#[derive(clap::Args, Debug, Clone, Default)]
pub struct Verbosity {
    #[arg(
        long,
        short = 'v',
        help = "Use verbose output (`-vv` for trace output)",
        action = clap::ArgAction::Count,
        global = true,
        overrides_with = "quiet",
    )]
    verbose: u8,

    #[arg(long, short, help = "Only print warnings and errors", global = true, overrides_with = "verbose")]
    quiet: bool,
}

impl Verbosity {
    pub fn level_filter(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::WARN;
        }
        match self.verbose {
            0 => LevelFilter::INFO,
            1 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }
}

fn build_filter(verbosity: &Verbosity) -> EnvFilter {
    match std::env::var(LOG_ENV) {
        Ok(directives) => EnvFilter::builder().parse_lossy(directives),
        Err(_) => EnvFilter::default().add_directive(verbosity.level_filter().into()),
    }
}

/// Install the stderr fmt subscriber.
pub fn init(verbosity: &Verbosity) {
    tracing_subscriber::fmt()
        .with_env_filter(build_filter(verbosity))
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
