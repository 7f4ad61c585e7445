//! Stream Sentry CLI application
//!
//! Command-line interface for probing IPTV stream endpoints and building a
//! blocklist of dead streams. Features concurrent probing, progress tracking,
//! and per-source result reporting.

use std::process;

use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use stream_sentry::cli::{handle_check, Cli};
use stream_sentry::errors::Result;

#[tokio::main]
async fn main() {
    let result = run().await;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Main application logic
async fn run() -> Result<()> {
    let cli = Cli::parse_args();

    init_logging(&cli);

    info!("Stream Sentry v{} starting", env!("CARGO_PKG_VERSION"));

    handle_check(cli).await
}

/// Initialize logging based on CLI verbosity settings
fn init_logging(cli: &Cli) {
    let log_level = cli.log_level();

    let filter = EnvFilter::from_default_env()
        .add_directive(format!("stream_sentry={}", log_level).parse().unwrap());

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(cli.very_verbose)
        .init();
}
