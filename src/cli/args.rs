//! Command-line argument parsing for Stream Sentry
//!
//! This module defines the CLI structure using clap derive macros. The tool
//! is single-purpose, so the surface is flat: source codes as positional
//! arguments plus overrides for the knobs that matter per run.

use std::path::PathBuf;

use clap::Parser;

use crate::constants::sources;

/// Stream Sentry - find dead IPTV stream endpoints
#[derive(Parser, Debug)]
#[command(
    name = "stream_sentry",
    version,
    about = "Probe IPTV playlist endpoints and build a blocklist of dead streams",
    long_about = "Fetches one or more per-country IPTV playlists, probes every stream endpoint \
with a bounded partial-content request, and writes a JSON blocklist of unreachable endpoints \
for downstream filtering."
)]
pub struct Cli {
    /// Source codes to test (e.g. "us uk de"); defaults to "us"
    #[arg(value_name = "SOURCE")]
    pub sources: Vec<String>,

    /// Number of probes in flight simultaneously
    #[arg(short = 'w', long, value_name = "N")]
    pub workers: Option<usize>,

    /// Per-probe timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub probe_timeout: Option<u64>,

    /// Per-playlist fetch timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub fetch_timeout: Option<u64>,

    /// Path for the generated blocklist JSON
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Configuration file path
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Very verbose logging (debug level)
    #[arg(long)]
    pub very_verbose: bool,

    /// Quiet mode - suppress progress bars and non-essential output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Source codes to test, falling back to the built-in default
    pub fn source_codes(&self) -> Vec<String> {
        if self.sources.is_empty() {
            vec![sources::DEFAULT_SOURCE.to_string()]
        } else {
            self.sources.clone()
        }
    }

    /// Get the logging level based on verbosity flags
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.very_verbose {
            tracing::Level::DEBUG
        } else if self.verbose {
            tracing::Level::INFO
        } else {
            tracing::Level::WARN
        }
    }

    /// Validate argument combinations
    pub fn validate(&self) -> Result<(), String> {
        if self.workers == Some(0) {
            return Err("Number of workers must be greater than 0".to_string());
        }

        if self.probe_timeout == Some(0) || self.fetch_timeout == Some(0) {
            return Err("Timeouts must be greater than 0 seconds".to_string());
        }

        if self.verbose && self.quiet {
            return Err("Cannot combine --verbose with --quiet".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli() -> Cli {
        Cli {
            sources: Vec::new(),
            workers: None,
            probe_timeout: None,
            fetch_timeout: None,
            output: None,
            config: None,
            verbose: false,
            very_verbose: false,
            quiet: false,
        }
    }

    #[test]
    fn test_default_source() {
        let args = cli();
        assert_eq!(args.source_codes(), vec!["us".to_string()]);

        let args = Cli {
            sources: vec!["uk".to_string(), "de".to_string()],
            ..cli()
        };
        assert_eq!(args.source_codes(), vec!["uk", "de"]);
    }

    #[test]
    fn test_validation() {
        assert!(cli().validate().is_ok());

        let zero_workers = Cli {
            workers: Some(0),
            ..cli()
        };
        assert!(zero_workers.validate().is_err());

        let zero_timeout = Cli {
            probe_timeout: Some(0),
            ..cli()
        };
        assert!(zero_timeout.validate().is_err());

        let conflicting = Cli {
            verbose: true,
            quiet: true,
            ..cli()
        };
        assert!(conflicting.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        assert_eq!(cli().log_level(), tracing::Level::WARN);

        let quiet = Cli {
            quiet: true,
            ..cli()
        };
        assert_eq!(quiet.log_level(), tracing::Level::ERROR);

        let verbose = Cli {
            verbose: true,
            ..cli()
        };
        assert_eq!(verbose.log_level(), tracing::Level::INFO);

        let very_verbose = Cli {
            very_verbose: true,
            ..cli()
        };
        assert_eq!(very_verbose.log_level(), tracing::Level::DEBUG);
    }

    #[test]
    fn test_parse_from_argv() {
        let args = Cli::parse_from([
            "stream_sentry",
            "us",
            "uk",
            "-w",
            "10",
            "--probe-timeout",
            "4",
            "-o",
            "dead.json",
        ]);
        assert_eq!(args.sources, vec!["us", "uk"]);
        assert_eq!(args.workers, Some(10));
        assert_eq!(args.probe_timeout, Some(4));
        assert_eq!(args.output, Some(PathBuf::from("dead.json")));
    }
}
