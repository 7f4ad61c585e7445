//! Command handler for Stream Sentry
//!
//! Wires configuration, the aggregator, and console reporting together. All
//! outer I/O lives here: console output, progress rendering, and writing the
//! blocklist artifact to disk.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::info;

use super::args::Cli;
use super::progress::BatchProgressBar;
use crate::app::{
    BatchScheduler, BlocklistReport, RunAggregator, RunEvent, RunReport, SourceClient,
    StreamProber,
};
use crate::config::AppConfig;
use crate::errors::{AppError, ReportError, ReportResult, Result};

/// Apply CLI overrides on top of the loaded configuration
pub fn apply_cli_overrides(config: &mut AppConfig, args: &Cli) {
    if let Some(workers) = args.workers {
        config.scheduler.concurrency = workers;
    }
    if let Some(secs) = args.probe_timeout {
        config.probe.timeout = Duration::from_secs(secs);
    }
    if let Some(secs) = args.fetch_timeout {
        config.fetch.timeout = Duration::from_secs(secs);
    }
    if let Some(output) = &args.output {
        config.report.output = output.clone();
    }
}

/// Run the health check across the requested sources and write the blocklist
pub async fn handle_check(args: Cli) -> Result<()> {
    args.validate().map_err(AppError::generic)?;

    let mut config = AppConfig::load(args.config.clone()).await?;
    apply_cli_overrides(&mut config, &args);
    let output_path = config.report.output.clone();

    let (probe_config, fetch_config, scheduler_config) = config.to_runtime_config();
    let aggregator = RunAggregator::new(
        SourceClient::new(fetch_config)?,
        StreamProber::new(&probe_config)?,
        BatchScheduler::new(scheduler_config)?,
    );

    let sources = args.source_codes();
    let chatty = !args.quiet;
    let started = Instant::now();

    let mut bar: Option<BatchProgressBar> = None;
    let report = aggregator
        .run(&sources, |event| match event {
            RunEvent::SourceStarted { source } => {
                if chatty {
                    println!("\n{}", "=".repeat(60));
                    println!("  Testing: {}", source.to_ascii_uppercase());
                    println!("{}", "=".repeat(60));
                }
            }
            RunEvent::FetchFailed { error, .. } => {
                if chatty {
                    println!("  Failed to fetch playlist: {}", error);
                }
            }
            RunEvent::SourceParsed { channels, .. } => {
                if chatty {
                    println!("  Found {} channels", channels);
                }
                bar = Some(BatchProgressBar::new(channels, chatty));
            }
            RunEvent::Progress { progress, .. } => {
                if let Some(bar) = &bar {
                    bar.update(&progress);
                }
            }
            RunEvent::SourceFinished { summary } => {
                if let Some(bar) = bar.take() {
                    bar.finish();
                }
                if chatty && summary.total > 0 {
                    println!("\n  Results for {}:", summary.source);
                    println!("    Working: {}", summary.working);
                    println!("    Broken:  {}", summary.broken);
                    println!("    Total:   {}", summary.total);
                }
            }
        })
        .await;

    write_report(&report.blocklist, &output_path).await?;
    info!(
        broken = report.blocklist.total_broken,
        path = %output_path.display(),
        "blocklist written"
    );

    if chatty {
        print_summary(&report, &output_path, started.elapsed());
    }

    Ok(())
}

/// Print the end-of-run summary block
fn print_summary(report: &RunReport, output_path: &Path, elapsed: Duration) {
    println!("\n{}", "=".repeat(60));
    println!("  SUMMARY");
    println!("{}", "=".repeat(60));
    for summary in &report.summaries {
        println!(
            "  {}: {}/{} working ({:.0}%)",
            summary.source,
            summary.working,
            summary.total,
            summary.working_percent()
        );
    }
    println!("\n  Time: {:.1}s", elapsed.as_secs_f64());
    println!(
        "  Blocklist saved to: {} ({} URLs)",
        output_path.display(),
        report.blocklist.total_broken
    );
}

/// Persist the blocklist report as pretty-printed JSON
pub async fn write_report(report: &BlocklistReport, path: &PathBuf) -> ReportResult<()> {
    let json = serde_json::to_string_pretty(report)?;
    tokio::fs::write(path, json)
        .await
        .map_err(|source| ReportError::Io {
            path: path.clone(),
            source,
        })?;
    Ok(())
}
