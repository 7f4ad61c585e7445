//! Run aggregation across sources
//!
//! Drives one or more sources through fetch, parse, and batch testing, and
//! merges the broken endpoints into the final blocklist report. Sources are
//! processed sequentially, one complete batch each; probes within a source
//! run concurrently. A fetch failure isolates its source (zero channels,
//! visible warning) and never aborts the run.

use std::collections::BTreeSet;

use tracing::warn;

use super::client::SourceClient;
use super::models::{BlocklistReport, SourceSummary};
use super::playlist;
use super::prober::StreamProber;
use super::scheduler::{BatchPartition, BatchProgress, BatchScheduler};
use crate::errors::FetchError;

/// Observable events emitted while a run progresses.
///
/// The aggregator owns the run lifecycle; rendering is left to the caller.
#[derive(Debug)]
pub enum RunEvent {
    /// A source is about to be fetched
    SourceStarted { source: String },
    /// Fetching a source playlist failed; the source is skipped
    FetchFailed { source: String, error: FetchError },
    /// A source playlist was parsed into channel records
    SourceParsed { source: String, channels: usize },
    /// Periodic progress within a source batch
    Progress { source: String, progress: BatchProgress },
    /// A source batch finished
    SourceFinished { summary: SourceSummary },
}

/// Final result of a run: per-source summaries and the blocklist artifact
#[derive(Debug)]
pub struct RunReport {
    /// Per-source summaries in run order, source codes uppercased
    pub summaries: Vec<SourceSummary>,
    /// De-duplicated broken endpoints across all sources
    pub blocklist: BlocklistReport,
}

impl RunReport {
    /// Total channels tested across all sources
    pub fn total_tested(&self) -> usize {
        self.summaries.iter().map(|s| s.total).sum()
    }
}

/// Accumulates per-source partitions into the final report.
///
/// Broken URLs are merged with set semantics, so the same dead endpoint
/// appearing in several sources (or several times within one) is reported
/// once. Every partition handed in is counted exactly once.
#[derive(Debug, Default)]
pub struct RunAccumulator {
    broken_urls: BTreeSet<String>,
    summaries: Vec<SourceSummary>,
}

impl RunAccumulator {
    /// Create an empty accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one source's partition into the accumulator and return the
    /// summary row recorded for it
    pub fn record_source(&mut self, source_id: &str, partition: &BatchPartition) -> SourceSummary {
        for record in &partition.broken {
            self.broken_urls.insert(record.url.clone());
        }

        let summary = SourceSummary {
            source: source_id.to_ascii_uppercase(),
            total: partition.total(),
            working: partition.working.len(),
            broken: partition.broken.len(),
        };
        self.summaries.push(summary.clone());
        summary
    }

    /// Build the final report from everything accumulated
    pub fn finish(self) -> RunReport {
        RunReport {
            summaries: self.summaries,
            blocklist: BlocklistReport::new(self.broken_urls.into_iter().collect()),
        }
    }
}

/// Drives sources through fetch, parse, and batch testing
#[derive(Debug)]
pub struct RunAggregator {
    client: SourceClient,
    prober: StreamProber,
    scheduler: BatchScheduler,
}

impl RunAggregator {
    /// Assemble an aggregator from its collaborators
    pub fn new(client: SourceClient, prober: StreamProber, scheduler: BatchScheduler) -> Self {
        Self {
            client,
            prober,
            scheduler,
        }
    }

    /// Test every source and build the final report.
    ///
    /// Source codes are lowercased before fetching. Each source runs as one
    /// complete batch before the next begins. `observer` receives lifecycle
    /// and progress events for rendering.
    pub async fn run(
        &self,
        source_ids: &[String],
        mut observer: impl FnMut(RunEvent),
    ) -> RunReport {
        let mut accumulator = RunAccumulator::new();

        for source_id in source_ids {
            let source = source_id.to_ascii_lowercase();
            observer(RunEvent::SourceStarted {
                source: source.clone(),
            });

            let text = match self.client.fetch_playlist(&source).await {
                Ok(text) => text,
                Err(error) => {
                    warn!(source = %source, %error, "playlist fetch failed, skipping source");
                    observer(RunEvent::FetchFailed {
                        source: source.clone(),
                        error,
                    });
                    let summary =
                        accumulator.record_source(&source, &BatchPartition::default());
                    observer(RunEvent::SourceFinished { summary });
                    continue;
                }
            };

            let records = playlist::parse(&text, &source);
            observer(RunEvent::SourceParsed {
                source: source.clone(),
                channels: records.len(),
            });

            let partition = self
                .scheduler
                .run_batch(
                    records,
                    |record| self.prober.probe(record),
                    |progress| {
                        observer(RunEvent::Progress {
                            source: source.clone(),
                            progress,
                        })
                    },
                )
                .await;

            let summary = accumulator.record_source(&source, &partition);
            observer(RunEvent::SourceFinished { summary });
        }

        accumulator.finish()
    }
}
