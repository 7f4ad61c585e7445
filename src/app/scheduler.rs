//! Concurrent batch scheduling of endpoint probes
//!
//! Fans a batch of channel records out to the prober with a fixed cap on
//! in-flight probes and partitions the results into working and broken sets.
//! Results are consumed in completion order from a single driving task, so
//! the two accumulators are task-local and never shared across concurrent
//! contexts. Every record that enters a batch is accounted for exactly once.
//!
//! A batch always runs to completion; bounded per-probe timeouts bound total
//! batch time.

use std::future::Future;

use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::models::{ChannelRecord, ProbeOutcome};
use crate::constants::workers;
use crate::errors::{ConfigError, ConfigResult};

/// Configuration for batch scheduling
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Maximum number of probes in flight simultaneously
    pub concurrency: usize,
    /// Completions between progress observations
    pub progress_interval: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            concurrency: workers::DEFAULT_CONCURRENCY,
            progress_interval: workers::PROGRESS_INTERVAL,
        }
    }
}

impl SchedulerConfig {
    /// Validate configuration bounds
    pub fn validate(&self) -> ConfigResult<()> {
        if self.concurrency == 0 {
            return Err(ConfigError::InvalidValue {
                field: "concurrency".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }
        if self.concurrency > workers::MAX_CONCURRENCY {
            return Err(ConfigError::InvalidValue {
                field: "concurrency".to_string(),
                reason: format!("must be at most {}", workers::MAX_CONCURRENCY),
            });
        }
        if self.progress_interval == 0 {
            return Err(ConfigError::InvalidValue {
                field: "progress_interval".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}

/// Snapshot of a batch in progress, emitted every N completions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchProgress {
    /// Probes completed so far
    pub completed: usize,
    /// Total records in the batch
    pub total: usize,
    /// Reachable endpoints so far
    pub working: usize,
    /// Broken endpoints so far
    pub broken: usize,
}

impl BatchProgress {
    /// Completion percentage, 100.0 for an empty batch
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            self.completed as f64 / self.total as f64 * 100.0
        }
    }
}

/// Partition of a batch into working and broken records.
///
/// Output order follows probe completion order, not input order.
#[derive(Debug, Default)]
pub struct BatchPartition {
    /// Records whose endpoints answered acceptably
    pub working: Vec<ChannelRecord>,
    /// Records whose endpoints are unreachable or invalid
    pub broken: Vec<ChannelRecord>,
}

impl BatchPartition {
    /// Total records accounted for
    pub fn total(&self) -> usize {
        self.working.len() + self.broken.len()
    }
}

/// Schedules probe batches with bounded concurrency
#[derive(Debug, Clone)]
pub struct BatchScheduler {
    config: SchedulerConfig,
}

impl BatchScheduler {
    /// Create a scheduler after validating its configuration
    pub fn new(config: SchedulerConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Scheduler configuration
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Probe every record in the batch and partition the results.
    ///
    /// At most `concurrency` probes run simultaneously. `on_progress` is
    /// invoked every `progress_interval` completions and once after the final
    /// completion. An empty batch returns immediately with two empty sets and
    /// no network activity.
    pub async fn run_batch<F, Fut>(
        &self,
        records: Vec<ChannelRecord>,
        probe: F,
        mut on_progress: impl FnMut(BatchProgress),
    ) -> BatchPartition
    where
        F: Fn(ChannelRecord) -> Fut,
        Fut: Future<Output = ProbeOutcome>,
    {
        let total = records.len();
        let mut partition = BatchPartition::default();
        if total == 0 {
            return partition;
        }

        debug!(
            total,
            concurrency = self.config.concurrency,
            "starting probe batch"
        );

        let mut completions = stream::iter(records)
            .map(|record| probe(record))
            .buffer_unordered(self.config.concurrency);

        let mut completed = 0;
        while let Some(outcome) = completions.next().await {
            completed += 1;
            if outcome.reachable {
                partition.working.push(outcome.record);
            } else {
                partition.broken.push(outcome.record);
            }

            if completed % self.config.progress_interval == 0 || completed == total {
                on_progress(BatchProgress {
                    completed,
                    total,
                    working: partition.working.len(),
                    broken: partition.broken.len(),
                });
            }
        }

        info!(
            total,
            working = partition.working.len(),
            broken = partition.broken.len(),
            "probe batch complete"
        );
        partition
    }
}
