//! Core application logic for Stream Sentry
//!
//! This module contains the playlist parser, the endpoint prober, the
//! concurrent batch scheduler, and the run aggregator that ties them
//! together.
//!
//! # Examples
//!
//! ```rust,no_run
//! use stream_sentry::app::{
//!     BatchScheduler, FetchConfig, ProbeConfig, RunAggregator, SchedulerConfig, SourceClient,
//!     StreamProber,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let aggregator = RunAggregator::new(
//!     SourceClient::new(FetchConfig::default())?,
//!     StreamProber::new(&ProbeConfig::default())?,
//!     BatchScheduler::new(SchedulerConfig::default())?,
//! );
//!
//! let report = aggregator.run(&["us".to_string()], |_event| {}).await;
//! println!("{} broken endpoints", report.blocklist.total_broken);
//! # Ok(())
//! # }
//! ```

pub mod aggregator;
pub mod client;
pub mod models;
pub mod playlist;
pub mod prober;
pub mod scheduler;

// Re-export main public API
pub use aggregator::{RunAggregator, RunEvent, RunReport};
pub use client::{FetchConfig, SourceClient};
pub use models::{BlocklistReport, ChannelRecord, ProbeOutcome, SourceSummary};
pub use prober::{ProbeConfig, StreamProber};
pub use scheduler::{BatchPartition, BatchProgress, BatchScheduler, SchedulerConfig};
