//! Stream Sentry Library
//!
//! A Rust library for checking the health of IPTV stream endpoints. Fetches
//! per-source M3U playlists, probes every endpoint concurrently with bounded
//! partial-content requests, and produces a de-duplicated blocklist of dead
//! streams for downstream filtering.

pub mod app;
pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;

// Re-export commonly used types for convenience
pub use errors::{AppError, Result};
