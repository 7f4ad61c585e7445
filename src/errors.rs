//! Error types for Stream Sentry
//!
//! Only the outer surfaces of the application carry error types: fetching a
//! source playlist, loading configuration, and persisting the blocklist
//! report. Probe failures never surface as errors; the prober converts every
//! failure path into a `ProbeOutcome` with `reachable = false`, and the
//! parser drops malformed entries silently.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while fetching a source playlist
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP request failed (DNS, connect, timeout, TLS)
    #[error("playlist request failed for source '{source_id}'")]
    Http {
        source_id: String,
        #[source]
        source: reqwest::Error,
    },

    /// Server answered with a non-success status
    #[error("playlist fetch for source '{source_id}' returned HTTP {status}")]
    Status { source_id: String, status: u16 },

    /// The playlist URL template produced an invalid URL
    #[error("invalid playlist URL for source '{source_id}': {url}")]
    InvalidUrl { source_id: String, url: String },
}

impl FetchError {
    /// Source identifier the failure belongs to
    pub fn source_id(&self) -> &str {
        match self {
            FetchError::Http { source_id, .. }
            | FetchError::Status { source_id, .. }
            | FetchError::InvalidUrl { source_id, .. } => source_id,
        }
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("configuration file not found: {path}")]
    NotFound { path: PathBuf },

    /// Invalid configuration format
    #[error("invalid configuration format")]
    InvalidFormat(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("invalid configuration value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    /// I/O error reading configuration
    #[error("failed to read configuration")]
    Io(#[from] std::io::Error),

    /// HTTP client construction failed
    #[error("failed to build HTTP client")]
    HttpClient(#[from] reqwest::Error),
}

/// Errors raised while writing the blocklist report
#[derive(Error, Debug)]
pub enum ReportError {
    /// JSON serialization failed
    #[error("failed to serialize blocklist report")]
    Serialize(#[from] serde_json::Error),

    /// I/O error writing the report file
    #[error("failed to write blocklist report to {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Top-level application error that can represent any error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Playlist fetch error
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Report persistence error
    #[error(transparent)]
    Report(#[from] ReportError),

    /// Generic application error with context
    #[error("application error: {message}")]
    Generic { message: String },
}

impl AppError {
    /// Create a generic application error with a message
    pub fn generic(message: impl Into<String>) -> Self {
        Self::Generic {
            message: message.into(),
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Fetch(_) => "fetch",
            AppError::Config(_) => "config",
            AppError::Report(_) => "report",
            AppError::Generic { .. } => "generic",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

/// Fetch result type alias
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Configuration result type alias
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Report result type alias
pub type ReportResult<T> = std::result::Result<T, ReportError>;
