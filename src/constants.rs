//! Application constants for Stream Sentry
//!
//! This module centralizes all constants used throughout the application,
//! organized by functional domain for maintainability and clarity.

use std::time::Duration;

/// HTTP client configuration constants
pub mod http {
    use super::Duration;

    /// Default user agent for all HTTP requests
    pub const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) StreamSentry/0.1";

    /// Default timeout for a single endpoint probe
    pub const PROBE_TIMEOUT: Duration = Duration::from_secs(8);

    /// Default timeout for fetching a source playlist
    pub const FETCH_TIMEOUT: Duration = Duration::from_secs(15);

    /// Connection establishment timeout
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

    /// Connection pool idle timeout
    pub const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

    /// Maximum connections per host in pool
    pub const POOL_MAX_PER_HOST: usize = 32;
}

/// Endpoint probe constants
pub mod probe {
    /// Byte range requested for each probe (first kilobyte only)
    pub const RANGE_HEADER_VALUE: &str = "bytes=0-1023";

    /// Maximum number of body bytes read per probe
    pub const READ_LIMIT: usize = 1024;

    /// Maximum length of a probe outcome detail string
    pub const DETAIL_MAX_LEN: usize = 60;

    /// Substrings that mark a response body as a valid HLS playlist
    pub const HLS_MARKERS: [&str; 3] = ["#EXTM3U", "#EXTINF", "#EXT-X"];
}

/// Playlist parsing constants
pub mod playlist {
    /// Directive prefix that starts a new channel entry
    pub const EXTINF_PREFIX: &str = "#EXTINF:";

    /// Attribute key for the channel logo
    pub const LOGO_ATTR: &str = "tvg-logo";

    /// Attribute key for the channel group
    pub const GROUP_ATTR: &str = "group-title";

    /// Display name used when a directive line carries no name
    pub const UNKNOWN_NAME: &str = "Unknown";
}

/// Worker and concurrency configuration
pub mod workers {
    /// Default number of probes in flight at once
    pub const DEFAULT_CONCURRENCY: usize = 30;

    /// Upper bound on the configurable concurrency cap
    pub const MAX_CONCURRENCY: usize = 256;

    /// Number of completions between progress observations
    pub const PROGRESS_INTERVAL: usize = 20;
}

/// Source playlist locations
pub mod sources {
    /// URL template for per-country playlists; `{code}` is replaced with the
    /// lowercased source code
    pub const PLAYLIST_URL_TEMPLATE: &str = "https://iptv-org.github.io/iptv/countries/{code}.m3u";

    /// Source tested when none are given on the command line
    pub const DEFAULT_SOURCE: &str = "us";
}

/// Blocklist report output
pub mod report {
    /// Default path for the generated blocklist
    pub const DEFAULT_OUTPUT_PATH: &str = "blocklist.json";
}

// Re-export commonly used constants for convenience
pub use http::{FETCH_TIMEOUT, PROBE_TIMEOUT, USER_AGENT};
pub use probe::DETAIL_MAX_LEN;
pub use sources::DEFAULT_SOURCE;
pub use workers::DEFAULT_CONCURRENCY;
