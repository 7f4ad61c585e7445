//! Core data models for Stream Sentry
//!
//! Defines the channel record produced by the playlist parser, the outcome
//! produced by the endpoint prober, the per-source summary, and the final
//! blocklist report artifact.

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::constants::probe;

/// One playlist entry: a named channel and its stream endpoint.
///
/// Records are immutable once constructed. The parser is the only producer;
/// after classification only derived outcome data is retained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelRecord {
    /// Display name, never empty (defaults to "Unknown")
    pub name: String,
    /// Stream endpoint URL, never empty
    pub url: String,
    /// Channel logo URL, empty if the directive carried none
    pub logo: String,
    /// Group title, empty if the directive carried none
    pub group: String,
    /// Origin identifier, e.g. a country code
    pub source: String,
}

/// Result of probing one channel record
#[derive(Debug, Clone)]
pub struct ProbeOutcome {
    /// The record this outcome classifies
    pub record: ChannelRecord,
    /// Whether the endpoint answered acceptably
    pub reachable: bool,
    /// Short human-readable classification, bounded length
    pub detail: String,
}

impl ProbeOutcome {
    /// Build an outcome, truncating the detail string to its bounded length
    pub fn new(record: ChannelRecord, reachable: bool, detail: impl Into<String>) -> Self {
        Self {
            record,
            reachable,
            detail: truncate_detail(detail.into()),
        }
    }
}

/// Truncate a detail string to the bounded outcome length.
///
/// Truncation is on a character boundary so arbitrary error messages cannot
/// split a multi-byte sequence.
pub fn truncate_detail(mut detail: String) -> String {
    if detail.chars().count() > probe::DETAIL_MAX_LEN {
        detail = detail.chars().take(probe::DETAIL_MAX_LEN).collect();
    }
    detail
}

/// Per-source aggregate counts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSummary {
    /// Source identifier
    pub source: String,
    /// Total channels tested
    pub total: usize,
    /// Channels classified reachable
    pub working: usize,
    /// Channels classified broken
    pub broken: usize,
}

impl SourceSummary {
    /// Percentage of working channels, 0.0 for an empty source
    pub fn working_percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.working as f64 / self.total as f64 * 100.0
        }
    }
}

/// Final blocklist artifact written at the end of a run
#[derive(Debug, Clone, Serialize)]
pub struct BlocklistReport {
    /// Generation timestamp, ISO-8601 UTC
    pub generated: String,
    /// Number of unique broken endpoint URLs
    pub total_broken: usize,
    /// De-duplicated broken endpoint URLs
    pub urls: Vec<String>,
}

impl BlocklistReport {
    /// Build a report from an already de-duplicated URL collection
    pub fn new(urls: Vec<String>) -> Self {
        Self {
            generated: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            total_broken: urls.len(),
            urls,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(url: &str) -> ChannelRecord {
        ChannelRecord {
            name: "Test".to_string(),
            url: url.to_string(),
            logo: String::new(),
            group: String::new(),
            source: "us".to_string(),
        }
    }

    #[test]
    fn test_detail_truncation() {
        let long = "x".repeat(200);
        let outcome = ProbeOutcome::new(record("http://a"), false, format!("Error: {}", long));
        assert_eq!(outcome.detail.chars().count(), probe::DETAIL_MAX_LEN);
        assert!(outcome.detail.starts_with("Error: "));
    }

    #[test]
    fn test_short_detail_unchanged() {
        let outcome = ProbeOutcome::new(record("http://a"), true, "OK (200)");
        assert_eq!(outcome.detail, "OK (200)");
    }

    #[test]
    fn test_truncation_is_char_safe() {
        let detail = "é".repeat(100);
        let truncated = truncate_detail(detail);
        assert_eq!(truncated.chars().count(), probe::DETAIL_MAX_LEN);
    }

    #[test]
    fn test_working_percent() {
        let summary = SourceSummary {
            source: "us".to_string(),
            total: 4,
            working: 3,
            broken: 1,
        };
        assert_eq!(summary.working_percent(), 75.0);

        let empty = SourceSummary {
            source: "de".to_string(),
            total: 0,
            working: 0,
            broken: 0,
        };
        assert_eq!(empty.working_percent(), 0.0);
    }

    #[test]
    fn test_report_serialization_shape() {
        let report = BlocklistReport::new(vec![
            "http://example.com/a".to_string(),
            "http://example.com/b".to_string(),
        ]);
        assert_eq!(report.total_broken, 2);

        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("generated").unwrap().is_string());
        assert_eq!(json.get("total_broken").unwrap(), 2);
        assert_eq!(json.get("urls").unwrap().as_array().unwrap().len(), 2);
        // RFC 3339 with trailing Z, e.g. 2026-08-30T12:00:00Z
        assert!(json["generated"].as_str().unwrap().ends_with('Z'));
    }
}
