//! Endpoint probing and response classification
//!
//! Issues one bounded partial-content request per channel record and converts
//! the result into a [`ProbeOutcome`]. Every failure path, transport errors,
//! bad statuses, unreadable bodies, is absorbed into a non-reachable outcome
//! with a short detail string. Nothing in this module returns an error once
//! the prober has been constructed.
//!
//! Probe request shape: HTTP GET with `Range: bytes=0-1023`, the identifying
//! user agent, and a client-side timeout. At most the first kilobyte of the
//! body is read. URLs whose path ends in `.m3u8` or `.m3u` additionally get a
//! shallow validity sniff for HLS marker substrings.

use std::time::Duration;

use reqwest::header::RANGE;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};
use url::Url;

use super::models::{ChannelRecord, ProbeOutcome};
use crate::constants::{http, probe};
use crate::errors::ConfigResult;

/// Configuration for the endpoint prober
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Per-probe timeout, covers connect and body read
    pub timeout: Duration,
    /// Connection establishment timeout
    pub connect_timeout: Duration,
    /// User agent sent with every probe
    pub user_agent: String,
    /// Connection pool idle timeout
    pub pool_idle_timeout: Duration,
    /// Maximum idle connections per host
    pub pool_max_per_host: usize,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout: http::PROBE_TIMEOUT,
            connect_timeout: http::CONNECT_TIMEOUT,
            user_agent: http::USER_AGENT.to_string(),
            pool_idle_timeout: http::POOL_IDLE_TIMEOUT,
            pool_max_per_host: http::POOL_MAX_PER_HOST,
        }
    }
}

impl ProbeConfig {
    /// Builds the HTTP client used for all probes
    pub fn build_http_client(&self) -> ConfigResult<Client> {
        let client = Client::builder()
            .user_agent(self.user_agent.as_str())
            .connect_timeout(self.connect_timeout)
            .pool_idle_timeout(self.pool_idle_timeout)
            .pool_max_idle_per_host(self.pool_max_per_host)
            .build()?;
        Ok(client)
    }
}

/// Prober issuing one bounded probe per channel record
#[derive(Debug)]
pub struct StreamProber {
    client: Client,
    timeout: Duration,
}

impl StreamProber {
    /// Create a prober with its own HTTP client
    pub fn new(config: &ProbeConfig) -> ConfigResult<Self> {
        Ok(Self {
            client: config.build_http_client()?,
            timeout: config.timeout,
        })
    }

    /// Probe one endpoint and classify the result.
    ///
    /// Exactly one outcome is produced per record; this method never fails
    /// and never retries.
    pub async fn probe(&self, record: ChannelRecord) -> ProbeOutcome {
        trace!(url = %record.url, "probing endpoint");

        let request = self
            .client
            .get(&record.url)
            .header(RANGE, probe::RANGE_HEADER_VALUE)
            .timeout(self.timeout);

        let outcome = match request.send().await {
            Ok(response) => self.classify_response(record, response).await,
            Err(e) => classify_request_error(record, &e),
        };

        debug!(
            url = %outcome.record.url,
            reachable = outcome.reachable,
            detail = %outcome.detail,
            "probe complete"
        );
        outcome
    }

    /// Classify a response the server actually produced
    async fn classify_response(&self, record: ChannelRecord, response: Response) -> ProbeOutcome {
        let status = response.status();
        if !status.is_success() {
            return ProbeOutcome::new(record, false, format!("HTTP {}", status.as_u16()));
        }

        let body = match read_limited(response).await {
            Ok(body) => body,
            Err(e) => return classify_request_error(record, &e),
        };

        classify_body(record, status, &body)
    }
}

/// Classify a successful response from its status and truncated body.
///
/// HLS-looking URLs get a marker sniff; a 200/206 without markers is still
/// accepted, since some valid upstreams omit markers within the truncated
/// first kilobyte (tolerance policy, intentionally not tightened).
fn classify_body(record: ChannelRecord, status: StatusCode, body: &[u8]) -> ProbeOutcome {
    let code = status.as_u16();
    let partial_ok = code == 200 || code == 206;

    if looks_like_hls_url(&record.url) {
        let text = String::from_utf8_lossy(body);
        if probe::HLS_MARKERS.iter().any(|marker| text.contains(marker)) {
            ProbeOutcome::new(record, true, format!("OK ({}, valid HLS)", code))
        } else if partial_ok {
            ProbeOutcome::new(record, true, format!("OK ({})", code))
        } else {
            ProbeOutcome::new(record, false, "Invalid HLS content")
        }
    } else if partial_ok {
        ProbeOutcome::new(record, true, format!("OK ({})", code))
    } else {
        ProbeOutcome::new(record, false, format!("HTTP {}", code))
    }
}

/// Convert a reqwest error into a non-reachable outcome.
///
/// A failure carrying a status code is reported as `HTTP {code}`; transport
/// failures (DNS, connect, timeout, TLS) as `URL Error: {reason}`; anything
/// else as `Error: {message}`.
fn classify_request_error(record: ChannelRecord, error: &reqwest::Error) -> ProbeOutcome {
    if let Some(status) = error.status() {
        return ProbeOutcome::new(record, false, format!("HTTP {}", status.as_u16()));
    }

    if error.is_builder() || error.is_body() || error.is_decode() {
        return ProbeOutcome::new(record, false, format!("Error: {}", root_cause(error)));
    }

    ProbeOutcome::new(record, false, format!("URL Error: {}", root_cause(error)))
}

/// Innermost error message in the source chain.
///
/// The outer reqwest message embeds the full URL, which would dominate the
/// bounded detail string; the root cause carries the useful part.
fn root_cause(error: &reqwest::Error) -> String {
    let mut cause: &dyn std::error::Error = error;
    while let Some(next) = cause.source() {
        cause = next;
    }
    cause.to_string()
}

/// Whether a URL points at a streaming playlist, judged by its path extension.
///
/// The query string is ignored, so `live.m3u8?token=x` matches. URLs that do
/// not parse fall back to a substring check; the transport layer reports the
/// real problem for those.
fn looks_like_hls_url(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => {
            let path = parsed.path().to_ascii_lowercase();
            path.ends_with(".m3u8") || path.ends_with(".m3u")
        }
        Err(_) => url.contains(".m3u8") || url.contains(".m3u"),
    }
}

/// Read at most the probe byte limit from a response body.
///
/// Servers ignoring the Range header would otherwise stream an entire live
/// feed into the checker.
async fn read_limited(mut response: Response) -> Result<Vec<u8>, reqwest::Error> {
    let mut body = Vec::with_capacity(probe::READ_LIMIT);
    while let Some(chunk) = response.chunk().await? {
        body.extend_from_slice(&chunk);
        if body.len() >= probe::READ_LIMIT {
            body.truncate(probe::READ_LIMIT);
            break;
        }
    }
    Ok(body)
}
