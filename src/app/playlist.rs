//! M3U playlist parsing
//!
//! Converts raw playlist text into channel records. Each channel is described
//! by one `#EXTINF:` directive line followed by one URL line; comment and
//! blank lines may sit between them. The parser is a small explicit state
//! machine with two states:
//!
//! - `AwaitingDirective`: skip everything until an `#EXTINF:` line starts a
//!   pending channel.
//! - `AwaitingUrl`: the next non-comment, non-blank line terminates the
//!   pending channel. Another directive line replaces the pending channel,
//!   dropping the unterminated one silently.
//!
//! Malformed input never produces an error; malformed entries are simply
//! excluded from the output.

use tracing::debug;

use super::models::ChannelRecord;
use crate::constants::playlist::{EXTINF_PREFIX, GROUP_ATTR, LOGO_ATTR, UNKNOWN_NAME};

/// Partial channel built from a directive line, waiting for its URL line
#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingChannel {
    name: String,
    logo: String,
    group: String,
    source: String,
}

impl PendingChannel {
    /// Parse a directive line into a pending channel.
    ///
    /// The display name is the substring after the last comma, trimmed, and
    /// defaults to "Unknown" when the line has no comma. Logo and group
    /// attributes default to empty strings when absent.
    fn from_directive(line: &str, source_id: &str) -> Self {
        let name = match line.rfind(',') {
            Some(idx) => {
                let name = line[idx + 1..].trim();
                if name.is_empty() {
                    UNKNOWN_NAME.to_string()
                } else {
                    name.to_string()
                }
            }
            None => UNKNOWN_NAME.to_string(),
        };

        Self {
            name,
            logo: extract_attribute(line, LOGO_ATTR).unwrap_or_default(),
            group: extract_attribute(line, GROUP_ATTR).unwrap_or_default(),
            source: source_id.to_string(),
        }
    }

    /// Terminate the pending channel with its URL line
    fn complete(self, url: &str) -> ChannelRecord {
        ChannelRecord {
            name: self.name,
            url: url.to_string(),
            logo: self.logo,
            group: self.group,
            source: self.source,
        }
    }
}

/// Parser state: either scanning for a directive or holding a pending channel
#[derive(Debug, Clone, PartialEq, Eq)]
enum ParserState {
    AwaitingDirective,
    AwaitingUrl(PendingChannel),
}

/// Extract a `key="value"` attribute from a directive line.
///
/// Returns `None` when the key is absent or the value is not terminated by a
/// closing quote.
fn extract_attribute(line: &str, key: &str) -> Option<String> {
    let marker = format!("{}=\"", key);
    let start = line.find(&marker)? + marker.len();
    let end = line[start..].find('"')? + start;
    Some(line[start..end].to_string())
}

/// Parse raw playlist text into channel records for one source.
///
/// Lines are consumed in order; output order mirrors directive order. Empty
/// input yields an empty vector. This function never fails: directives with
/// no following URL, bare URL lines with no preceding directive, comments,
/// and blank lines are all dropped.
pub fn parse(text: &str, source_id: &str) -> Vec<ChannelRecord> {
    let mut channels = Vec::new();
    let mut state = ParserState::AwaitingDirective;

    for raw_line in text.lines() {
        let line = raw_line.trim();

        if line.starts_with(EXTINF_PREFIX) {
            // A new directive always starts a fresh pending channel. An
            // unterminated previous one is dropped, not errored.
            if let ParserState::AwaitingUrl(pending) = &state {
                debug!(
                    source = source_id,
                    channel = %pending.name,
                    "dropping directive with no URL line"
                );
            }
            state = ParserState::AwaitingUrl(PendingChannel::from_directive(line, source_id));
        } else if !line.is_empty() && !line.starts_with('#') {
            // Only the first URL line after a directive is consumed; later
            // bare URL lines find no pending channel and are ignored.
            if let ParserState::AwaitingUrl(pending) = state {
                channels.push(pending.complete(line));
            }
            state = ParserState::AwaitingDirective;
        }
        // Comments, blank lines, and other directives leave the state as-is.
    }

    if let ParserState::AwaitingUrl(pending) = state {
        debug!(
            source = source_id,
            channel = %pending.name,
            "dropping trailing directive with no URL line"
        );
    }

    debug!(
        source = source_id,
        channels = channels.len(),
        "parsed playlist"
    );
    channels
}
