//! Source playlist fetching
//!
//! Fetches raw playlist text for a source code from the configured URL
//! template. Fetch failures are real errors (unlike probe failures) but are
//! isolated per source by the aggregator; a failed source contributes zero
//! channels and the run continues.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::constants::{http, sources};
use crate::errors::{ConfigResult, FetchError, FetchResult};

/// Configuration for playlist fetching
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Timeout for one playlist fetch
    pub timeout: Duration,
    /// Connection establishment timeout
    pub connect_timeout: Duration,
    /// User agent sent with playlist requests
    pub user_agent: String,
    /// URL template with a `{code}` placeholder for the source code
    pub url_template: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: http::FETCH_TIMEOUT,
            connect_timeout: http::CONNECT_TIMEOUT,
            user_agent: http::USER_AGENT.to_string(),
            url_template: sources::PLAYLIST_URL_TEMPLATE.to_string(),
        }
    }
}

impl FetchConfig {
    /// Builds the HTTP client used for playlist fetches
    pub fn build_http_client(&self) -> ConfigResult<Client> {
        let client = Client::builder()
            .user_agent(self.user_agent.as_str())
            .timeout(self.timeout)
            .connect_timeout(self.connect_timeout)
            .build()?;
        Ok(client)
    }

    /// Playlist URL for a source code, lowercased before templating
    pub fn playlist_url(&self, source_id: &str) -> String {
        self.url_template
            .replace("{code}", &source_id.to_ascii_lowercase())
    }
}

/// Client fetching raw playlist text per source
#[derive(Debug)]
pub struct SourceClient {
    client: Client,
    config: FetchConfig,
}

impl SourceClient {
    /// Create a source client with its own HTTP client
    pub fn new(config: FetchConfig) -> ConfigResult<Self> {
        Ok(Self {
            client: config.build_http_client()?,
            config,
        })
    }

    /// Fetch the raw playlist text for one source.
    ///
    /// The body is decoded lossily; invalid byte sequences are replaced
    /// rather than failing the fetch.
    pub async fn fetch_playlist(&self, source_id: &str) -> FetchResult<String> {
        let url = self.config.playlist_url(source_id);
        if Url::parse(&url).is_err() {
            return Err(FetchError::InvalidUrl {
                source_id: source_id.to_string(),
                url,
            });
        }

        debug!(source = source_id, url = %url, "fetching playlist");

        let response =
            self.client
                .get(&url)
                .send()
                .await
                .map_err(|source| FetchError::Http {
                    source_id: source_id.to_string(),
                    source,
                })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                source_id: source_id.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|source| FetchError::Http {
            source_id: source_id.to_string(),
            source,
        })?;

        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            if let Ok((mut stream, _)) = listener.accept().await {
                let mut request = [0u8; 4096];
                let _ = stream.read(&mut request).await;
                let response = format!(
                    "{}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status_line,
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
        });
        format!("http://{}", addr)
    }

    #[test]
    fn test_playlist_url_templating() {
        let config = FetchConfig::default();
        assert_eq!(
            config.playlist_url("US"),
            "https://iptv-org.github.io/iptv/countries/us.m3u"
        );
    }

    #[tokio::test]
    async fn test_fetch_playlist_success() {
        let base = serve_once("HTTP/1.1 200 OK", "#EXTM3U\n#EXTINF:-1,A\nhttp://a\n").await;
        let config = FetchConfig {
            url_template: format!("{}/{{code}}.m3u", base),
            ..Default::default()
        };
        let client = SourceClient::new(config).unwrap();

        let text = client.fetch_playlist("us").await.unwrap();
        assert!(text.contains("#EXTINF"));
    }

    #[tokio::test]
    async fn test_fetch_playlist_http_error_status() {
        let base = serve_once("HTTP/1.1 404 Not Found", "missing").await;
        let config = FetchConfig {
            url_template: format!("{}/{{code}}.m3u", base),
            ..Default::default()
        };
        let client = SourceClient::new(config).unwrap();

        match client.fetch_playlist("zz").await {
            Err(FetchError::Status { source_id, status }) => {
                assert_eq!(source_id, "zz");
                assert_eq!(status, 404);
            }
            other => panic!("expected status error, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_fetch_playlist_connection_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let config = FetchConfig {
            url_template: format!("http://{}/{{code}}.m3u", addr),
            ..Default::default()
        };
        let client = SourceClient::new(config).unwrap();

        assert!(matches!(
            client.fetch_playlist("us").await,
            Err(FetchError::Http { .. })
        ));
    }

    #[tokio::test]
    async fn test_fetch_playlist_invalid_template() {
        let config = FetchConfig {
            url_template: "not a url {code}".to_string(),
            ..Default::default()
        };
        let client = SourceClient::new(config).unwrap();

        assert!(matches!(
            client.fetch_playlist("us").await,
            Err(FetchError::InvalidUrl { .. })
        ));
    }
}
