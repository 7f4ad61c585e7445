//! Configuration management for Stream Sentry
//!
//! Layered configuration with zero-config defaults: built-in values, an
//! optional TOML file (project-local `stream-sentry.toml` or the user config
//! directory), and CLI overrides applied by the command layer. Durations in
//! the TOML file use humantime strings such as `"8s"`.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::app::{FetchConfig, ProbeConfig, SchedulerConfig};
use crate::constants::{http, report, sources, workers};
use crate::errors::{ConfigError, ConfigResult};

/// Unified application configuration for TOML serialization
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Endpoint probe settings
    pub probe: ProbeConfigToml,
    /// Playlist fetch settings
    pub fetch: FetchConfigToml,
    /// Batch scheduling settings
    pub scheduler: SchedulerConfigToml,
    /// Report output settings
    pub report: ReportConfigToml,
}

/// TOML-friendly probe configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfigToml {
    /// Per-probe timeout, e.g. "8s"
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
    /// Connection establishment timeout
    #[serde(with = "humantime_serde")]
    pub connect_timeout: Duration,
    /// User agent sent with every request
    pub user_agent: String,
}

impl Default for ProbeConfigToml {
    fn default() -> Self {
        Self {
            timeout: http::PROBE_TIMEOUT,
            connect_timeout: http::CONNECT_TIMEOUT,
            user_agent: http::USER_AGENT.to_string(),
        }
    }
}

/// TOML-friendly fetch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfigToml {
    /// Per-playlist fetch timeout, e.g. "15s"
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
    /// URL template with a `{code}` placeholder
    pub url_template: String,
}

impl Default for FetchConfigToml {
    fn default() -> Self {
        Self {
            timeout: http::FETCH_TIMEOUT,
            url_template: sources::PLAYLIST_URL_TEMPLATE.to_string(),
        }
    }
}

/// TOML-friendly scheduler configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfigToml {
    /// Maximum probes in flight simultaneously
    pub concurrency: usize,
    /// Completions between progress observations
    pub progress_interval: usize,
}

impl Default for SchedulerConfigToml {
    fn default() -> Self {
        Self {
            concurrency: workers::DEFAULT_CONCURRENCY,
            progress_interval: workers::PROGRESS_INTERVAL,
        }
    }
}

/// TOML-friendly report configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfigToml {
    /// Path the blocklist JSON is written to
    pub output: PathBuf,
}

impl Default for ReportConfigToml {
    fn default() -> Self {
        Self {
            output: PathBuf::from(report::DEFAULT_OUTPUT_PATH),
        }
    }
}

impl AppConfig {
    /// Convert TOML-friendly configuration to runtime configuration
    pub fn to_runtime_config(&self) -> (ProbeConfig, FetchConfig, SchedulerConfig) {
        (
            self.probe.to_runtime_config(),
            self.fetch.to_runtime_config(&self.probe),
            self.scheduler.to_runtime_config(),
        )
    }

    /// Load configuration with multi-source precedence: defaults, then an
    /// optional config file. CLI overrides are applied by the caller.
    pub async fn load(config_file_override: Option<PathBuf>) -> ConfigResult<Self> {
        let config_path = match config_file_override {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound { path });
                }
                Some(path)
            }
            None => Self::find_config_file(),
        };

        match config_path {
            Some(path) => Self::load_from_file(&path).await,
            None => Ok(Self::default()),
        }
    }

    /// Find a configuration file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let mut search_paths = vec![PathBuf::from("./stream-sentry.toml")];
        if let Some(config_dir) = dirs::config_dir() {
            search_paths.push(config_dir.join("stream-sentry").join("config.toml"));
        }

        for path in search_paths {
            if path.exists() {
                debug!("found config file: {}", path.display());
                return Some(path);
            }
        }

        debug!("no config file found in standard locations");
        None
    }

    /// Load configuration from a TOML file
    async fn load_from_file(path: &PathBuf) -> ConfigResult<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        let config: AppConfig = toml::from_str(&content)?;
        debug!("loaded configuration from: {}", path.display());
        Ok(config)
    }
}

impl ProbeConfigToml {
    /// Convert to runtime ProbeConfig
    pub fn to_runtime_config(&self) -> ProbeConfig {
        ProbeConfig {
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            user_agent: self.user_agent.clone(),
            ..Default::default()
        }
    }
}

impl FetchConfigToml {
    /// Convert to runtime FetchConfig, sharing the probe user agent
    pub fn to_runtime_config(&self, probe: &ProbeConfigToml) -> FetchConfig {
        FetchConfig {
            timeout: self.timeout,
            connect_timeout: probe.connect_timeout,
            user_agent: probe.user_agent.clone(),
            url_template: self.url_template.clone(),
        }
    }
}

impl SchedulerConfigToml {
    /// Convert to runtime SchedulerConfig
    pub fn to_runtime_config(&self) -> SchedulerConfig {
        SchedulerConfig {
            concurrency: self.concurrency,
            progress_interval: self.progress_interval,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.probe.timeout, Duration::from_secs(8));
        assert_eq!(config.fetch.timeout, Duration::from_secs(15));
        assert_eq!(config.scheduler.concurrency, workers::DEFAULT_CONCURRENCY);
        assert_eq!(config.report.output, PathBuf::from("blocklist.json"));
    }

    #[test]
    fn test_runtime_conversion() {
        let config = AppConfig::default();
        let (probe, fetch, scheduler) = config.to_runtime_config();

        assert_eq!(probe.timeout, Duration::from_secs(8));
        assert_eq!(fetch.timeout, Duration::from_secs(15));
        assert_eq!(fetch.user_agent, probe.user_agent);
        assert!(scheduler.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [probe]
            timeout = "2s"

            [scheduler]
            concurrency = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.probe.timeout, Duration::from_secs(2));
        assert_eq!(config.scheduler.concurrency, 5);
        // Unspecified sections and fields fall back to defaults
        assert_eq!(config.probe.connect_timeout, http::CONNECT_TIMEOUT);
        assert_eq!(config.fetch.timeout, Duration::from_secs(15));
        assert_eq!(config.report.output, PathBuf::from("blocklist.json"));
    }

    #[tokio::test]
    async fn test_load_missing_explicit_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope.toml");

        let result = AppConfig::load(Some(missing)).await;
        assert!(matches!(result, Err(ConfigError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        tokio::fs::write(
            &path,
            r#"
            [fetch]
            timeout = "30s"
            url_template = "http://localhost:9999/{code}.m3u"

            [report]
            output = "dead.json"
            "#,
        )
        .await
        .unwrap();

        let config = AppConfig::load(Some(path)).await.unwrap();
        assert_eq!(config.fetch.timeout, Duration::from_secs(30));
        assert_eq!(config.fetch.url_template, "http://localhost:9999/{code}.m3u");
        assert_eq!(config.report.output, PathBuf::from("dead.json"));
        assert_eq!(config.probe.timeout, Duration::from_secs(8));
    }

    #[test]
    fn test_invalid_toml_is_rejected() {
        let result: Result<AppConfig, _> = toml::from_str("probe = \"not a table\"");
        assert!(result.is_err());
    }
}
