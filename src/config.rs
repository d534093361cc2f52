//! Dashboard configuration
//!
//! Resolved from environment variables (binaries load `.env` first) or from a
//! YAML file. Anything unset falls back to the defaults below.
//!
//! | Variable | Default |
//! |---|---|
//! | `DASHBOARD_API_URL` | `http://localhost:8000/api/v1` |
//! | `DASHBOARD_TIMEOUT_SECS` | `30` |
//! | `DASHBOARD_MAX_RETRIES` | `1` |
//! | `DASHBOARD_RETRY_BASE_MS` | `1000` |

use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;
use tracing::info;
use url::Url;

use crate::client::RetryPolicy;
use crate::error::ConfigError;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api/v1";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub base_url: Url,
    pub request_timeout: Duration,
    pub retry: RetryPolicy,
    /// Per-resource freshness windows replacing the resource defaults.
    /// A zero duration disables caching for that resource.
    pub freshness_overrides: HashMap<String, Duration>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            base_url: default_url(),
            request_timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
            freshness_overrides: HashMap::new(),
        }
    }
}

/// On-disk shape; every field optional
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    base_url: Option<String>,
    timeout_secs: Option<u64>,
    #[serde(default)]
    retry: RetryFile,
    #[serde(default)]
    freshness_secs: HashMap<String, u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RetryFile {
    max_retries: Option<u32>,
    base_delay_ms: Option<u64>,
}

impl DashboardConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup("DASHBOARD_API_URL") {
            config.base_url = parse_url(&raw)?;
        }
        if let Some(secs) = parse_var::<u64, _>(&lookup, "DASHBOARD_TIMEOUT_SECS")? {
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(retries) = parse_var::<u32, _>(&lookup, "DASHBOARD_MAX_RETRIES")? {
            config.retry.max_retries = retries;
        }
        if let Some(ms) = parse_var::<u64, _>(&lookup, "DASHBOARD_RETRY_BASE_MS")? {
            config.retry.base_delay = Duration::from_millis(ms);
        }

        Ok(config)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!("Loading dashboard configuration from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = serde_yaml::from_str(content)?;
        let mut config = Self::default();

        if let Some(raw) = file.base_url {
            config.base_url = parse_url(&raw)?;
        }
        if let Some(secs) = file.timeout_secs {
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(retries) = file.retry.max_retries {
            config.retry.max_retries = retries;
        }
        if let Some(ms) = file.retry.base_delay_ms {
            config.retry.base_delay = Duration::from_millis(ms);
        }
        config.freshness_overrides = file
            .freshness_secs
            .into_iter()
            .map(|(resource, secs)| (resource, Duration::from_secs(secs)))
            .collect();

        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_freshness(mut self, resource: impl Into<String>, window: Duration) -> Self {
        self.freshness_overrides.insert(resource.into(), window);
        self
    }

    /// Effective freshness window for `resource`; `None` means never cache
    pub fn freshness_for(&self, resource: &str, default: Option<Duration>) -> Option<Duration> {
        match self.freshness_overrides.get(resource) {
            Some(window) if window.is_zero() => None,
            Some(window) => Some(*window),
            None => default,
        }
    }
}

fn default_url() -> Url {
    Url::parse(DEFAULT_API_URL).expect("DEFAULT_API_URL is a valid URL")
}

fn parse_url(raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw.trim()).map_err(|source| ConfigError::InvalidUrl {
        value: raw.to_string(),
        source,
    })
}

fn parse_var<T, F>(lookup: &F, var: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidNumber {
                var: var.to_string(),
                value: raw,
            }),
    }
}
