//! Console configuration: defaults overlaid with `FQS_*` environment variables.

use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_SESSION_FILE: &str = ".fqs_session.json";
pub const DEFAULT_LOG_FILTER: &str = "info";

pub const ENV_API_URL: &str = "FQS_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "FQS_TIMEOUT_SECS";
pub const ENV_SESSION_PATH: &str = "FQS_SESSION_PATH";
pub const ENV_SESSION_TTL_DAYS: &str = "FQS_SESSION_TTL_DAYS";
pub const ENV_LOG: &str = "FQS_LOG";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {var}: '{value}'")]
    Invalid { var: &'static str, value: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Backend root, without trailing slash
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub session_path: PathBuf,
    pub session_ttl_days: i64,
    /// Fallback `EnvFilter` directive when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            session_path: PathBuf::from(DEFAULT_SESSION_FILE),
            session_ttl_days: fqs_core::session::DEFAULT_SESSION_TTL_DAYS,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl ConsoleConfig {
    /// Defaults overlaid with the process environment.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Defaults overlaid with whatever `lookup` returns for each `FQS_*` variable.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_API_URL) {
            config = config.with_base_url(&url);
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            config.request_timeout_secs = parse_number(ENV_TIMEOUT_SECS, &raw)?;
        }
        if let Some(path) = lookup(ENV_SESSION_PATH) {
            config.session_path = PathBuf::from(path);
        }
        if let Some(raw) = lookup(ENV_SESSION_TTL_DAYS) {
            config.session_ttl_days = parse_number(ENV_SESSION_TTL_DAYS, &raw)?;
        }
        if let Some(filter) = lookup(ENV_LOG) {
            config.log_filter = filter;
        }

        Ok(config)
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.api_base_url = url.trim().trim_end_matches('/').to_string();
        self
    }

    pub fn with_session_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.session_path = path.into();
        self
    }

    /// Absolute URL for an API path such as `/quejas/3`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_base_url, path)
    }
}

fn parse_number<T>(var: &'static str, raw: &str) -> ConfigResult<T>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    match raw.trim().parse::<T>() {
        Ok(value) if value > T::default() => Ok(value),
        _ => Err(ConfigError::Invalid {
            var,
            value: raw.to_string(),
        }),
    }
}
