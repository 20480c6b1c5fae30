use crate::error::{AppResult, ConfigError};
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "homeschool.toml";

/// Program configuration
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend base URL, without the `/api` suffix
    pub backend_url: String,
    /// Where the token and cached profile are persisted
    pub session_file: String,
    /// Total time budget for one request
    pub request_timeout_secs: u64,
    /// Time budget for establishing the connection
    pub connect_timeout_secs: u64,
    /// Whether to show debug logs
    pub verbose_logging: bool,
    /// Plain-text run log
    pub output_log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:8001".to_string(),
            session_file: ".homeschool_session.json".to_string(),
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
            verbose_logging: false,
            output_log_file: "homeschool.log".to_string(),
        }
    }
}

impl Config {
    /// Defaults overridden by environment variables
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Reads a TOML file; missing keys keep their defaults
    pub fn from_toml_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| {
            ConfigError::TomlParseFailed {
                path: path.display().to_string(),
                source,
            }
            .into()
        })
    }

    /// File (`HOMESCHOOL_CONFIG` or `homeschool.toml` when present), then env, then validation
    pub fn load() -> AppResult<Self> {
        let explicit = std::env::var("HOMESCHOOL_CONFIG").ok();
        let base = match explicit {
            Some(path) => Self::from_toml_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_toml_file(DEFAULT_CONFIG_FILE)?
            }
            None => Self::default(),
        };
        let config = base.with_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Unparseable numeric values are ignored and the current value kept
    pub fn with_env_overrides(self) -> Self {
        Self {
            backend_url: std::env::var("HOMESCHOOL_BACKEND_URL").unwrap_or(self.backend_url),
            session_file: std::env::var("HOMESCHOOL_SESSION_FILE").unwrap_or(self.session_file),
            request_timeout_secs: env_or(
                "HOMESCHOOL_REQUEST_TIMEOUT_SECS",
                self.request_timeout_secs,
            ),
            connect_timeout_secs: env_or(
                "HOMESCHOOL_CONNECT_TIMEOUT_SECS",
                self.connect_timeout_secs,
            ),
            verbose_logging: env_or("VERBOSE_LOGGING", self.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(self.output_log_file),
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        let url = self.backend_url.trim();
        if url.is_empty() || !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                key: "backend_url".to_string(),
                value: self.backend_url.clone(),
                expected: "an http(s) URL".to_string(),
            }
            .into());
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "request_timeout_secs".to_string(),
                value: "0".to_string(),
                expected: "a positive number of seconds".to_string(),
            }
            .into());
        }
        if self.connect_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "connect_timeout_secs".to_string(),
                value: "0".to_string(),
                expected: "a positive number of seconds".to_string(),
            }
            .into());
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// API root, e.g. `http://localhost:8001/api`
    pub fn api_base(&self) -> String {
        format!("{}/api", self.backend_url.trim().trim_end_matches('/'))
    }
}

/// Parsed env value, or `current` when unset or unparseable
fn env_or<T: FromStr>(key: &str, current: T) -> T {
    std::env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(current)
}
