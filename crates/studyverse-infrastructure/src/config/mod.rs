mod timeouts;

pub use timeouts::TimeoutConfig;

use anyhow::{anyhow, Context, Result};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::http::RetryConfig;
use crate::logging::LogLevel;
use studyverse_domain::activity::DayBoundary;

const PRODUCTION_API_URL: &str = "https://svback.onrender.com/api";
const DEVELOPMENT_API_URL: &str = "http://localhost:5000/api";

pub const ENV_API_URL: &str = "STUDYVERSE_API_URL";
pub const ENV_ENVIRONMENT: &str = "STUDYVERSE_ENV";
pub const ENV_HTTP_TIMEOUT_SECS: &str = "STUDYVERSE_HTTP_TIMEOUT_SECS";
pub const ENV_DAY_BOUNDARY: &str = "STUDYVERSE_DAY_BOUNDARY";
pub const ENV_DATA_DIR: &str = "STUDYVERSE_DATA_DIR";
pub const ENV_LOG_LEVEL: &str = "STUDYVERSE_LOG_LEVEL";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    Production,
    #[default]
    Development,
}

impl Environment {
    fn parse(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "production" | "prod" => Ok(Environment::Production),
            "development" | "dev" => Ok(Environment::Development),
            other => Err(anyhow!("Unknown environment '{}'", other)),
        }
    }

    fn default_api_url(&self) -> &'static str {
        match self {
            Environment::Production => PRODUCTION_API_URL,
            Environment::Development => DEVELOPMENT_API_URL,
        }
    }
}

/// Runtime configuration, read once at startup
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub api_base_url: Url,
    pub timeouts: TimeoutConfig,
    pub retry: RetryConfig,
    pub day_boundary: DayBoundary,
    pub data_dir: PathBuf,
    pub log_level: LogLevel,
}

impl AppConfig {
    /// Read configuration from `STUDYVERSE_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup(ENV_ENVIRONMENT) {
            Some(value) => Environment::parse(&value)?,
            None => Environment::default(),
        };

        let raw_url = lookup(ENV_API_URL).unwrap_or_else(|| environment.default_api_url().into());
        let api_base_url = parse_base_url(&raw_url)?;

        let mut timeouts = TimeoutConfig::default();
        if let Some(secs) = lookup(ENV_HTTP_TIMEOUT_SECS) {
            let secs: u64 = secs
                .trim()
                .parse()
                .with_context(|| format!("{} must be a number of seconds", ENV_HTTP_TIMEOUT_SECS))?;
            timeouts = timeouts.with_http_request(Duration::from_secs(secs));
        }

        let day_boundary = match lookup(ENV_DAY_BOUNDARY) {
            Some(value) => DayBoundary::parse(&value).map_err(|e| anyhow!(e.to_string()))?,
            None => DayBoundary::default(),
        };

        let log_level = match lookup(ENV_LOG_LEVEL) {
            Some(value) => LogLevel::parse(&value)
                .ok_or_else(|| anyhow!("Unknown log level '{}'", value.trim()))?,
            None => LogLevel::default(),
        };

        let data_dir = lookup(ENV_DATA_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);

        Ok(Self {
            environment,
            api_base_url,
            timeouts,
            retry: RetryConfig::default(),
            day_boundary,
            data_dir,
            log_level,
        })
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }

    pub fn token_path(&self) -> PathBuf {
        self.data_dir.join("session.json")
    }
}

/// Base URLs are joined with relative paths, so they need a trailing slash
fn parse_base_url(raw: &str) -> Result<Url> {
    let mut normalized = raw.trim().to_string();
    if !normalized.ends_with('/') {
        normalized.push('/');
    }
    Url::parse(&normalized).with_context(|| format!("Invalid API base URL '{}'", raw))
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("studyverse")
}
