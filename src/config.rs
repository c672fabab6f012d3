use std::env;
use std::time::Duration;

use crate::chart::ChartVariant;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deployment {
    Local,
    Dev,
    Stage,
    Prod,
}

impl Deployment {
    #[must_use]
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "dev" | "development" => Self::Dev,
            "stage" | "staging" => Self::Stage,
            "prod" | "production" => Self::Prod,
            _ => Self::Local,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    // Presence API
    pub api_base_url: String,
    pub request_timeout_seconds: u64,

    // Dashboard
    pub chart_variant: ChartVariant,

    // Caching
    pub dataset_cache_ttl_seconds: u64,
    pub dataset_cache_max_entries: u64,

    // Application metadata
    pub deployment: Deployment,
}

impl Config {
    /// Load configuration from environment variables (and `.env` if present).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if required environment variables are not set,
    /// or `ConfigError::Invalid` if a value cannot be interpreted.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`Config::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base_url = lookup("PRESENCE_API_BASE_URL")
            .filter(|url| !url.trim().is_empty())
            .ok_or(ConfigError::Missing("PRESENCE_API_BASE_URL"))?
            .trim()
            .trim_end_matches('/')
            .to_string();

        let chart_variant = match lookup("CHART_VARIANT") {
            Some(raw) => ChartVariant::from_name(&raw)
                .ok_or(ConfigError::Invalid("CHART_VARIANT", raw))?,
            None => ChartVariant::MeanWeekday,
        };

        Ok(Self {
            api_base_url,
            request_timeout_seconds: lookup("REQUEST_TIMEOUT_SECONDS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),

            chart_variant,

            dataset_cache_ttl_seconds: lookup("DATASET_CACHE_TTL_SECONDS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(600), // matches the backend's CSV cache window
            dataset_cache_max_entries: lookup("DATASET_CACHE_MAX_ENTRIES")
                .and_then(|v| v.parse().ok())
                .unwrap_or(256),

            deployment: Deployment::from_str(
                &lookup("DEPLOYMENT").unwrap_or_else(|| "local".to_string()),
            ),
        })
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}
