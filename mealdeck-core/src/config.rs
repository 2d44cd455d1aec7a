//! App configuration from environment variables.

use std::env;
use std::time::Duration;
use thiserror::Error;

/// Default catalog base URL (TheMealDB public API).
pub const DEFAULT_CATALOG_URL: &str = "https://www.themealdb.com/api/json/v1/1";

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default staleness window for cached queries in seconds.
pub const DEFAULT_STALE_SECS: u64 = 60;

/// Default time in seconds an unused cached query is kept.
pub const DEFAULT_GC_SECS: u64 = 300;

/// Default quiet period before a search term is dispatched.
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// Default number of random recipes shown on the home and search feeds.
pub const DEFAULT_FEED_SIZE: usize = 12;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {name}: {value:?}")]
    InvalidValue { name: String, value: String },
}

/// Runtime configuration shared by the clients and the query layer.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the favorites backend.
    pub api_url: String,
    /// Base URL of the recipe catalog.
    pub catalog_url: String,
    pub timeout: Duration,
    /// How long a cached query result is served without refetching.
    pub stale_time: Duration,
    /// Unused queries are dropped after this long.
    pub gc_time: Duration,
    pub debounce: Duration,
    pub feed_size: usize,
}

impl AppConfig {
    /// Build a configuration with defaults for everything but the backend URL.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            stale_time: Duration::from_secs(DEFAULT_STALE_SECS),
            gc_time: Duration::from_secs(DEFAULT_GC_SECS),
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            feed_size: DEFAULT_FEED_SIZE,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `MEALDECK_API_URL`: favorites backend base URL
    ///
    /// Optional:
    /// - `MEALDECK_CATALOG_URL`: catalog base URL (default: TheMealDB v1)
    /// - `MEALDECK_HTTP_TIMEOUT_SECS`: request timeout (default: 30)
    /// - `MEALDECK_STALE_SECS`: query staleness window (default: 60)
    /// - `MEALDECK_GC_SECS`: how long unused queries are kept (default: 300)
    /// - `MEALDECK_SEARCH_DEBOUNCE_MS`: search debounce (default: 500)
    /// - `MEALDECK_FEED_SIZE`: random feed size (default: 12)
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_url = env::var("MEALDECK_API_URL")
            .map_err(|_| ConfigError::MissingEnvVar("MEALDECK_API_URL".to_string()))?;

        Self::new(api_url).with_env_overrides()
    }

    /// Apply the optional environment variables on top of `self`.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        let mut config = self;

        if let Ok(url) = env::var("MEALDECK_CATALOG_URL") {
            config.catalog_url = url;
        }
        if let Some(secs) = parse_var::<u64>("MEALDECK_HTTP_TIMEOUT_SECS")? {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = parse_var::<u64>("MEALDECK_STALE_SECS")? {
            config.stale_time = Duration::from_secs(secs);
        }
        if let Some(secs) = parse_var::<u64>("MEALDECK_GC_SECS")? {
            config.gc_time = Duration::from_secs(secs);
        }
        if let Some(ms) = parse_var::<u64>("MEALDECK_SEARCH_DEBOUNCE_MS")? {
            config.debounce = Duration::from_millis(ms);
        }
        if let Some(size) = parse_var::<usize>("MEALDECK_FEED_SIZE")? {
            config.feed_size = size;
        }

        Ok(config)
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue {
                name: name.to_string(),
                value,
            }),
        Err(_) => Ok(None),
    }
}
