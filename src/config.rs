use serde::Deserialize;
use std::time::Duration;

use crate::error::{AppError, AppResult};

/// Upper bound on recommendations per request, configured or requested
pub const MAX_RESULTS_LIMIT: usize = 25;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Anime catalog (Jikan v4) base URL
    #[serde(default = "default_catalog_api_url")]
    pub catalog_api_url: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Fixed pause between successive catalog calls within one request
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,

    /// Timeout applied to every catalog HTTP call
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    /// Number of results requested when resolving a seed title
    #[serde(default = "default_title_search_limit")]
    pub title_search_limit: usize,

    /// Number of candidates requested per expanded genre
    #[serde(default = "default_genre_pool_size")]
    pub genre_pool_size: usize,

    /// Maximum candidates a single genre may contribute
    #[serde(default = "default_per_genre_cap")]
    pub per_genre_cap: usize,

    /// Minimum share of seed works a genre must cover to be expanded
    #[serde(default = "default_genre_floor")]
    pub genre_floor: f64,

    /// Default number of recommendations returned
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

fn default_catalog_api_url() -> String {
    "https://api.jikan.moe/v4".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_request_delay_ms() -> u64 {
    1000
}

fn default_http_timeout_secs() -> u64 {
    10
}

fn default_title_search_limit() -> usize {
    10
}

fn default_genre_pool_size() -> usize {
    15
}

fn default_per_genre_cap() -> usize {
    3
}

fn default_genre_floor() -> f64 {
    0.25
}

fn default_max_results() -> usize {
    10
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings the engine cannot run with
    pub fn validate(&self) -> AppResult<()> {
        if self.catalog_api_url.trim().is_empty() {
            return Err(AppError::Config("CATALOG_API_URL must not be empty".to_string()));
        }

        if !(0.0..=1.0).contains(&self.genre_floor) {
            return Err(AppError::Config(format!(
                "GENRE_FLOOR must be within [0, 1], got {}",
                self.genre_floor
            )));
        }

        let counts = [
            ("TITLE_SEARCH_LIMIT", self.title_search_limit),
            ("GENRE_POOL_SIZE", self.genre_pool_size),
            ("PER_GENRE_CAP", self.per_genre_cap),
            ("MAX_RESULTS", self.max_results),
        ];
        for (name, value) in counts {
            if value == 0 {
                return Err(AppError::Config(format!("{} must be greater than zero", name)));
            }
        }

        if self.max_results > MAX_RESULTS_LIMIT {
            return Err(AppError::Config(format!(
                "MAX_RESULTS must be at most {}, got {}",
                MAX_RESULTS_LIMIT, self.max_results
            )));
        }

        Ok(())
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Tunables consumed by the recommendation engine
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    pub title_search_limit: usize,
    pub genre_pool_size: usize,
    pub per_genre_cap: usize,
    pub genre_floor: f64,
    pub max_results: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            title_search_limit: default_title_search_limit(),
            genre_pool_size: default_genre_pool_size(),
            per_genre_cap: default_per_genre_cap(),
            genre_floor: default_genre_floor(),
            max_results: default_max_results(),
        }
    }
}

impl From<&Config> for EngineSettings {
    fn from(config: &Config) -> Self {
        Self {
            title_search_limit: config.title_search_limit,
            genre_pool_size: config.genre_pool_size,
            per_genre_cap: config.per_genre_cap,
            genre_floor: config.genre_floor,
            max_results: config.max_results,
        }
    }
}
