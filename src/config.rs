//! # Configuration Module
//!
//! This module defines the runtime configuration of the bot: credentials for
//! the upstream APIs, HTTP timeouts, weather cache sizing and logging output.
//! Values come from the process environment (optionally seeded from `.env`).

use std::time::Duration;

use anyhow::{anyhow, Context, Result};

// Constants for bot configuration
pub const DEFAULT_TARGET_LANGUAGE: &str = "ru";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 20;
pub const DEFAULT_CACHE_TTL_SECS: u64 = 600; // 10 minutes
pub const DEFAULT_CACHE_CAPACITY: usize = 100;
pub const DEFAULT_LOG_FILE: &str = "bot.log";

/// Weather cache configuration
#[derive(Debug, Clone)]
pub struct WeatherCacheConfig {
    /// Lifetime of a cached report
    pub ttl: Duration,
    /// Maximum number of cities kept at once
    pub capacity: usize,
}

impl Default for WeatherCacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

/// Outbound HTTP configuration shared by every gateway
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Upper bound for a single outbound request
    pub request_timeout: Duration,
    /// Language code passed to upstream APIs and the translator
    pub target_language: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            target_language: DEFAULT_TARGET_LANGUAGE.to_string(),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub file: String,
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file: DEFAULT_LOG_FILE.to_string(),
            format: LogFormat::Text,
        }
    }
}

/// API credentials
#[derive(Clone)]
pub struct Credentials {
    pub telegram_token: String,
    pub openweather_api_key: String,
    pub cat_api_key: String,
    pub nasa_api_key: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credentials { .. }")
    }
}

/// Complete bot configuration
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub credentials: Credentials,
    pub http: HttpConfig,
    pub cache: WeatherCacheConfig,
    pub log: LogConfig,
}

impl BotConfig {
    /// Build the configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup
    ///
    /// Required credentials must be present and non-empty; optional values
    /// fall back to their defaults when absent.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String> {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| anyhow!("missing required variable"))
                .with_context(|| format!("{key} must be set"))
        };

        let credentials = Credentials {
            telegram_token: required("TELEGRAM_TOKEN")?,
            openweather_api_key: required("OPENWEATHER_API_KEY")?,
            cat_api_key: required("THE_CAT_API_KEY")?,
            nasa_api_key: required("NASA_API_KEY")?,
        };

        let mut http = HttpConfig::default();
        if let Some(lang) = lookup("TARGET_LANGUAGE").filter(|v| !v.trim().is_empty()) {
            http.target_language = lang.trim().to_string();
        }
        if let Some(raw) = lookup("REQUEST_TIMEOUT_SECS") {
            http.request_timeout = Duration::from_secs(parse_positive(&raw, "REQUEST_TIMEOUT_SECS")?);
        }

        let mut cache = WeatherCacheConfig::default();
        if let Some(raw) = lookup("WEATHER_CACHE_TTL_SECS") {
            cache.ttl = Duration::from_secs(parse_positive(&raw, "WEATHER_CACHE_TTL_SECS")?);
        }
        if let Some(raw) = lookup("WEATHER_CACHE_CAPACITY") {
            cache.capacity = parse_positive(&raw, "WEATHER_CACHE_CAPACITY")? as usize;
        }

        let mut log = LogConfig::default();
        if let Some(file) = lookup("LOG_FILE").filter(|v| !v.trim().is_empty()) {
            log.file = file;
        }
        if let Some(raw) = lookup("LOG_FORMAT") {
            log.format = match raw.trim().to_ascii_lowercase().as_str() {
                "text" | "" => LogFormat::Text,
                "json" => LogFormat::Json,
                other => return Err(anyhow!("LOG_FORMAT must be `text` or `json`, got `{other}`")),
            };
        }

        Ok(Self {
            credentials,
            http,
            cache,
            log,
        })
    }
}

fn parse_positive(raw: &str, name: &str) -> Result<u64> {
    let value = raw
        .trim()
        .parse::<u64>()
        .with_context(|| format!("{name} must be a positive integer"))?;
    if value == 0 {
        return Err(anyhow!("{name} must be a positive integer"));
    }
    Ok(value)
}
