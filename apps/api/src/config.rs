use anyhow::{Context, Result};

use crate::render::StyleId;
use crate::storage::artifact_cache::DEFAULT_TTL_SECS;

const DEFAULT_SESSION_IDLE_TTL_SECS: u64 = 3600;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
    /// Style every new session starts with.
    pub default_style: StyleId,
    pub artifact_cache_ttl_secs: u64,
    /// Sessions untouched for this long are dropped.
    pub session_idle_ttl_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. `from_env` passes the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let require = |key: &str| {
            lookup(key).with_context(|| format!("Required environment variable '{key}' is not set"))
        };

        Ok(Config {
            database_url: require("DATABASE_URL")?,
            redis_url: require("REDIS_URL")?,
            s3_bucket: require("S3_BUCKET")?,
            s3_endpoint: require("S3_ENDPOINT")?,
            aws_access_key_id: require("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require("AWS_SECRET_ACCESS_KEY")?,
            anthropic_api_key: require("ANTHROPIC_API_KEY")?,
            port: lookup("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            default_style: lookup("DEFAULT_STYLE")
                .unwrap_or_else(|| StyleId::Modern.to_string())
                .parse::<StyleId>()
                .context("DEFAULT_STYLE must name a known style")?,
            artifact_cache_ttl_secs: match lookup("ARTIFACT_CACHE_TTL_SECS") {
                Some(raw) => raw
                    .parse::<u64>()
                    .context("ARTIFACT_CACHE_TTL_SECS must be a whole number of seconds")?,
                None => DEFAULT_TTL_SECS,
            },
            session_idle_ttl_secs: match lookup("SESSION_IDLE_TTL_SECS") {
                Some(raw) => raw
                    .parse::<u64>()
                    .context("SESSION_IDLE_TTL_SECS must be a whole number of seconds")?,
                None => DEFAULT_SESSION_IDLE_TTL_SECS,
            },
        })
    }
}
