use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::extraction::pipeline::Strategy;

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub oracle_url: String,
    pub oracle_model: String,
    pub oracle_timeout: Duration,
    pub keyword_db_path: String,
    pub default_strategy: Strategy,
    /// Bullets rewritten in parallel per request. Always at least 1.
    pub rewrite_concurrency: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_vars(|key| std::env::var(key).ok())
    }

    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str, default: &str| var(key).unwrap_or_else(|| default.to_string());

        let rewrite_concurrency = get("REWRITE_CONCURRENCY", "4")
            .parse::<usize>()
            .context("REWRITE_CONCURRENCY must be a positive integer")?;
        if rewrite_concurrency == 0 {
            bail!("REWRITE_CONCURRENCY must be at least 1");
        }

        Ok(Config {
            port: get("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: get("RUST_LOG", "info"),
            oracle_url: get("ORACLE_URL", "http://localhost:11434/api/generate"),
            oracle_model: get("ORACLE_MODEL", "llama3"),
            oracle_timeout: Duration::from_secs(
                get("ORACLE_TIMEOUT_SECS", "30")
                    .parse::<u64>()
                    .context("ORACLE_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            keyword_db_path: get("KEYWORD_DB_PATH", "data/industry_keywords.json"),
            default_strategy: get("PIPELINE_STRATEGY", "generative_with_fallback")
                .parse::<Strategy>()
                .map_err(anyhow::Error::msg)
                .context("PIPELINE_STRATEGY is invalid")?,
            rewrite_concurrency,
        })
    }
}
