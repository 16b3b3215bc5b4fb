//! Server configuration, read from the environment.

use anyhow::Context;
use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

use crate::catalog::RetryPolicy;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub db_path: String,
    /// JSON dump imported at startup when the catalog is empty
    pub seed_path: Option<PathBuf>,
    pub retry: RetryPolicy,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let retries: u32 = try_load(&lookup, "CATALOG_RETRY_ATTEMPTS", "3")?;
        let delay_ms: u64 = try_load(&lookup, "CATALOG_RETRY_DELAY_MS", "1000")?;

        Ok(Self {
            port: try_load(&lookup, "RUST_PORT", "3000")?,
            db_path: try_load(&lookup, "CATALOG_DB_PATH", "catalog.sqlite3")?,
            seed_path: lookup("CATALOG_SEED_PATH")
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
            retry: RetryPolicy {
                max_retries: retries,
                delay: Duration::from_millis(delay_ms),
            },
        })
    }
}

fn try_load<T, F>(lookup: &F, key: &str, default: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.trim()
        .parse()
        .map_err(|e| anyhow::anyhow!("{e}"))
        .with_context(|| format!("Invalid {key} value: {raw:?}"))
}
