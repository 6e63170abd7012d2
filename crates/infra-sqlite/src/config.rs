// Store configuration (environment driven)

use festival_core::error::{AppError, Result};
use std::time::Duration;

pub const ENV_DB_PATH: &str = "FESTIVAL_DB_PATH";
pub const ENV_DB_MAX_CONNECTIONS: &str = "FESTIVAL_DB_MAX_CONNECTIONS";
pub const ENV_DB_BUSY_TIMEOUT_MS: &str = "FESTIVAL_DB_BUSY_TIMEOUT_MS";

const DEFAULT_DB_PATH: &str = "~/.festival/ledger.db";

/// SQLite connection settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// File path or sqlite URL (`sqlite::memory:` for tests)
    pub database_url: String,
    pub max_connections: u32,
    /// How long a writer waits on a locked database before giving up
    pub busy_timeout: Duration,
}

impl StoreConfig {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Default::default()
        }
    }

    /// Load from process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup(ENV_DB_PATH) {
            config.database_url = shellexpand::tilde(&path).into_owned();
        }

        if let Some(raw) = lookup(ENV_DB_MAX_CONNECTIONS) {
            config.max_connections = raw
                .trim()
                .parse()
                .ok()
                .filter(|n: &u32| *n > 0)
                .ok_or_else(|| {
                    AppError::Config(format!(
                        "{ENV_DB_MAX_CONNECTIONS} must be a positive integer, got '{raw}'"
                    ))
                })?;
        }

        if let Some(raw) = lookup(ENV_DB_BUSY_TIMEOUT_MS) {
            let ms: u64 = raw.trim().parse().map_err(|_| {
                AppError::Config(format!(
                    "{ENV_DB_BUSY_TIMEOUT_MS} must be an integer, got '{raw}'"
                ))
            })?;
            config.busy_timeout = Duration::from_millis(ms);
        }

        Ok(config)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_url: shellexpand::tilde(DEFAULT_DB_PATH).into_owned(),
            max_connections: 10,
            busy_timeout: Duration::from_secs(5),
        }
    }
}
