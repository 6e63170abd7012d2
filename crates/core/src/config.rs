// Ledger configuration (environment driven)

use crate::error::{AppError, Result};
use std::time::Duration;

pub const ENV_DEADLINE_MS: &str = "FESTIVAL_LEDGER_DEADLINE_MS";
pub const ENV_STRICT_REVERSAL: &str = "FESTIVAL_LEDGER_STRICT_REVERSAL";

/// Ticket ledger settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerConfig {
    /// Abort any transaction still in flight after this long (None = no deadline)
    pub deadline: Option<Duration>,

    /// Abort reversals that match more than one identical ticket instead of
    /// removing one and warning
    pub strict_reversal: bool,
}

impl LedgerConfig {
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn strict(mut self) -> Self {
        self.strict_reversal = true;
        self
    }

    /// Load from process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup (tests pass a map)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let deadline = match lookup(ENV_DEADLINE_MS) {
            Some(raw) => {
                let ms: u64 = raw.trim().parse().map_err(|_| {
                    AppError::Config(format!("{ENV_DEADLINE_MS} must be an integer, got '{raw}'"))
                })?;
                (ms > 0).then(|| Duration::from_millis(ms))
            }
            None => None,
        };

        let strict_reversal = match lookup(ENV_STRICT_REVERSAL) {
            Some(raw) => parse_bool(&raw).ok_or_else(|| {
                AppError::Config(format!("{ENV_STRICT_REVERSAL} must be a boolean, got '{raw}'"))
            })?,
            None => false,
        };

        Ok(Self {
            deadline,
            strict_reversal,
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
