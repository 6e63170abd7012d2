// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DomainError {
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },

    #[error("Invalid capacity: {0} (must be >= 0)")]
    InvalidCapacity(i64),

    #[error("Invalid duration: {0} minutes (must be > 0)")]
    InvalidDuration(i64),

    #[error("Invalid age: {0}")]
    InvalidAge(i32),

    #[error("Invalid transaction state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },
}

pub type Result<T> = std::result::Result<T, DomainError>;

/// Reject blank (empty or whitespace-only) text fields
pub(crate) fn require_text(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(DomainError::EmptyField { field });
    }
    Ok(())
}
