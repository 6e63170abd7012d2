// Central Error Types for the Application

use crate::domain::{AttendeeId, EntityKind, StageId};
use thiserror::Error;

/// Application-level error type (store and service failures)
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Domain error: {0}")]
    Domain(#[from] crate::domain::DomainError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

// From implementations for infra crates (to avoid circular dependency)
impl From<String> for AppError {
    fn from(err: String) -> Self {
        AppError::Database(err)
    }
}

// Note: sqlx::Error conversion is handled in infra-sqlite crate
// by converting to AppError::Database / AppError::Conflict

/// Failure of a ticket purchase or reversal.
///
/// Every variant is returned after the transaction was rolled back, so no
/// partial effect of the failed operation is visible.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: EntityKind, id: String },

    #[error("Stage {stage} has no remaining capacity")]
    CapacityExhausted { stage: StageId },

    #[error("Reversal for attendee {attendee} matched {matches} identical tickets")]
    ReversalAmbiguous { attendee: AttendeeId, matches: u64 },

    #[error("Transaction aborted: {0}")]
    TransactionAborted(#[source] AppError),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Deadline of {deadline_ms}ms exceeded")]
    DeadlineExceeded { deadline_ms: u64 },
}

impl LedgerError {
    pub fn attendee_not_found(id: &AttendeeId) -> Self {
        LedgerError::NotFound {
            entity: EntityKind::Attendee,
            id: id.to_string(),
        }
    }

    pub fn stage_not_found(id: &StageId) -> Self {
        LedgerError::NotFound {
            entity: EntityKind::Stage,
            id: id.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, LedgerError::NotFound { .. })
    }

    /// True when the store gave up because of a concurrent writer.
    /// The ledger never retries; callers decide.
    pub fn is_retryable(&self) -> bool {
        matches!(self, LedgerError::TransactionAborted(AppError::Conflict(_)))
    }
}

// Any store failure inside a transaction aborts it
impl From<AppError> for LedgerError {
    fn from(err: AppError) -> Self {
        LedgerError::TransactionAborted(err)
    }
}
