// Ledger Domain Vocabulary

use super::error::{DomainError, Result};
use super::ids::{AttendeeId, StageId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Lifecycle of one ledger transaction: `Started -> {Committed | Aborted}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionState {
    Started,
    Committed,
    Aborted,
}

impl TransactionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TransactionState::Committed | TransactionState::Aborted)
    }

    /// Move to `next`, rejecting anything that leaves a terminal state
    pub fn transition(self, next: TransactionState) -> Result<TransactionState> {
        match (self, next) {
            (TransactionState::Started, TransactionState::Committed)
            | (TransactionState::Started, TransactionState::Aborted) => Ok(next),
            _ => Err(DomainError::InvalidStateTransition {
                from: self.to_string(),
                to: next.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for TransactionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionState::Started => write!(f, "STARTED"),
            TransactionState::Committed => write!(f, "COMMITTED"),
            TransactionState::Aborted => write!(f, "ABORTED"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LedgerOperation {
    Purchase,
    Reversal,
}

impl std::fmt::Display for LedgerOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LedgerOperation::Purchase => write!(f, "PURCHASE"),
            LedgerOperation::Reversal => write!(f, "REVERSAL"),
        }
    }
}

/// Kind of record a ledger operation failed to find
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Attendee,
    Stage,
    Ticket,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Attendee => write!(f, "Attendee"),
            EntityKind::Stage => write!(f, "Stage"),
            EntityKind::Ticket => write!(f, "Ticket"),
        }
    }
}

/// Non-fatal condition observed while committing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LedgerWarning {
    /// Several identical tickets matched the reversal; one of them was removed
    ReversalAmbiguous { matches: u64 },
}

/// Outcome of a committed ledger operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerReceipt {
    pub operation: LedgerOperation,
    pub state: TransactionState,
    pub attendee: AttendeeId,
    pub stage: StageId,
    pub date: NaiveDate,
    /// Stage capacity once the operation is applied
    pub capacity_after: i64,
    pub warning: Option<LedgerWarning>,
}

impl LedgerReceipt {
    pub fn is_committed(&self) -> bool {
        self.state == TransactionState::Committed
    }
}
