// Transaction port for atomic ledger operations

use crate::domain::{AttendeeId, StageId, Ticket};
use crate::error::Result;
use async_trait::async_trait;

/// Transaction trait for atomic multi-step operations
#[async_trait]
pub trait Transaction: Send {
    /// Commit the transaction
    async fn commit(self: Box<Self>) -> Result<()>;

    /// Rollback the transaction
    async fn rollback(self: Box<Self>) -> Result<()>;
}

/// Store able to open ledger transactions.
///
/// Every write issued through the returned transaction stays invisible to
/// other readers until `commit`, and is discarded by `rollback` (or drop).
#[async_trait]
pub trait TransactionalLedgerStore: Send + Sync {
    /// Begin a new transaction
    async fn begin_transaction(&self) -> Result<Box<dyn LedgerTransaction>>;
}

/// Result of a conditional capacity update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapacityChange {
    /// Update applied; `capacity` is the new value
    Applied { capacity: i64 },
    /// Update refused because capacity would drop below zero
    Insufficient { capacity: i64 },
    /// No stage with that ID
    StageMissing,
}

/// Field-level reads and writes within a transaction
#[async_trait]
pub trait LedgerTransaction: Transaction {
    /// Whether the attendee record exists
    async fn attendee_exists(&mut self, attendee: &AttendeeId) -> Result<bool>;

    /// Add `delta` to the stage capacity unless the result would be negative.
    ///
    /// Ledger operations issue this first so the transaction takes the write
    /// lock before reading anything.
    async fn adjust_capacity(&mut self, stage: &StageId, delta: i64) -> Result<CapacityChange>;

    /// Append a ticket to the attendee's list. Returns false if the attendee
    /// does not exist.
    async fn push_ticket(&mut self, attendee: &AttendeeId, ticket: &Ticket) -> Result<bool>;

    /// Number of held tickets equal to `ticket`
    async fn count_tickets(&mut self, attendee: &AttendeeId, ticket: &Ticket) -> Result<u64>;

    /// Remove one ticket equal to `ticket`. Returns false if none matched.
    async fn pull_ticket(&mut self, attendee: &AttendeeId, ticket: &Ticket) -> Result<bool>;
}
