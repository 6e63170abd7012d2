// Ticket Ledger - atomic purchase and reversal of tickets

pub mod cancel;
pub mod purchase;
pub mod reverse;

#[cfg(test)]
mod ledger_test;

pub use cancel::{cancel_channel, CancelHandle, CancelToken};
pub use purchase::PurchaseRequest;
pub use reverse::ReversalRequest;

use crate::config::LedgerConfig;
use crate::domain::{AttendeeId, LedgerOperation, LedgerReceipt, StageId, TransactionState};
use crate::error::LedgerError;
use crate::port::{LedgerTransaction, TransactionalLedgerStore};
use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

enum Command {
    Purchase(PurchaseRequest),
    Reversal(ReversalRequest),
}

impl Command {
    fn operation(&self) -> LedgerOperation {
        match self {
            Command::Purchase(_) => LedgerOperation::Purchase,
            Command::Reversal(_) => LedgerOperation::Reversal,
        }
    }

    fn attendee(&self) -> &AttendeeId {
        match self {
            Command::Purchase(req) => &req.attendee,
            Command::Reversal(req) => &req.attendee,
        }
    }

    fn stage(&self) -> &StageId {
        match self {
            Command::Purchase(req) => &req.stage,
            Command::Reversal(req) => &req.stage,
        }
    }
}

/// Applies or reverses single ticket purchases, each as one store transaction.
///
/// Every call opens its own transaction and always ends it: committed when
/// all writes succeed, rolled back otherwise (including cancellation and
/// deadline expiry). Nothing is retried here.
pub struct TicketLedger {
    store: Arc<dyn TransactionalLedgerStore>,
    config: LedgerConfig,
}

impl TicketLedger {
    pub fn new(store: Arc<dyn TransactionalLedgerStore>, config: LedgerConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Append a `{stage, date}` ticket to the attendee and take one slot
    /// from the stage, atomically.
    ///
    /// # Errors
    ///
    /// * `NotFound` - attendee or stage missing
    /// * `CapacityExhausted` - stage has no slot left
    /// * `TransactionAborted` - the store failed or rejected the writes
    /// * `DeadlineExceeded` - configured deadline elapsed
    pub async fn purchase_ticket(
        &self,
        attendee: &AttendeeId,
        stage: &StageId,
        date: NaiveDate,
    ) -> Result<LedgerReceipt, LedgerError> {
        let req = PurchaseRequest::new(attendee.clone(), stage.clone(), date);
        self.execute(Command::Purchase(req), None).await
    }

    /// Same as [`purchase_ticket`](Self::purchase_ticket), aborting when
    /// `cancel` fires.
    pub async fn purchase_ticket_with_cancel(
        &self,
        req: PurchaseRequest,
        cancel: CancelToken,
    ) -> Result<LedgerReceipt, LedgerError> {
        self.execute(Command::Purchase(req), Some(cancel)).await
    }

    /// Remove one `{stage, date}` ticket from the attendee and add
    /// `capacity_delta` to the stage, atomically.
    ///
    /// When several identical tickets match, one of them is removed and the
    /// receipt carries a warning (or the call fails with `ReversalAmbiguous`
    /// under `strict_reversal`).
    pub async fn reverse_ticket(
        &self,
        attendee: &AttendeeId,
        stage: &StageId,
        date: NaiveDate,
        capacity_delta: i64,
    ) -> Result<LedgerReceipt, LedgerError> {
        let req = ReversalRequest::new(attendee.clone(), stage.clone(), date, capacity_delta);
        self.execute(Command::Reversal(req), None).await
    }

    /// Same as [`reverse_ticket`](Self::reverse_ticket), aborting when
    /// `cancel` fires.
    pub async fn reverse_ticket_with_cancel(
        &self,
        req: ReversalRequest,
        cancel: CancelToken,
    ) -> Result<LedgerReceipt, LedgerError> {
        self.execute(Command::Reversal(req), Some(cancel)).await
    }

    async fn execute(
        &self,
        command: Command,
        cancel: Option<CancelToken>,
    ) -> Result<LedgerReceipt, LedgerError> {
        let operation = command.operation();
        let attendee = command.attendee().clone();
        let stage = command.stage().clone();

        if cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
            return Err(LedgerError::Cancelled);
        }

        // One clock for the whole call: pool acquisition counts against it too
        let interrupt = interrupted(cancel, self.config.deadline);
        tokio::pin!(interrupt);

        let mut tx = tokio::select! {
            tx = self.store.begin_transaction() => tx?,
            err = &mut interrupt => {
                warn!(
                    operation = %operation,
                    attendee_id = %attendee,
                    stage_id = %stage,
                    error = %err,
                    "Ledger transaction not started"
                );
                return Err(err);
            }
        };
        let state = TransactionState::Started;
        debug!(
            operation = %operation,
            attendee_id = %attendee,
            stage_id = %stage,
            state = %state,
            "Ledger transaction started"
        );

        let outcome = tokio::select! {
            result = apply(tx.as_mut(), &command, self.config.strict_reversal) => result,
            err = &mut interrupt => Err(err),
        };

        match outcome {
            Ok(mut receipt) => {
                // Commit is not interruptible: once sent, the writes may
                // already be durable
                if let Err(e) = tx.commit().await {
                    warn!(
                        operation = %operation,
                        attendee_id = %attendee,
                        stage_id = %stage,
                        state = %TransactionState::Aborted,
                        error = %e,
                        "Ledger commit failed"
                    );
                    return Err(LedgerError::TransactionAborted(e));
                }

                receipt.state = state
                    .transition(TransactionState::Committed)
                    .map_err(|e| LedgerError::TransactionAborted(e.into()))?;
                info!(
                    operation = %operation,
                    attendee_id = %attendee,
                    stage_id = %stage,
                    capacity_after = receipt.capacity_after,
                    state = %receipt.state,
                    "Ledger transaction committed"
                );
                Ok(receipt)
            }
            Err(err) => {
                if matches!(
                    err,
                    LedgerError::Cancelled | LedgerError::DeadlineExceeded { .. }
                ) {
                    // The interrupted statement may still own the connection.
                    // Drop queues the rollback behind it without waiting.
                    drop(tx);
                } else if let Err(e) = tx.rollback().await {
                    warn!(error = %e, "Ledger rollback failed");
                }
                warn!(
                    operation = %operation,
                    attendee_id = %attendee,
                    stage_id = %stage,
                    state = %TransactionState::Aborted,
                    error = %err,
                    "Ledger transaction aborted"
                );
                Err(err)
            }
        }
    }
}

async fn apply(
    tx: &mut dyn LedgerTransaction,
    command: &Command,
    strict_reversal: bool,
) -> Result<LedgerReceipt, LedgerError> {
    match command {
        Command::Purchase(req) => purchase::apply(tx, req).await,
        Command::Reversal(req) => reverse::apply(tx, req, strict_reversal).await,
    }
}

/// Resolves with the error to report once the token fires or the deadline
/// elapses. Pending forever when neither is configured.
async fn interrupted(cancel: Option<CancelToken>, deadline: Option<Duration>) -> LedgerError {
    tokio::select! {
        _ = wait_cancelled(cancel) => LedgerError::Cancelled,
        _ = wait_deadline(deadline) => LedgerError::DeadlineExceeded {
            deadline_ms: deadline.map(deadline_millis).unwrap_or_default(),
        },
    }
}

fn deadline_millis(deadline: Duration) -> u64 {
    u64::try_from(deadline.as_millis()).unwrap_or(u64::MAX)
}

async fn wait_cancelled(cancel: Option<CancelToken>) {
    match cancel {
        Some(mut token) => token.cancelled().await,
        None => std::future::pending().await,
    }
}

async fn wait_deadline(deadline: Option<Duration>) {
    match deadline {
        Some(deadline) => tokio::time::sleep(deadline).await,
        None => std::future::pending().await,
    }
}
