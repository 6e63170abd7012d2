// Reversal Use Case

use crate::domain::{
    AttendeeId, EntityKind, LedgerOperation, LedgerReceipt, LedgerWarning, StageId, Ticket,
    TransactionState,
};
use crate::error::LedgerError;
use crate::port::{CapacityChange, LedgerTransaction};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Undo a purchase: drop one `{stage, date}` ticket and move the stage
/// capacity by `capacity_delta`.
///
/// The delta is applied as given. Pass `1` to exactly invert one purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReversalRequest {
    pub attendee: AttendeeId,
    pub stage: StageId,
    pub date: NaiveDate,
    pub capacity_delta: i64,
}

impl ReversalRequest {
    pub fn new(attendee: AttendeeId, stage: StageId, date: NaiveDate, capacity_delta: i64) -> Self {
        Self {
            attendee,
            stage,
            date,
            capacity_delta,
        }
    }
}

/// Apply the reversal writes inside `tx`
pub async fn apply(
    tx: &mut dyn LedgerTransaction,
    req: &ReversalRequest,
    strict: bool,
) -> Result<LedgerReceipt, LedgerError> {
    let capacity_after = match tx.adjust_capacity(&req.stage, req.capacity_delta).await? {
        CapacityChange::Applied { capacity } => capacity,
        CapacityChange::Insufficient { .. } => {
            return Err(LedgerError::CapacityExhausted {
                stage: req.stage.clone(),
            })
        }
        CapacityChange::StageMissing => return Err(LedgerError::stage_not_found(&req.stage)),
    };

    if !tx.attendee_exists(&req.attendee).await? {
        return Err(LedgerError::attendee_not_found(&req.attendee));
    }

    let ticket = Ticket::new(req.stage.clone(), req.date);
    let matches = tx.count_tickets(&req.attendee, &ticket).await?;
    if matches == 0 {
        return Err(ticket_not_found(req));
    }

    let warning = if matches > 1 {
        if strict {
            return Err(LedgerError::ReversalAmbiguous {
                attendee: req.attendee.clone(),
                matches,
            });
        }
        warn!(
            attendee_id = %req.attendee,
            stage_id = %req.stage,
            date = %req.date,
            matches,
            "Reversal matched several identical tickets, removing one"
        );
        Some(LedgerWarning::ReversalAmbiguous { matches })
    } else {
        None
    };

    if !tx.pull_ticket(&req.attendee, &ticket).await? {
        return Err(ticket_not_found(req));
    }

    Ok(LedgerReceipt {
        operation: LedgerOperation::Reversal,
        state: TransactionState::Started,
        attendee: req.attendee.clone(),
        stage: req.stage.clone(),
        date: req.date,
        capacity_after,
        warning,
    })
}

fn ticket_not_found(req: &ReversalRequest) -> LedgerError {
    LedgerError::NotFound {
        entity: EntityKind::Ticket,
        id: format!("{}@{}", req.stage, req.date),
    }
}
