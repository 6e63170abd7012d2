// Purchase Use Case

use crate::domain::{
    AttendeeId, LedgerOperation, LedgerReceipt, StageId, Ticket, TransactionState,
};
use crate::error::LedgerError;
use crate::port::{CapacityChange, LedgerTransaction};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Buy one ticket for `stage` on `date`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseRequest {
    pub attendee: AttendeeId,
    pub stage: StageId,
    pub date: NaiveDate,
}

impl PurchaseRequest {
    pub fn new(attendee: AttendeeId, stage: StageId, date: NaiveDate) -> Self {
        Self {
            attendee,
            stage,
            date,
        }
    }
}

/// Apply the purchase writes inside `tx`.
///
/// On any error the caller rolls the transaction back, so a missing attendee
/// discovered after the capacity update leaves nothing behind.
pub async fn apply(
    tx: &mut dyn LedgerTransaction,
    req: &PurchaseRequest,
) -> Result<LedgerReceipt, LedgerError> {
    let capacity_after = match tx.adjust_capacity(&req.stage, -1).await? {
        CapacityChange::Applied { capacity } => capacity,
        CapacityChange::Insufficient { .. } => {
            return Err(LedgerError::CapacityExhausted {
                stage: req.stage.clone(),
            })
        }
        CapacityChange::StageMissing => return Err(LedgerError::stage_not_found(&req.stage)),
    };

    let ticket = Ticket::new(req.stage.clone(), req.date);
    if !tx.push_ticket(&req.attendee, &ticket).await? {
        return Err(LedgerError::attendee_not_found(&req.attendee));
    }

    Ok(LedgerReceipt {
        operation: LedgerOperation::Purchase,
        state: TransactionState::Started,
        attendee: req.attendee.clone(),
        stage: req.stage.clone(),
        date: req.date,
        capacity_after,
        warning: None,
    })
}
