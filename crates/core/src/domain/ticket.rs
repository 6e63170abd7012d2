// Ticket - embedded in an attendee's ticket list

use super::ids::StageId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A purchased ticket.
///
/// Tickets have no identity of their own: two tickets for the same stage and
/// date are indistinguishable, and reversal matches on field equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ticket {
    pub stage: StageId,
    pub date: NaiveDate,
}

impl Ticket {
    pub fn new(stage: StageId, date: NaiveDate) -> Self {
        Self { stage, date }
    }
}
