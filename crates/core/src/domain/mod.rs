// Domain Layer - Pure festival entities and ledger vocabulary

pub mod attendee;
pub mod band;
pub mod error;
pub mod ids;
pub mod ledger;
pub mod performance;
pub mod stage;
pub mod ticket;

// Re-exports
pub use attendee::{Attendee, NewAttendee};
pub use band::{Band, NewBand};
pub use error::DomainError;
pub use ids::{AttendeeId, BandId, PerformanceId, StageId};
pub use ledger::{EntityKind, LedgerOperation, LedgerReceipt, LedgerWarning, TransactionState};
pub use performance::{NewPerformance, Performance};
pub use stage::{NewStage, Stage};
pub use ticket::Ticket;
