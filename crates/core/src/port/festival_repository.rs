// Festival Repository Port (registry reads and inserts)

use crate::domain::{Attendee, AttendeeId, Band, Performance, Stage, StageId};
use crate::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait FestivalRepository: Send + Sync {
    /// Insert a new attendee (its ticket list is stored empty)
    async fn insert_attendee(&self, attendee: &Attendee) -> Result<()>;

    /// Insert a new stage
    async fn insert_stage(&self, stage: &Stage) -> Result<()>;

    /// Insert a new band
    async fn insert_band(&self, band: &Band) -> Result<()>;

    /// Insert a performance; band and stage must already exist
    async fn insert_performance(&self, performance: &Performance) -> Result<()>;

    /// Find attendee by ID, tickets included in purchase order
    async fn find_attendee(&self, id: &AttendeeId) -> Result<Option<Attendee>>;

    /// Find stage by ID
    async fn find_stage(&self, id: &StageId) -> Result<Option<Stage>>;

    /// All attendees with exactly this display name
    async fn find_attendees_by_name(&self, name: &str) -> Result<Vec<Attendee>>;
}
