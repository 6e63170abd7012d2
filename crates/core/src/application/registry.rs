// Registry Service - registration and lookup of festival records

use crate::domain::{
    Attendee, AttendeeId, BandId, NewAttendee, NewBand, NewPerformance, NewStage, PerformanceId,
    Stage, StageId,
};
use crate::error::Result;
use crate::port::{FestivalRepository, IdProvider};
use std::sync::Arc;
use tracing::info;

/// Creates attendees, stages and bands under fresh surrogate IDs
pub struct RegistryService {
    repo: Arc<dyn FestivalRepository>,
    id_provider: Arc<dyn IdProvider>,
}

impl RegistryService {
    pub fn new(repo: Arc<dyn FestivalRepository>, id_provider: Arc<dyn IdProvider>) -> Self {
        Self { repo, id_provider }
    }

    pub async fn register_attendee(&self, req: NewAttendee) -> Result<AttendeeId> {
        let id = AttendeeId::new(self.id_provider.generate_id());
        let attendee = req.into_attendee(id.clone())?;
        self.repo.insert_attendee(&attendee).await?;

        info!(attendee_id = %id, name = %attendee.name, "Attendee registered");
        Ok(id)
    }

    pub async fn register_stage(&self, req: NewStage) -> Result<StageId> {
        let id = StageId::new(self.id_provider.generate_id());
        let stage = req.into_stage(id.clone())?;
        self.repo.insert_stage(&stage).await?;

        info!(
            stage_id = %id,
            name = %stage.name,
            capacity = stage.capacity,
            "Stage registered"
        );
        Ok(id)
    }

    pub async fn register_band(&self, req: NewBand) -> Result<BandId> {
        let id = BandId::new(self.id_provider.generate_id());
        let band = req.into_band(id.clone())?;
        self.repo.insert_band(&band).await?;

        info!(band_id = %id, name = %band.name, genre = %band.genre, "Band registered");
        Ok(id)
    }

    /// Put a band on a stage for one date
    pub async fn schedule_performance(&self, req: NewPerformance) -> Result<PerformanceId> {
        let id = PerformanceId::new(self.id_provider.generate_id());
        let performance = req.into_performance(id.clone())?;
        self.repo.insert_performance(&performance).await?;

        info!(
            performance_id = %id,
            band_id = %performance.band,
            stage_id = %performance.stage,
            date = %performance.date,
            "Performance scheduled"
        );
        Ok(id)
    }

    pub async fn attendee(&self, id: &AttendeeId) -> Result<Option<Attendee>> {
        self.repo.find_attendee(id).await
    }

    pub async fn stage(&self, id: &StageId) -> Result<Option<Stage>> {
        self.repo.find_stage(id).await
    }

    /// Resolve a display name to every attendee carrying it
    pub async fn attendees_named(&self, name: &str) -> Result<Vec<Attendee>> {
        self.repo.find_attendees_by_name(name.trim()).await
    }
}
