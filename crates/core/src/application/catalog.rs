// Catalog Service - lookup helpers over stages and bands

use crate::domain::{Band, Performance, Stage, StageId};
use crate::error::Result;
use crate::port::{CatalogRepository, RecordStream};
use futures::TryStreamExt;
use std::sync::Arc;

/// Typed replacements for the festival's stored lookup functions.
///
/// The streams are lazy and finite; calling the method again starts a new
/// query from the beginning.
pub struct CatalogService {
    catalog: Arc<dyn CatalogRepository>,
}

impl CatalogService {
    pub fn new(catalog: Arc<dyn CatalogRepository>) -> Self {
        Self { catalog }
    }

    /// Stages in `city`
    pub fn stages_by_city<'a>(&'a self, city: &'a str) -> RecordStream<'a, Stage> {
        self.catalog.stages_by_city(city)
    }

    /// Active bands of `genre`
    pub fn active_bands_by_genre<'a>(&'a self, genre: &'a str) -> RecordStream<'a, Band> {
        self.catalog.active_bands_by_genre(genre)
    }

    /// Performances on `stage`, earliest first
    pub fn performances_at_stage<'a>(
        &'a self,
        stage: &'a StageId,
    ) -> RecordStream<'a, Performance> {
        self.catalog.performances_at_stage(stage)
    }

    pub async fn collect_stages_by_city(&self, city: &str) -> Result<Vec<Stage>> {
        self.stages_by_city(city).try_collect().await
    }

    pub async fn collect_active_bands_by_genre(&self, genre: &str) -> Result<Vec<Band>> {
        self.active_bands_by_genre(genre).try_collect().await
    }

    pub async fn collect_performances_at_stage(&self, stage: &StageId) -> Result<Vec<Performance>> {
        self.performances_at_stage(stage).try_collect().await
    }
}
