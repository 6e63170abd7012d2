// Catalog Port - lazy lookup helpers

use crate::domain::{Band, Performance, Stage, StageId};
use crate::error::Result;
use futures::stream::BoxStream;

/// Lazy, finite stream of records. Re-invoking the query restarts it.
pub type RecordStream<'a, T> = BoxStream<'a, Result<T>>;

pub trait CatalogRepository: Send + Sync {
    /// Stages located in `city`
    fn stages_by_city<'a>(&'a self, city: &'a str) -> RecordStream<'a, Stage>;

    /// Active bands playing `genre`
    fn active_bands_by_genre<'a>(&'a self, genre: &'a str) -> RecordStream<'a, Band>;

    /// Performances scheduled on `stage`, by date
    fn performances_at_stage<'a>(
        &'a self,
        stage: &'a StageId,
    ) -> RecordStream<'a, Performance>;
}
