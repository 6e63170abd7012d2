// Performance Domain Model

use super::error::{DomainError, Result};
use super::ids::{BandId, PerformanceId, StageId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A band's slot on a stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Performance {
    pub id: PerformanceId,
    pub band: BandId,
    pub stage: StageId,
    pub date: NaiveDate,
    pub duration_minutes: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPerformance {
    pub band: BandId,
    pub stage: StageId,
    pub date: NaiveDate,
    pub duration_minutes: i64,
}

impl NewPerformance {
    pub fn new(band: BandId, stage: StageId, date: NaiveDate, duration_minutes: i64) -> Self {
        Self {
            band,
            stage,
            date,
            duration_minutes,
        }
    }

    pub fn into_performance(self, id: PerformanceId) -> Result<Performance> {
        if self.duration_minutes <= 0 {
            return Err(DomainError::InvalidDuration(self.duration_minutes));
        }
        Ok(Performance {
            id,
            band: self.band,
            stage: self.stage,
            date: self.date,
            duration_minutes: self.duration_minutes,
        })
    }
}
