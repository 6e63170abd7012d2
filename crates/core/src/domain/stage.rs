// Stage Domain Model

use super::error::{require_text, DomainError, Result};
use super::ids::StageId;
use serde::{Deserialize, Serialize};

/// Festival stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    pub id: StageId,
    pub name: String,
    pub city: String,
    /// Remaining sellable slots. Only the ticket ledger mutates it.
    pub capacity: i64,
}

impl Stage {
    pub fn is_sold_out(&self) -> bool {
        self.capacity <= 0
    }
}

/// Registration request for a new stage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewStage {
    pub name: String,
    pub city: String,
    pub capacity: i64,
}

impl NewStage {
    pub fn new(name: impl Into<String>, city: impl Into<String>, capacity: i64) -> Self {
        Self {
            name: name.into(),
            city: city.into(),
            capacity,
        }
    }

    pub fn validate(&self) -> Result<()> {
        require_text("stage name", &self.name)?;
        require_text("stage city", &self.city)?;
        if self.capacity < 0 {
            return Err(DomainError::InvalidCapacity(self.capacity));
        }
        Ok(())
    }

    pub fn into_stage(self, id: StageId) -> Result<Stage> {
        self.validate()?;
        Ok(Stage {
            id,
            name: self.name.trim().to_string(),
            city: self.city.trim().to_string(),
            capacity: self.capacity,
        })
    }
}
