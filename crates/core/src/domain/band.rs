// Band Domain Model

use super::error::{require_text, Result};
use super::ids::BandId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Band {
    pub id: BandId,
    pub name: String,
    pub genre: String,
    pub active: bool,
}

/// Registration request for a new band
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBand {
    pub name: String,
    pub genre: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl NewBand {
    pub fn new(name: impl Into<String>, genre: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            genre: genre.into(),
            active: true,
        }
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    pub fn into_band(self, id: BandId) -> Result<Band> {
        require_text("band name", &self.name)?;
        require_text("band genre", &self.genre)?;
        Ok(Band {
            id,
            name: self.name.trim().to_string(),
            genre: self.genre.trim().to_string(),
            active: self.active,
        })
    }
}
