// Attendee Domain Model

use super::error::{require_text, DomainError, Result};
use super::ids::AttendeeId;
use super::ticket::Ticket;
use serde::{Deserialize, Serialize};

/// Festival attendee with the tickets they currently hold
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendee {
    pub id: AttendeeId,
    /// Display name (not unique)
    pub name: String,
    pub city: Option<String>,
    pub age: Option<i32>,
    #[serde(default)]
    pub favorite_genres: Vec<String>,
    /// Purchased tickets, in purchase order
    #[serde(default)]
    pub tickets: Vec<Ticket>,
}

impl Attendee {
    /// Number of held tickets equal to `ticket`
    pub fn count_matching(&self, ticket: &Ticket) -> usize {
        self.tickets.iter().filter(|t| *t == ticket).count()
    }
}

/// Registration request for a new attendee
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewAttendee {
    pub name: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub age: Option<i32>,
    #[serde(default)]
    pub favorite_genres: Vec<String>,
}

impl NewAttendee {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn with_age(mut self, age: i32) -> Self {
        self.age = Some(age);
        self
    }

    pub fn with_genres<I, S>(mut self, genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.favorite_genres = genres.into_iter().map(Into::into).collect();
        self
    }

    pub fn validate(&self) -> Result<()> {
        require_text("attendee name", &self.name)?;
        if let Some(age) = self.age {
            if !(0..=150).contains(&age) {
                return Err(DomainError::InvalidAge(age));
            }
        }
        Ok(())
    }

    /// Build the entity with its assigned ID and an empty ticket list
    pub fn into_attendee(self, id: AttendeeId) -> Result<Attendee> {
        self.validate()?;
        Ok(Attendee {
            id,
            name: self.name.trim().to_string(),
            city: self.city,
            age: self.age,
            favorite_genres: self.favorite_genres,
            tickets: Vec::new(),
        })
    }
}
