use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::error::{min_chars, ValidationError};

/// Type-safe identifier for Technicians.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TechnicianId(pub u32);

impl From<u32> for TechnicianId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for TechnicianId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "tech_{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    Available,
    Busy,
    Unavailable,
    Offline,
}

/// A field technician on the roster.
///
/// # Actor Framework
/// This struct implements the [`ActorEntity`](crate::framework::ActorEntity) trait,
/// allowing it to be managed by a [`ResourceActor`](crate::framework::ResourceActor).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Technician {
    pub id: TechnicianId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub specialty: String,
    pub availability: Availability,
}

/// Payload for adding a technician to the roster.
#[derive(Debug, Clone)]
pub struct NewTechnician {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub specialty: String,
}

impl NewTechnician {
    pub fn validate(&self) -> Result<(), ValidationError> {
        min_chars("name", &self.name, 3)?;
        if !self.email.contains('@') {
            return Err(ValidationError::new("email", "must be a valid email address"));
        }
        min_chars("specialty", &self.specialty, 3)
    }
}

/// Roster query. `None` fields do not constrain the result.
#[derive(Debug, Clone, Default)]
pub struct TechnicianFilter {
    /// Case-insensitive match on name, email or specialty.
    pub search: Option<String>,
    pub availability: Option<Availability>,
    pub specialty: Option<String>,
}

impl Technician {
    pub fn new(id: TechnicianId, params: NewTechnician) -> Self {
        Self {
            id,
            name: params.name,
            email: params.email,
            phone: params.phone,
            specialty: params.specialty,
            availability: Availability::Available,
        }
    }

    pub fn matches(&self, filter: &TechnicianFilter) -> bool {
        if filter.availability.is_some_and(|a| a != self.availability) {
            return false;
        }
        if let Some(specialty) = &filter.specialty {
            if !self.specialty.eq_ignore_ascii_case(specialty) {
                return false;
            }
        }
        match &filter.search {
            Some(term) => {
                let term = term.to_lowercase();
                [&self.name, &self.email, &self.specialty]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&term))
            }
            None => true,
        }
    }
}
