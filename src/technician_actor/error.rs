//! Error types for the Technician actor.

use thiserror::Error;

use crate::access::PermissionDenied;
use crate::error::{Retryable, ValidationError};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum TechnicianError {
    #[error("Technician not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    PermissionDenied(#[from] PermissionDenied),

    #[error("Technician roster unavailable: {0}")]
    Unavailable(String),
}

impl From<String> for TechnicianError {
    fn from(msg: String) -> Self {
        TechnicianError::Unavailable(msg)
    }
}

impl Retryable for TechnicianError {
    fn is_retryable(&self) -> bool {
        matches!(self, TechnicianError::Unavailable(_))
    }
}
