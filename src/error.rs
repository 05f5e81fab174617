//! Errors shared by every store.
//!
//! Per-actor enums ([`WorkOrderError`](crate::work_order_actor::WorkOrderError),
//! [`TechnicianError`](crate::technician_actor::TechnicianError),
//! [`EvidenceError`](crate::evidence_actor::EvidenceError)) wrap these, so callers can match
//! on the same taxonomy regardless of which store rejected the request.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single form field that failed its constraint.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Requires `value` to have at least `min` characters once trimmed.
pub fn min_chars(field: &str, value: &str, min: usize) -> Result<(), ValidationError> {
    if value.trim().chars().count() < min {
        return Err(ValidationError::new(
            field,
            format!("must be at least {min} characters"),
        ));
    }
    Ok(())
}

/// Errors that can be retried without changing the request.
pub trait Retryable {
    fn is_retryable(&self) -> bool;
}
