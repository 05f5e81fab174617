//! Error types for the Evidence actor.

use thiserror::Error;

use crate::access::PermissionDenied;
use crate::error::{Retryable, ValidationError};
use crate::model::{OrderId, OrderStatus};
use crate::work_order_actor::WorkOrderError;

/// Errors that can occur while recording evidence.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EvidenceError {
    #[error("Evidence not found: {0}")]
    NotFound(String),

    /// The file or description failed a constraint.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    PermissionDenied(#[from] PermissionDenied),

    /// Technicians attach files only to orders assigned to them.
    #[error("evidence for {order} requires the assigned technician")]
    NotAssignee { order: OrderId },

    /// Closed orders take no further evidence.
    #[error("cannot attach evidence to {order}, it is {status}")]
    OrderClosed { order: OrderId, status: OrderStatus },

    /// The work order lookup failed (unknown order, store down).
    #[error("Work order error: {0}")]
    WorkOrder(#[from] WorkOrderError),

    #[error("Evidence store unavailable: {0}")]
    Unavailable(String),
}

impl From<String> for EvidenceError {
    fn from(msg: String) -> Self {
        EvidenceError::Unavailable(msg)
    }
}

impl Retryable for EvidenceError {
    fn is_retryable(&self) -> bool {
        match self {
            EvidenceError::Unavailable(_) => true,
            EvidenceError::WorkOrder(inner) => inner.is_retryable(),
            _ => false,
        }
    }
}
