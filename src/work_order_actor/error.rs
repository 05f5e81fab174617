//! Error types for the Work Order actor.

use thiserror::Error;

use crate::access::PermissionDenied;
use crate::error::{Retryable, ValidationError};
use crate::model::{ChecklistError, OrderId, OrderStatus, TransitionError};
use crate::technician_actor::TechnicianError;

/// Errors that can occur during work order operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum WorkOrderError {
    /// The requested work order was not found.
    #[error("Work order not found: {0}")]
    NotFound(String),

    /// The input failed a field constraint.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The acting role lacks the capability for this operation.
    #[error(transparent)]
    PermissionDenied(#[from] PermissionDenied),

    /// Field actions are reserved for the technician the order is assigned to.
    #[error("{action} on {order} requires the assigned technician")]
    NotAssignee { order: OrderId, action: &'static str },

    /// The lifecycle gate refuses the action in the order's current status.
    #[error("cannot {action} an order that is {status}")]
    ActionNotAllowed {
        action: &'static str,
        status: OrderStatus,
    },

    /// The status change is not an edge of the lifecycle.
    #[error(transparent)]
    InvalidTransition(#[from] TransitionError),

    /// Required checklist items were left unchecked.
    #[error("incomplete required items: {}", missing.join(", "))]
    IncompleteChecklist { missing: Vec<String> },

    /// The technician roster rejected the lookup (unknown technician, roster down).
    #[error("Roster error: {0}")]
    Roster(#[from] TechnicianError),

    /// An error occurred while communicating with the actor system.
    #[error("Work order store unavailable: {0}")]
    Unavailable(String),
}

impl From<String> for WorkOrderError {
    fn from(msg: String) -> Self {
        WorkOrderError::Unavailable(msg)
    }
}

impl From<ChecklistError> for WorkOrderError {
    fn from(err: ChecklistError) -> Self {
        match err {
            ChecklistError::IncompleteChecklist { missing } => {
                WorkOrderError::IncompleteChecklist { missing }
            }
            ChecklistError::Validation(err) => WorkOrderError::Validation(err),
        }
    }
}

impl Retryable for WorkOrderError {
    fn is_retryable(&self) -> bool {
        match self {
            WorkOrderError::Unavailable(_) => true,
            WorkOrderError::Roster(inner) => inner.is_retryable(),
            _ => false,
        }
    }
}
