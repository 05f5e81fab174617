//! Work order status lifecycle and the other enumerated order attributes.
//!
//! Status changes are only legal along the edges of [`OrderStatus::can_transition_to`]:
//!
//! ```text
//! pending ──► in_progress ──► completed
//!    │  │        │   ▲  │
//!    │  │        ▼   │  └────► cancelled
//!    │  └────► observed ─────► cancelled
//!    └─────────────────────────► cancelled
//! ```
//!
//! `completed` and `cancelled` are terminal. `observed` is not: an observed order resumes
//! to `in_progress` once the impediment is cleared.

use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

use crate::error::ValidationError;

/// Lifecycle state of a work order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    InProgress,
    Completed,
    Observed,
    Cancelled,
}

/// A status change outside the lifecycle's edge set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("transition from {from} to {to} is not allowed")]
pub struct TransitionError {
    pub from: OrderStatus,
    pub to: OrderStatus,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::InProgress,
        OrderStatus::Completed,
        OrderStatus::Observed,
        OrderStatus::Cancelled,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::InProgress => "in_progress",
            OrderStatus::Completed => "completed",
            OrderStatus::Observed => "observed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    /// Returns true if `next` is reachable from `self` in one step.
    #[must_use]
    pub const fn can_transition_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (*self, next),
            (Pending, InProgress)
                | (Pending, Observed)
                | (Pending, Cancelled)
                | (InProgress, Completed)
                | (InProgress, Observed)
                | (InProgress, Cancelled)
                | (Observed, InProgress)
                | (Observed, Cancelled)
        )
    }

    /// Validates a single step of the lifecycle.
    pub fn transition(self, next: OrderStatus) -> Result<OrderStatus, TransitionError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(TransitionError {
                from: self,
                to: next,
            })
        }
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ValidationError::new("status", format!("unknown status: {s}")))
    }
}

/// Urgency of a work order. Independent of status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        }
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            "urgent" => Ok(Priority::Urgent),
            other => Err(ValidationError::new(
                "priority",
                format!("unknown priority: {other}"),
            )),
        }
    }
}

/// Kind of field work. Wire names are the dashboard's Spanish identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderType {
    #[serde(rename = "instalacion")]
    Installation,
    #[serde(rename = "mantenimiento")]
    Maintenance,
    #[serde(rename = "inspeccion")]
    Inspection,
    #[serde(rename = "reparacion")]
    Repair,
    #[serde(rename = "otro")]
    Other,
}

impl OrderType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderType::Installation => "instalacion",
            OrderType::Maintenance => "mantenimiento",
            OrderType::Inspection => "inspeccion",
            OrderType::Repair => "reparacion",
            OrderType::Other => "otro",
        }
    }
}

impl Display for OrderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "instalacion" => Ok(OrderType::Installation),
            "mantenimiento" => Ok(OrderType::Maintenance),
            "inspeccion" => Ok(OrderType::Inspection),
            "reparacion" => Ok(OrderType::Repair),
            "otro" => Ok(OrderType::Other),
            other => Err(ValidationError::new(
                "order_type",
                format!("unknown order type: {other}"),
            )),
        }
    }
}
