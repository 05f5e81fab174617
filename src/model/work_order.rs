use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

use crate::error::{min_chars, ValidationError};
use crate::model::checklist::AcceptedChecklist;
use crate::model::{OrderStatus, OrderType, Priority, TechnicianId, TransitionError};

/// Type-safe identifier for Work Orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OrderId(pub u32);

impl From<u32> for OrderId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "order_{}", self.0)
    }
}

/// The customer the work is done for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub name: String,
    pub tax_id: Option<String>,
    pub address: String,
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// Where the work happens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub address: String,
    /// `"lat,lng"`
    pub coordinates: Option<String>,
    pub map_link: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpedimentKind {
    Access,
    Materials,
    Equipment,
    Safety,
    Client,
    Other,
}

/// State a technician reports alongside progress notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressState {
    InProgress,
    /// Work stopped on site; the order moves to `observed`.
    Paused,
}

impl FromStr for ImpedimentKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "access" => Ok(ImpedimentKind::Access),
            "materials" => Ok(ImpedimentKind::Materials),
            "equipment" => Ok(ImpedimentKind::Equipment),
            "safety" => Ok(ImpedimentKind::Safety),
            "client" => Ok(ImpedimentKind::Client),
            "other" => Ok(ImpedimentKind::Other),
            other => Err(ValidationError::new(
                "kind",
                format!("unknown impediment type: {other}"),
            )),
        }
    }
}

impl FromStr for ProgressState {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in_progress" => Ok(ProgressState::InProgress),
            "paused" => Ok(ProgressState::Paused),
            other => Err(ValidationError::new(
                "state",
                format!("unsupported progress state: {other}"),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressReport {
    pub state: ProgressState,
    pub notes: String,
    pub technician: TechnicianId,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Impediment {
    pub kind: ImpedimentKind,
    pub description: String,
    pub technician: TechnicianId,
    pub at: DateTime<Utc>,
}

/// Append-only history shown on the order page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActivityEntry {
    Progress(ProgressReport),
    Impediment(Impediment),
}

/// Sign-off recorded when a technician closes the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRecord {
    pub notes: String,
    pub client_signed: bool,
    pub technician: TechnicianId,
    pub at: DateTime<Utc>,
}

/// A unit of field work.
///
/// # Actor Framework
/// This struct implements the [`ActorEntity`](crate::framework::ActorEntity) trait,
/// allowing it to be managed by a [`ResourceActor`](crate::framework::ResourceActor).
///
/// See [`impl ActorEntity for WorkOrder`](#impl-ActorEntity-for-WorkOrder) for details on:
/// - Creation parameters ([`NewWorkOrder`])
/// - Update parameters ([`WorkOrderUpdate`](crate::work_order_actor::WorkOrderUpdate))
/// - Custom actions ([`WorkOrderAction`](crate::work_order_actor::WorkOrderAction))
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkOrder {
    pub id: OrderId,
    pub order_number: u32,
    pub title: String,
    pub description: String,
    pub order_type: OrderType,
    pub client: Client,
    pub location: Location,
    pub created_at: DateTime<Utc>,
    pub scheduled_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub status: OrderStatus,
    pub priority: Priority,
    pub assigned_to: Option<TechnicianId>,
    pub supervisor_notes: Option<String>,
    pub activity: Vec<ActivityEntry>,
    pub checklist: Option<AcceptedChecklist>,
    pub completion: Option<CompletionRecord>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a new work order. New orders always start `pending`.
#[derive(Debug, Clone)]
pub struct NewWorkOrder {
    pub title: String,
    pub description: String,
    pub order_type: OrderType,
    pub client: Client,
    pub location: Location,
    pub scheduled_at: DateTime<Utc>,
    pub priority: Priority,
    pub assigned_to: Option<TechnicianId>,
    pub supervisor_notes: Option<String>,
}

fn validate_client(client: &Client) -> Result<(), ValidationError> {
    min_chars("client.name", &client.name, 3)?;
    min_chars("client.address", &client.address, 5)?;
    match &client.email {
        Some(email) if !email.contains('@') => Err(ValidationError::new(
            "client.email",
            "must be a valid email address",
        )),
        _ => Ok(()),
    }
}

impl NewWorkOrder {
    pub fn validate(&self) -> Result<(), ValidationError> {
        min_chars("title", &self.title, 5)?;
        min_chars("description", &self.description, 10)?;
        validate_client(&self.client)?;
        min_chars("location.address", &self.location.address, 5)
    }
}

/// Field edits a supervisor may apply. Status only moves through the lifecycle actions.
#[derive(Debug, Clone, Default)]
pub struct WorkOrderPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub order_type: Option<OrderType>,
    pub client: Option<Client>,
    pub location: Option<Location>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub priority: Option<Priority>,
    pub supervisor_notes: Option<String>,
}

impl WorkOrderPatch {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(title) = &self.title {
            min_chars("title", title, 5)?;
        }
        if let Some(description) = &self.description {
            min_chars("description", description, 10)?;
        }
        if let Some(client) = &self.client {
            validate_client(client)?;
        }
        if let Some(location) = &self.location {
            min_chars("location.address", &location.address, 5)?;
        }
        Ok(())
    }
}

/// Work order query. `None` fields do not constrain the result.
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    /// Case-insensitive match on title, description, location, client name, tax id or
    /// order number.
    pub search: Option<String>,
    pub status: Option<OrderStatus>,
    pub priority: Option<Priority>,
    pub order_type: Option<OrderType>,
    pub assigned_to: Option<TechnicianId>,
}

impl WorkOrder {
    pub fn new(id: OrderId, params: NewWorkOrder, now: DateTime<Utc>) -> Self {
        Self {
            id,
            order_number: id.0,
            title: params.title,
            description: params.description,
            order_type: params.order_type,
            client: params.client,
            location: params.location,
            created_at: now,
            scheduled_at: params.scheduled_at,
            started_at: None,
            finished_at: None,
            status: OrderStatus::Pending,
            priority: params.priority,
            assigned_to: params.assigned_to,
            supervisor_notes: params.supervisor_notes,
            activity: Vec::new(),
            checklist: None,
            completion: None,
            updated_at: now,
        }
    }

    /// Moves the order one step along the lifecycle and stamps the timestamps.
    ///
    /// `started_at` is set on the first entry into `in_progress` only; resuming from
    /// `observed` keeps the first start.
    pub fn move_to(&mut self, next: OrderStatus, now: DateTime<Utc>) -> Result<(), TransitionError> {
        self.status = self.status.transition(next)?;
        if next == OrderStatus::InProgress && self.started_at.is_none() {
            self.started_at = Some(now);
        }
        if next.is_terminal() {
            self.finished_at = Some(now);
        }
        self.updated_at = now;
        Ok(())
    }

    pub fn apply_patch(&mut self, patch: WorkOrderPatch, now: DateTime<Utc>) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(order_type) = patch.order_type {
            self.order_type = order_type;
        }
        if let Some(client) = patch.client {
            self.client = client;
        }
        if let Some(location) = patch.location {
            self.location = location;
        }
        if let Some(scheduled_at) = patch.scheduled_at {
            self.scheduled_at = scheduled_at;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(notes) = patch.supervisor_notes {
            self.supervisor_notes = Some(notes);
        }
        self.updated_at = now;
    }

    pub fn is_assigned_to(&self, technician: TechnicianId) -> bool {
        self.assigned_to == Some(technician)
    }

    pub fn impediments(&self) -> impl Iterator<Item = &Impediment> {
        self.activity.iter().filter_map(|entry| match entry {
            ActivityEntry::Impediment(impediment) => Some(impediment),
            ActivityEntry::Progress(_) => None,
        })
    }

    pub fn matches(&self, filter: &OrderFilter) -> bool {
        if filter.status.is_some_and(|s| s != self.status)
            || filter.priority.is_some_and(|p| p != self.priority)
            || filter.order_type.is_some_and(|t| t != self.order_type)
        {
            return false;
        }
        if filter.assigned_to.is_some() && filter.assigned_to != self.assigned_to {
            return false;
        }
        match &filter.search {
            Some(term) => {
                let term = term.to_lowercase();
                let number = self.order_number.to_string();
                let hit = [
                    Some(self.title.as_str()),
                    Some(self.description.as_str()),
                    Some(self.location.address.as_str()),
                    Some(self.client.name.as_str()),
                    self.client.tax_id.as_deref(),
                    Some(number.as_str()),
                ]
                .into_iter()
                .flatten()
                .any(|field| field.to_lowercase().contains(&term));
                hit
            }
            None => true,
        }
    }
}

/// Order counts per status, as shown on the metrics page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub total: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub observed: usize,
    pub cancelled: usize,
}

impl OrderSummary {
    pub fn from_orders<'a>(orders: impl IntoIterator<Item = &'a WorkOrder>) -> Self {
        orders.into_iter().fold(Self::default(), |mut summary, order| {
            summary.total += 1;
            match order.status {
                OrderStatus::Pending => summary.pending += 1,
                OrderStatus::InProgress => summary.in_progress += 1,
                OrderStatus::Completed => summary.completed += 1,
                OrderStatus::Observed => summary.observed += 1,
                OrderStatus::Cancelled => summary.cancelled += 1,
            }
            summary
        })
    }

    /// Share of orders completed, in `0.0..=1.0`. Zero when there are no orders.
    pub fn completion_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }
}
