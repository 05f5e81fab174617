//! The create/edit order form as entered by a supervisor.

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::ValidationError;
use crate::model::{Client, Location, NewWorkOrder, TechnicianId, WorkOrderPatch};

/// Raw field values. Optional text inputs left blank are treated as absent.
#[derive(Debug, Clone, Default)]
pub struct OrderForm {
    pub title: String,
    pub description: String,
    pub order_type: String,
    pub priority: String,
    pub client_name: String,
    pub client_tax_id: String,
    pub client_address: String,
    pub client_phone: String,
    pub client_email: String,
    pub location: String,
    pub location_coordinates: String,
    /// RFC 3339 timestamp or a plain `YYYY-MM-DD` date (scheduled at midnight UTC).
    pub scheduled_at: String,
    pub assigned_to: Option<TechnicianId>,
    pub supervisor_notes: String,
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn required<'a>(field: &str, value: &'a str, what: &str) -> Result<&'a str, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::new(field, format!("select {what}")));
    }
    Ok(value)
}

fn parse_schedule(value: &str) -> Result<DateTime<Utc>, ValidationError> {
    let value = required("scheduled_at", value, "a scheduled date")?;
    if let Ok(at) = DateTime::parse_from_rfc3339(value) {
        return Ok(at.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|at| at.and_utc())
        .ok_or_else(|| ValidationError::new("scheduled_at", format!("invalid date: {value}")))
}

impl OrderForm {
    /// Parses and validates the form into a create payload.
    pub fn parse(&self) -> Result<NewWorkOrder, ValidationError> {
        let params = NewWorkOrder {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            order_type: required("order_type", &self.order_type, "an order type")?.parse()?,
            client: Client {
                name: self.client_name.trim().to_string(),
                tax_id: optional(&self.client_tax_id),
                address: self.client_address.trim().to_string(),
                phone: optional(&self.client_phone),
                email: optional(&self.client_email),
            },
            location: Location {
                address: self.location.trim().to_string(),
                coordinates: optional(&self.location_coordinates),
                map_link: None,
            },
            scheduled_at: parse_schedule(&self.scheduled_at)?,
            priority: required("priority", &self.priority, "a priority")?.parse()?,
            assigned_to: self.assigned_to,
            supervisor_notes: optional(&self.supervisor_notes),
        };
        params.validate()?;
        Ok(params)
    }

    /// Parses the form as an edit. Every field is written back; assignment goes through
    /// its own action.
    pub fn parse_patch(&self) -> Result<WorkOrderPatch, ValidationError> {
        let params = self.parse()?;
        Ok(WorkOrderPatch {
            title: Some(params.title),
            description: Some(params.description),
            order_type: Some(params.order_type),
            client: Some(params.client),
            location: Some(params.location),
            scheduled_at: Some(params.scheduled_at),
            priority: Some(params.priority),
            supervisor_notes: params.supervisor_notes,
        })
    }
}
