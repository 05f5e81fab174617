//! Checklist templates and the rule that accepts or rejects a technician's responses.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::error::ValidationError;
use crate::model::{OrderId, OrderType, TechnicianId};

/// One verification step of a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: String,
    pub description: String,
    pub required: bool,
}

/// A named, ordered list of verification items, usually tied to one order type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistTemplate {
    pub id: String,
    pub name: String,
    pub order_type: Option<OrderType>,
    pub items: Vec<ChecklistItem>,
}

/// The technician's answer for one item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemResponse {
    pub checked: bool,
    pub notes: Option<String>,
}

/// A submitted response set, keyed by item id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistResponse {
    pub work_order_id: OrderId,
    pub technician_id: Option<TechnicianId>,
    pub entries: BTreeMap<String, ItemResponse>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChecklistError {
    /// Required items left unchecked or unanswered, in template order.
    #[error("incomplete required items: {}", missing.join(", "))]
    IncompleteChecklist { missing: Vec<String> },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl ChecklistTemplate {
    /// Accepts `response` iff every required item is answered with `checked == true`.
    ///
    /// Optional items may be unchecked or absent. Entries for items the template does not
    /// define are rejected. Validation is pure, so resubmitting the same response always
    /// yields the same outcome.
    pub fn validate(&self, response: &ChecklistResponse) -> Result<(), ChecklistError> {
        if let Some(unknown) = response
            .entries
            .keys()
            .find(|id| !self.items.iter().any(|item| &item.id == *id))
        {
            return Err(ValidationError::new(
                "items",
                format!("item {unknown} is not part of checklist {}", self.id),
            )
            .into());
        }

        let missing: Vec<String> = self
            .items
            .iter()
            .filter(|item| item.required)
            .filter(|item| !response.entries.get(&item.id).is_some_and(|r| r.checked))
            .map(|item| item.id.clone())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ChecklistError::IncompleteChecklist { missing })
        }
    }

    pub fn required_items(&self) -> impl Iterator<Item = &ChecklistItem> {
        self.items.iter().filter(|item| item.required)
    }
}

/// A response the store accepted for an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptedChecklist {
    pub template_id: String,
    pub response: ChecklistResponse,
}
