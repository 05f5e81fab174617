//! [`ActorEntity`] implementation for [`Evidence`].

use async_trait::async_trait;
use chrono::Utc;

use crate::access::{has_permission, PermissionDenied, Principal};
use crate::clients::WorkOrderClient;
use crate::error::min_chars;
use crate::evidence_actor::EvidenceError;
use crate::framework::{ActorClient, ActorEntity};
use crate::model::{Capability, Evidence, EvidenceFilter, EvidenceId, NewEvidence, Role};

/// Replaces the description. Allowed for the uploader and for `editOrders`.
#[derive(Debug, Clone)]
pub struct EvidenceUpdate {
    pub principal: Principal,
    pub description: Option<String>,
}

/// Evidence records have no actions beyond CRUD.
#[derive(Debug, Clone)]
pub enum EvidenceAction {}

#[async_trait]
impl ActorEntity for Evidence {
    type Id = EvidenceId;
    type Create = NewEvidence;
    type Update = EvidenceUpdate;
    type Action = EvidenceAction;
    type ActionResult = ();
    type Filter = EvidenceFilter;
    type Context = WorkOrderClient;
    type Error = EvidenceError;

    fn from_create_params(id: EvidenceId, params: NewEvidence) -> Result<Self, Self::Error> {
        params.file.validate()?;
        Ok(Evidence::new(id, params, Utc::now()))
    }

    fn matches(&self, filter: &EvidenceFilter) -> bool {
        Evidence::matches(self, filter)
    }

    /// The order must exist and still be open, and a technician must be its assignee.
    async fn on_create(&mut self, orders: &WorkOrderClient) -> Result<(), Self::Error> {
        let order = orders.fetch(self.work_order_id).await?;
        let uploader = self.uploaded_by;
        if uploader.role == Role::Technician
            && !uploader
                .technician_id
                .is_some_and(|tech| order.is_assigned_to(tech))
        {
            return Err(EvidenceError::NotAssignee { order: order.id });
        }
        if order.status.is_terminal() {
            return Err(EvidenceError::OrderClosed {
                order: order.id,
                status: order.status,
            });
        }
        Ok(())
    }

    async fn on_update(
        &mut self,
        update: EvidenceUpdate,
        _orders: &WorkOrderClient,
    ) -> Result<(), Self::Error> {
        let EvidenceUpdate {
            principal,
            description,
        } = update;
        let uploader = self
            .technician_id()
            .is_some_and(|tech| principal.is_technician(tech));
        if !uploader && !has_permission(principal.role, Capability::EditOrders) {
            return Err(PermissionDenied {
                role: principal.role,
                capability: Capability::EditOrders,
            }
            .into());
        }
        if let Some(description) = &description {
            min_chars("description", description, 3)?;
        }
        self.description = description;
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: EvidenceAction,
        _orders: &WorkOrderClient,
    ) -> Result<(), Self::Error> {
        match action {}
    }
}
