//! [`ActorEntity`] implementation for [`WorkOrder`].
//!
//! Every mutation re-checks the lifecycle gate against the stored snapshot and then
//! applies the status change through [`WorkOrder::move_to`]. The actor commits the working
//! copy only when the hook returns `Ok`, so a rejected action leaves the order untouched.

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use crate::access::{require, PermissionDenied, Principal};
use crate::clients::TechnicianClient;
use crate::error::ValidationError;
use crate::framework::{ActorClient, ActorEntity};
use crate::gates;
use crate::model::{
    AcceptedChecklist, ActivityEntry, Capability, CompletionRecord, Impediment, NewWorkOrder,
    OrderFilter, OrderId, OrderStatus, ProgressReport, ProgressState, Role, TechnicianId,
    TransitionError, WorkOrder,
};
use crate::work_order_actor::{WorkOrderAction, WorkOrderCommand, WorkOrderError, WorkOrderUpdate};

impl WorkOrder {
    /// The technician behind `principal`, provided they are this order's assignee.
    fn assignee(
        &self,
        principal: &Principal,
        action: &'static str,
    ) -> Result<TechnicianId, WorkOrderError> {
        match (principal.role, principal.technician_id, self.assigned_to) {
            (Role::Technician, Some(acting), Some(assigned)) if acting == assigned => Ok(acting),
            _ => Err(WorkOrderError::NotAssignee {
                order: self.id,
                action,
            }),
        }
    }

    fn not_allowed(&self, action: &'static str) -> WorkOrderError {
        WorkOrderError::ActionNotAllowed {
            action,
            status: self.status,
        }
    }

    /// A transition that is legal in general but not through this action, e.g. starting an
    /// observed order instead of resuming it.
    fn require_status(&self, expected: OrderStatus, next: OrderStatus) -> Result<(), WorkOrderError> {
        if self.status == expected {
            Ok(())
        } else {
            Err(TransitionError {
                from: self.status,
                to: next,
            }
            .into())
        }
    }
}

#[async_trait]
impl ActorEntity for WorkOrder {
    type Id = OrderId;
    type Create = NewWorkOrder;
    type Update = WorkOrderUpdate;
    type Action = WorkOrderAction;
    type ActionResult = WorkOrder;
    type Filter = OrderFilter;
    type Context = TechnicianClient;
    type Error = WorkOrderError;

    fn from_create_params(id: OrderId, params: NewWorkOrder) -> Result<Self, Self::Error> {
        params.validate()?;
        Ok(WorkOrder::new(id, params, Utc::now()))
    }

    fn matches(&self, filter: &OrderFilter) -> bool {
        WorkOrder::matches(self, filter)
    }

    /// Rejects orders pre-assigned to a technician the roster does not know.
    async fn on_create(&mut self, roster: &TechnicianClient) -> Result<(), Self::Error> {
        if let Some(technician) = self.assigned_to {
            roster.fetch(technician).await?;
        }
        Ok(())
    }

    async fn on_update(
        &mut self,
        update: WorkOrderUpdate,
        _roster: &TechnicianClient,
    ) -> Result<(), Self::Error> {
        let WorkOrderUpdate { principal, patch } = update;
        if !gates::can_edit(self, principal.role) {
            return Err(PermissionDenied {
                role: principal.role,
                capability: Capability::EditOrders,
            }
            .into());
        }
        if self.status.is_terminal() {
            return Err(self.not_allowed("edit"));
        }
        patch.validate()?;
        self.apply_patch(patch, Utc::now());
        Ok(())
    }

    async fn on_delete(&self, _roster: &TechnicianClient) -> Result<(), Self::Error> {
        debug!(order = %self.id, status = %self.status, "Removing work order");
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: WorkOrderAction,
        roster: &TechnicianClient,
    ) -> Result<WorkOrder, Self::Error> {
        let WorkOrderAction { principal, command } = action;
        let name = command.name();
        command.validate()?;
        let now = Utc::now();

        match command {
            WorkOrderCommand::AssignTechnician { technician } => {
                require(principal.role, Capability::AssignTechnicians)?;
                if !gates::can_assign_technician(self, principal.role) {
                    return Err(self.not_allowed(name));
                }
                roster.fetch(technician).await?;
                self.assigned_to = Some(technician);
                self.updated_at = now;
            }
            WorkOrderCommand::Start => {
                self.assignee(&principal, name)?;
                self.require_status(OrderStatus::Pending, OrderStatus::InProgress)?;
                self.move_to(OrderStatus::InProgress, now)?;
            }
            WorkOrderCommand::Resume => {
                self.assignee(&principal, name)?;
                self.require_status(OrderStatus::Observed, OrderStatus::InProgress)?;
                self.move_to(OrderStatus::InProgress, now)?;
            }
            WorkOrderCommand::ReportProgress { state, notes } => {
                let technician = self.assignee(&principal, name)?;
                if !gates::can_report_progress(self, principal.role) {
                    return Err(self.not_allowed(name));
                }
                self.activity.push(ActivityEntry::Progress(ProgressReport {
                    state,
                    notes,
                    technician,
                    at: now,
                }));
                match state {
                    ProgressState::Paused => self.move_to(OrderStatus::Observed, now)?,
                    ProgressState::InProgress => self.updated_at = now,
                }
            }
            WorkOrderCommand::ReportImpediment { kind, description } => {
                let technician = self.assignee(&principal, name)?;
                if !gates::can_report_impediment(self, principal.role) {
                    return Err(self.not_allowed(name));
                }
                self.activity.push(ActivityEntry::Impediment(Impediment {
                    kind,
                    description,
                    technician,
                    at: now,
                }));
                self.move_to(OrderStatus::Observed, now)?;
            }
            WorkOrderCommand::SubmitChecklist {
                template,
                mut response,
            } => {
                let technician = self.assignee(&principal, name)?;
                if self.status != OrderStatus::InProgress {
                    return Err(self.not_allowed(name));
                }
                if response.work_order_id != self.id {
                    return Err(ValidationError::new(
                        "work_order_id",
                        format!("response belongs to {}", response.work_order_id),
                    )
                    .into());
                }
                template.validate(&response)?;
                response.technician_id = Some(technician);
                self.checklist = Some(AcceptedChecklist {
                    template_id: template.id,
                    response,
                });
                self.updated_at = now;
            }
            WorkOrderCommand::Complete {
                notes,
                confirmation,
            } => {
                require(principal.role, Capability::MarkOrderComplete)?;
                let technician = self.assignee(&principal, name)?;
                if !gates::can_complete(self, principal.role, confirmation) {
                    self.require_status(OrderStatus::InProgress, OrderStatus::Completed)?;
                    return Err(self.not_allowed(name));
                }
                self.move_to(OrderStatus::Completed, now)?;
                self.completion = Some(CompletionRecord {
                    notes,
                    client_signed: confirmation.client_signed,
                    technician,
                    at: now,
                });
            }
            WorkOrderCommand::Cancel { reason } => {
                require(principal.role, Capability::EditOrders)?;
                self.move_to(OrderStatus::Cancelled, now)?;
                if let Some(reason) = reason {
                    self.supervisor_notes = Some(match self.supervisor_notes.take() {
                        Some(notes) => format!("{notes}\nCancelled: {reason}"),
                        None => format!("Cancelled: {reason}"),
                    });
                }
            }
        }

        debug!(order = %self.id, action = name, status = %self.status, "Applied");
        Ok(self.clone())
    }
}
