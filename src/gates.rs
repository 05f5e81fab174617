//! # Work Order Lifecycle Gate
//!
//! Pure predicates that decide which actions a role may take on a work order snapshot.
//! They never mutate. The work-order store evaluates them again against its own copy
//! before applying any change.

use serde::{Deserialize, Serialize};

use crate::access::{has_permission, Principal};
use crate::model::{Capability, OrderStatus, Role, WorkOrder};

/// What the technician affirms in the completion form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionConfirmation {
    pub all_tasks_completed: bool,
    pub client_signed: bool,
}

impl CompletionConfirmation {
    pub const CONFIRMED: Self = Self {
        all_tasks_completed: true,
        client_signed: true,
    };

    pub const fn is_confirmed(&self) -> bool {
        self.all_tasks_completed && self.client_signed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderActionKind {
    Edit,
    AssignTechnician,
    Start,
    Resume,
    ReportProgress,
    ReportImpediment,
    SubmitChecklist,
    UploadEvidence,
    Complete,
    Cancel,
}

pub fn can_assign_technician(order: &WorkOrder, role: Role) -> bool {
    has_permission(role, Capability::AssignTechnicians) && order.status != OrderStatus::Completed
}

pub fn can_report_impediment(order: &WorkOrder, role: Role) -> bool {
    role == Role::Technician && order.status == OrderStatus::InProgress
}

pub fn can_report_progress(order: &WorkOrder, role: Role) -> bool {
    role == Role::Technician && order.status == OrderStatus::InProgress
}

/// Whether the completion form may be shown. Submitting it additionally needs a
/// [`CompletionConfirmation`], see [`can_complete`].
pub fn can_complete_order(order: &WorkOrder, role: Role) -> bool {
    role == Role::Technician
        && has_permission(role, Capability::MarkOrderComplete)
        && order.status == OrderStatus::InProgress
}

pub fn can_complete(order: &WorkOrder, role: Role, confirmation: CompletionConfirmation) -> bool {
    can_complete_order(order, role) && confirmation.is_confirmed()
}

pub fn can_edit(_order: &WorkOrder, role: Role) -> bool {
    has_permission(role, Capability::EditOrders)
}

pub fn can_cancel(order: &WorkOrder, role: Role) -> bool {
    can_edit(order, role) && order.status.can_transition_to(OrderStatus::Cancelled)
}

pub fn can_upload_evidence(role: Role) -> bool {
    has_permission(role, Capability::UploadEvidence)
}

/// A technician may start a pending order assigned to them.
pub fn can_start(order: &WorkOrder, principal: &Principal) -> bool {
    acts_as_assignee(order, principal) && order.status == OrderStatus::Pending
}

/// A technician may pick an observed order back up once the impediment clears.
pub fn can_resume(order: &WorkOrder, principal: &Principal) -> bool {
    acts_as_assignee(order, principal) && order.status == OrderStatus::Observed
}

fn acts_as_assignee(order: &WorkOrder, principal: &Principal) -> bool {
    order
        .assigned_to
        .is_some_and(|tech| principal.is_technician(tech))
}

/// Every action the gate currently permits `principal` on `order`.
///
/// Technician field actions are only offered on orders assigned to that technician.
pub fn available_actions(order: &WorkOrder, principal: &Principal) -> Vec<OrderActionKind> {
    let role = principal.role;
    let assignee = role != Role::Technician || acts_as_assignee(order, principal);
    let mut actions = Vec::new();

    if can_edit(order, role) && !order.status.is_terminal() {
        actions.push(OrderActionKind::Edit);
    }
    if can_assign_technician(order, role) && !order.status.is_terminal() {
        actions.push(OrderActionKind::AssignTechnician);
    }
    if can_start(order, principal) {
        actions.push(OrderActionKind::Start);
    }
    if can_resume(order, principal) {
        actions.push(OrderActionKind::Resume);
    }
    if assignee && can_report_progress(order, role) {
        actions.push(OrderActionKind::ReportProgress);
    }
    if assignee && can_report_impediment(order, role) {
        actions.push(OrderActionKind::ReportImpediment);
        actions.push(OrderActionKind::SubmitChecklist);
    }
    if assignee && can_upload_evidence(role) && !order.status.is_terminal() {
        actions.push(OrderActionKind::UploadEvidence);
    }
    if assignee && can_complete_order(order, role) {
        actions.push(OrderActionKind::Complete);
    }
    if can_cancel(order, role) {
        actions.push(OrderActionKind::Cancel);
    }
    actions
}
