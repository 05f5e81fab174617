//! Custom actions for the Work Order actor.
//!
//! Each action carries the acting [`Principal`] so the lifecycle gate can be evaluated
//! against the stored snapshot inside the actor, where no other request can interleave.
//! Handled by [`ActorEntity::handle_action`](crate::framework::ActorEntity::handle_action)
//! on [`WorkOrder`](crate::model::WorkOrder).

use crate::access::Principal;
use crate::error::{min_chars, ValidationError};
use crate::gates::CompletionConfirmation;
use crate::model::{
    ChecklistResponse, ChecklistTemplate, ImpedimentKind, ProgressState, TechnicianId,
    WorkOrderPatch,
};

/// Lifecycle operations on a single work order.
#[derive(Debug, Clone)]
pub enum WorkOrderCommand {
    /// Assigns (or reassigns) the order. The technician must exist on the roster.
    AssignTechnician { technician: TechnicianId },
    /// `pending → in_progress`, by the assigned technician.
    Start,
    /// Appends a progress note. `Paused` moves the order to `observed`.
    ReportProgress { state: ProgressState, notes: String },
    /// Logs an impediment and moves the order to `observed`.
    ReportImpediment {
        kind: ImpedimentKind,
        description: String,
    },
    /// Validates and stores the technician's checklist answers.
    SubmitChecklist {
        template: ChecklistTemplate,
        response: ChecklistResponse,
    },
    /// `in_progress → completed`, with the client's sign-off.
    Complete {
        notes: String,
        confirmation: CompletionConfirmation,
    },
    /// Any non-terminal state `→ cancelled`, by a supervisor.
    Cancel { reason: Option<String> },
    /// `observed → in_progress`, by the assigned technician.
    Resume,
}

impl WorkOrderCommand {
    /// Field constraints shared by the forms and the store.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            WorkOrderCommand::ReportProgress { notes, .. } => min_chars("notes", notes, 10),
            WorkOrderCommand::ReportImpediment { description, .. } => {
                min_chars("description", description, 10)
            }
            WorkOrderCommand::Complete {
                notes,
                confirmation,
            } => {
                min_chars("notes", notes, 10)?;
                if !confirmation.client_signed {
                    return Err(ValidationError::new(
                        "client_signed",
                        "the client must sign off the work",
                    ));
                }
                if !confirmation.all_tasks_completed {
                    return Err(ValidationError::new(
                        "all_tasks_completed",
                        "all tasks must be completed",
                    ));
                }
                Ok(())
            }
            WorkOrderCommand::AssignTechnician { .. }
            | WorkOrderCommand::Start
            | WorkOrderCommand::SubmitChecklist { .. }
            | WorkOrderCommand::Cancel { .. }
            | WorkOrderCommand::Resume => Ok(()),
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            WorkOrderCommand::AssignTechnician { .. } => "assign_technician",
            WorkOrderCommand::Start => "start",
            WorkOrderCommand::ReportProgress { .. } => "report_progress",
            WorkOrderCommand::ReportImpediment { .. } => "report_impediment",
            WorkOrderCommand::SubmitChecklist { .. } => "submit_checklist",
            WorkOrderCommand::Complete { .. } => "complete",
            WorkOrderCommand::Cancel { .. } => "cancel",
            WorkOrderCommand::Resume => "resume",
        }
    }
}

/// A command together with who issued it.
#[derive(Debug, Clone)]
pub struct WorkOrderAction {
    pub principal: Principal,
    pub command: WorkOrderCommand,
}

/// A field patch together with who issued it.
#[derive(Debug, Clone)]
pub struct WorkOrderUpdate {
    pub principal: Principal,
    pub patch: WorkOrderPatch,
}
