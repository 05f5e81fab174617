//! Technician-side forms and the assignment/evidence forms.
//!
//! Each form parses its raw inputs and validates them with the same rules the store
//! applies, so the store never sees a request the form would have rejected.

use crate::error::{min_chars, ValidationError};
use crate::gates::CompletionConfirmation;
use crate::model::{EvidenceFile, TechnicianId};
use crate::work_order_actor::WorkOrderCommand;

#[derive(Debug, Clone, Default)]
pub struct ProgressReportForm {
    /// `in_progress` or `paused`.
    pub state: String,
    pub notes: String,
}

impl ProgressReportForm {
    pub fn parse(&self) -> Result<WorkOrderCommand, ValidationError> {
        let command = WorkOrderCommand::ReportProgress {
            state: self.state.trim().parse()?,
            notes: self.notes.trim().to_string(),
        };
        command.validate()?;
        Ok(command)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ImpedimentForm {
    /// `access`, `materials`, `equipment`, `safety`, `client` or `other`.
    pub kind: String,
    pub description: String,
}

impl ImpedimentForm {
    pub fn parse(&self) -> Result<WorkOrderCommand, ValidationError> {
        let command = WorkOrderCommand::ReportImpediment {
            kind: self.kind.trim().parse()?,
            description: self.description.trim().to_string(),
        };
        command.validate()?;
        Ok(command)
    }
}

#[derive(Debug, Clone, Default)]
pub struct CompletionForm {
    pub notes: String,
    pub client_signed: bool,
    pub all_tasks_completed: bool,
}

impl CompletionForm {
    pub fn confirmation(&self) -> CompletionConfirmation {
        CompletionConfirmation {
            all_tasks_completed: self.all_tasks_completed,
            client_signed: self.client_signed,
        }
    }

    pub fn parse(&self) -> Result<WorkOrderCommand, ValidationError> {
        let command = WorkOrderCommand::Complete {
            notes: self.notes.trim().to_string(),
            confirmation: self.confirmation(),
        };
        command.validate()?;
        Ok(command)
    }
}

#[derive(Debug, Clone, Default)]
pub struct AssignmentForm {
    pub technician: Option<TechnicianId>,
}

impl AssignmentForm {
    pub fn parse(&self) -> Result<WorkOrderCommand, ValidationError> {
        let technician = self
            .technician
            .ok_or_else(|| ValidationError::new("technician", "select a technician"))?;
        Ok(WorkOrderCommand::AssignTechnician { technician })
    }
}

#[derive(Debug, Clone, Default)]
pub struct EvidenceForm {
    pub files: Vec<EvidenceFile>,
    pub description: String,
}

impl EvidenceForm {
    /// Checks that at least one file is attached and every file is acceptable.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.files.is_empty() {
            return Err(ValidationError::new("files", "attach at least one file"));
        }
        self.files.iter().try_for_each(EvidenceFile::validate)?;
        match self.description.trim() {
            "" => Ok(()),
            description => min_chars("description", description, 3),
        }
    }

    pub fn description(&self) -> Option<String> {
        let description = self.description.trim();
        (!description.is_empty()).then(|| description.to_string())
    }
}
