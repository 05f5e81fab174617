//! [`ActorEntity`] implementation for [`Technician`].

use async_trait::async_trait;

use crate::framework::ActorEntity;
use crate::model::{Availability, NewTechnician, Technician, TechnicianFilter, TechnicianId};
use crate::technician_actor::TechnicianError;

/// Profile edits. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct TechnicianUpdate {
    pub phone: Option<String>,
    pub specialty: Option<String>,
}

#[derive(Debug, Clone)]
pub enum TechnicianAction {
    SetAvailability(Availability),
}

#[async_trait]
impl ActorEntity for Technician {
    type Id = TechnicianId;
    type Create = NewTechnician;
    type Update = TechnicianUpdate;
    type Action = TechnicianAction;
    type ActionResult = Technician;
    type Filter = TechnicianFilter;
    type Context = ();
    type Error = TechnicianError;

    fn from_create_params(id: TechnicianId, params: NewTechnician) -> Result<Self, Self::Error> {
        params.validate()?;
        Ok(Technician::new(id, params))
    }

    fn matches(&self, filter: &TechnicianFilter) -> bool {
        Technician::matches(self, filter)
    }

    async fn on_update(&mut self, update: TechnicianUpdate, _ctx: &()) -> Result<(), Self::Error> {
        if let Some(specialty) = update.specialty {
            crate::error::min_chars("specialty", &specialty, 3)?;
            self.specialty = specialty;
        }
        if let Some(phone) = update.phone {
            self.phone = Some(phone);
        }
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: TechnicianAction,
        _ctx: &(),
    ) -> Result<Technician, Self::Error> {
        match action {
            TechnicianAction::SetAvailability(availability) => {
                self.availability = availability;
                Ok(self.clone())
            }
        }
    }
}
