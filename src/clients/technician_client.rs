//! # Technician Client
//!
//! Provides a high-level API for the technician roster.
//! It wraps a `ResourceClient<Technician>` and checks role authority before each write.

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::access::{has_permission, require, PermissionDenied, Principal};
use crate::clients::RetryPolicy;
use crate::framework::{ActorClient, FrameworkError, ResourceClient};
use crate::model::{Availability, Capability, NewTechnician, Technician, TechnicianFilter, TechnicianId};
use crate::technician_actor::{TechnicianAction, TechnicianError, TechnicianUpdate};

/// Client for interacting with the Technician actor.
#[derive(Clone)]
pub struct TechnicianClient {
    inner: ResourceClient<Technician>,
    retry: RetryPolicy,
}

impl TechnicianClient {
    pub fn new(inner: ResourceClient<Technician>) -> Self {
        Self {
            inner,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

#[async_trait]
impl ActorClient<Technician> for TechnicianClient {
    type Error = TechnicianError;

    fn inner(&self) -> &ResourceClient<Technician> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e.into_entity_error::<TechnicianError>() {
            Ok(err) => err,
            Err(FrameworkError::NotFound(id)) => TechnicianError::NotFound(id),
            Err(other) => TechnicianError::Unavailable(other.to_string()),
        }
    }

    fn not_found(id: &TechnicianId) -> Self::Error {
        TechnicianError::NotFound(id.to_string())
    }
}

impl TechnicianClient {
    /// Adds a technician to the roster. Requires `manageUsers`.
    #[instrument(skip(self))]
    pub async fn create(
        &self,
        principal: &Principal,
        params: NewTechnician,
    ) -> Result<TechnicianId, TechnicianError> {
        require(principal.role, Capability::ManageUsers)?;
        params.validate()?;
        debug!("Sending request");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: TechnicianId) -> Result<Technician, TechnicianError> {
        self.retry.run("get_technician", || self.fetch(id)).await
    }

    #[instrument(skip(self))]
    pub async fn list(&self, filter: TechnicianFilter) -> Result<Vec<Technician>, TechnicianError> {
        self.retry
            .run("list_technicians", || self.fetch_all(filter.clone()))
            .await
    }

    /// Edits a profile. Requires `manageUsers`.
    #[instrument(skip(self))]
    pub async fn update(
        &self,
        principal: &Principal,
        id: TechnicianId,
        update: TechnicianUpdate,
    ) -> Result<Technician, TechnicianError> {
        require(principal.role, Capability::ManageUsers)?;
        debug!("Sending request");
        self.inner.update(id, update).await.map_err(Self::map_error)
    }

    /// Technicians may set their own availability; anyone else needs `manageUsers`.
    #[instrument(skip(self))]
    pub async fn set_availability(
        &self,
        principal: &Principal,
        id: TechnicianId,
        availability: Availability,
    ) -> Result<Technician, TechnicianError> {
        if !principal.is_technician(id) && !has_permission(principal.role, Capability::ManageUsers)
        {
            return Err(PermissionDenied {
                role: principal.role,
                capability: Capability::ManageUsers,
            }
            .into());
        }
        debug!("Sending request");
        self.inner
            .perform_action(id, TechnicianAction::SetAvailability(availability))
            .await
            .map_err(Self::map_error)
    }
}
