//! Who is acting.
//!
//! The dashboard keeps the selected role in browser storage and falls back to `supervisor`.
//! [`RoleSelection`] reproduces that behavior in-process; deployments with real sign-in
//! implement [`SessionProvider`] over their own session lookup instead.

use serde::{Deserialize, Serialize};
use std::sync::{PoisonError, RwLock};
use thiserror::Error;

use crate::model::{Role, TechnicianId};

/// The acting identity passed into every client call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub role: Role,
    /// The technician record behind a technician principal.
    pub technician_id: Option<TechnicianId>,
}

impl Principal {
    pub const fn supervisor() -> Self {
        Self {
            role: Role::Supervisor,
            technician_id: None,
        }
    }

    pub const fn technician(id: TechnicianId) -> Self {
        Self {
            role: Role::Technician,
            technician_id: Some(id),
        }
    }

    /// True when this principal acts as the given technician.
    pub fn is_technician(&self, id: TechnicianId) -> bool {
        self.role == Role::Technician && self.technician_id == Some(id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("technician role requires a technician id")]
    MissingTechnician,
}

pub trait SessionProvider: Send + Sync {
    /// The role of the current user.
    fn current_role(&self) -> Role;

    /// The full acting identity of the current user.
    fn current_principal(&self) -> Result<Principal, SessionError>;
}

/// Unauthenticated role switch. Defaults to `supervisor` until a role is selected.
#[derive(Debug)]
pub struct RoleSelection {
    selected: RwLock<Option<Principal>>,
    default_role: Role,
}

impl Default for RoleSelection {
    fn default() -> Self {
        Self::new(Role::Supervisor)
    }
}

impl RoleSelection {
    pub fn new(default_role: Role) -> Self {
        Self {
            selected: RwLock::new(None),
            default_role,
        }
    }

    pub fn select(&self, principal: Principal) {
        tracing::info!(role = %principal.role, technician = ?principal.technician_id, "Role selected");
        *self.selected.write().unwrap_or_else(PoisonError::into_inner) = Some(principal);
    }

    pub fn clear(&self) {
        *self.selected.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    fn selected(&self) -> Option<Principal> {
        *self.selected.read().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SessionProvider for RoleSelection {
    fn current_role(&self) -> Role {
        self.selected().map_or(self.default_role, |p| p.role)
    }

    fn current_principal(&self) -> Result<Principal, SessionError> {
        match self.selected() {
            Some(principal) => Ok(principal),
            None => match self.default_role {
                Role::Supervisor => Ok(Principal::supervisor()),
                Role::Technician => Err(SessionError::MissingTechnician),
            },
        }
    }
}

/// A session pinned to one principal.
#[derive(Debug, Clone, Copy)]
pub struct FixedSession(pub Principal);

impl SessionProvider for FixedSession {
    fn current_role(&self) -> Role {
        self.0.role
    }

    fn current_principal(&self) -> Result<Principal, SessionError> {
        Ok(self.0)
    }
}

/// Resolves the current role through `provider`.
pub fn resolve_current_role(provider: &dyn SessionProvider) -> Role {
    provider.current_role()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_supervisor() {
        let session = RoleSelection::default();
        assert_eq!(resolve_current_role(&session), Role::Supervisor);
        assert_eq!(session.current_principal().unwrap(), Principal::supervisor());
    }

    #[test]
    fn test_returns_last_selection() {
        let session = RoleSelection::default();
        session.select(Principal::technician(TechnicianId(4)));
        assert_eq!(resolve_current_role(&session), Role::Technician);
        session.select(Principal::supervisor());
        assert_eq!(resolve_current_role(&session), Role::Supervisor);
        session.select(Principal::technician(TechnicianId(4)));
        session.clear();
        assert_eq!(resolve_current_role(&session), Role::Supervisor);
    }

    #[test]
    fn test_technician_default_needs_an_identity() {
        let session = RoleSelection::new(Role::Technician);
        assert_eq!(session.current_role(), Role::Technician);
        assert_eq!(
            session.current_principal().unwrap_err(),
            SessionError::MissingTechnician
        );
    }

    #[test]
    fn test_fixed_session() {
        let session = FixedSession(Principal::technician(TechnicianId(1)));
        assert_eq!(resolve_current_role(&session), Role::Technician);
        assert!(session
            .current_principal()
            .unwrap()
            .is_technician(TechnicianId(1)));
    }
}
