//! Static role → capability table.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{Capability, Role};

/// One flag per capability. Field names match the dashboard's permission keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionSet {
    pub create_orders: bool,
    pub edit_orders: bool,
    pub assign_technicians: bool,
    pub view_all_orders: bool,
    pub mark_order_complete: bool,
    pub upload_evidence: bool,
    pub view_metrics: bool,
    pub manage_users: bool,
}

const SUPERVISOR: PermissionSet = PermissionSet {
    create_orders: true,
    edit_orders: true,
    assign_technicians: true,
    view_all_orders: true,
    mark_order_complete: true,
    upload_evidence: true,
    view_metrics: true,
    manage_users: true,
};

const TECHNICIAN: PermissionSet = PermissionSet {
    create_orders: false,
    edit_orders: false,
    assign_technicians: false,
    view_all_orders: false,
    mark_order_complete: true,
    upload_evidence: true,
    view_metrics: false,
    manage_users: false,
};

impl PermissionSet {
    pub const fn allows(&self, capability: Capability) -> bool {
        match capability {
            Capability::CreateOrders => self.create_orders,
            Capability::EditOrders => self.edit_orders,
            Capability::AssignTechnicians => self.assign_technicians,
            Capability::ViewAllOrders => self.view_all_orders,
            Capability::MarkOrderComplete => self.mark_order_complete,
            Capability::UploadEvidence => self.upload_evidence,
            Capability::ViewMetrics => self.view_metrics,
            Capability::ManageUsers => self.manage_users,
        }
    }

    /// Capabilities granted by this set, in declaration order.
    pub fn granted(&self) -> impl Iterator<Item = Capability> + '_ {
        Capability::ALL.into_iter().filter(|c| self.allows(*c))
    }
}

/// The full permission record for `role`.
pub const fn permissions(role: Role) -> PermissionSet {
    match role {
        Role::Supervisor => SUPERVISOR,
        Role::Technician => TECHNICIAN,
    }
}

/// Whether `role` holds `capability`. Total and side-effect free.
pub const fn has_permission(role: Role, capability: Capability) -> bool {
    permissions(role).allows(capability)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("role {role} lacks permission {capability}")]
pub struct PermissionDenied {
    pub role: Role,
    pub capability: Capability,
}

pub fn require(role: Role, capability: Capability) -> Result<(), PermissionDenied> {
    if has_permission(role, capability) {
        Ok(())
    } else {
        Err(PermissionDenied { role, capability })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supervisor_holds_every_capability() {
        for capability in Capability::ALL {
            assert!(has_permission(Role::Supervisor, capability), "{capability}");
        }
    }

    #[test]
    fn test_technician_table_is_exact() {
        for capability in Capability::ALL {
            let expected = matches!(
                capability,
                Capability::MarkOrderComplete | Capability::UploadEvidence
            );
            assert_eq!(
                has_permission(Role::Technician, capability),
                expected,
                "{capability}"
            );
        }
    }

    #[test]
    fn test_lookup_is_deterministic() {
        for role in Role::ALL {
            for capability in Capability::ALL {
                assert_eq!(
                    has_permission(role, capability),
                    has_permission(role, capability)
                );
                assert_eq!(
                    permissions(role).allows(capability),
                    has_permission(role, capability)
                );
            }
        }
    }

    #[test]
    fn test_require_reports_role_and_capability() {
        assert!(require(Role::Supervisor, Capability::ManageUsers).is_ok());
        let err = require(Role::Technician, Capability::CreateOrders).unwrap_err();
        assert_eq!(
            err,
            PermissionDenied {
                role: Role::Technician,
                capability: Capability::CreateOrders
            }
        );
        assert_eq!(
            err.to_string(),
            "role technician lacks permission createOrders"
        );
    }

    #[test]
    fn test_granted_lists_technician_capabilities() {
        let granted: Vec<_> = permissions(Role::Technician).granted().collect();
        assert_eq!(
            granted,
            vec![Capability::MarkOrderComplete, Capability::UploadEvidence]
        );
    }
}
