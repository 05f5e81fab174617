use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

use crate::error::ValidationError;

/// Acting capacity of the current user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Supervisor,
    Technician,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::Supervisor, Role::Technician];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::Supervisor => "supervisor",
            Role::Technician => "technician",
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "supervisor" => Ok(Role::Supervisor),
            "technician" => Ok(Role::Technician),
            other => Err(ValidationError::new("role", format!("unknown role: {other}"))),
        }
    }
}

/// A named permission gating one kind of action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Capability {
    CreateOrders,
    EditOrders,
    AssignTechnicians,
    ViewAllOrders,
    MarkOrderComplete,
    UploadEvidence,
    ViewMetrics,
    ManageUsers,
}

impl Capability {
    pub const ALL: [Capability; 8] = [
        Capability::CreateOrders,
        Capability::EditOrders,
        Capability::AssignTechnicians,
        Capability::ViewAllOrders,
        Capability::MarkOrderComplete,
        Capability::UploadEvidence,
        Capability::ViewMetrics,
        Capability::ManageUsers,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Capability::CreateOrders => "createOrders",
            Capability::EditOrders => "editOrders",
            Capability::AssignTechnicians => "assignTechnicians",
            Capability::ViewAllOrders => "viewAllOrders",
            Capability::MarkOrderComplete => "markOrderComplete",
            Capability::UploadEvidence => "uploadEvidence",
            Capability::ViewMetrics => "viewMetrics",
            Capability::ManageUsers => "manageUsers",
        }
    }
}

impl Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parses_its_own_name() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert!("admin".parse::<Role>().is_err());
    }

    #[test]
    fn test_serde_uses_wire_names() {
        #[derive(Deserialize)]
        struct Row {
            role: Role,
            capability: Capability,
        }
        let row: Row =
            toml::from_str("role = \"technician\"\ncapability = \"assignTechnicians\"").unwrap();
        assert_eq!(row.role, Role::Technician);
        assert_eq!(row.capability, Capability::AssignTechnicians);
    }
}
