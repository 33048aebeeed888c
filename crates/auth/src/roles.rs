use core::str::FromStr;

use serde::{Deserialize, Serialize};

use konsut_core::DomainError;

/// Role tag used for RBAC.
///
/// The set is closed. A session whose role tag is blank or unknown carries no
/// `Role` at all (`Option<Role>::None`), which every policy treats as the least
/// privileged position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Ceo,
    Manager,
    Sales,
    Storekeeper,
    Accountant,
    Staff,
    Viewer,
}

impl Role {
    pub const ALL: [Role; 8] = [
        Role::Admin,
        Role::Ceo,
        Role::Manager,
        Role::Sales,
        Role::Storekeeper,
        Role::Accountant,
        Role::Staff,
        Role::Viewer,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Ceo => "ceo",
            Role::Manager => "manager",
            Role::Sales => "sales",
            Role::Storekeeper => "storekeeper",
            Role::Accountant => "accountant",
            Role::Staff => "staff",
            Role::Viewer => "viewer",
        }
    }

    /// Admin and CEO bypass every permission list.
    pub fn is_privileged(self) -> bool {
        matches!(self, Role::Admin | Role::Ceo)
    }

    /// Human-facing label shown next to the avatar and in user management.
    pub fn display_name(self) -> &'static str {
        match self {
            Role::Admin => "Administrator",
            Role::Ceo => "CEO",
            Role::Manager => "Manager",
            Role::Sales => "Sales",
            Role::Storekeeper => "Storekeeper",
            Role::Accountant => "Accountant",
            Role::Staff => "Staff",
            Role::Viewer => "Viewer",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_ascii_lowercase();
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == tag)
            .ok_or_else(|| DomainError::validation(format!("unknown role '{}'", s.trim())))
    }
}
