//! Default permission lists per role and the catalog of assignable grants
//! (user management screen).

use serde::Serialize;

use crate::{PermissionSet, Role};

/// An assignable grant, as listed in user management.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PermissionDefinition {
    pub id: &'static str,
    pub label: &'static str,
    pub description: &'static str,
}

pub static PERMISSION_CATALOG: &[PermissionDefinition] = &[
    PermissionDefinition { id: "/", label: "Overview", description: "Main business dashboard" },
    PermissionDefinition { id: "/new-invoice", label: "Create Order", description: "Generate invoices & quotes" },
    PermissionDefinition { id: "/invoices", label: "Order History", description: "View and manage all documents" },
    PermissionDefinition { id: "/clients", label: "Client Base", description: "Manage customer records" },
    PermissionDefinition { id: "/stock/inventory", label: "Inventory", description: "View and manage stock items" },
    PermissionDefinition { id: "/stock/add", label: "Add Stock", description: "Initialize new resources" },
    PermissionDefinition { id: "/analytics", label: "Financials", description: "Revenue & accounting reports" },
    PermissionDefinition { id: "/audit-logs", label: "Security Logs", description: "Audit trails & activity history" },
    PermissionDefinition { id: "/system-health", label: "Server Health", description: "System monitoring" },
    PermissionDefinition { id: "/settings/profile", label: "Company Profile", description: "Business identity settings" },
    PermissionDefinition { id: "/settings/invoice", label: "Invoice Engine", description: "PDF & layout configuration" },
    PermissionDefinition { id: "/settings/preferences", label: "Preferences", description: "User UI/UX settings" },
    PermissionDefinition { id: "/settings/system", label: "System Control", description: "Administrative state management" },
    PermissionDefinition { id: "/users", label: "User Control", description: "Manage accounts & permissions" },
];

impl Role {
    /// Permission list pre-filled when a user is created with this role.
    ///
    /// The first entry doubles as the landing page, so every preset starts at
    /// the dashboard.
    pub fn preset_paths(self) -> &'static [&'static str] {
        match self {
            Role::Admin => &[
                "/", "/new-invoice", "/invoices", "/clients", "/stock/inventory", "/stock/add",
                "/analytics", "/audit-logs", "/system-health", "/settings/profile",
                "/settings/invoice", "/settings/preferences", "/settings/system", "/users",
            ],
            Role::Ceo => &[
                "/", "/invoices", "/clients", "/analytics", "/audit-logs", "/settings/profile",
                "/settings/preferences",
            ],
            Role::Manager => &[
                "/", "/new-invoice", "/invoices", "/clients", "/stock/inventory", "/stock/add",
                "/analytics",
            ],
            Role::Sales => &["/", "/new-invoice", "/invoices", "/clients", "/stock/inventory"],
            Role::Storekeeper => &["/", "/stock/inventory", "/stock/add", "/invoices"],
            Role::Accountant => &["/", "/invoices", "/analytics", "/settings/invoice"],
            Role::Staff => &["/", "/new-invoice", "/invoices", "/clients"],
            Role::Viewer => &["/", "/invoices", "/clients"],
        }
    }

    pub fn preset_permissions(self) -> PermissionSet {
        PermissionSet::from_paths(self.preset_paths().iter().copied())
    }
}

/// Role with its preset (for the user-management role picker).
#[derive(Debug, Clone, Serialize)]
pub struct RoleDefinition {
    pub role: Role,
    pub display_name: &'static str,
    pub privileged: bool,
    pub preset: Vec<&'static str>,
}

pub fn role_catalog() -> Vec<RoleDefinition> {
    Role::ALL
        .into_iter()
        .map(|role| RoleDefinition {
            role,
            display_name: role.display_name(),
            privileged: role.is_privileged(),
            preset: role.preset_paths().to_vec(),
        })
        .collect()
}

pub fn permission_definition(id: &str) -> Option<&'static PermissionDefinition> {
    PERMISSION_CATALOG.iter().find(|p| p.id == id)
}
