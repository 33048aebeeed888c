//! Fine-grained capability checks used by in-page controls and the command
//! palette.

use serde::Serialize;

use crate::{Role, User};

/// Exact permission check with a privileged override.
///
/// Stricter than route access: an empty list grants nothing here.
pub fn can(user: Option<&User>, permission: &str) -> bool {
    let Some(user) = user.filter(|u| u.is_authenticated) else {
        return false;
    };
    user.is_privileged() || user.permissions.contains(permission)
}

/// Role membership; admin satisfies every role check.
pub fn has_role(user: Option<&User>, roles: &[Role]) -> bool {
    let Some(role) = user.filter(|u| u.is_authenticated).and_then(|u| u.role) else {
        return false;
    };
    role == Role::Admin || roles.contains(&role)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CommandAction {
    pub id: &'static str,
    pub label: &'static str,
    /// Navigation target, may carry a query string.
    pub location: &'static str,
    /// Grant required to list the action.
    pub permission: &'static str,
}

pub static COMMAND_ACTIONS: &[CommandAction] = &[
    CommandAction { id: "new-inv", label: "Create New Invoice", location: "/new-invoice", permission: "/" },
    CommandAction { id: "new-quote", label: "Create New Quotation", location: "/new-invoice?type=quotation", permission: "/" },
    CommandAction { id: "new-prof", label: "Create New Proforma", location: "/new-invoice?type=proforma", permission: "/" },
    CommandAction { id: "clients", label: "Manage Clients", location: "/clients", permission: "/clients" },
    CommandAction { id: "stock", label: "Check Inventory", location: "/stock/inventory", permission: "/stock/inventory" },
    CommandAction { id: "suppliers", label: "Manage Suppliers", location: "/suppliers", permission: "/suppliers" },
    CommandAction { id: "analytics", label: "View Analytics & Reports", location: "/analytics", permission: "/analytics" },
    CommandAction { id: "tasks", label: "My Tasks", location: "/tasks", permission: "/tasks" },
    CommandAction { id: "notifs", label: "Notifications", location: "/notifications", permission: "/notifications" },
    CommandAction { id: "users", label: "Manage Users", location: "/users", permission: "/users" },
    CommandAction { id: "audit", label: "Security Audit Logs", location: "/audit-logs", permission: "/audit-logs" },
    CommandAction { id: "health", label: "System Health Status", location: "/system-health", permission: "/system-health" },
    CommandAction { id: "accountability", label: "Accountability Reports", location: "/accountability", permission: "/accountability" },
    CommandAction { id: "settings", label: "System Settings", location: "/settings/system", permission: "/settings/system" },
];

/// Palette entries the user may run whose label contains `query`
/// (case-insensitive). A blank query lists every permitted action.
pub fn available_commands(user: Option<&User>, query: &str) -> Vec<&'static CommandAction> {
    let needle = query.trim().to_lowercase();
    COMMAND_ACTIONS
        .iter()
        .filter(|a| can(user, a.permission))
        .filter(|a| a.label.to_lowercase().contains(&needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PermissionSet;
    use konsut_core::UserId;

    fn user(role: Role, perms: &[&str]) -> User {
        User::new(
            UserId::from(5),
            "palette",
            Some(role),
            PermissionSet::from_paths(perms.iter().copied()),
        )
    }

    #[test]
    fn can_requires_exact_entry() {
        let u = user(Role::Accountant, &["/", "/invoices"]);
        assert!(can(Some(&u), "/invoices"));
        assert!(!can(Some(&u), "/invoices/1"));
        assert!(!can(None, "/"));
    }

    #[test]
    fn empty_list_grants_no_capability() {
        let u = user(Role::Staff, &[]);
        assert!(!can(Some(&u), "/clients"));
    }

    #[test]
    fn privileged_roles_can_do_anything() {
        assert!(can(Some(&user(Role::Ceo, &[])), "/users"));
    }

    #[test]
    fn has_role_with_admin_override() {
        let admin = user(Role::Admin, &[]);
        let sales = user(Role::Sales, &[]);
        assert!(has_role(Some(&admin), &[Role::Accountant]));
        assert!(has_role(Some(&sales), &[Role::Sales, Role::Manager]));
        assert!(!has_role(Some(&sales), &[Role::Manager]));
        assert!(!has_role(None, &[Role::Sales]));
    }

    #[test]
    fn palette_filters_by_permission_and_query() {
        let u = user(Role::Sales, &["/", "/clients"]);
        let ids: Vec<&str> = available_commands(Some(&u), "").iter().map(|a| a.id).collect();
        assert_eq!(ids, vec!["new-inv", "new-quote", "new-prof", "clients"]);

        let ids: Vec<&str> = available_commands(Some(&u), "  QUOT ").iter().map(|a| a.id).collect();
        assert_eq!(ids, vec!["new-quote"]);
    }
}
