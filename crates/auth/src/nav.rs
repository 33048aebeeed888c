//! Sidebar registry and menu visibility.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{Role, User, routes};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub path: &'static str,
    pub label: &'static str,
    /// Highlight only on an exact location match (no sub-paths).
    pub exact: bool,
}

impl NavItem {
    const fn new(path: &'static str, label: &'static str) -> Self {
        Self { path, label, exact: false }
    }

    const fn exact(path: &'static str, label: &'static str) -> Self {
        Self { path, label, exact: true }
    }

    /// Active-link highlighting for the current location.
    pub fn is_active(&self, location: &str) -> bool {
        let path = routes::pathname(location);
        if self.exact || self.path == routes::ROOT {
            return path == self.path;
        }
        path.strip_prefix(self.path)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavSection {
    pub title: &'static str,
    pub items: &'static [NavItem],
}

/// Sidebar sections in display order.
pub static NAV_SECTIONS: &[NavSection] = &[
    NavSection {
        title: "Intelligence",
        items: &[
            NavItem::exact("/", "Dashboard"),
            NavItem::new("/analytics", "Analytics & Reports"),
        ],
    },
    NavSection {
        title: "Sales & Operations",
        items: &[
            NavItem::new("/new-invoice", "Create New"),
            NavItem::new("/invoices", "Invoices & Quotes"),
            NavItem::new("/clients", "Clients CRM"),
        ],
    },
    NavSection {
        title: "Inventory & Supply",
        items: &[
            NavItem::new("/stock/inventory", "Product Inventory"),
            NavItem::new("/suppliers", "Suppliers"),
            NavItem::new("/documents", "Document Vault"),
        ],
    },
    NavSection {
        title: "Team & Tasks",
        items: &[
            NavItem::new("/tasks", "Task Board"),
            NavItem::new("/memos", "Internal Memos"),
            NavItem::new("/notifications", "Notifications"),
        ],
    },
    NavSection {
        title: "Governance",
        items: &[
            NavItem::new("/users", "User Management"),
            NavItem::new("/audit-logs", "Audit Logs"),
            NavItem::new("/accountability", "Accountability Reports"),
            NavItem::new("/system-health", "System Health"),
        ],
    },
    NavSection {
        title: "Configuration",
        items: &[
            NavItem::new("/settings/profile", "My Profile"),
            NavItem::new("/settings/invoice", "Invoice Engine"),
            NavItem::new("/settings/preferences", "Preferences"),
            NavItem::new("/settings/system", "System Control"),
        ],
    },
    NavSection {
        title: "Resources & Support",
        items: &[
            NavItem::exact("/support", "Help Center"),
            NavItem::new("/support/guide", "System Manual"),
            NavItem::new("/support/contact", "Contact Support"),
        ],
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RouteEntry {
    pub exact: bool,
}

/// Path → match mode for every navigable route.
pub fn route_registry() -> BTreeMap<&'static str, RouteEntry> {
    NAV_SECTIONS
        .iter()
        .flat_map(|s| s.items)
        .map(|item| (item.path, RouteEntry { exact: item.exact }))
        .collect()
}

/// The named rule that settled a menu visibility check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NavRule {
    NoSession,
    SelfService,
    PrivilegedRole,
    /// Shared workspace pages every working role sees.
    UniversalPath,
    /// Exact entry in the permission list.
    ExplicitPermission,
    /// Menu-level fail-closed: not listed (or no list at all).
    NotListed,
}

impl NavRule {
    pub fn shows(self) -> bool {
        !matches!(self, NavRule::NoSession | NavRule::NotListed)
    }
}

/// Menu-level reading of a session.
///
/// Unlike `evaluate::route_permission_rule`, an empty or malformed permission
/// list hides everything outside the self-service and universal pages. A route
/// can therefore render while its link stays hidden. That asymmetry is
/// deliberate; do not merge the two rules.
pub fn nav_visibility_rule(user: Option<&User>, path: &str) -> NavRule {
    let Some(user) = user.filter(|u| u.is_authenticated) else {
        return NavRule::NoSession;
    };
    if routes::is_self_service(path) {
        return NavRule::SelfService;
    }
    if user.is_privileged() {
        return NavRule::PrivilegedRole;
    }
    if routes::is_universal(path) && user.role.is_some_and(|r| r != Role::Viewer) {
        return NavRule::UniversalPath;
    }
    if user.permissions.contains(path) {
        NavRule::ExplicitPermission
    } else {
        NavRule::NotListed
    }
}

pub fn is_nav_item_visible(user: Option<&User>, path: &str) -> bool {
    nav_visibility_rule(user, path).shows()
}

/// A sidebar section after filtering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisibleSection {
    pub title: &'static str,
    pub items: Vec<NavItem>,
}

/// Filter the sidebar for `user`, dropping sections left empty.
pub fn visible_sections(user: Option<&User>) -> Vec<VisibleSection> {
    NAV_SECTIONS
        .iter()
        .filter_map(|section| {
            let items: Vec<NavItem> = section
                .items
                .iter()
                .filter(|item| is_nav_item_visible(user, item.path))
                .copied()
                .collect();
            (!items.is_empty()).then_some(VisibleSection {
                title: section.title,
                items,
            })
        })
        .collect()
}
