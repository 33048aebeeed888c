//! `konsut-auth`: pure route authorization (RBAC over path grants).
//!
//! This crate is intentionally decoupled from rendering, HTTP and storage:
//! sessions and flags are passed in, verdicts are returned.

pub mod capabilities;
pub mod evaluate;
pub mod explain;
pub mod nav;
pub mod permissions;
pub mod presets;
pub mod roles;
pub mod routes;
pub mod session;

pub use capabilities::{CommandAction, available_commands, can, has_role};
pub use evaluate::{AccessRule, Redirect, Verdict, evaluate, route_permission_rule};
pub use explain::{AccessExplanation, PrincipalState, explain_access};
pub use nav::{NavItem, NavRule, NavSection, VisibleSection, is_nav_item_visible, nav_visibility_rule, visible_sections};
pub use permissions::{Permission, PermissionSet};
pub use presets::{PermissionDefinition, RoleDefinition, role_catalog};
pub use roles::Role;
pub use session::User;

#[cfg(test)]
mod properties;
