//! Route access evaluation.
//!
//! - No IO
//! - No panics
//! - Same inputs, same verdict

use serde::Serialize;

use konsut_core::ValueObject;

use crate::{PermissionSet, User, routes};

/// The named rule that settled a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessRule {
    /// No session, or the session is not authenticated.
    Unauthenticated,
    /// Maintenance mode is on and the role cannot bypass it.
    MaintenanceLockout,
    /// Admin or CEO.
    PrivilegedRole,
    /// Profile and preferences pages.
    SelfService,
    /// Route-level fail-open: the session has no explicit permission list.
    UnrestrictedPermissions,
    /// The path equals a grant or sits below one.
    PermissionGranted,
    /// The root path needs its own grant; sub-path grants do not imply it.
    RootNotGranted,
    /// No grant covers the path.
    PermissionMissing,
}

impl AccessRule {
    pub fn allows(self) -> bool {
        matches!(
            self,
            AccessRule::PrivilegedRole
                | AccessRule::SelfService
                | AccessRule::UnrestrictedPermissions
                | AccessRule::PermissionGranted
        )
    }
}

/// Where a refused navigation is sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Redirect {
    /// Sign-in page; `from` is the location to return to afterwards.
    Login { from: String },
    Maintenance,
    /// The user's first granted path.
    Landing { path: String },
    /// Terminal fallback when the landing page is unusable.
    AccessDenied,
}

impl Redirect {
    pub fn path(&self) -> &str {
        match self {
            Redirect::Login { .. } => routes::LOGIN,
            Redirect::Maintenance => routes::MAINTENANCE,
            Redirect::Landing { path } => path,
            Redirect::AccessDenied => routes::ACCESS_DENIED,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    Allow { rule: AccessRule },
    Redirect { rule: AccessRule, to: Redirect },
}

impl Verdict {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Verdict::Allow { .. })
    }

    pub fn rule(&self) -> AccessRule {
        match self {
            Verdict::Allow { rule } | Verdict::Redirect { rule, .. } => *rule,
        }
    }

    pub fn redirect(&self) -> Option<&Redirect> {
        match self {
            Verdict::Allow { .. } => None,
            Verdict::Redirect { to, .. } => Some(to),
        }
    }

    pub fn redirect_path(&self) -> Option<&str> {
        self.redirect().map(Redirect::path)
    }
}

impl ValueObject for Verdict {}

/// Decide whether `user` may enter `location`.
///
/// Checks run in a fixed order: authentication, maintenance, privileged role,
/// self-service pages, then the permission list. `location` may carry a query
/// string; only its path is matched, but the full location is kept for the
/// post-login return.
pub fn evaluate(user: Option<&User>, location: &str, maintenance_active: bool) -> Verdict {
    let path = routes::pathname(location);

    let Some(user) = user.filter(|u| u.is_authenticated) else {
        tracing::debug!(path, "no authenticated session; sending to login");
        return Verdict::Redirect {
            rule: AccessRule::Unauthenticated,
            to: Redirect::Login {
                from: location.to_string(),
            },
        };
    };

    if maintenance_active && !user.is_privileged() {
        tracing::debug!(user_id = %user.id, path, "maintenance lockout");
        return Verdict::Redirect {
            rule: AccessRule::MaintenanceLockout,
            to: Redirect::Maintenance,
        };
    }

    if user.is_privileged() {
        return Verdict::Allow {
            rule: AccessRule::PrivilegedRole,
        };
    }

    if routes::is_self_service(path) {
        return Verdict::Allow {
            rule: AccessRule::SelfService,
        };
    }

    let rule = route_permission_rule(&user.permissions, path);
    if rule.allows() {
        return Verdict::Allow { rule };
    }

    let to = landing_redirect(user, path);
    tracing::debug!(user_id = %user.id, path, ?rule, target = to.path(), "route refused");
    Verdict::Redirect { rule, to }
}

/// Route-level reading of a permission list.
///
/// Fails OPEN: an empty list allows every path. Menu visibility reads the same
/// list fail-closed (`nav::nav_visibility_rule`); keep the two apart.
pub fn route_permission_rule(permissions: &PermissionSet, path: &str) -> AccessRule {
    if permissions.is_empty() {
        return AccessRule::UnrestrictedPermissions;
    }
    if path == routes::ROOT && !permissions.contains(routes::ROOT) {
        return AccessRule::RootNotGranted;
    }
    if permissions.grants(path) {
        AccessRule::PermissionGranted
    } else {
        AccessRule::PermissionMissing
    }
}

// The first grant is the landing page. It is only trusted when it is itself
// reachable and differs from the refused path; otherwise stop at the neutral
// page instead of bouncing between redirects.
fn landing_redirect(user: &User, refused_path: &str) -> Redirect {
    let Some(first) = user.permissions.first() else {
        tracing::warn!(user_id = %user.id, "refused route with no landing page configured");
        return Redirect::AccessDenied;
    };

    let target = first.as_str();
    let target_path = routes::pathname(target);
    let usable = target.starts_with('/')
        && target_path != refused_path
        && (routes::is_self_service(target_path)
            || route_permission_rule(&user.permissions, target_path).allows());

    if usable {
        Redirect::Landing {
            path: target.to_string(),
        }
    } else {
        tracing::warn!(
            user_id = %user.id,
            refused_path,
            target,
            "landing page is itself refused; permission list is inconsistent"
        );
        Redirect::AccessDenied
    }
}
