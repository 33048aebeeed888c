//! Access decision explanations (audit trail).

use chrono::{DateTime, Utc};
use serde::Serialize;

use konsut_core::UserId;

use crate::{AccessRule, Redirect, Role, User, Verdict, evaluate, routes};

/// Detailed explanation of a route access decision.
///
/// Answers "why was this navigation allowed/refused?" for audit logs and
/// support tickets.
#[derive(Debug, Clone, Serialize)]
pub struct AccessExplanation {
    /// Location as requested (path and query).
    pub requested: String,

    /// Path component actually matched.
    pub path: String,

    pub granted: bool,

    pub rule: AccessRule,

    /// Human-readable reason for the decision.
    pub reason: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_to: Option<String>,

    /// Details about the session, if any.
    pub principal: Option<PrincipalState>,

    pub maintenance_active: bool,

    /// What an administrator could change to grant access.
    pub suggestions: Vec<String>,

    pub evaluated_at: DateTime<Utc>,
}

/// Session state as seen at evaluation time.
#[derive(Debug, Clone, Serialize)]
pub struct PrincipalState {
    pub user_id: UserId,
    pub username: String,
    pub role: Option<Role>,
    pub display_role: &'static str,
    pub privileged: bool,
    pub permissions: Vec<String>,
}

impl PrincipalState {
    fn of(user: &User) -> Self {
        Self {
            user_id: user.id.clone(),
            username: user.username.clone(),
            role: user.role,
            display_role: user.display_role(),
            privileged: user.is_privileged(),
            permissions: user.permissions.to_strings(),
        }
    }
}

/// Evaluate and explain in one step. The verdict is exactly what `evaluate`
/// returns for the same arguments.
pub fn explain_access(
    user: Option<&User>,
    location: &str,
    maintenance_active: bool,
    now: DateTime<Utc>,
) -> AccessExplanation {
    let verdict = evaluate(user, location, maintenance_active);
    let path = routes::pathname(location);

    AccessExplanation {
        requested: location.to_string(),
        path: path.to_string(),
        granted: verdict.is_allowed(),
        rule: verdict.rule(),
        reason: reason_for(&verdict, user, path),
        redirect_to: verdict.redirect_path().map(str::to_string),
        principal: user.map(PrincipalState::of),
        maintenance_active,
        suggestions: suggestions_for(&verdict, path),
        evaluated_at: now,
    }
}

fn reason_for(verdict: &Verdict, user: Option<&User>, path: &str) -> String {
    let role = user.map_or("none", User::display_role);
    match verdict.rule() {
        AccessRule::Unauthenticated => "No authenticated session".to_string(),
        AccessRule::MaintenanceLockout => {
            format!("Maintenance mode is active and role '{role}' cannot bypass it")
        }
        AccessRule::PrivilegedRole => format!("Role '{role}' has unrestricted access"),
        AccessRule::SelfService => format!("'{path}' is a self-service page open to every user"),
        AccessRule::UnrestrictedPermissions => {
            "Session has no explicit permission list; routes are unrestricted".to_string()
        }
        AccessRule::PermissionGranted => {
            let grant = user
                .and_then(|u| u.permissions.iter().find(|p| p.covers(path)))
                .map_or_else(String::new, |p| p.as_str().to_string());
            format!("Permission '{grant}' covers '{path}'")
        }
        AccessRule::RootNotGranted => {
            "The dashboard '/' requires its own permission entry".to_string()
        }
        AccessRule::PermissionMissing => {
            let current = user.map(|u| u.permissions.to_strings()).unwrap_or_default();
            format!("No permission covers '{path}'. Current permissions: {current:?}")
        }
    }
}

fn suggestions_for(verdict: &Verdict, path: &str) -> Vec<String> {
    match verdict {
        Verdict::Allow { .. } => Vec::new(),
        Verdict::Redirect { rule, to } => {
            let mut suggestions = match rule {
                AccessRule::Unauthenticated => vec!["Sign in again".to_string()],
                AccessRule::MaintenanceLockout => vec![
                    "Wait for maintenance to end, or ask an administrator to disable it".to_string(),
                ],
                _ => vec![
                    format!("Grant the '{path}' permission to the user"),
                    "Assign a role preset that includes this page".to_string(),
                ],
            };
            if matches!(to, Redirect::AccessDenied) {
                suggestions.push(
                    "Make the first permission entry an absolute path the user can open".to_string(),
                );
            }
            suggestions
        }
    }
}
