//! Route guard state machine.
//!
//! ```text
//! Loading ──resolve──▶ Unauthenticated
//!    ▲          └────▶ AuthenticatedAllowed ◀──navigate──▶ AuthenticatedDenied
//!    └── begin_session_resolution (session torn down)
//! ```
//!
//! Each navigation ends in exactly one outcome: pending, render or a single
//! redirect. The guard never retries.

use serde::Serialize;

use konsut_auth::{
    AccessRule, CommandAction, Redirect, User, Verdict, VisibleSection, available_commands, evaluate,
    routes, visible_sections,
};

use crate::config::GuardConfig;
use crate::flags::{FlagStore, maintenance_active};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardState {
    /// Session not resolved yet.
    Loading,
    Unauthenticated,
    AuthenticatedAllowed,
    AuthenticatedDenied,
}

/// What the routing layer should do for the current location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum GuardOutcome {
    /// Show a spinner; the session is still resolving.
    Pending,
    Render,
    /// Replace the current history entry with `to`. `from` is set on the
    /// login redirect: the location to return to after signing in.
    Redirect {
        to: String,
        rule: AccessRule,
        #[serde(skip_serializing_if = "Option::is_none")]
        from: Option<String>,
    },
}

/// Handle for one session resolution. Only the most recent one is honoured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolutionTicket(u64);

#[derive(Debug, Clone)]
enum SessionState {
    Resolving,
    Resolved(Option<User>),
}

pub struct RouteGuard<S> {
    config: GuardConfig,
    flags: S,
    session: SessionState,
    generation: u64,
    location: String,
    state: GuardState,
}

impl<S: FlagStore> RouteGuard<S> {
    /// A guard for `location` whose session has not been resolved yet.
    pub fn new(config: GuardConfig, flags: S, location: impl Into<String>) -> Self {
        Self {
            config,
            flags,
            session: SessionState::Resolving,
            generation: 0,
            location: location.into(),
            state: GuardState::Loading,
        }
    }

    pub fn state(&self) -> GuardState {
        self.state
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn user(&self) -> Option<&User> {
        match &self.session {
            SessionState::Resolved(user) => user.as_ref(),
            SessionState::Resolving => None,
        }
    }

    pub fn flags(&self) -> &S {
        &self.flags
    }

    pub fn flags_mut(&mut self) -> &mut S {
        &mut self.flags
    }

    pub fn maintenance_active(&self) -> bool {
        maintenance_active(&self.flags, &self.config.maintenance_key)
    }

    /// Start (or restart) resolving the session. Any earlier ticket goes stale.
    pub fn begin_session_resolution(&mut self) -> ResolutionTicket {
        self.generation += 1;
        self.session = SessionState::Resolving;
        self.state = GuardState::Loading;
        ResolutionTicket(self.generation)
    }

    /// Deliver a resolved session.
    ///
    /// Returns `None` when the ticket was superseded (by a newer resolution or
    /// by `set_session`); the late result is dropped.
    pub fn complete_session_resolution(
        &mut self,
        ticket: ResolutionTicket,
        user: Option<User>,
    ) -> Option<GuardOutcome> {
        let current = ticket.0 == self.generation && matches!(self.session, SessionState::Resolving);
        if !current {
            tracing::debug!(
                ticket = ticket.0,
                generation = self.generation,
                "dropping stale session resolution"
            );
            return None;
        }
        Some(self.set_session_inner(user))
    }

    /// Replace the session directly (login, profile update, logout).
    /// Supersedes any resolution still in flight.
    pub fn set_session(&mut self, user: Option<User>) -> GuardOutcome {
        self.generation += 1;
        self.set_session_inner(user)
    }

    fn set_session_inner(&mut self, user: Option<User>) -> GuardOutcome {
        match &user {
            Some(u) => tracing::info!(user_id = %u.id, role = u.display_role(), "session resolved"),
            None => tracing::info!("session resolved without a user"),
        }
        self.session = SessionState::Resolved(user);
        self.decide()
    }

    /// Enter a new location.
    pub fn navigate(&mut self, location: impl Into<String>) -> GuardOutcome {
        self.location = location.into();
        self.decide()
    }

    /// Re-check the current location (e.g. after a flag toggle).
    pub fn refresh(&mut self) -> GuardOutcome {
        self.decide()
    }

    /// Sidebar sections for the current session.
    pub fn visible_sections(&self) -> Vec<VisibleSection> {
        visible_sections(self.user())
    }

    pub fn available_commands(&self, query: &str) -> Vec<&'static CommandAction> {
        available_commands(self.user(), query)
    }

    fn decide(&mut self) -> GuardOutcome {
        let path = routes::pathname(&self.location);

        let user = match &self.session {
            SessionState::Resolving => {
                self.state = GuardState::Loading;
                if routes::is_public(path) {
                    return GuardOutcome::Render;
                }
                return GuardOutcome::Pending;
            }
            SessionState::Resolved(user) => user.as_ref().filter(|u| u.is_authenticated),
        };

        if routes::is_public(path) {
            self.state = if user.is_some() {
                GuardState::AuthenticatedAllowed
            } else {
                GuardState::Unauthenticated
            };
            return GuardOutcome::Render;
        }

        let maintenance = user.is_some() && maintenance_active(&self.flags, &self.config.maintenance_key);
        let verdict = evaluate(user, &self.location, maintenance);

        let (state, outcome) = match verdict {
            Verdict::Allow { .. } => (GuardState::AuthenticatedAllowed, GuardOutcome::Render),
            Verdict::Redirect { rule, to } => {
                let state = if user.is_some() {
                    GuardState::AuthenticatedDenied
                } else {
                    GuardState::Unauthenticated
                };
                (
                    state,
                    GuardOutcome::Redirect {
                        to: to.path().to_string(),
                        rule,
                        from: match to {
                            Redirect::Login { from } => Some(from),
                            _ => None,
                        },
                    },
                )
            }
        };

        tracing::debug!(location = %self.location, ?state, ?outcome, "navigation decided");
        self.state = state;
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::MemoryFlagStore;
    use konsut_auth::{PermissionSet, Role};
    use konsut_core::UserId;
    use serde_json::json;

    fn user(role: Role, perms: &[&str]) -> User {
        User::new(
            UserId::from(3),
            "guard",
            Some(role),
            PermissionSet::from_paths(perms.iter().copied()),
        )
    }

    fn guard(location: &str) -> RouteGuard<MemoryFlagStore> {
        RouteGuard::new(GuardConfig::default(), MemoryFlagStore::new(), location)
    }

    #[test]
    fn pending_until_session_resolves() {
        let mut g = guard("/invoices");
        let ticket = g.begin_session_resolution();
        assert_eq!(g.refresh(), GuardOutcome::Pending);
        assert_eq!(g.state(), GuardState::Loading);

        let outcome = g.complete_session_resolution(ticket, Some(user(Role::Sales, &["/invoices"])));
        assert_eq!(outcome, Some(GuardOutcome::Render));
        assert_eq!(g.state(), GuardState::AuthenticatedAllowed);
    }

    #[test]
    fn public_routes_render_while_loading() {
        let mut g = guard("/login");
        g.begin_session_resolution();
        assert_eq!(g.refresh(), GuardOutcome::Render);
    }

    #[test]
    fn no_session_redirects_to_login_keeping_the_return_location() {
        let mut g = guard("/clients?page=2");
        let ticket = g.begin_session_resolution();
        let outcome = g.complete_session_resolution(ticket, None).unwrap();
        assert_eq!(
            outcome,
            GuardOutcome::Redirect {
                to: "/login".to_string(),
                rule: AccessRule::Unauthenticated,
                from: Some("/clients?page=2".to_string()),
            }
        );
        assert_eq!(g.state(), GuardState::Unauthenticated);
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({
                "outcome": "redirect",
                "to": "/login",
                "rule": "unauthenticated",
                "from": "/clients?page=2",
            })
        );
    }

    #[test]
    fn denied_navigation_redirects_once_to_landing_page() {
        let mut g = guard("/");
        g.set_session(Some(user(Role::Storekeeper, &["/stock/inventory", "/stock/add"])));
        assert_eq!(g.state(), GuardState::AuthenticatedDenied);

        let outcome = g.navigate("/users");
        assert_eq!(
            outcome,
            GuardOutcome::Redirect {
                to: "/stock/inventory".to_string(),
                rule: AccessRule::PermissionMissing,
                from: None,
            }
        );

        assert_eq!(g.navigate("/stock/inventory"), GuardOutcome::Render);
        assert_eq!(g.state(), GuardState::AuthenticatedAllowed);
    }

    #[test]
    fn stale_resolution_is_dropped() {
        let mut g = guard("/invoices");
        let first = g.begin_session_resolution();
        let second = g.begin_session_resolution();

        assert_eq!(g.complete_session_resolution(first, Some(user(Role::Admin, &[]))), None);
        assert_eq!(g.state(), GuardState::Loading);

        let outcome = g.complete_session_resolution(second, Some(user(Role::Viewer, &["/clients"])));
        assert_eq!(
            outcome,
            Some(GuardOutcome::Redirect {
                to: "/clients".to_string(),
                rule: AccessRule::PermissionMissing,
                from: None,
            })
        );
    }

    #[test]
    fn logout_supersedes_inflight_resolution() {
        let mut g = guard("/invoices");
        let ticket = g.begin_session_resolution();
        g.set_session(None);
        assert_eq!(g.complete_session_resolution(ticket, Some(user(Role::Admin, &[]))), None);
        assert!(g.user().is_none());
    }

    #[test]
    fn maintenance_toggle_applies_on_refresh() {
        let mut g = guard("/invoices");
        g.set_session(Some(user(Role::Manager, &["/invoices"])));
        assert_eq!(g.refresh(), GuardOutcome::Render);

        g.flags_mut().set("system_maintenance", json!("true")).unwrap();
        assert!(g.maintenance_active());
        assert_eq!(
            g.refresh(),
            GuardOutcome::Redirect {
                to: "/maintenance".to_string(),
                rule: AccessRule::MaintenanceLockout,
                from: None,
            }
        );
        assert_eq!(g.navigate("/maintenance"), GuardOutcome::Render);
    }

    #[test]
    fn menu_follows_the_current_session() {
        let mut g = guard("/");
        assert!(g.visible_sections().is_empty());
        g.set_session(Some(user(Role::Ceo, &[])));
        assert_eq!(g.visible_sections().len(), konsut_auth::nav::NAV_SECTIONS.len());
        assert!(!g.available_commands("users").is_empty());
    }
}
