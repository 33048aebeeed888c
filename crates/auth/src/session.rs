//! Signed-in user as seen by the access policy.
//!
//! The authentication layer owns this value (created at login, updated on
//! profile edits, dropped on logout). Policies only read it.

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use konsut_core::UserId;

use crate::{PermissionSet, Role};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawUser", rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub username: String,
    /// `None` when the stored tag is not a known role.
    #[serde(serialize_with = "serialize_role")]
    pub role: Option<Role>,
    pub permissions: PermissionSet,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub is_authenticated: bool,
}

impl User {
    pub fn new(
        id: UserId,
        username: impl Into<String>,
        role: Option<Role>,
        permissions: PermissionSet,
    ) -> Self {
        let username = username.into();
        Self {
            id,
            name: display_name_for(None, &username),
            username,
            role,
            permissions,
            email: None,
            is_authenticated: true,
        }
    }

    pub fn is_privileged(&self) -> bool {
        self.role.is_some_and(Role::is_privileged)
    }

    pub fn display_role(&self) -> &'static str {
        self.role.map_or("Unassigned", Role::display_name)
    }
}

/// Wire shape of a session as returned by the login endpoint or read back from
/// local storage. Every field tolerates missing or mistyped values.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawUser {
    id: UserId,
    #[serde(default)]
    username: String,
    #[serde(default)]
    role: Value,
    #[serde(default)]
    permissions: Value,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default = "default_authenticated", alias = "is_authenticated")]
    is_authenticated: bool,
}

fn default_authenticated() -> bool {
    true
}

impl From<RawUser> for User {
    fn from(raw: RawUser) -> Self {
        Self {
            id: raw.id,
            role: role_from_value(&raw.role),
            permissions: PermissionSet::from_value(&raw.permissions),
            name: display_name_for(raw.name.as_deref(), &raw.username),
            username: raw.username,
            email: raw.email.filter(|e| !e.trim().is_empty()),
            is_authenticated: raw.is_authenticated,
        }
    }
}

/// Stored tag for the unset role.
pub(crate) const UNASSIGNED_TAG: &str = "unassigned";

// A missing or empty role means the backend predates roles: treat as viewer.
fn role_from_value(value: &Value) -> Option<Role> {
    match value {
        Value::Null => Some(Role::Viewer),
        Value::String(tag) if tag.trim().is_empty() => Some(Role::Viewer),
        Value::String(tag) if tag.trim() == UNASSIGNED_TAG => None,
        Value::String(tag) => match tag.parse() {
            Ok(role) => Some(role),
            Err(err) => {
                tracing::warn!(error = %err, "session carries an unknown role; treating as unset");
                None
            }
        },
        _ => {
            tracing::warn!("session role is not a string; treating as unset");
            None
        }
    }
}

fn display_name_for(name: Option<&str>, username: &str) -> String {
    [name.unwrap_or_default(), username]
        .into_iter()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .unwrap_or("User")
        .to_string()
}

// Unset gets its own tag so that a round trip does not turn it into viewer.
fn serialize_role<S: Serializer>(role: &Option<Role>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(role.map_or(UNASSIGNED_TAG, Role::as_str))
}
