use std::borrow::Cow;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use konsut_core::ValueObject;

/// A single path grant (e.g. `"/invoices"`).
///
/// A grant covers its own path and every sub-path below it, so `"/settings"`
/// covers `"/settings/invoice"` but not `"/settingsx"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

impl Permission {
    pub fn new(path: impl Into<Cow<'static, str>>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Exact match only. Used by menu visibility.
    pub fn matches_exact(&self, path: &str) -> bool {
        self.as_str() == path
    }

    /// Exact match or `grant + "/"` prefix match. Used by route access.
    pub fn covers(&self, path: &str) -> bool {
        match path.strip_prefix(self.as_str()) {
            Some("") => true,
            Some(rest) => rest.starts_with('/'),
            None => false,
        }
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl ValueObject for Permission {}

/// Ordered, de-duplicated list of path grants attached to a session.
///
/// Order matters: the first entry is the user's landing page when a route is
/// refused. An empty set means "no explicit list", which route access and menu
/// visibility interpret differently (see `evaluate` and `nav`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PermissionSet(Vec<Permission>);

// JSON strings holding JSON arrays are unwrapped at most this many times.
const MAX_ENCODING_DEPTH: usize = 2;

impl PermissionSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self::default();
        for path in paths {
            set.push(path.into());
        }
        set
    }

    /// Normalize a permission payload of unknown shape.
    ///
    /// Accepts an array of strings, or a string holding a JSON-encoded array.
    /// Non-string array members are dropped. Anything else (objects, numbers,
    /// broken JSON) yields the empty set. Never fails.
    pub fn from_value(value: &Value) -> Self {
        Self::from_value_at(value, 0)
    }

    /// Parse the textual column form (`'["/", "/invoices"]'`).
    pub fn parse(raw: &str) -> Self {
        Self::from_value(&Value::String(raw.to_string()))
    }

    fn from_value_at(value: &Value, depth: usize) -> Self {
        match value {
            Value::Null | Value::Bool(false) => Self::default(),
            Value::Array(items) => Self::from_array(items),
            Value::String(s) if s.trim().is_empty() => Self::default(),
            Value::String(s) if depth < MAX_ENCODING_DEPTH => match serde_json::from_str::<Value>(s) {
                Ok(decoded) => Self::from_value_at(&decoded, depth + 1),
                Err(err) => {
                    tracing::warn!(error = %err, "permission payload is not valid JSON; treating as empty");
                    Self::default()
                }
            },
            other => {
                tracing::warn!(shape = shape_of(other), "unrecognized permission payload; treating as empty");
                Self::default()
            }
        }
    }

    fn from_array(items: &[Value]) -> Self {
        let mut set = Self::default();
        for item in items {
            match item {
                Value::String(path) => set.push(path.clone()),
                // Never matches a path; keeping the remaining grants stays restrictive.
                other => tracing::warn!(
                    shape = shape_of(other),
                    "dropping non-string permission entry"
                ),
            }
        }
        set
    }

    fn push(&mut self, path: String) {
        let trimmed = path.trim();
        if trimmed.is_empty() {
            // A blank entry would prefix-match every path.
            tracing::warn!("dropping blank permission entry");
            return;
        }
        if self.0.iter().any(|p| p.as_str() == trimmed) {
            return;
        }
        self.0.push(Permission::new(trimmed.to_string()));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The landing page used when a route is refused.
    pub fn first(&self) -> Option<&Permission> {
        self.0.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Permission> {
        self.0.iter()
    }

    /// Exact membership.
    pub fn contains(&self, path: &str) -> bool {
        self.0.iter().any(|p| p.matches_exact(path))
    }

    /// Exact or sub-path membership.
    pub fn grants(&self, path: &str) -> bool {
        self.0.iter().any(|p| p.covers(path))
    }

    pub fn to_strings(&self) -> Vec<String> {
        self.0.iter().map(|p| p.as_str().to_string()).collect()
    }
}

impl ValueObject for PermissionSet {}

impl<'de> Deserialize<'de> for PermissionSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

fn shape_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
