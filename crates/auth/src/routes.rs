//! Fixed route paths the access policy refers to.

pub const ROOT: &str = "/";
pub const LOGIN: &str = "/login";
pub const RESET_PASSWORD: &str = "/reset-password";
pub const MAINTENANCE: &str = "/maintenance";

/// Neutral terminal page for refused routes whose redirect target is unusable.
pub const ACCESS_DENIED: &str = "/access-denied";

pub const PROFILE: &str = "/settings/profile";
pub const PREFERENCES: &str = "/settings/preferences";

/// Always reachable by any signed-in user, whatever the role or list says.
pub const SELF_SERVICE: [&str; 2] = [PROFILE, PREFERENCES];

/// Shown in the menu to every role except viewer and unset, even without an
/// explicit grant.
pub const UNIVERSAL: [&str; 9] = [
    "/stock/inventory",
    "/suppliers",
    "/documents",
    "/tasks",
    "/memos",
    "/notifications",
    "/support",
    "/support/guide",
    "/support/contact",
];

/// Rendered outside the guard.
pub const PUBLIC: [&str; 4] = [LOGIN, RESET_PASSWORD, MAINTENANCE, ACCESS_DENIED];

pub fn is_self_service(path: &str) -> bool {
    SELF_SERVICE.contains(&path)
}

pub fn is_universal(path: &str) -> bool {
    UNIVERSAL.contains(&path)
}

pub fn is_public(path: &str) -> bool {
    PUBLIC.contains(&path)
}

/// Path component of a location (`/invoices?type=quote#top` → `/invoices`).
pub fn pathname(location: &str) -> &str {
    let end = location.find(['?', '#']).unwrap_or(location.len());
    match &location[..end] {
        "" => ROOT,
        path => path,
    }
}
