//! Property tests for route access and menu visibility.

use proptest::prelude::*;
use serde_json::json;

use konsut_core::UserId;

use crate::session::UNASSIGNED_TAG;

use crate::{
    AccessRule, NavRule, PermissionSet, Redirect, Role, User, evaluate, is_nav_item_visible,
    nav_visibility_rule, routes,
};

const KNOWN_PATHS: &[&str] = &[
    "/",
    "/invoices",
    "/invoices/123",
    "/clients",
    "/new-invoice",
    "/stock/inventory",
    "/stock/add",
    "/suppliers",
    "/tasks",
    "/users",
    "/audit-logs",
    "/settings",
    "/settings/invoice",
    "/settings/profile",
    "/settings/preferences",
    "/support/guide",
];

fn path_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::sample::select(KNOWN_PATHS).prop_map(str::to_string),
        "/[a-z]{1,8}(/[a-z0-9]{1,6})?",
    ]
}

fn role_strategy() -> impl Strategy<Value = Option<Role>> {
    prop_oneof![
        4 => prop::sample::select(Role::ALL.to_vec()).prop_map(Some),
        1 => Just(None),
    ]
}

fn non_privileged_role() -> impl Strategy<Value = Option<Role>> {
    role_strategy().prop_filter("non-privileged", |r| !r.is_some_and(Role::is_privileged))
}

fn perms_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(path_strategy(), 0..5)
}

fn user(role: Option<Role>, perms: &[String]) -> User {
    User::new(
        UserId::from(1),
        "prop",
        role,
        PermissionSet::from_paths(perms.iter().cloned()),
    )
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 512,
        ..ProptestConfig::default()
    })]

    /// Property: Admin and CEO enter every path, with or without maintenance.
    #[test]
    fn privileged_roles_enter_everything(
        role in prop::sample::select(vec![Role::Admin, Role::Ceo]),
        perms in perms_strategy(),
        path in path_strategy(),
        maintenance in any::<bool>(),
    ) {
        let u = user(Some(role), &perms);
        prop_assert_eq!(evaluate(Some(&u), &path, maintenance).rule(), AccessRule::PrivilegedRole);
    }

    /// Property: Profile and preferences are open to every signed-in user.
    #[test]
    fn self_service_always_allowed(role in role_strategy(), perms in perms_strategy()) {
        let u = user(role, &perms);
        for path in routes::SELF_SERVICE {
            prop_assert!(evaluate(Some(&u), path, false).is_allowed());
            prop_assert!(is_nav_item_visible(Some(&u), path));
        }
    }

    /// Property: Maintenance sends every non-privileged user to the maintenance page.
    #[test]
    fn maintenance_locks_out_non_privileged(
        role in non_privileged_role(),
        perms in perms_strategy(),
        path in path_strategy(),
    ) {
        let u = user(role, &perms);
        let verdict = evaluate(Some(&u), &path, true);
        prop_assert_eq!(verdict.redirect(), Some(&Redirect::Maintenance));
    }

    /// Property: Evaluation is idempotent.
    #[test]
    fn evaluation_is_idempotent(
        role in role_strategy(),
        perms in perms_strategy(),
        path in path_strategy(),
        maintenance in any::<bool>(),
    ) {
        let u = user(role, &perms);
        prop_assert_eq!(evaluate(Some(&u), &path, maintenance), evaluate(Some(&u), &path, maintenance));
    }

    /// Property: A landing redirect always points at a page the user can open,
    /// and never at the refused path itself.
    #[test]
    fn landing_redirect_never_loops(
        role in non_privileged_role(),
        perms in perms_strategy(),
        path in path_strategy(),
    ) {
        let u = user(role, &perms);
        if let Some(Redirect::Landing { path: target }) = evaluate(Some(&u), &path, false).redirect() {
            prop_assert_ne!(target, &path);
            prop_assert!(evaluate(Some(&u), target, false).is_allowed());
        }
    }

    /// Property: An empty list opens every route but hides every link outside
    /// the self-service and universal pages.
    #[test]
    fn empty_list_route_open_menu_closed(role in non_privileged_role(), path in path_strategy()) {
        let u = user(role, &[]);
        prop_assert!(evaluate(Some(&u), &path, false).is_allowed());
        if !routes::is_self_service(&path) && !routes::is_universal(&path) {
            prop_assert_eq!(nav_visibility_rule(Some(&u), &path), NavRule::NotListed);
        }
    }

    /// Property: Storing a permission list in any of its wire shapes and
    /// reading it back yields the same decisions.
    #[test]
    fn permission_round_trip_preserves_decisions(
        role in role_strategy(),
        perms in perms_strategy(),
        paths in prop::collection::vec(path_strategy(), 1..6),
    ) {
        let original = user(role, &perms);
        let as_array = serde_json::to_value(&original.permissions).unwrap();
        let as_text = serde_json::Value::String(as_array.to_string());

        for payload in [as_array, as_text] {
            let restored: User = serde_json::from_value(json!({
                "id": 1,
                "username": "prop",
                "role": original.role.map_or(UNASSIGNED_TAG, Role::as_str),
                "permissions": payload,
            }))
            .unwrap();
            prop_assert_eq!(&restored.permissions, &original.permissions);

            for path in &paths {
                prop_assert_eq!(
                    evaluate(Some(&restored), path, false),
                    evaluate(Some(&original), path, false)
                );
                prop_assert_eq!(
                    is_nav_item_visible(Some(&restored), path),
                    is_nav_item_visible(Some(&original), path)
                );
            }
        }
    }
}

/// Regression: route access fails open on an empty list while the menu fails
/// closed, except for universal pages.
#[test]
fn route_and_menu_read_an_empty_list_differently() {
    let staff = user(Some(Role::Staff), &[]);
    assert!(evaluate(Some(&staff), "/analytics", false).is_allowed());
    assert!(!is_nav_item_visible(Some(&staff), "/analytics"));

    let sales = user(Some(Role::Sales), &[]);
    assert!(is_nav_item_visible(Some(&sales), "/tasks"));
}

#[test]
fn prefix_grant_and_first_entry_redirect() {
    let u = user(Some(Role::Sales), &["/invoices".to_string(), "/clients".to_string()]);
    assert!(evaluate(Some(&u), "/invoices/123", false).is_allowed());
    assert_eq!(evaluate(Some(&u), "/suppliers", false).redirect_path(), Some("/invoices"));
}

/// Regression: a stray non-string grant must not lift the session to the
/// unrestricted empty list.
#[test]
fn mistyped_grant_keeps_the_remaining_restrictions() {
    let sales: User = serde_json::from_value(json!({
        "id": 5,
        "username": "wambui",
        "role": "sales",
        "permissions": ["/invoices", 3],
    }))
    .unwrap();

    assert_eq!(sales.permissions.to_strings(), vec!["/invoices"]);
    let verdict = evaluate(Some(&sales), "/users", false);
    assert_eq!(verdict.rule(), AccessRule::PermissionMissing);
    assert_eq!(verdict.redirect_path(), Some("/invoices"));
    assert!(evaluate(Some(&sales), "/invoices/7", false).is_allowed());
}
