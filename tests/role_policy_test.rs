// ABOUTME: Integration tests for the role policy and the route policy table
// ABOUTME: Dashboards per role, case-insensitive membership and table validation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Clinic Access Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use clinic_access::constants::routes;
use clinic_access::models::Role;
use clinic_access::permissions::{
    dashboard_for, is_allowed, FallbackRoute, PolicyError, RoleSet, RoutePolicy, RoutePolicyTable,
};

#[test]
fn test_dashboard_for_each_role() {
    let expected = [
        ("doctor", routes::DOCTOR_DASHBOARD),
        ("admin", routes::ADMIN_DASHBOARD),
        ("clinicadmin", routes::CLINIC_ADMIN),
        ("branchadmin", routes::BRANCH_ADMIN),
        ("superadmin", routes::SAAS_ADMIN),
    ];
    let table = RoutePolicyTable::standard().unwrap();
    for (role, dashboard) in expected {
        assert_eq!(dashboard_for(Some(role)), dashboard);
        assert_eq!(table.dashboard_for(Some(role)), dashboard);
        assert_ne!(dashboard, routes::LOGIN);
    }
}

#[test]
fn test_dashboard_for_anything_else_is_login() {
    let table = RoutePolicyTable::standard().unwrap();
    for role in [None, Some(""), Some("nurse"), Some("super admin")] {
        assert_eq!(dashboard_for(role), routes::LOGIN);
        assert_eq!(table.dashboard_for(role), routes::LOGIN);
    }
}

#[test]
fn test_is_allowed_is_case_insensitive() {
    let required = RoleSet::from([Role::Doctor, Role::Admin]);
    assert!(is_allowed(Some("doctor"), &required));
    assert!(is_allowed(Some("Doctor"), &required));
    assert!(is_allowed(Some("ADMIN"), &required));
    assert!(!is_allowed(Some("branchadmin"), &required));
}

#[test]
fn test_is_allowed_compares_role_exactly_apart_from_case() {
    let required = RoleSet::from(Role::Doctor);
    assert!(!is_allowed(Some(" doctor "), &required));
    assert!(!is_allowed(Some("doctor "), &required));
    assert_eq!(dashboard_for(Some(" doctor")), routes::LOGIN);
}

#[test]
fn test_is_allowed_false_without_role() {
    let required = RoleSet::from([Role::Doctor]);
    assert!(!is_allowed(None, &required));
    assert!(!is_allowed(Some(""), &required));
    assert!(!is_allowed(Some("clerk"), &required));
    assert!(!is_allowed(Some("doctor"), &RoleSet::new()));
}

#[test]
fn test_standard_table_declarations() {
    let table = RoutePolicyTable::standard().unwrap();
    let saas = table.policy_for(routes::SAAS_ADMIN).unwrap();
    assert_eq!(
        saas.allowed_roles,
        RoleSet::from([Role::SuperAdmin, Role::ClinicAdmin, Role::BranchAdmin])
    );
    assert_eq!(saas.fallback, FallbackRoute::RoleDashboard);

    let users = table.policy_for(routes::USER_MANAGEMENT).unwrap();
    assert!(users.permits(Some("clinicadmin")));
    assert!(!users.permits(Some("doctor")));

    for path in [routes::PATIENTS, routes::REPORTS, routes::SEARCH, routes::SETTINGS] {
        let policy = table.policy_for(path).unwrap();
        assert_eq!(policy.allowed_roles, RoleSet::from([Role::Doctor, Role::Admin]));
        assert_eq!(policy.redirect_to, routes::LOGIN);
    }
}

#[test]
fn test_policy_lookup_uses_segment_prefixes() {
    let table = RoutePolicyTable::standard().unwrap();
    assert_eq!(table.policy_for("/patients/42").unwrap().path, routes::PATIENTS);
    assert_eq!(table.policy_for("/patients?page=2").unwrap().path, routes::PATIENTS);
    assert!(table.policy_for("/patientsfoo").is_none());
    assert!(table.policy_for("/login").is_none());
}

#[test]
fn test_builder_rejects_empty_role_set() {
    let err = RoutePolicyTable::standard_builder()
        .route(RoutePolicy::new("/nobody", RoleSet::new()))
        .build()
        .unwrap_err();
    assert_eq!(err, PolicyError::EmptyAllowedRoles("/nobody".to_owned()));
}

#[test]
fn test_builder_rejects_duplicates_and_relative_paths() {
    let duplicate = RoutePolicyTable::standard_builder()
        .route(RoutePolicy::new(routes::PATIENTS, Role::Doctor))
        .build()
        .unwrap_err();
    assert_eq!(duplicate, PolicyError::DuplicateRoute(routes::PATIENTS.to_owned()));

    let relative = RoutePolicyTable::standard_builder()
        .route(RoutePolicy::new("reports-archive", Role::Doctor))
        .build()
        .unwrap_err();
    assert!(matches!(relative, PolicyError::InvalidPath(_)));
}

#[test]
fn test_builder_requires_a_dashboard_per_role() {
    let err = RoutePolicyTable::builder()
        .dashboard(Role::Doctor, routes::DOCTOR_DASHBOARD)
        .build()
        .unwrap_err();
    assert!(matches!(err, PolicyError::MissingDashboard(_)));
}

#[test]
fn test_custom_login_route_applies_to_every_default() {
    let table = RoutePolicyTable::standard_builder()
        .login_route("/signin")
        .build()
        .unwrap();
    assert_eq!(table.login_route(), "/signin");
    assert_eq!(table.dashboard_for(Some("nurse")), "/signin");
    let admin = table.policy_for(routes::ADMIN_DASHBOARD).unwrap();
    assert_eq!(admin.redirect_to, "/signin");
    assert_eq!(admin.fallback, FallbackRoute::Path("/signin".to_owned()));
}

#[test]
fn test_role_set_from_provider_names() {
    let roles = RoleSet::from_names(["SuperAdmin", "clinicadmin"]).unwrap();
    assert!(roles.contains(Role::SuperAdmin));
    assert_eq!(roles.len(), 2);
    assert!(RoleSet::from_names(["receptionist"]).is_err());
}
