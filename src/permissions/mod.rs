// ABOUTME: Role policy mapping roles to default dashboards and allowed routes
// ABOUTME: Pure, lock-free functions plus the immutable route table shared by guard and adapter
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Clinic Access Contributors

//! # Role Policy
//!
//! Two contracts live here:
//!
//! - [`dashboard_for`]: the landing route of a role, `/login` for anything
//!   that is not a known role.
//! - [`is_allowed`]: membership of a role in a required-role set, compared
//!   case-insensitively, never true for an absent role.
//!
//! Both are pure. The [`RoutePolicyTable`] bundles the same mapping with the
//! protected route declarations so that the route guard and the auth adapter
//! consume a single source of truth.

mod role_set;
mod route_table;

pub use role_set::RoleSet;
pub use route_table::{FallbackRoute, PolicyError, RoutePolicy, RoutePolicyTable, RoutePolicyTableBuilder};

use clinic_core::constants::routes;
use clinic_core::models::Role;

/// Default dashboard of a known role
#[must_use]
pub const fn dashboard_for_role(role: Role) -> &'static str {
    match role {
        Role::SuperAdmin => routes::SAAS_ADMIN,
        Role::ClinicAdmin => routes::CLINIC_ADMIN,
        Role::BranchAdmin => routes::BRANCH_ADMIN,
        Role::Doctor => routes::DOCTOR_DASHBOARD,
        Role::Admin => routes::ADMIN_DASHBOARD,
    }
}

/// Default dashboard for a raw role string
///
/// Absent or unrecognized roles resolve to the login route.
#[must_use]
pub fn dashboard_for(role: Option<&str>) -> &'static str {
    role.and_then(Role::parse)
        .map_or(routes::LOGIN, dashboard_for_role)
}

/// Whether `role` is a member of `required_roles`
///
/// The comparison ignores ASCII case. An absent or unrecognized role is never
/// allowed.
#[must_use]
pub fn is_allowed(role: Option<&str>, required_roles: &RoleSet) -> bool {
    role.and_then(Role::parse)
        .is_some_and(|role| required_roles.contains(role))
}
