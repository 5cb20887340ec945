// ABOUTME: Immutable table of protected routes, their allowed roles and redirect targets
// ABOUTME: Validated once at startup and shared read-only by the guard and the auth adapter
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Clinic Access Contributors

use super::role_set::RoleSet;
use super::{dashboard_for_role, is_allowed};
use clinic_core::constants::routes;
use clinic_core::errors::AppError;
use clinic_core::models::Role;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors raised while building a [`RoutePolicyTable`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    /// A protected route declared no allowed role
    #[error("route '{0}' must allow at least one role")]
    EmptyAllowedRoles(String),
    /// A role has no default dashboard
    #[error("role '{0}' has no default dashboard")]
    MissingDashboard(Role),
    /// The same route path was declared twice
    #[error("route '{0}' is declared more than once")]
    DuplicateRoute(String),
    /// Route paths must be absolute
    #[error("route '{0}' must start with '/'")]
    InvalidPath(String),
}

impl From<PolicyError> for AppError {
    fn from(error: PolicyError) -> Self {
        Self::config(error.to_string())
    }
}

/// Where a signed-in user without the required role is sent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "path")]
pub enum FallbackRoute {
    /// A fixed route, commonly the login page
    Path(String),
    /// The user's own default dashboard
    RoleDashboard,
}

/// Access declaration for one protected route
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutePolicy {
    /// Route path, matched exactly or as a segment prefix
    pub path: String,
    /// Roles allowed to view the route
    pub allowed_roles: RoleSet,
    /// Login path for unauthenticated visitors
    pub redirect_to: String,
    /// Target for authenticated visitors lacking the role
    pub fallback: FallbackRoute,
}

impl RoutePolicy {
    /// Route protected for `allowed_roles`, redirecting every denial to the login page
    #[must_use]
    pub fn new(path: impl Into<String>, allowed_roles: impl Into<RoleSet>) -> Self {
        Self {
            path: path.into(),
            allowed_roles: allowed_roles.into(),
            redirect_to: routes::LOGIN.to_owned(),
            fallback: FallbackRoute::Path(routes::LOGIN.to_owned()),
        }
    }

    /// Override the unauthenticated redirect
    #[must_use]
    pub fn with_redirect_to(mut self, path: impl Into<String>) -> Self {
        self.redirect_to = path.into();
        self
    }

    /// Override the wrong-role redirect
    #[must_use]
    pub fn with_fallback(mut self, fallback: FallbackRoute) -> Self {
        self.fallback = fallback;
        self
    }

    /// Whether a raw provider role may view this route
    #[must_use]
    pub fn permits(&self, role: Option<&str>) -> bool {
        is_allowed(role, &self.allowed_roles)
    }

    fn matches(&self, path: &str) -> bool {
        path == self.path
            || path
                .strip_prefix(self.path.as_str())
                .is_some_and(|rest| rest.starts_with('/'))
    }
}

/// Immutable role/route configuration
///
/// Every role maps to exactly one dashboard and every protected route
/// declares a non-empty role set; [`RoutePolicyTableBuilder::build`] refuses
/// anything else.
#[derive(Debug, Clone)]
pub struct RoutePolicyTable {
    login_route: String,
    dashboards: BTreeMap<Role, String>,
    policies: BTreeMap<String, RoutePolicy>,
}

impl RoutePolicyTable {
    /// Start an empty builder
    #[must_use]
    pub fn builder() -> RoutePolicyTableBuilder {
        RoutePolicyTableBuilder::default()
    }

    /// The clinic application's dashboards and protected routes
    ///
    /// # Errors
    ///
    /// Never fails for the built-in declarations; the `Result` mirrors
    /// [`RoutePolicyTableBuilder::build`].
    pub fn standard() -> Result<Self, PolicyError> {
        Self::standard_builder().build()
    }

    /// Builder pre-populated with the standard declarations
    #[must_use]
    pub fn standard_builder() -> RoutePolicyTableBuilder {
        let clinical = [Role::Doctor, Role::Admin];
        let own_dashboard = FallbackRoute::RoleDashboard;

        let mut builder = Self::builder();
        for role in Role::ALL {
            builder = builder.dashboard(role, dashboard_for_role(role));
        }
        builder
            .route(
                RoutePolicy::new(
                    routes::SAAS_ADMIN,
                    [Role::SuperAdmin, Role::ClinicAdmin, Role::BranchAdmin],
                )
                .with_fallback(own_dashboard.clone()),
            )
            .route(
                RoutePolicy::new(routes::CLINIC_ADMIN, Role::ClinicAdmin)
                    .with_fallback(own_dashboard.clone()),
            )
            .route(
                RoutePolicy::new(routes::BRANCH_ADMIN, Role::BranchAdmin)
                    .with_fallback(own_dashboard),
            )
            .route(RoutePolicy::new(routes::ADMIN_DASHBOARD, Role::Admin))
            .route(RoutePolicy::new(routes::DOCTOR_DASHBOARD, clinical))
            .route(RoutePolicy::new(routes::PATIENTS, clinical))
            .route(RoutePolicy::new(routes::REPORTS, clinical))
            .route(RoutePolicy::new(routes::SEARCH, clinical))
            .route(RoutePolicy::new(routes::SETTINGS, clinical))
            .route(RoutePolicy::new(
                routes::USER_MANAGEMENT,
                [Role::Admin, Role::SuperAdmin, Role::ClinicAdmin],
            ))
    }

    /// Login route used for every safe-default deny
    #[must_use]
    pub fn login_route(&self) -> &str {
        &self.login_route
    }

    /// Default dashboard for a raw provider role; login for unknown or absent roles
    #[must_use]
    pub fn dashboard_for(&self, role: Option<&str>) -> &str {
        role.and_then(Role::parse)
            .and_then(|role| self.dashboards.get(&role))
            .map_or(self.login_route.as_str(), String::as_str)
    }

    /// Landing route when a login succeeds before the session role resolves
    #[must_use]
    pub fn post_login_default(&self) -> &str {
        self.dashboards
            .get(&Role::Doctor)
            .map_or(routes::DOCTOR_DASHBOARD, String::as_str)
    }

    /// Policy guarding `path`
    ///
    /// Query strings are ignored. An exact declaration wins; otherwise the
    /// longest declared segment prefix applies, so `/patients/42` is guarded
    /// by `/patients`.
    #[must_use]
    pub fn policy_for(&self, path: &str) -> Option<&RoutePolicy> {
        let path = path.split(['?', '#']).next().unwrap_or(path);
        if let Some(policy) = self.policies.get(path) {
            return Some(policy);
        }
        self.policies
            .values()
            .filter(|policy| policy.matches(path))
            .max_by_key(|policy| policy.path.len())
    }

    /// All protected routes, ordered by path
    pub fn policies(&self) -> impl Iterator<Item = &RoutePolicy> {
        self.policies.values()
    }

    /// Resolve the wrong-role target of `policy` for a raw provider role
    ///
    /// A role-dashboard fallback that points back at the denied route would
    /// loop, so it degrades to the login route.
    #[must_use]
    pub fn fallback_for(&self, policy: &RoutePolicy, role: Option<&str>) -> String {
        match &policy.fallback {
            FallbackRoute::Path(path) => path.clone(),
            FallbackRoute::RoleDashboard => {
                let dashboard = self.dashboard_for(role);
                if policy.matches(dashboard) {
                    self.login_route.clone()
                } else {
                    dashboard.to_owned()
                }
            }
        }
    }
}

/// Builder validating the table invariants
#[derive(Debug, Clone, Default)]
pub struct RoutePolicyTableBuilder {
    login_route: Option<String>,
    dashboards: BTreeMap<Role, String>,
    routes: Vec<RoutePolicy>,
}

impl RoutePolicyTableBuilder {
    /// Override the login route (defaults to `/login`)
    ///
    /// Routes still pointing at the previous login route are rewritten on build.
    #[must_use]
    pub fn login_route(mut self, path: impl Into<String>) -> Self {
        self.login_route = Some(path.into());
        self
    }

    /// Set the default dashboard of a role
    #[must_use]
    pub fn dashboard(mut self, role: Role, path: impl Into<String>) -> Self {
        self.dashboards.insert(role, path.into());
        self
    }

    /// Declare a protected route
    #[must_use]
    pub fn route(mut self, policy: RoutePolicy) -> Self {
        self.routes.push(policy);
        self
    }

    /// Validate and freeze the table
    ///
    /// # Errors
    ///
    /// Returns an error if a role has no dashboard, a route allows no role,
    /// a path is declared twice, or a path is not absolute.
    pub fn build(self) -> Result<RoutePolicyTable, PolicyError> {
        let login_route = self.login_route.unwrap_or_else(|| routes::LOGIN.to_owned());
        if !login_route.starts_with('/') {
            return Err(PolicyError::InvalidPath(login_route));
        }

        if let Some(role) = Role::ALL
            .into_iter()
            .find(|role| !self.dashboards.contains_key(role))
        {
            return Err(PolicyError::MissingDashboard(role));
        }

        let mut policies = BTreeMap::new();
        for mut policy in self.routes {
            if !policy.path.starts_with('/') {
                return Err(PolicyError::InvalidPath(policy.path));
            }
            if policy.allowed_roles.is_empty() {
                return Err(PolicyError::EmptyAllowedRoles(policy.path));
            }
            if policy.redirect_to == routes::LOGIN {
                policy.redirect_to.clone_from(&login_route);
            }
            if policy.fallback == FallbackRoute::Path(routes::LOGIN.to_owned()) {
                policy.fallback = FallbackRoute::Path(login_route.clone());
            }
            if policies.contains_key(&policy.path) {
                return Err(PolicyError::DuplicateRoute(policy.path));
            }
            policies.insert(policy.path.clone(), policy);
        }

        tracing::debug!(
            routes = policies.len(),
            login_route = %login_route,
            "Route policy table built"
        );

        Ok(RoutePolicyTable {
            login_route,
            dashboards: self.dashboards,
            policies,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_table_builds() {
        let table = RoutePolicyTable::standard().unwrap();
        assert_eq!(table.login_route(), routes::LOGIN);
        assert!(table.policies().all(|p| !p.allowed_roles.is_empty()));
    }

    #[test]
    fn test_empty_role_set_is_rejected() {
        let result = RoutePolicyTable::standard_builder()
            .route(RoutePolicy::new("/billing", RoleSet::new()))
            .build();
        assert_eq!(
            result.unwrap_err(),
            PolicyError::EmptyAllowedRoles("/billing".to_owned())
        );
    }

    #[test]
    fn test_missing_dashboard_is_rejected() {
        let result = RoutePolicyTable::builder()
            .dashboard(Role::Doctor, routes::DOCTOR_DASHBOARD)
            .build();
        assert!(matches!(result, Err(PolicyError::MissingDashboard(_))));
    }

    #[test]
    fn test_duplicate_route_is_rejected() {
        let result = RoutePolicyTable::standard_builder()
            .route(RoutePolicy::new(routes::PATIENTS, Role::Doctor))
            .build();
        assert_eq!(
            result.unwrap_err(),
            PolicyError::DuplicateRoute(routes::PATIENTS.to_owned())
        );
    }

    #[test]
    fn test_policy_lookup_by_segment_prefix() {
        let table = RoutePolicyTable::standard().unwrap();
        let policy = table.policy_for("/patients/42?tab=history").unwrap();
        assert_eq!(policy.path, routes::PATIENTS);
        assert!(table.policy_for("/patientsx").is_none());
        assert!(table.policy_for("/").is_none());
    }

    #[test]
    fn test_custom_login_route_propagates() {
        let table = RoutePolicyTable::standard_builder()
            .login_route("/signin")
            .build()
            .unwrap();
        let policy = table.policy_for(routes::REPORTS).unwrap();
        assert_eq!(policy.redirect_to, "/signin");
        assert_eq!(table.dashboard_for(Some("clerk")), "/signin");
    }

    #[test]
    fn test_role_dashboard_fallback_never_loops() {
        let table = RoutePolicyTable::builder()
            .dashboard(Role::Doctor, "/clinic-admin")
            .dashboard(Role::Admin, routes::ADMIN_DASHBOARD)
            .dashboard(Role::ClinicAdmin, routes::CLINIC_ADMIN)
            .dashboard(Role::BranchAdmin, routes::BRANCH_ADMIN)
            .dashboard(Role::SuperAdmin, routes::SAAS_ADMIN)
            .route(
                RoutePolicy::new(routes::CLINIC_ADMIN, Role::ClinicAdmin)
                    .with_fallback(FallbackRoute::RoleDashboard),
            )
            .build()
            .unwrap();
        let policy = table.policy_for(routes::CLINIC_ADMIN).unwrap();
        assert_eq!(table.fallback_for(policy, Some("doctor")), routes::LOGIN);
        assert_eq!(
            table.fallback_for(policy, Some("superadmin")),
            routes::SAAS_ADMIN
        );
    }
}
