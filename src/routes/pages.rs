// ABOUTME: Policy-protected application pages served behind the route guard
// ABOUTME: One route per declared path plus its sub-paths, answering with a page summary
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Clinic Access Contributors

use crate::guard::GuardedSession;
use crate::middleware::route_guard_middleware;
use crate::resources::ServerResources;
use axum::extract::State;
use axum::http::Uri;
use axum::routing::get;
use axum::{middleware, Extension, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// What an allowed page request returns
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSummary {
    /// Requested path
    pub path: String,
    /// Declared route the path matched
    pub route: String,
    /// Signed-in email
    pub email: String,
    /// Role string of the session
    pub role: Option<String>,
    /// Clinic name for branding
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clinic_name: Option<String>,
    /// The caller's own dashboard
    pub dashboard: String,
}

/// Guarded page routes
pub struct PageRoutes;

impl PageRoutes {
    /// One route for every path in the policy table, guarded
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        let mut router = Router::new();
        for policy in resources.policy.policies() {
            router = router
                .route(&policy.path, get(Self::handle_page))
                .route(&format!("{}/*rest", policy.path), get(Self::handle_page));
        }
        router
            .layer(middleware::from_fn_with_state(
                Arc::clone(&resources),
                route_guard_middleware,
            ))
            .with_state(resources)
    }

    async fn handle_page(
        State(resources): State<Arc<ServerResources>>,
        Extension(GuardedSession(session)): Extension<GuardedSession>,
        uri: Uri,
    ) -> Json<PageSummary> {
        let path = uri.path().to_owned();
        let route = resources
            .policy
            .policy_for(&path)
            .map_or_else(|| path.clone(), |p| p.path.clone());
        Json(PageSummary {
            dashboard: resources.policy.dashboard_for(session.raw_role()).to_owned(),
            path,
            route,
            email: session.email,
            role: session.role,
            clinic_name: session.clinic_name,
        })
    }
}
