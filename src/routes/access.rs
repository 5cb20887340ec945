// ABOUTME: Access check route handlers
// ABOUTME: Guard decisions, role membership and dashboard lookup for the caller's session
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Clinic Access Contributors

use crate::guard::GuardDecision;
use crate::permissions::RoleSet;
use crate::resources::ServerResources;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::routing::get;
use axum::{Json, Router};
use clinic_core::errors::AppError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// `?path=` query
#[derive(Debug, Deserialize)]
pub struct CheckQuery {
    /// Path to evaluate
    pub path: String,
}

/// `?roles=` query, comma separated
#[derive(Debug, Deserialize)]
pub struct RolesQuery {
    /// Role names
    pub roles: String,
}

/// Guard decision plus the composed redirect location
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessCheckResponse {
    /// Evaluated decision
    #[serde(flatten)]
    pub decision: GuardDecision,
    /// Redirect target including the callback query
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Access check routes
pub struct AccessRoutes;

impl AccessRoutes {
    /// Create the access routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/access/check", get(Self::handle_check))
            .route("/api/access/has-role", get(Self::handle_has_role))
            .route("/api/access/dashboard", get(Self::handle_dashboard))
            .with_state(resources)
    }

    /// Evaluate the guard for `path`
    async fn handle_check(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<CheckQuery>,
    ) -> Result<Json<AccessCheckResponse>, AppError> {
        if !query.path.starts_with('/') {
            return Err(AppError::invalid_input("path must start with '/'"));
        }
        let state = resources.session_state(&headers);
        let decision = resources.guard.evaluate_path(&state, &query.path);
        let location = decision.location();
        Ok(Json(AccessCheckResponse { decision, location }))
    }

    /// Whether the caller holds one of `roles`
    async fn handle_has_role(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<RolesQuery>,
    ) -> Result<Json<serde_json::Value>, AppError> {
        let roles = RoleSet::from_names(query.roles.split(',').map(str::trim).filter(|s| !s.is_empty()))
            .map_err(|e| AppError::invalid_input(e.to_string()))?;
        let (_client, adapter) = resources.auth_session(ServerResources::session_token(&headers));
        Ok(Json(serde_json::json!({
            "roles": roles,
            "hasRole": adapter.has_role(roles.clone()),
        })))
    }

    /// Dashboard of the caller's role
    async fn handle_dashboard(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Json<serde_json::Value> {
        let (_client, adapter) = resources.auth_session(ServerResources::session_token(&headers));
        Json(serde_json::json!({ "dashboard": adapter.dashboard() }))
    }
}
