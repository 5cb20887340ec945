// ABOUTME: Tenant-scoped user directory routes
// ABOUTME: Admin roles list users within their clinic or branch; single lookups obey resource access rules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Clinic Access Contributors

use crate::auth::PublicUser;
use crate::middleware::require_roles;
use crate::permissions::RoleSet;
use crate::resources::ServerResources;
use crate::tenant::{has_access_to_resource, ScopeFilter, ScopeOptions, ScopedResource};
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::routing::get;
use axum::{Json, Router};
use clinic_core::errors::AppError;
use clinic_core::models::Role;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// User list response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserListResponse {
    /// Visible users
    pub users: Vec<PublicUser>,
    /// Scope applied to the list
    pub scope: ScopeFilter,
}

/// User directory routes
pub struct UserRoutes;

impl UserRoutes {
    /// Create the user routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/users", get(Self::handle_list_users))
            .route("/api/users/:user_id", get(Self::handle_get_user))
            .with_state(resources)
    }

    fn managers() -> RoleSet {
        RoleSet::from([Role::Admin, Role::SuperAdmin, Role::ClinicAdmin, Role::BranchAdmin])
    }

    /// List users visible to the caller
    async fn handle_list_users(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Json<UserListResponse>, AppError> {
        let state = resources.session_state(&headers);
        let session = require_roles(state.user(), &Self::managers())?;
        let scope = ScopeFilter::for_session(Some(session), ScopeOptions::users())?;
        let users = scope.retain(resources.identity.users(), user_scope);

        info!(
            user_id = %session.user_id,
            visible = users.len(),
            "Listed users"
        );
        Ok(Json(UserListResponse { users, scope }))
    }

    /// Fetch one user, subject to resource access rules
    async fn handle_get_user(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(user_id): Path<Uuid>,
    ) -> Result<Json<PublicUser>, AppError> {
        let state = resources.session_state(&headers);
        let session = state.user().ok_or_else(AppError::auth_required)?;
        let user = resources
            .identity
            .user(user_id)
            .ok_or_else(|| AppError::not_found(format!("User {user_id}")))?;

        if user.id != session.user_id && !has_access_to_resource(Some(session), Some(&user_scope(&user))) {
            return Err(AppError::permission_denied(
                "User is outside your clinic or branch",
            ));
        }
        Ok(Json(user))
    }
}

/// Tenant identifiers of a user record
fn user_scope(user: &PublicUser) -> ScopedResource {
    ScopedResource {
        id: Some(user.id),
        owner_id: None,
        clinic_id: user.clinic_id,
        branch_id: user.branch_id,
        branch_clinic_id: user.branch_id.and(user.clinic_id),
    }
}
