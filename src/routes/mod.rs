// ABOUTME: Route module organization for the clinic access HTTP surface
// ABOUTME: Assembles auth, access, user, page and health routes into one axum router
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Clinic Access Contributors

//! HTTP routes
//!
//! Each domain module exposes a `*Routes` type whose `routes` function returns
//! a router with its state already applied, so the pieces merge freely.

/// Access checks against the route policy
pub mod access;
/// Login, logout and session endpoints
pub mod auth;
/// Health check routes
pub mod health;
/// Policy-protected application pages
pub mod pages;
/// Tenant-scoped user listing
pub mod users;

pub use access::AccessRoutes;
pub use auth::{AuthRoutes, LoginRequest, LogoutResponse};
pub use health::HealthRoutes;
pub use pages::{PageRoutes, PageSummary};
pub use users::UserRoutes;

use crate::middleware::{setup_cors, with_request_tracing};
use crate::resources::ServerResources;
use axum::Router;
use std::sync::Arc;

/// Full application router with tracing and CORS layers
#[must_use]
pub fn router(resources: Arc<ServerResources>) -> Router {
    let cors = setup_cors(&resources.config);
    let request_id_header = resources.config.request_id_header_name();
    let app = Router::new()
        .merge(HealthRoutes::routes())
        .merge(AuthRoutes::routes(Arc::clone(&resources)))
        .merge(AccessRoutes::routes(Arc::clone(&resources)))
        .merge(UserRoutes::routes(Arc::clone(&resources)))
        .merge(PageRoutes::routes(resources))
        .layer(cors);
    with_request_tracing(app, request_id_header)
}
