// ABOUTME: Axum middleware applying the route guard to every policy-protected page
// ABOUTME: Allowed requests carry the session as an extension; denied ones get a 303 redirect
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Clinic Access Contributors

use crate::guard::{GuardState, GuardedSession};
use crate::logging::AppLogger;
use crate::resources::ServerResources;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use std::sync::Arc;

/// Guard a request against the route policy table
///
/// Paths without a declaration pass through untouched.
///
/// # Example
///
/// ```rust,no_run
/// use axum::{middleware, routing::get, Router};
/// use clinic_access::middleware::route_guard_middleware;
/// use clinic_access::resources::ServerResources;
/// use std::sync::Arc;
///
/// # async fn handler() -> &'static str { "" }
/// # fn example(resources: Arc<ServerResources>) {
/// let app: Router = Router::new()
///     .route("/patients", get(handler))
///     .layer(middleware::from_fn_with_state(resources, route_guard_middleware));
/// # }
/// ```
pub async fn route_guard_middleware(
    State(resources): State<Arc<ServerResources>>,
    mut req: Request,
    next: Next,
) -> Response {
    let requested = req
        .uri()
        .path_and_query()
        .map_or_else(|| req.uri().path().to_owned(), |pq| pq.as_str().to_owned());
    let state = resources.session_state(req.headers());
    let decision = resources.guard.evaluate_path(&state, &requested);

    match decision.state {
        GuardState::Allowed => {
            if let Some(user) = state.user() {
                tracing::Span::current().record("user_id", user.user_id.to_string());
                req.extensions_mut().insert(GuardedSession(user.clone()));
            }
            next.run(req).await
        }
        GuardState::Pending => (StatusCode::ACCEPTED, Json(decision)).into_response(),
        GuardState::DeniedUnauthenticated | GuardState::DeniedWrongRole => {
            let location = decision
                .location()
                .unwrap_or_else(|| resources.policy.login_route().to_owned());
            AppLogger::log_access_denied(
                &requested,
                if decision.state == GuardState::DeniedWrongRole {
                    "denied_wrong_role"
                } else {
                    "denied_unauthenticated"
                },
                state.user().and_then(|u| u.raw_role()),
                &location,
            );
            Redirect::to(&location).into_response()
        }
    }
}
