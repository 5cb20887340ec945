// ABOUTME: Login, logout and session route handlers
// ABOUTME: Drives the auth session adapter and maintains the session cookie
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Clinic Access Contributors

use crate::auth::{AuthError, AuthResult, SessionProvider};
use crate::logging::AppLogger;
use crate::resources::ServerResources;
use crate::security::cookies::{clear_session_cookie, set_session_cookie};
use crate::session::SessionHandle;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use clinic_core::errors::AppError;
use clinic_core::models::SessionState;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// Login form
///
/// Missing fields deserialize as empty and fail like wrong credentials.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Login email
    #[serde(default)]
    pub email: String,
    /// Plain-text password
    #[serde(default)]
    pub password: String,
    /// Page the user originally asked for
    #[serde(default)]
    pub callback_url: Option<String>,
}

/// Logout response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutResponse {
    /// Where to navigate next
    pub redirect_to: String,
}

/// Authentication routes
pub struct AuthRoutes;

impl AuthRoutes {
    /// Create the auth routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/auth/login", post(Self::handle_login))
            .route("/api/auth/logout", post(Self::handle_logout))
            .route("/api/auth/session", get(Self::handle_session))
            .with_state(resources)
    }

    /// Handle login
    ///
    /// A `callbackUrl` replaces the role dashboard when the new session may
    /// open it.
    async fn handle_login(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<LoginRequest>,
    ) -> Response {
        let (client, adapter) = resources.auth_session(None);
        let result = adapter.login(&request.email, &request.password).await;

        AppLogger::log_auth_event(
            &request.email,
            "login",
            result.is_ok(),
            result.as_ref().err().map(ToString::to_string).as_deref(),
        );

        let mut body = AuthResult::from(&result);
        let status = match &result {
            Ok(_) => StatusCode::OK,
            Err(error) => login_failure_status(error),
        };
        let mut headers = HeaderMap::new();

        if result.is_ok() {
            if let Some(callback) = request.callback_url.as_deref() {
                if Self::callback_allowed(&resources, &client.session(), callback) {
                    debug!(callback = %callback, "Redirecting to callback url");
                    body.redirect_to = Some(callback.to_owned());
                }
            }
            match client.token().await {
                Some(token) => set_session_cookie(
                    &mut headers,
                    &token,
                    resources.config.auth.session_ttl().as_secs(),
                    resources.config.auth.secure_cookies,
                ),
                None => warn!("Login succeeded without a session token"),
            }
        }

        (status, headers, Json(body)).into_response()
    }

    fn callback_allowed(resources: &ServerResources, session: &SessionHandle, callback: &str) -> bool {
        is_local_path(callback)
            && resources
                .guard
                .evaluate_path(&session.peek(), callback)
                .is_allowed()
    }

    /// Handle logout
    async fn handle_logout(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Response {
        let token = ServerResources::session_token(&headers);
        let (_client, adapter) = resources.auth_session(token);
        let redirect_to = adapter.logout().await;

        let mut response_headers = HeaderMap::new();
        clear_session_cookie(&mut response_headers, resources.config.auth.secure_cookies);
        (
            StatusCode::OK,
            response_headers,
            Json(LogoutResponse { redirect_to }),
        )
            .into_response()
    }

    /// Handle session lookup
    async fn handle_session(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Json<SessionState> {
        Json(resources.session_state(&headers))
    }
}

/// Whether `target` stays on this site once a browser normalizes it
///
/// Browsers treat `\` like `/`, so `/\host` means `//host`. Checked on the
/// raw and the percent-decoded form.
fn is_local_path(target: &str) -> bool {
    let local = |path: &str| {
        path.starts_with('/')
            && !path.starts_with("//")
            && !path.contains('\\')
            && !path.chars().any(char::is_control)
    };
    local(target) && urlencoding::decode(target).is_ok_and(|decoded| local(&decoded))
}

fn login_failure_status(error: &AuthError) -> StatusCode {
    StatusCode::from_u16(AppError::from(error.clone()).http_status())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

#[cfg(test)]
mod tests {
    use super::is_local_path;

    #[test]
    fn test_local_paths() {
        assert!(is_local_path("/patients/7"));
        assert!(is_local_path("/search?q=a%20b"));
    }

    #[test]
    fn test_off_site_targets_are_rejected() {
        for target in [
            "https://evil.example",
            "//evil.example",
            "/\\evil.example",
            "/%5Cevil.example",
            "/%2Fevil.example",
            "/\tevil",
            "patients",
            "",
        ] {
            assert!(!is_local_path(target), "{target}");
        }
    }
}
