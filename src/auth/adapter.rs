// ABOUTME: Auth session adapter wrapping login and logout calls to the session provider
// ABOUTME: Normalizes provider errors and derives post-login redirects from the role policy
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Clinic Access Contributors

use super::notify::{Notification, Notifier};
use super::provider::{Credentials, SessionProvider};
use super::AuthError;
use crate::permissions::{is_allowed, RoleSet, RoutePolicyTable};
use clinic_core::constants::{defaults, messages};
use clinic_core::models::{Role, Session};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Where to go after a successful login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRedirect {
    /// Navigation target
    pub redirect_to: String,
    /// Role the redirect was computed from; `None` when it never resolved
    pub role: Option<Role>,
}

/// Outcome of a login attempt as reported to the UI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResult {
    /// Whether the login succeeded
    pub success: bool,
    /// Navigation target on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_to: Option<String>,
    /// User-facing error on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&Result<LoginRedirect, AuthError>> for AuthResult {
    fn from(result: &Result<LoginRedirect, AuthError>) -> Self {
        match result {
            Ok(redirect) => Self {
                success: true,
                redirect_to: Some(redirect.redirect_to.clone()),
                error: None,
            },
            Err(error) => Self {
                success: false,
                redirect_to: None,
                error: Some(error.to_string()),
            },
        }
    }
}

/// Login/logout front for one session provider
///
/// The provider, the policy table and the notifier are injected; the adapter
/// holds no session state of its own.
#[derive(Clone)]
pub struct AuthSessionAdapter {
    provider: Arc<dyn SessionProvider>,
    policy: Arc<RoutePolicyTable>,
    notifier: Arc<dyn Notifier>,
    resolve_timeout: Duration,
}

impl AuthSessionAdapter {
    /// Adapter over `provider`
    #[must_use]
    pub fn new(
        provider: Arc<dyn SessionProvider>,
        policy: Arc<RoutePolicyTable>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            provider,
            policy,
            notifier,
            resolve_timeout: Duration::from_millis(defaults::SESSION_RESOLVE_TIMEOUT_MS),
        }
    }

    /// How long login waits for the session store to report the new user
    #[must_use]
    pub const fn with_resolve_timeout(mut self, timeout: Duration) -> Self {
        self.resolve_timeout = timeout;
        self
    }

    /// Log in and compute the landing route
    ///
    /// After the provider accepts the credentials the adapter waits (bounded
    /// by the resolve timeout) for the session store to publish the new user,
    /// then maps its role through the policy table. If the role is still
    /// unresolved the user lands on the doctor dashboard.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::AuthenticationFailed`] for rejected credentials
    /// and [`AuthError::Provider`] for any other provider failure.
    #[tracing::instrument(skip(self, email, password), fields(email = %email))]
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginRedirect, AuthError> {
        let credentials = Credentials::new(email, password);
        // A user already in the store belongs to the previous session
        let mut session = self.provider.session();
        session.mark_seen();
        if let Err(provider_error) = self.provider.sign_in(&credentials).await {
            let error = AuthError::from(provider_error);
            warn!("Login failed: {error}");
            self.notifier.notify(Notification::error(
                messages::LOGIN_FAILED_TITLE,
                error.to_string(),
            ));
            return Err(error);
        }

        let session = session.wait_for_next_user(self.resolve_timeout).await;
        let raw_role = session.as_ref().and_then(Session::raw_role);
        let redirect_to = match raw_role {
            Some(role) => self.policy.dashboard_for(Some(role)).to_owned(),
            None => {
                warn!("Session role unresolved after login, defaulting to doctor dashboard");
                self.policy.post_login_default().to_owned()
            }
        };
        let role = session.as_ref().and_then(Session::role);

        info!(redirect_to = %redirect_to, role = ?role, "Login successful");
        self.notifier.notify(Notification::success(
            messages::LOGIN_SUCCESS_TITLE,
            messages::WELCOME_BACK,
        ));
        Ok(LoginRedirect { redirect_to, role })
    }

    /// Sign out and return the login route to navigate to
    ///
    /// Sign-out is best effort: a provider failure is logged and the caller is
    /// still sent to the login route.
    #[tracing::instrument(skip(self))]
    pub async fn logout(&self) -> String {
        match self.provider.sign_out().await {
            Ok(()) => {
                info!("Logout successful");
                self.notifier.notify(Notification::success(
                    messages::LOGOUT_SUCCESS_TITLE,
                    messages::LOGGED_OUT,
                ));
            }
            Err(error) => warn!("Logout failed, navigating to login anyway: {error}"),
        }
        self.policy.login_route().to_owned()
    }

    /// Whether the current session holds one of `roles`
    ///
    /// Accepts a single [`Role`], an array, a slice or a [`RoleSet`].
    #[must_use]
    pub fn has_role(&self, roles: impl Into<RoleSet>) -> bool {
        let state = self.provider.session().peek();
        is_allowed(state.user().and_then(Session::raw_role), &roles.into())
    }

    /// Dashboard of the current session, login when absent
    #[must_use]
    pub fn dashboard(&self) -> String {
        let state = self.provider.session().peek();
        self.policy
            .dashboard_for(state.user().and_then(Session::raw_role))
            .to_owned()
    }
}
