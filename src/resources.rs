// ABOUTME: Shared state handed to every HTTP handler and middleware
// ABOUTME: Configuration, route policy, guard, identity service and notifier behind Arcs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Clinic Access Contributors

use crate::auth::{
    AuthSessionAdapter, LocalIdentityService, LocalSessionClient, Notifier, SessionProvider,
    TracingNotifier,
};
use crate::config::ServerConfig;
use crate::guard::RouteGuard;
use crate::permissions::RoutePolicyTable;
use crate::security::cookies::get_cookie_value;
use clinic_core::constants::http_names::SESSION_COOKIE;
use clinic_core::errors::AppResult;
use clinic_core::models::SessionState;
use http::{header, HeaderMap};
use std::sync::Arc;

/// Server state shared across requests
#[derive(Clone)]
pub struct ServerResources {
    /// Server configuration
    pub config: Arc<ServerConfig>,
    /// Route policy table, shared by the guard and every auth adapter
    pub policy: Arc<RoutePolicyTable>,
    /// Route guard over `policy`
    pub guard: RouteGuard,
    /// Credential store and session issuer
    pub identity: Arc<LocalIdentityService>,
    /// Sink for user-facing notifications
    pub notifier: Arc<dyn Notifier>,
}

impl ServerResources {
    /// Build resources from configuration with the standard route table
    ///
    /// # Errors
    ///
    /// Returns an error if the configured login route yields an invalid policy table.
    pub fn new(config: ServerConfig) -> AppResult<Self> {
        let policy = Arc::new(
            RoutePolicyTable::standard_builder()
                .login_route(config.login_route.clone())
                .build()?,
        );
        let identity = Arc::new(LocalIdentityService::new(
            config.auth.session_ttl(),
            config.auth.bcrypt_cost,
        ));
        Ok(Self {
            config: Arc::new(config),
            guard: RouteGuard::new(Arc::clone(&policy)),
            policy,
            identity,
            notifier: Arc::new(TracingNotifier),
        })
    }

    /// Replace the notifier
    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Session token from the session cookie, or a bearer `Authorization` header
    #[must_use]
    pub fn session_token(headers: &HeaderMap) -> Option<String> {
        get_cookie_value(headers, SESSION_COOKIE)
            .filter(|token| !token.is_empty())
            .or_else(|| {
                headers
                    .get(header::AUTHORIZATION)
                    .and_then(|h| h.to_str().ok())
                    .and_then(|auth| auth.strip_prefix("Bearer "))
                    .map(|token| token.trim().to_owned())
            })
    }

    /// Session state of the caller
    #[must_use]
    pub fn session_state(&self, headers: &HeaderMap) -> SessionState {
        Self::session_token(headers)
            .map_or_else(SessionState::unauthenticated, |token| {
                self.identity.resolve(&token)
            })
    }

    /// Session provider and auth adapter for one request
    #[must_use]
    pub fn auth_session(&self, token: Option<String>) -> (Arc<LocalSessionClient>, AuthSessionAdapter) {
        let client = Arc::new(self.identity.client(token));
        let provider: Arc<dyn SessionProvider> = client.clone();
        let adapter = AuthSessionAdapter::new(
            provider,
            Arc::clone(&self.policy),
            Arc::clone(&self.notifier),
        )
        .with_resolve_timeout(self.config.auth.session_resolve_timeout());
        (client, adapter)
    }
}
