// ABOUTME: Route guard deciding allow or redirect for every navigation
// ABOUTME: Pending while the session loads, then Allowed or one of two Denied states
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Clinic Access Contributors

//! # Route Guard
//!
//! ```text
//!             session loading
//!   Pending <-----------------+
//!      |                      |
//!      | resolved             | session changed
//!      v                      |
//!   +--------------------------------+
//!   | no user     -> DeniedUnauthenticated (redirect: login)
//!   | role absent
//!   |  from set   -> DeniedWrongRole       (redirect: fallback)
//!   | role in set -> Allowed
//!   +--------------------------------+
//! ```
//!
//! `Pending` is the only non-terminal state and never carries a redirect, so a
//! UI shows a loading indicator instead of flickering through the login page.

mod watcher;

pub use watcher::GuardWatcher;

use crate::permissions::{RoutePolicy, RoutePolicyTable};
use crate::session::SessionHandle;
use clinic_core::constants::routes::CALLBACK_URL_PARAM;
use clinic_core::models::{Session, SessionState};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Outcome of evaluating a route against the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardState {
    /// Session still loading; render a loading indicator
    Pending,
    /// Render the route
    Allowed,
    /// No user; send to the login path
    DeniedUnauthenticated,
    /// User lacks the required role; send to the fallback
    DeniedWrongRole,
}

impl GuardState {
    /// Whether re-evaluation can still change the outcome without a session change
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// Guard state plus where to navigate, if anywhere
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuardDecision {
    /// Evaluated state
    pub state: GuardState,
    /// Redirect target for the denied states
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_to: Option<String>,
    /// Originally requested path, carried to the login page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,
}

impl GuardDecision {
    /// Session still loading
    #[must_use]
    pub const fn pending() -> Self {
        Self {
            state: GuardState::Pending,
            redirect_to: None,
            callback_url: None,
        }
    }

    /// Route may render
    #[must_use]
    pub const fn allowed() -> Self {
        Self {
            state: GuardState::Allowed,
            redirect_to: None,
            callback_url: None,
        }
    }

    fn denied(state: GuardState, redirect_to: String, callback_url: Option<String>) -> Self {
        Self {
            state,
            redirect_to: Some(redirect_to),
            callback_url,
        }
    }

    /// Whether the route may render
    #[must_use]
    pub const fn is_allowed(&self) -> bool {
        matches!(self.state, GuardState::Allowed)
    }

    /// Full navigation target, including the callback query on login redirects
    #[must_use]
    pub fn location(&self) -> Option<String> {
        let target = self.redirect_to.as_deref()?;
        Some(match &self.callback_url {
            Some(callback) => format!(
                "{target}?{CALLBACK_URL_PARAM}={}",
                urlencoding::encode(callback)
            ),
            None => target.to_owned(),
        })
    }
}

/// Per-navigation gate over the shared route policy table
#[derive(Debug, Clone)]
pub struct RouteGuard {
    policy: Arc<RoutePolicyTable>,
}

impl RouteGuard {
    /// Guard backed by `policy`
    #[must_use]
    pub const fn new(policy: Arc<RoutePolicyTable>) -> Self {
        Self { policy }
    }

    /// Shared policy table
    #[must_use]
    pub fn policy(&self) -> &Arc<RoutePolicyTable> {
        &self.policy
    }

    /// Evaluate a route declaration against a session snapshot
    ///
    /// No callback URL is attached; see [`Self::evaluate_path`].
    #[must_use]
    pub fn evaluate(&self, state: &SessionState, route: &RoutePolicy) -> GuardDecision {
        self.decide(state, route, None)
    }

    /// Evaluate the route protecting `path`
    ///
    /// Paths with no declaration are public and always allowed, even while the
    /// session is loading. Unauthenticated redirects carry `path` as callback.
    #[must_use]
    pub fn evaluate_path(&self, state: &SessionState, path: &str) -> GuardDecision {
        match self.policy.policy_for(path) {
            Some(route) => self.decide(state, route, Some(path)),
            None => GuardDecision::allowed(),
        }
    }

    /// Watch a route, re-evaluating on every session change
    #[must_use]
    pub fn watch(&self, route: RoutePolicy, session: SessionHandle) -> GuardWatcher {
        GuardWatcher::new(self.clone(), route, session)
    }

    fn decide(
        &self,
        state: &SessionState,
        route: &RoutePolicy,
        requested_path: Option<&str>,
    ) -> GuardDecision {
        if state.is_loading() {
            return GuardDecision::pending();
        }

        let Some(user) = state.user() else {
            debug!(route = %route.path, "No session, redirecting to login");
            return GuardDecision::denied(
                GuardState::DeniedUnauthenticated,
                route.redirect_to.clone(),
                requested_path.map(str::to_owned),
            );
        };

        if route.permits(user.raw_role()) {
            return GuardDecision::allowed();
        }

        let fallback = self.policy.fallback_for(route, user.raw_role());
        debug!(
            route = %route.path,
            user_id = %user.user_id,
            role = user.raw_role().unwrap_or("<none>"),
            fallback = %fallback,
            "Role not permitted"
        );
        GuardDecision::denied(GuardState::DeniedWrongRole, fallback, None)
    }
}

/// Session of an allowed request, inserted into request extensions by the guard middleware
#[derive(Debug, Clone)]
pub struct GuardedSession(pub Session);
