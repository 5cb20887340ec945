// ABOUTME: Main library entry point for the Clinic Access platform
// ABOUTME: Role policy, route guard, auth session adapter, tenant scoping and HTTP surface
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Clinic Access Contributors

#![deny(unsafe_code)]

//! # Clinic Access
//!
//! Role-based access control for a multi-tenant clinic application. The
//! crate decides, for every navigation, whether the current principal may see
//! a route and where to send them otherwise.
//!
//! ## Architecture
//!
//! - **Session**: read-only handle onto the external session store
//! - **Permissions**: one immutable role/route table shared by every consumer
//! - **Guard**: per-navigation decision plus a watcher that re-evaluates on
//!   every session change
//! - **Auth**: login/logout adapter over a pluggable session provider, with a
//!   local in-memory provider for the bundled server
//! - **Tenant**: clinic/branch scoping of resource access
//! - **Routes**: axum router exposing the above over HTTP
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use clinic_access::guard::RouteGuard;
//! use clinic_access::permissions::RoutePolicyTable;
//! use clinic_access::models::SessionState;
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let guard = RouteGuard::new(Arc::new(RoutePolicyTable::standard()?));
//! let decision = guard.evaluate_path(&SessionState::unauthenticated(), "/patients");
//! assert_eq!(decision.redirect_to.as_deref(), Some("/login"));
//! # Ok(())
//! # }
//! ```

/// Login, logout and role checks over the external session provider
pub mod auth;

/// Configuration management
pub mod config;

/// Route guard state machine and session watcher
pub mod guard;

/// Production logging and structured output
pub mod logging;

/// HTTP middleware for request tracing and route guarding
pub mod middleware;

/// Role policy: dashboards per role and route declarations
pub mod permissions;

/// Shared server state for the HTTP surface
pub mod resources;

/// `HTTP` routes for auth, access checks, users and guarded pages
pub mod routes;

/// Cookie handling for session tokens
pub mod security;

/// Read-only session handles and the publisher side used by providers
pub mod session;

/// Multi-tenant data scoping for clinics and branches
pub mod tenant;

pub use clinic_core::{constants, errors, models};
