// ABOUTME: HTTP middleware for request tracing, CORS and route guarding
// ABOUTME: Request ID propagation, per-request spans and guard-driven redirects
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Clinic Access Contributors

/// Role checks for handlers that need a specific role set
pub mod admin_guard;
/// CORS configuration
pub mod cors;
/// Route guard middleware for policy-protected pages
pub mod route_guard;
/// Request ID and tracing layers
pub mod tracing;

pub use admin_guard::require_roles;
pub use cors::setup_cors;
pub use route_guard::route_guard_middleware;
pub use tracing::{make_request_span, with_request_tracing};
