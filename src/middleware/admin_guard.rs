// ABOUTME: Role authorization guard for handlers outside the page route table
// ABOUTME: Returns 401 without a session and 403 when the role is not in the required set
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Clinic Access Contributors

//! Role Authorization Guard
//!
//! API handlers that are not declared in the route policy table check roles
//! with [`require_roles`] instead of inlining the comparison.
//!
//! ```rust,no_run
//! use clinic_access::middleware::admin_guard::require_roles;
//! use clinic_access::models::{Role, Session};
//! use clinic_access::errors::AppError;
//!
//! fn list_users(session: Option<&Session>) -> Result<String, AppError> {
//!     let admin = require_roles(session, &[Role::Admin, Role::SuperAdmin].into())?;
//!     Ok(format!("Hello {}", admin.email))
//! }
//! ```

use crate::auth::AuthError;
use crate::permissions::{is_allowed, RoleSet};
use clinic_core::errors::AppError;
use clinic_core::models::Session;
use tracing::debug;

/// Require a session whose role is in `roles`
///
/// # Errors
///
/// Returns an auth-required error without a session and a permission-denied
/// error when the role is absent, unknown or not in `roles`.
pub fn require_roles<'a>(session: Option<&'a Session>, roles: &RoleSet) -> Result<&'a Session, AppError> {
    let session = session.ok_or_else(|| AppError::from(AuthError::SessionMissing))?;
    if is_allowed(session.raw_role(), roles) {
        return Ok(session);
    }
    debug!(
        user_id = %session.user_id,
        role = session.raw_role().unwrap_or("<none>"),
        required = %roles,
        "Role check failed"
    );
    Err(AuthError::RoleNotPermitted(session.role.clone()).into())
}
