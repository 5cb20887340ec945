// ABOUTME: Authentication against the external session provider
// ABOUTME: Login/logout adapter, provider seam, notifications, credentials and local provider
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Clinic Access Contributors

//! # Authentication
//!
//! The [`AuthSessionAdapter`] is the only component that asks the session
//! provider to mutate the session. It normalizes provider failures into
//! [`AuthError`] and derives the post-login redirect from the shared role
//! policy.

mod adapter;
mod credentials;
/// Demo directory seeding for local development
pub mod demo;
mod local;
mod notify;
mod provider;

pub use adapter::{AuthResult, AuthSessionAdapter, LoginRedirect};
pub use credentials::{hash_password, verify_password};
pub use local::{LocalIdentityService, LocalSessionClient, NewUser, PublicUser, UserRecord};
pub use notify::{BroadcastNotifier, Notification, NotificationLevel, Notifier, TracingNotifier};
pub use provider::{Credentials, ProviderError, SessionProvider};

use clinic_core::constants::messages;
use clinic_core::errors::{AppError, ErrorCode};
use thiserror::Error;

/// Failures of the auth layer
///
/// `AuthenticationFailed` and `Provider` reach the user as notifications;
/// `SessionMissing` and `RoleNotPermitted` are resolved by redirecting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Bad credentials
    #[error("{}", messages::INVALID_CREDENTIALS)]
    AuthenticationFailed,
    /// Not logged in
    #[error("Authentication required")]
    SessionMissing,
    /// Logged in without a permitted role
    #[error("Role '{}' is not permitted", .0.as_deref().unwrap_or("none"))]
    RoleNotPermitted(Option<String>),
    /// Unexpected failure reported by the session service
    #[error("{0}")]
    Provider(String),
}

impl From<ProviderError> for AuthError {
    fn from(error: ProviderError) -> Self {
        match error {
            ProviderError::InvalidCredentials => Self::AuthenticationFailed,
            ProviderError::Service(message) if message.trim().is_empty() => {
                Self::Provider(messages::LOGIN_FAILED.to_owned())
            }
            ProviderError::Service(message) => Self::Provider(message),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(error: AuthError) -> Self {
        let code = match &error {
            AuthError::AuthenticationFailed => ErrorCode::AuthInvalid,
            AuthError::SessionMissing => ErrorCode::AuthRequired,
            AuthError::RoleNotPermitted(_) => ErrorCode::PermissionDenied,
            AuthError::Provider(_) => ErrorCode::ExternalServiceError,
        };
        Self::new(code, error.to_string())
    }
}
