// ABOUTME: Seam to the external session provider that owns the session store
// ABOUTME: sign-in and sign-out requests plus a read-only handle onto the store
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Clinic Access Contributors

use crate::session::SessionHandle;
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// Email/password pair submitted at login
#[derive(Clone)]
pub struct Credentials {
    /// Login email
    pub email: String,
    /// Plain-text password, never logged
    pub password: String,
}

impl Credentials {
    /// Bundle an email and password
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Failure reported by a session provider
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// Credentials were rejected
    #[error("invalid credentials")]
    InvalidCredentials,
    /// Any other failure, with the provider's message
    #[error("{0}")]
    Service(String),
}

/// External session/auth service
///
/// Timeouts and retries of the underlying transport belong to the
/// implementation.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Verify credentials and establish a session
    ///
    /// The session store may be updated after this returns.
    async fn sign_in(&self, credentials: &Credentials) -> Result<(), ProviderError>;

    /// Destroy the current session
    async fn sign_out(&self) -> Result<(), ProviderError>;

    /// Read-only handle onto the session store
    fn session(&self) -> SessionHandle;
}
