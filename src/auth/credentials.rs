// ABOUTME: Password hashing and verification for the local identity provider
// ABOUTME: bcrypt with a configurable cost; verification never panics on malformed hashes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Clinic Access Contributors

use clinic_core::errors::{AppError, AppResult};

/// Hash a password with bcrypt
///
/// # Errors
///
/// Returns an error if `cost` is outside bcrypt's supported range.
pub fn hash_password(password: &str, cost: u32) -> AppResult<String> {
    bcrypt::hash(password, cost)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))
}

/// Compare a password with a bcrypt hash
///
/// A malformed hash counts as a mismatch.
#[must_use]
pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or_else(|e| {
        tracing::warn!("Stored password hash could not be verified: {e}");
        false
    })
}
