// ABOUTME: Core types and constants for the Clinic Access platform
// ABOUTME: Foundation crate with roles, sessions, tenant identifiers, errors and route constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Clinic Access Contributors

#![deny(unsafe_code)]

//! # Clinic Core
//!
//! Foundation crate providing shared types and constants for role-based clinic
//! access. It is deliberately free of async and HTTP machinery (except the
//! optional `IntoResponse` impl) so the policy crate and any UI adapter can
//! depend on it cheaply.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode` and `AppResult`
//! - **constants**: Route paths, user-facing messages, cookie and header names
//! - **models**: `Role`, `Session`, `SessionState`, `ClinicId`, `BranchId`

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Core data models (roles, sessions, tenant identifiers)
pub mod models;
