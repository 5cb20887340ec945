// ABOUTME: Core data models for clinic access control
// ABOUTME: Re-exports Role, Session, SessionState and tenant identifier types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Clinic Access Contributors

//! # Data Models
//!
//! The session shape mirrors what the external session provider hands out:
//! a principal with a raw role string and optional clinic/branch scope. Role
//! strings are kept raw on the session and parsed on demand so that an
//! unrecognized role survives deserialization and can be denied explicitly.

mod role;
mod session;
mod tenant;

pub use role::{Role, UnknownRole};
pub use session::{Session, SessionState, SessionStatus};
pub use tenant::{BranchId, ClinicId};
