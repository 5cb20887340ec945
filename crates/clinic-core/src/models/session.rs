// ABOUTME: Read-only session view handed out by the external session provider
// ABOUTME: Session principal plus the loading/authenticated/unauthenticated status flag
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Clinic Access Contributors

use super::role::Role;
use super::tenant::{BranchId, ClinicId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Authenticated principal for the current user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// User identifier
    pub user_id: Uuid,
    /// Login email
    pub email: String,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// Role exactly as supplied by the provider; `None` while unresolved
    #[serde(default)]
    pub role: Option<String>,
    /// Clinic the user belongs to
    #[serde(default)]
    pub clinic_id: Option<ClinicId>,
    /// Branch the user belongs to
    #[serde(default)]
    pub branch_id: Option<BranchId>,
    /// Clinic display name, used for branding
    #[serde(default)]
    pub clinic_name: Option<String>,
    /// Branch display name
    #[serde(default)]
    pub branch_name: Option<String>,
}

impl Session {
    /// Minimal session with a user and a role
    #[must_use]
    pub fn new(user_id: Uuid, email: impl Into<String>, role: Option<Role>) -> Self {
        Self {
            user_id,
            email: email.into(),
            name: None,
            role: role.map(|r| r.as_str().to_owned()),
            clinic_id: None,
            branch_id: None,
            clinic_name: None,
            branch_name: None,
        }
    }

    /// Attach a clinic scope
    #[must_use]
    pub const fn with_clinic(mut self, clinic_id: ClinicId) -> Self {
        self.clinic_id = Some(clinic_id);
        self
    }

    /// Attach a branch scope
    #[must_use]
    pub const fn with_branch(mut self, branch_id: BranchId) -> Self {
        self.branch_id = Some(branch_id);
        self
    }

    /// Override the raw role string, including values no `Role` recognizes
    #[must_use]
    pub fn with_raw_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Parsed role; `None` when absent or unrecognized
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.role.as_deref().and_then(Role::parse)
    }

    /// Raw role string as supplied by the provider
    #[must_use]
    pub fn raw_role(&self) -> Option<&str> {
        self.role.as_deref()
    }
}

/// Resolution status of the session store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// Round-trip to the session provider still in flight
    Loading,
    /// A principal is present
    Authenticated,
    /// Resolved with no principal
    Unauthenticated,
}

/// Snapshot of the session store at one point in time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    /// Resolution status
    pub status: SessionStatus,
    /// Principal, present only when authenticated
    #[serde(rename = "user")]
    pub session: Option<Session>,
}

impl SessionState {
    /// Session still resolving
    #[must_use]
    pub const fn loading() -> Self {
        Self {
            status: SessionStatus::Loading,
            session: None,
        }
    }

    /// Resolved without a user
    #[must_use]
    pub const fn unauthenticated() -> Self {
        Self {
            status: SessionStatus::Unauthenticated,
            session: None,
        }
    }

    /// Resolved with a user
    #[must_use]
    pub const fn authenticated(session: Session) -> Self {
        Self {
            status: SessionStatus::Authenticated,
            session: Some(session),
        }
    }

    /// Whether the provider has not answered yet
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self.status, SessionStatus::Loading)
    }

    /// The principal, if the state is resolved and carries one
    #[must_use]
    pub const fn user(&self) -> Option<&Session> {
        match self.status {
            SessionStatus::Authenticated => self.session.as_ref(),
            SessionStatus::Loading | SessionStatus::Unauthenticated => None,
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::loading()
    }
}
