// ABOUTME: Tenant scoping of data access by role, clinic and branch
// ABOUTME: Builds per-session scope filters and answers per-resource access checks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Clinic Access Contributors

//! # Tenant Scoping
//!
//! Route policy decides which pages a role may open; tenant scoping decides
//! which records those pages may show.
//!
//! | Role          | Users              | Patients                       |
//! |---------------|--------------------|--------------------------------|
//! | `superadmin`  | all                | all                            |
//! | `clinicadmin` | own clinic         | branches of own clinic         |
//! | `branchadmin` | own branch         | own branch                     |
//! | anything else | self               | own patients, in own branch    |

use clinic_core::errors::{AppError, AppResult, ErrorCode};
use clinic_core::models::{BranchId, ClinicId, Role, Session};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which record kinds a filter is built for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScopeOptions {
    /// Scope user records
    pub users: bool,
    /// Scope patient records
    pub patients: bool,
}

impl ScopeOptions {
    /// Scope user records only
    #[must_use]
    pub const fn users() -> Self {
        Self {
            users: true,
            patients: false,
        }
    }

    /// Scope patient records only
    #[must_use]
    pub const fn patients() -> Self {
        Self {
            users: false,
            patients: true,
        }
    }
}

/// Tenant identifiers of one record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopedResource {
    /// Record id, for user records
    pub id: Option<Uuid>,
    /// Owning user, for patient records
    pub owner_id: Option<Uuid>,
    /// Clinic the record belongs to
    pub clinic_id: Option<ClinicId>,
    /// Branch the record belongs to
    pub branch_id: Option<BranchId>,
    /// Clinic of the record's branch
    pub branch_clinic_id: Option<ClinicId>,
}

/// Equality constraints a record must satisfy to be visible
///
/// Every populated field must match; an empty filter matches everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeFilter {
    /// Record id must equal
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    /// Owning user must equal
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<Uuid>,
    /// Clinic must equal
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clinic_id: Option<ClinicId>,
    /// Branch must equal
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_id: Option<BranchId>,
    /// Clinic of the branch must equal
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_clinic_id: Option<ClinicId>,
}

impl ScopeFilter {
    /// Filter for the records `session` may see
    ///
    /// A tenant admin without a tenant id gets no constraints from it.
    /// Roles other than the tenant admins are scoped like doctors.
    ///
    /// # Errors
    ///
    /// Returns an auth-required error when there is no session.
    pub fn for_session(session: Option<&Session>, options: ScopeOptions) -> AppResult<Self> {
        let session = session.ok_or_else(|| {
            AppError::new(
                ErrorCode::AuthRequired,
                "User session is required for tenant scoping",
            )
        })?;
        let mut filter = Self::default();

        match session.role() {
            Some(Role::SuperAdmin) => {}
            Some(Role::ClinicAdmin) => {
                if let Some(clinic_id) = session.clinic_id {
                    if options.users {
                        filter.clinic_id = Some(clinic_id);
                    }
                    if options.patients {
                        filter.branch_clinic_id = Some(clinic_id);
                    }
                }
            }
            Some(Role::BranchAdmin) => {
                if session.branch_id.is_some() && (options.users || options.patients) {
                    filter.branch_id = session.branch_id;
                }
            }
            Some(Role::Doctor | Role::Admin) | None => {
                if options.users {
                    filter.id = Some(session.user_id);
                }
                if options.patients {
                    filter.owner_id = Some(session.user_id);
                    filter.branch_id = session.branch_id;
                }
            }
        }
        Ok(filter)
    }

    /// Whether the filter has no constraints
    #[must_use]
    pub const fn is_unscoped(&self) -> bool {
        self.id.is_none()
            && self.owner_id.is_none()
            && self.clinic_id.is_none()
            && self.branch_id.is_none()
            && self.branch_clinic_id.is_none()
    }

    /// Whether `resource` satisfies every constraint
    #[must_use]
    pub fn matches(&self, resource: &ScopedResource) -> bool {
        fn check<T: PartialEq>(wanted: Option<T>, actual: Option<T>) -> bool {
            wanted.is_none() || actual == wanted
        }
        check(self.id, resource.id)
            && check(self.owner_id, resource.owner_id)
            && check(self.clinic_id, resource.clinic_id)
            && check(self.branch_id, resource.branch_id)
            && check(self.branch_clinic_id, resource.branch_clinic_id)
    }

    /// Keep the items whose tenant identifiers match
    pub fn retain<T>(&self, items: Vec<T>, scope_of: impl Fn(&T) -> ScopedResource) -> Vec<T> {
        if self.is_unscoped() {
            return items;
        }
        items
            .into_iter()
            .filter(|item| self.matches(&scope_of(item)))
            .collect()
    }
}

/// Whether `session` may access one specific resource
///
/// Default deny: anything not granted by a rule below is refused.
#[must_use]
pub fn has_access_to_resource(session: Option<&Session>, resource: Option<&ScopedResource>) -> bool {
    let (Some(session), Some(resource)) = (session, resource) else {
        return false;
    };
    let role = session.role();

    if role == Some(Role::SuperAdmin) {
        return true;
    }

    if let Some(branch_id) = resource.branch_id {
        match role {
            Some(Role::BranchAdmin | Role::Doctor) => {
                return session.branch_id == Some(branch_id);
            }
            Some(Role::ClinicAdmin) => {
                if let Some(clinic_id) = resource.branch_clinic_id {
                    return session.clinic_id == Some(clinic_id);
                }
            }
            _ => {}
        }
    }

    if let Some(clinic_id) = resource.clinic_id {
        if role == Some(Role::ClinicAdmin) {
            return session.clinic_id == Some(clinic_id);
        }
    }

    if role == Some(Role::Doctor) {
        if let Some(owner_id) = resource.owner_id {
            return owner_id == session.user_id;
        }
    }

    false
}
