// ABOUTME: Seeds the local identity directory with one clinic, two branches and a user per role
// ABOUTME: Used by the server's --seed-demo-users flag and by integration tests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Clinic Access Contributors

use super::local::{LocalIdentityService, NewUser, PublicUser};
use clinic_core::errors::AppResult;
use clinic_core::models::{BranchId, ClinicId, Role};
use tracing::info;

/// Environment variable holding the shared demo password
pub const DEMO_PASSWORD_ENV: &str = "DEMO_USER_PASSWORD";

/// Name of the seeded clinic
pub const DEMO_CLINIC_NAME: &str = "Main Healthcare Center";
/// Branch holding the seeded branch admin and doctor
pub const DEMO_BRANCH_NAME: &str = "Downtown Branch";
/// Second branch of the seeded clinic, with no users
pub const DEMO_OTHER_BRANCH_NAME: &str = "Uptown Branch";

/// Identifiers of the seeded tenant
#[derive(Debug, Clone)]
pub struct DemoTenant {
    /// Seeded clinic
    pub clinic_id: ClinicId,
    /// Branch with users
    pub branch_id: BranchId,
    /// Branch without users
    pub other_branch_id: BranchId,
    /// Seeded users, one per role
    pub users: Vec<PublicUser>,
}

/// Register one user per role, all sharing `password`
///
/// # Errors
///
/// Returns an error if any of the demo emails is already registered.
pub fn seed(service: &LocalIdentityService, password: &str) -> AppResult<DemoTenant> {
    let clinic_id = ClinicId::new();
    let branch_id = BranchId::new();
    let other_branch_id = BranchId::new();

    let users = [
        NewUser::new("superadmin@healthcare.com", password, Role::SuperAdmin)
            .with_name("Super Administrator"),
        NewUser::new("admin@healthcare.com", password, Role::Admin).with_name("Administrator"),
        NewUser::new("clinicadmin@healthcare.com", password, Role::ClinicAdmin)
            .with_name("Clinic Administrator")
            .in_clinic(clinic_id, DEMO_CLINIC_NAME),
        NewUser::new("branchadmin@healthcare.com", password, Role::BranchAdmin)
            .with_name("Branch Administrator")
            .in_clinic(clinic_id, DEMO_CLINIC_NAME)
            .in_branch(branch_id, DEMO_BRANCH_NAME),
        NewUser::new("doctor@healthcare.com", password, Role::Doctor)
            .with_name("Dr. John Smith")
            .in_clinic(clinic_id, DEMO_CLINIC_NAME)
            .in_branch(branch_id, DEMO_BRANCH_NAME),
    ]
    .into_iter()
    .map(|user| service.register(user))
    .collect::<AppResult<Vec<_>>>()?;

    info!(
        clinic_id = %clinic_id,
        users = users.len(),
        "Seeded demo clinic '{DEMO_CLINIC_NAME}'"
    );
    Ok(DemoTenant {
        clinic_id,
        branch_id,
        other_branch_id,
        users,
    })
}
