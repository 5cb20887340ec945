// ABOUTME: Principal roles recognized by the clinic application
// ABOUTME: Case-insensitive parsing with explicit failure for unknown role strings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Clinic Access Contributors

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Named principal category determining dashboard and route access
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Clinician working inside a branch
    Doctor,
    /// Application administrator
    Admin,
    /// Administrator of a single clinic (tenant)
    ClinicAdmin,
    /// Administrator of a single branch of a clinic
    BranchAdmin,
    /// Platform-wide administrator across all clinics
    SuperAdmin,
}

/// Returned when a role string does not name a known role
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown role '{0}'")]
pub struct UnknownRole(pub String);

impl Role {
    /// Every role, in privilege-agnostic declaration order
    pub const ALL: [Self; 5] = [
        Self::Doctor,
        Self::Admin,
        Self::ClinicAdmin,
        Self::BranchAdmin,
        Self::SuperAdmin,
    ];

    /// Canonical lowercase identifier as stored by the session provider
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Doctor => "doctor",
            Self::Admin => "admin",
            Self::ClinicAdmin => "clinicadmin",
            Self::BranchAdmin => "branchadmin",
            Self::SuperAdmin => "superadmin",
        }
    }

    /// Parse a role identifier, ignoring ASCII case
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(value))
    }

    /// Whether this role administers some tenant scope
    #[must_use]
    pub const fn is_tenant_admin(self) -> bool {
        matches!(self, Self::ClinicAdmin | Self::BranchAdmin | Self::SuperAdmin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| UnknownRole(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(Role::parse("Doctor"), Some(Role::Doctor));
        assert_eq!(Role::parse("SUPERADMIN"), Some(Role::SuperAdmin));
        assert_eq!(Role::parse("clinicAdmin"), Some(Role::ClinicAdmin));
    }

    #[test]
    fn test_padded_role_is_rejected() {
        assert_eq!(Role::parse(" doctor "), None);
        assert_eq!(Role::parse("doctor\n"), None);
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        assert_eq!(Role::parse("clerk"), None);
        assert_eq!(Role::parse(""), None);
        assert_eq!(
            "nurse".parse::<Role>(),
            Err(UnknownRole("nurse".to_owned()))
        );
    }

    #[test]
    fn test_serde_uses_provider_identifiers() {
        let json = serde_json::to_string(&Role::BranchAdmin).unwrap();
        assert_eq!(json, "\"branchadmin\"");
        let role: Role = serde_json::from_str("\"superadmin\"").unwrap();
        assert_eq!(role, Role::SuperAdmin);
    }
}
