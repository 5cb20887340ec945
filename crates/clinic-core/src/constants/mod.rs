// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Route paths, user-facing messages, cookie names and environment defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Clinic Access Contributors

//! Constants module
//!
//! Constants are grouped into logical domains rather than being in a single
//! large namespace.

/// Well-known route paths of the clinic application
pub mod routes {
    /// Login page, also the target of every safe-default deny
    pub const LOGIN: &str = "/login";
    /// Platform-wide dashboard for super administrators
    pub const SAAS_ADMIN: &str = "/saas-admin";
    /// Dashboard for clinic administrators
    pub const CLINIC_ADMIN: &str = "/clinic-admin";
    /// Dashboard for branch administrators
    pub const BRANCH_ADMIN: &str = "/branch-admin";
    /// Dashboard for application administrators
    pub const ADMIN_DASHBOARD: &str = "/admin-dashboard";
    /// Dashboard for doctors
    pub const DOCTOR_DASHBOARD: &str = "/doctor-dashboard";
    /// Patient list and patient records
    pub const PATIENTS: &str = "/patients";
    /// Investigation reports
    pub const REPORTS: &str = "/reports";
    /// Patient search
    pub const SEARCH: &str = "/search";
    /// Account settings
    pub const SETTINGS: &str = "/settings";
    /// User administration
    pub const USER_MANAGEMENT: &str = "/user-management";

    /// Query parameter carrying the originally requested path on login redirects
    pub const CALLBACK_URL_PARAM: &str = "callbackUrl";
}

/// Messages surfaced to end users
pub mod messages {
    /// Normalized message for any credential failure
    pub const INVALID_CREDENTIALS: &str = "Invalid email or password";
    /// Fallback when the provider fails without a message
    pub const LOGIN_FAILED: &str = "An error occurred during login";
    /// Toast title for a failed login
    pub const LOGIN_FAILED_TITLE: &str = "Login Failed";
    /// Toast title for a successful login
    pub const LOGIN_SUCCESS_TITLE: &str = "Login Successful";
    /// Toast body for a successful login
    pub const WELCOME_BACK: &str = "Welcome back!";
    /// Toast title for a successful logout
    pub const LOGOUT_SUCCESS_TITLE: &str = "Logout Successful";
    /// Toast body for a successful logout
    pub const LOGGED_OUT: &str = "You have been logged out";
}

/// Cookie and header names used by the HTTP surface
pub mod http_names {
    /// Session cookie issued on login
    pub const SESSION_COOKIE: &str = "clinic_session";
    /// Request correlation header
    pub const REQUEST_ID_HEADER: &str = "x-request-id";
}

/// Defaults for environment-driven configuration
pub mod defaults {
    /// Default HTTP port
    pub const HTTP_PORT: u16 = 8080;
    /// Default bind address
    pub const HOST: &str = "127.0.0.1";
    /// Default session lifetime in hours
    pub const SESSION_TTL_HOURS: u64 = 24;
    /// How long the auth adapter waits for the session to resolve after login
    pub const SESSION_RESOLVE_TIMEOUT_MS: u64 = 2_000;
    /// bcrypt cost used for new password hashes
    pub const BCRYPT_COST: u32 = 12;
    /// Service name reported in structured logs
    pub const SERVICE_NAME: &str = "clinic-access";
}
