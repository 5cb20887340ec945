// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Parses environment variables into typed server and auth configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Clinic Access Contributors

//! Environment-based configuration

use anyhow::{Context, Result};
use clinic_core::constants::{defaults, http_names, routes};
use http::header::HeaderName;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

/// Strongly typed log level configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Errors only
    Error,
    /// Warnings and errors
    Warn,
    /// Informational messages
    #[default]
    Info,
    /// Debug output
    Debug,
    /// Everything
    Trace,
}

impl LogLevel {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "error" => Self::Error,
            "warn" => Self::Warn,
            "debug" => Self::Debug,
            "trace" => Self::Trace,
            _ => Self::Info,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warn => write!(f, "warn"),
            Self::Info => write!(f, "info"),
            Self::Debug => write!(f, "debug"),
            Self::Trace => write!(f, "trace"),
        }
    }
}

/// Deployment environment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Production deployment
    Production,
    /// Automated tests
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Session and credential settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Lifetime of issued sessions
    pub session_ttl_hours: u64,
    /// How long login waits for the session role to resolve
    pub session_resolve_timeout_ms: u64,
    /// bcrypt cost for new password hashes
    pub bcrypt_cost: u32,
    /// Mark the session cookie `Secure`
    pub secure_cookies: bool,
}

impl AuthConfig {
    /// Session lifetime as a duration
    #[must_use]
    pub const fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_hours * 3600)
    }

    /// Session resolve timeout as a duration
    #[must_use]
    pub const fn session_resolve_timeout(&self) -> Duration {
        Duration::from_millis(self.session_resolve_timeout_ms)
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_ttl_hours: defaults::SESSION_TTL_HOURS,
            session_resolve_timeout_ms: defaults::SESSION_RESOLVE_TIMEOUT_MS,
            bcrypt_cost: defaults::BCRYPT_COST,
            secure_cookies: false,
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP listen port
    pub http_port: u16,
    /// Bind address
    pub host: String,
    /// Deployment environment
    pub environment: Environment,
    /// Log level used when `RUST_LOG` is unset
    pub log_level: LogLevel,
    /// Header carrying the per-request correlation ID
    pub request_id_header: String,
    /// Login page every unauthenticated redirect targets
    pub login_route: String,
    /// Allowed CORS origins; `*` allows any
    pub cors_origins: Vec<String>,
    /// Session and credential settings
    pub auth: AuthConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: defaults::HTTP_PORT,
            host: defaults::HOST.to_owned(),
            environment: Environment::default(),
            log_level: LogLevel::default(),
            request_id_header: http_names::REQUEST_ID_HEADER.to_owned(),
            login_route: routes::LOGIN.to_owned(),
            cors_origins: vec!["*".to_owned()],
            auth: AuthConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but cannot be parsed, or the
    /// resulting configuration is invalid
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let environment = Environment::from_str_or_default(&env_var_or("ENVIRONMENT", "development"));
        let config = Self {
            http_port: parse_env("HTTP_PORT", defaults::HTTP_PORT)?,
            host: env_var_or("HOST", defaults::HOST),
            environment,
            log_level: LogLevel::from_str_or_default(&env_var_or("LOG_LEVEL", "info")),
            request_id_header: env_var_or("REQUEST_ID_HEADER", http_names::REQUEST_ID_HEADER),
            login_route: env_var_or("LOGIN_ROUTE", routes::LOGIN),
            cors_origins: parse_origins(&env_var_or("CORS_ORIGINS", "*")),
            auth: AuthConfig {
                session_ttl_hours: parse_env("SESSION_TTL_HOURS", defaults::SESSION_TTL_HOURS)?,
                session_resolve_timeout_ms: parse_env(
                    "SESSION_RESOLVE_TIMEOUT_MS",
                    defaults::SESSION_RESOLVE_TIMEOUT_MS,
                )?,
                bcrypt_cost: parse_env("BCRYPT_COST", defaults::BCRYPT_COST)?,
                secure_cookies: parse_env("SECURE_COOKIES", environment.is_production())?,
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error for settings the server cannot run with
    pub fn validate(&self) -> Result<()> {
        if !self.login_route.starts_with('/') {
            return Err(anyhow::anyhow!(
                "LOGIN_ROUTE must be an absolute path, got '{}'",
                self.login_route
            ));
        }
        if HeaderName::try_from(self.request_id_header.as_str()).is_err() {
            return Err(anyhow::anyhow!(
                "REQUEST_ID_HEADER must be a valid header name, got '{}'",
                self.request_id_header
            ));
        }
        if !(4..=31).contains(&self.auth.bcrypt_cost) {
            return Err(anyhow::anyhow!(
                "BCRYPT_COST must be between 4 and 31, got {}",
                self.auth.bcrypt_cost
            ));
        }
        if self.auth.session_ttl_hours == 0 {
            return Err(anyhow::anyhow!("SESSION_TTL_HOURS must be positive"));
        }
        if self.environment.is_production() && !self.auth.secure_cookies {
            warn!("Production environment without SECURE_COOKIES; session cookie sent over plain HTTP");
        }
        Ok(())
    }

    /// Request ID header, falling back to `x-request-id` when unparseable
    #[must_use]
    pub fn request_id_header_name(&self) -> HeaderName {
        HeaderName::try_from(self.request_id_header.as_str())
            .unwrap_or_else(|_| HeaderName::from_static(http_names::REQUEST_ID_HEADER))
    }

    /// Get a summary of the configuration for logging
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Clinic Access Configuration:\n\
             - Listen: {}:{}\n\
             - Environment: {}\n\
             - Log Level: {}\n\
             - Request ID Header: {}\n\
             - Login Route: {}\n\
             - Session TTL: {}h\n\
             - Session Resolve Timeout: {}ms\n\
             - Secure Cookies: {}",
            self.host,
            self.http_port,
            self.environment,
            self.log_level,
            self.request_id_header,
            self.login_route,
            self.auth.session_ttl_hours,
            self.auth.session_resolve_timeout_ms,
            if self.auth.secure_cookies {
                "Enabled"
            } else {
                "Disabled"
            },
        )
    }
}

/// Get environment variable or default value
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Parse an environment variable, using `default` when unset
fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .with_context(|| format!("Invalid value for {key}: '{value}'")),
        Err(_) => Ok(default),
    }
}

/// Parse comma-separated CORS origins
fn parse_origins(origins_str: &str) -> Vec<String> {
    if origins_str == "*" {
        vec!["*".to_owned()]
    } else {
        origins_str
            .split(',')
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .collect()
    }
}
