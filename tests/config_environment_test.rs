// ABOUTME: Tests for environment-driven server configuration
// ABOUTME: Defaults, overrides, parse errors and validation of ServerConfig
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Clinic Access Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use clinic_access::config::{Environment, LogLevel, ServerConfig};
use clinic_access::logging::LoggingConfig;
use clinic_access::resources::ServerResources;
use serial_test::serial;
use std::env;

const VARS: [&str; 12] = [
    "HTTP_PORT",
    "HOST",
    "ENVIRONMENT",
    "LOGIN_ROUTE",
    "SESSION_TTL_HOURS",
    "SESSION_RESOLVE_TIMEOUT_MS",
    "BCRYPT_COST",
    "SECURE_COOKIES",
    "CORS_ORIGINS",
    "LOG_LEVEL",
    "REQUEST_ID_HEADER",
    "RUST_LOG",
];

fn clear_env() {
    for var in VARS {
        env::remove_var(var);
    }
}

#[test]
fn test_log_level_parsing() {
    assert_eq!(LogLevel::from_str_or_default("error"), LogLevel::Error);
    assert_eq!(LogLevel::from_str_or_default("WARN"), LogLevel::Warn);
    assert_eq!(LogLevel::from_str_or_default("Debug"), LogLevel::Debug);
    assert_eq!(LogLevel::from_str_or_default("trace"), LogLevel::Trace);
    assert_eq!(LogLevel::from_str_or_default("invalid"), LogLevel::Info);
    assert_eq!(LogLevel::Warn.to_string(), "warn");
}

#[test]
fn test_environment_parsing() {
    assert_eq!(Environment::from_str_or_default("PROD"), Environment::Production);
    assert_eq!(Environment::from_str_or_default("test"), Environment::Testing);
    assert_eq!(Environment::from_str_or_default("dev"), Environment::Development);
    assert_eq!(Environment::from_str_or_default("staging"), Environment::Development);
}

#[test]
#[serial]
fn test_defaults() {
    clear_env();
    let config = ServerConfig::from_env().unwrap();
    assert_eq!(config.http_port, 8080);
    assert_eq!(config.host, "127.0.0.1");
    assert_eq!(config.login_route, "/login");
    assert_eq!(config.auth.session_ttl_hours, 24);
    assert_eq!(config.auth.session_resolve_timeout_ms, 2_000);
    assert_eq!(config.auth.bcrypt_cost, 12);
    assert!(!config.auth.secure_cookies);
    assert_eq!(config.cors_origins, vec!["*"]);
    assert_eq!(config.log_level, LogLevel::Info);
    assert_eq!(config.request_id_header_name().as_str(), "x-request-id");
}

#[test]
#[serial]
fn test_overrides() {
    clear_env();
    env::set_var("HTTP_PORT", "9090");
    env::set_var("ENVIRONMENT", "production");
    env::set_var("LOGIN_ROUTE", "/signin");
    env::set_var("BCRYPT_COST", "10");
    env::set_var("CORS_ORIGINS", "https://clinic.example, https://admin.example");

    let config = ServerConfig::from_env().unwrap();
    assert_eq!(config.http_port, 9090);
    assert_eq!(config.environment, Environment::Production);
    assert!(config.auth.secure_cookies, "production defaults to secure cookies");
    assert_eq!(config.auth.bcrypt_cost, 10);
    assert_eq!(config.cors_origins.len(), 2);
    assert!(config.summary().contains("Login Route: /signin"));

    let resources = ServerResources::new(config).unwrap();
    assert_eq!(resources.policy.login_route(), "/signin");
    clear_env();
}

#[test]
#[serial]
fn test_unparseable_values_are_errors() {
    clear_env();
    env::set_var("HTTP_PORT", "eighty");
    assert!(ServerConfig::from_env().is_err());
    clear_env();

    env::set_var("SECURE_COOKIES", "maybe");
    assert!(ServerConfig::from_env().is_err());
    clear_env();
}

#[test]
#[serial]
fn test_invalid_values_fail_validation() {
    clear_env();
    env::set_var("LOGIN_ROUTE", "login");
    assert!(ServerConfig::from_env().is_err());
    clear_env();

    env::set_var("SESSION_TTL_HOURS", "0");
    assert!(ServerConfig::from_env().is_err());
    clear_env();
}

#[test]
#[serial]
fn test_log_level_drives_logging_config() {
    clear_env();
    env::set_var("LOG_LEVEL", "debug");
    env::set_var("ENVIRONMENT", "production");
    let config = ServerConfig::from_env().unwrap();
    assert_eq!(config.log_level, LogLevel::Debug);

    let logging = LoggingConfig::for_server(&config);
    assert_eq!(logging.level, "debug");
    assert_eq!(logging.environment, "production");
    assert!(logging.include_location);

    env::set_var("RUST_LOG", "clinic_access=trace");
    assert_eq!(LoggingConfig::for_server(&config).level, "clinic_access=trace");
    clear_env();
}

#[test]
#[serial]
fn test_request_id_header_override() {
    clear_env();
    env::set_var("REQUEST_ID_HEADER", "X-Correlation-Id");
    let config = ServerConfig::from_env().unwrap();
    assert_eq!(config.request_id_header_name().as_str(), "x-correlation-id");
    assert!(config.summary().contains("Request ID Header: X-Correlation-Id"));

    env::set_var("REQUEST_ID_HEADER", "not a header");
    assert!(ServerConfig::from_env().is_err());
    clear_env();
}
