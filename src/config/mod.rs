// ABOUTME: Configuration module for the clinic access server
// ABOUTME: Environment-driven server, auth and logging settings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Clinic Access Contributors

//! Configuration management
//!
//! All settings come from environment variables; the server binary layers
//! command-line overrides on top.

/// Environment variable parsing and typed configuration
pub mod environment;

pub use environment::{AuthConfig, Environment, LogLevel, ServerConfig};
