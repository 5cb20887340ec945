// ABOUTME: Security utilities for the HTTP surface
// ABOUTME: Session cookie construction and parsing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Clinic Access Contributors

/// Session cookie helpers
pub mod cookies;
