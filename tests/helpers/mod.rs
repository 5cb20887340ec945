// ABOUTME: Shared test helpers for HTTP integration tests
// ABOUTME: Exports the axum oneshot request/response wrappers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Clinic Access Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

pub mod axum_test;
