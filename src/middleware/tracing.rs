// ABOUTME: Request tracing middleware for correlation and structured logging
// ABOUTME: Assigns x-request-id, propagates it to responses and opens one span per request
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Clinic Access Contributors

use axum::body::Body;
use axum::Router;
use http::header::HeaderName;
use http::Request;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::Span;

/// Span for one HTTP request, tagged with the ID found under `header`
#[must_use]
pub fn make_request_span(request: &Request<Body>, header: &HeaderName) -> Span {
    let request_id = request
        .headers()
        .get(header)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");
    tracing::info_span!(
        "http_request",
        method = %request.method(),
        path = %request.uri().path(),
        request_id = %request_id,
        user_id = tracing::field::Empty,
    )
}

/// Wrap `router` with request ID assignment, propagation and tracing
///
/// Incoming request IDs under `header` are kept; missing ones get a UUID.
#[must_use]
pub fn with_request_tracing(router: Router, header: HeaderName) -> Router {
    let span_header = header.clone();
    router
        .layer(PropagateRequestIdLayer::new(header.clone()))
        .layer(TraceLayer::new_for_http().make_span_with(move |request: &Request<Body>| {
            make_request_span(request, &span_header)
        }))
        .layer(SetRequestIdLayer::new(header, MakeRequestUuid))
}
