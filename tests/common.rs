// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Scriptable session provider, recording notifier, sessions and server fixtures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Clinic Access Contributors
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used,
    clippy::expect_used
)]
//! Shared test utilities for `clinic_access`

use async_trait::async_trait;
use clinic_access::auth::{
    demo, AuthSessionAdapter, Credentials, Notification, Notifier, ProviderError, SessionProvider,
};
use clinic_access::config::ServerConfig;
use clinic_access::logging::LoggingConfig;
use clinic_access::models::{Role, Session, SessionState};
use clinic_access::permissions::RoutePolicyTable;
use clinic_access::resources::ServerResources;
use clinic_access::session::{SessionHandle, SessionPublisher};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;
use uuid::Uuid;

static INIT_LOGGER: Once = Once::new();

/// Password shared by the seeded demo users
pub const DEMO_PASSWORD: &str = "demo-password";

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        // Another test binary in the same process may have installed one already
        let _ = LoggingConfig::for_tests().init();
    });
}

/// Standard route policy table
pub fn standard_policy() -> Arc<RoutePolicyTable> {
    Arc::new(RoutePolicyTable::standard().unwrap())
}

/// Authenticated session with `role`
pub fn session_with_role(role: Role) -> Session {
    Session::new(
        Uuid::new_v4(),
        format!("{}@x.com", role.as_str()),
        Some(role),
    )
}

/// Authenticated state with `role`
pub fn signed_in(role: Role) -> SessionState {
    SessionState::authenticated(session_with_role(role))
}

/// What the stub provider does on sign-in
#[derive(Debug, Clone)]
pub enum SignInOutcome {
    /// Publish this session immediately
    Resolve(Session),
    /// Publish this session after a delay
    ResolveAfter(Session, Duration),
    /// Accept the credentials but never publish a user
    NeverResolve,
    /// Fail with this error
    Reject(ProviderError),
}

/// Scriptable session provider
pub struct StubProvider {
    publisher: Arc<SessionPublisher>,
    outcome: Mutex<SignInOutcome>,
    sign_out_error: Option<ProviderError>,
    sign_in_calls: AtomicUsize,
    sign_out_calls: AtomicUsize,
}

impl StubProvider {
    /// Provider starting from `initial`
    pub fn new(initial: SessionState, outcome: SignInOutcome) -> Self {
        Self {
            publisher: Arc::new(SessionPublisher::new(initial)),
            outcome: Mutex::new(outcome),
            sign_out_error: None,
            sign_in_calls: AtomicUsize::new(0),
            sign_out_calls: AtomicUsize::new(0),
        }
    }

    /// Make sign-out fail
    pub fn failing_sign_out(mut self, error: ProviderError) -> Self {
        self.sign_out_error = Some(error);
        self
    }

    /// Write side of the session store
    pub fn publisher(&self) -> Arc<SessionPublisher> {
        Arc::clone(&self.publisher)
    }

    pub fn sign_in_calls(&self) -> usize {
        self.sign_in_calls.load(Ordering::SeqCst)
    }

    pub fn sign_out_calls(&self) -> usize {
        self.sign_out_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionProvider for StubProvider {
    async fn sign_in(&self, _credentials: &Credentials) -> Result<(), ProviderError> {
        self.sign_in_calls.fetch_add(1, Ordering::SeqCst);
        let outcome = self.outcome.lock().unwrap().clone();
        match outcome {
            SignInOutcome::Resolve(session) => {
                self.publisher.publish(SessionState::authenticated(session));
                Ok(())
            }
            SignInOutcome::ResolveAfter(session, delay) => {
                let publisher = self.publisher();
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    publisher.publish(SessionState::authenticated(session));
                });
                Ok(())
            }
            SignInOutcome::NeverResolve => Ok(()),
            SignInOutcome::Reject(error) => Err(error),
        }
    }

    async fn sign_out(&self) -> Result<(), ProviderError> {
        self.sign_out_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = &self.sign_out_error {
            return Err(error.clone());
        }
        self.publisher.publish(SessionState::unauthenticated());
        Ok(())
    }

    fn session(&self) -> SessionHandle {
        self.publisher.subscribe()
    }
}

/// Notifier that keeps every notification
#[derive(Default)]
pub struct RecordingNotifier {
    notifications: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.notifications.lock().unwrap().push(notification);
    }
}

/// Adapter over `provider` with the standard policy and a short resolve timeout
pub fn adapter_for(
    provider: Arc<StubProvider>,
    notifier: Arc<RecordingNotifier>,
) -> AuthSessionAdapter {
    AuthSessionAdapter::new(provider, standard_policy(), notifier)
        .with_resolve_timeout(Duration::from_millis(200))
}

/// Test server configuration: cheap bcrypt, short resolve timeout
pub fn test_config() -> ServerConfig {
    let mut config = ServerConfig::default();
    config.auth.bcrypt_cost = 4;
    config.auth.session_resolve_timeout_ms = 200;
    config
}

/// Server resources with the demo clinic seeded
pub fn test_resources() -> (Arc<ServerResources>, demo::DemoTenant) {
    init_test_logging();
    let resources = ServerResources::new(test_config()).unwrap();
    let tenant = demo::seed(&resources.identity, DEMO_PASSWORD).unwrap();
    (Arc::new(resources), tenant)
}
