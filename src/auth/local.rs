// ABOUTME: In-process identity service and session provider backed by bcrypt credentials
// ABOUTME: Users and issued session tokens live in DashMaps; sessions expire after a TTL
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Clinic Access Contributors

//! # Local Identity Provider
//!
//! [`LocalIdentityService`] plays the role of the external session service for
//! the bundled HTTP server and for tests: it stores users, checks credentials
//! and issues opaque session tokens. [`LocalSessionClient`] is the per-caller
//! [`SessionProvider`] over it, publishing session changes to a watch channel.

use super::credentials::{hash_password, verify_password};
use super::provider::{Credentials, ProviderError, SessionProvider};
use crate::session::{SessionHandle, SessionPublisher};
use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use clinic_core::errors::{AppError, AppResult, ErrorCode};
use clinic_core::models::{BranchId, ClinicId, Role, Session, SessionState};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Stored user, including the password hash
#[derive(Debug, Clone)]
pub struct UserRecord {
    /// User identifier
    pub id: Uuid,
    /// Login email, stored lowercase
    pub email: String,
    /// Display name
    pub name: Option<String>,
    /// Assigned role
    pub role: Role,
    /// bcrypt hash of the password
    pub password_hash: String,
    /// Inactive users cannot log in
    pub is_active: bool,
    /// Clinic the user belongs to
    pub clinic_id: Option<ClinicId>,
    /// Clinic display name
    pub clinic_name: Option<String>,
    /// Branch the user belongs to
    pub branch_id: Option<BranchId>,
    /// Branch display name
    pub branch_name: Option<String>,
    /// Registration time
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    /// Session principal for this user
    #[must_use]
    pub fn to_session(&self) -> Session {
        let mut session = Session::new(self.id, self.email.clone(), Some(self.role));
        session.name.clone_from(&self.name);
        session.clinic_id = self.clinic_id;
        session.clinic_name.clone_from(&self.clinic_name);
        session.branch_id = self.branch_id;
        session.branch_name.clone_from(&self.branch_name);
        session
    }

    /// Public view without the password hash
    #[must_use]
    pub fn sanitize(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            email: self.email.clone(),
            name: self.name.clone(),
            role: self.role,
            is_active: self.is_active,
            clinic_id: self.clinic_id,
            clinic_name: self.clinic_name.clone(),
            branch_id: self.branch_id,
            branch_name: self.branch_name.clone(),
            created_at: self.created_at,
        }
    }
}

/// User as exposed over the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    /// User identifier
    pub id: Uuid,
    /// Login email
    pub email: String,
    /// Display name
    pub name: Option<String>,
    /// Assigned role
    pub role: Role,
    /// Whether the user can log in
    pub is_active: bool,
    /// Clinic the user belongs to
    pub clinic_id: Option<ClinicId>,
    /// Clinic display name
    pub clinic_name: Option<String>,
    /// Branch the user belongs to
    pub branch_id: Option<BranchId>,
    /// Branch display name
    pub branch_name: Option<String>,
    /// Registration time
    pub created_at: DateTime<Utc>,
}

/// Registration request
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Login email
    pub email: String,
    /// Plain-text password
    pub password: String,
    /// Display name
    pub name: Option<String>,
    /// Assigned role
    pub role: Role,
    /// Clinic scope, with display name
    pub clinic: Option<(ClinicId, String)>,
    /// Branch scope, with display name
    pub branch: Option<(BranchId, String)>,
}

impl NewUser {
    /// Registration with no tenant scope
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>, role: Role) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            name: None,
            role,
            clinic: None,
            branch: None,
        }
    }

    /// Set the display name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Scope the user to a clinic
    #[must_use]
    pub fn in_clinic(mut self, clinic_id: ClinicId, name: impl Into<String>) -> Self {
        self.clinic = Some((clinic_id, name.into()));
        self
    }

    /// Scope the user to a branch
    #[must_use]
    pub fn in_branch(mut self, branch_id: BranchId, name: impl Into<String>) -> Self {
        self.branch = Some((branch_id, name.into()));
        self
    }
}

#[derive(Debug, Clone)]
struct IssuedSession {
    user_id: Uuid,
    expires_at: DateTime<Utc>,
}

/// Credential store and session token issuer
#[derive(Debug)]
pub struct LocalIdentityService {
    users: DashMap<String, UserRecord>,
    sessions: DashMap<String, IssuedSession>,
    session_ttl: Duration,
    bcrypt_cost: u32,
}

impl LocalIdentityService {
    /// Empty directory
    #[must_use]
    pub fn new(session_ttl: Duration, bcrypt_cost: u32) -> Self {
        Self {
            users: DashMap::new(),
            sessions: DashMap::new(),
            session_ttl,
            bcrypt_cost,
        }
    }

    fn key(email: &str) -> String {
        email.trim().to_lowercase()
    }

    /// Register a user
    ///
    /// # Errors
    ///
    /// Returns an error if the email is empty or taken, or hashing fails.
    pub fn register(&self, user: NewUser) -> AppResult<PublicUser> {
        let email = Self::key(&user.email);
        if email.is_empty() {
            return Err(AppError::new(
                ErrorCode::MissingRequiredField,
                "Email is required",
            ));
        }
        let (clinic_id, clinic_name) = user.clinic.unzip();
        let (branch_id, branch_name) = user.branch.unzip();
        let record = UserRecord {
            id: Uuid::new_v4(),
            email: email.clone(),
            name: user.name,
            role: user.role,
            password_hash: hash_password(&user.password, self.bcrypt_cost)?,
            is_active: true,
            clinic_id,
            clinic_name,
            branch_id,
            branch_name,
            created_at: Utc::now(),
        };
        let public = record.sanitize();
        match self.users.entry(email) {
            Entry::Occupied(existing) => {
                return Err(AppError::new(
                    ErrorCode::ResourceAlreadyExists,
                    format!("User {} already exists", existing.key()),
                ));
            }
            Entry::Vacant(slot) => {
                slot.insert(record);
            }
        }
        info!(user_id = %public.id, role = %public.role, "User registered");
        Ok(public)
    }

    /// Block a user from logging in; existing sessions stop resolving
    ///
    /// # Errors
    ///
    /// Returns an error if no user has that email.
    pub fn deactivate(&self, email: &str) -> AppResult<()> {
        let user_id = {
            let mut record = self
                .users
                .get_mut(&Self::key(email))
                .ok_or_else(|| AppError::not_found(format!("User {email}")))?;
            record.is_active = false;
            record.id
        };
        info!(user_id = %user_id, "User deactivated");
        Ok(())
    }

    /// Check credentials
    ///
    /// Missing fields, unknown email, inactive account and wrong password are
    /// indistinguishable to the caller.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::InvalidCredentials`] on any credential failure.
    pub async fn authorize(&self, credentials: &Credentials) -> Result<UserRecord, ProviderError> {
        if credentials.email.trim().is_empty() || credentials.password.is_empty() {
            return Err(ProviderError::InvalidCredentials);
        }
        let Some(record) = self
            .users
            .get(&Self::key(&credentials.email))
            .map(|r| r.value().clone())
        else {
            debug!("Login attempt for unknown email");
            return Err(ProviderError::InvalidCredentials);
        };
        if !record.is_active {
            debug!(user_id = %record.id, "Login attempt for inactive user");
            return Err(ProviderError::InvalidCredentials);
        }

        let password = credentials.password.clone();
        let hash = record.password_hash.clone();
        let matches = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
            .await
            .map_err(|e| ProviderError::Service(format!("Password check failed: {e}")))?;
        if matches {
            Ok(record)
        } else {
            debug!(user_id = %record.id, "Wrong password");
            Err(ProviderError::InvalidCredentials)
        }
    }

    /// Issue an opaque session token for `user_id`
    ///
    /// Expired tokens are purged first.
    #[must_use]
    pub fn issue(&self, user_id: Uuid) -> String {
        let now = Utc::now();
        self.purge_expired(now);

        let token = Uuid::new_v4().simple().to_string();
        let ttl = ChronoDuration::from_std(self.session_ttl).unwrap_or(ChronoDuration::MAX);
        let expires_at = now.checked_add_signed(ttl).unwrap_or(DateTime::<Utc>::MAX_UTC);
        self.sessions.insert(token.clone(), IssuedSession { user_id, expires_at });
        token
    }

    /// Session state for a token
    ///
    /// Unknown, expired and revoked tokens, and tokens of users that were
    /// deactivated since, resolve to unauthenticated.
    #[must_use]
    pub fn resolve(&self, token: &str) -> SessionState {
        let Some(issued) = self.sessions.get(token).map(|s| s.value().clone()) else {
            return SessionState::unauthenticated();
        };
        if issued.expires_at <= Utc::now() {
            self.sessions.remove(token);
            return SessionState::unauthenticated();
        }
        self.users
            .iter()
            .find(|u| u.id == issued.user_id && u.is_active)
            .map_or_else(SessionState::unauthenticated, |u| {
                SessionState::authenticated(u.to_session())
            })
    }

    fn purge_expired(&self, now: DateTime<Utc>) {
        let before = self.sessions.len();
        self.sessions.retain(|_, issued| issued.expires_at > now);
        let purged = before.saturating_sub(self.sessions.len());
        if purged > 0 {
            debug!(purged, "Purged expired session tokens");
        }
    }

    /// Number of tokens currently held, expired ones included until purged
    #[must_use]
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Invalidate a token; unknown tokens are ignored
    pub fn revoke(&self, token: &str) {
        if self.sessions.remove(token).is_some() {
            debug!("Session token revoked");
        }
    }

    /// All users, sanitized, ordered by email
    #[must_use]
    pub fn users(&self) -> Vec<PublicUser> {
        let mut users: Vec<PublicUser> = self.users.iter().map(|u| u.sanitize()).collect();
        users.sort_by(|a, b| a.email.cmp(&b.email));
        users
    }

    /// One user by id, sanitized
    #[must_use]
    pub fn user(&self, id: Uuid) -> Option<PublicUser> {
        self.users.iter().find(|u| u.id == id).map(|u| u.sanitize())
    }

    /// Session provider for one caller, optionally resuming a token
    #[must_use]
    pub fn client(self: &Arc<Self>, token: Option<String>) -> LocalSessionClient {
        let initial = token
            .as_deref()
            .map_or_else(SessionState::unauthenticated, |t| self.resolve(t));
        LocalSessionClient {
            service: Arc::clone(self),
            publisher: SessionPublisher::new(initial),
            token: Mutex::new(token),
        }
    }
}

/// Session provider over a [`LocalIdentityService`]
#[derive(Debug)]
pub struct LocalSessionClient {
    service: Arc<LocalIdentityService>,
    publisher: SessionPublisher,
    token: Mutex<Option<String>>,
}

impl LocalSessionClient {
    /// Token of the current session, if any
    pub async fn token(&self) -> Option<String> {
        self.token.lock().await.clone()
    }
}

#[async_trait]
impl SessionProvider for LocalSessionClient {
    async fn sign_in(&self, credentials: &Credentials) -> Result<(), ProviderError> {
        self.publisher.publish(SessionState::loading());
        let record = match self.service.authorize(credentials).await {
            Ok(record) => record,
            Err(error) => {
                self.publisher.publish(SessionState::unauthenticated());
                return Err(error);
            }
        };

        let token = self.service.issue(record.id);
        if let Some(previous) = self.token.lock().await.replace(token) {
            self.service.revoke(&previous);
        }
        self.publisher
            .publish(SessionState::authenticated(record.to_session()));
        Ok(())
    }

    async fn sign_out(&self) -> Result<(), ProviderError> {
        match self.token.lock().await.take() {
            Some(token) => self.service.revoke(&token),
            None => warn!("Sign-out without an active session"),
        }
        self.publisher.publish(SessionState::unauthenticated());
        Ok(())
    }

    fn session(&self) -> SessionHandle {
        self.publisher.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> Arc<LocalIdentityService> {
        let service = Arc::new(LocalIdentityService::new(Duration::from_secs(60), 4));
        service
            .register(NewUser::new("Doc@Example.com", "pw", Role::Doctor))
            .unwrap();
        service
    }

    #[tokio::test]
    async fn test_authorize_is_case_insensitive_on_email() {
        let record = service()
            .authorize(&Credentials::new("doc@example.com", "pw"))
            .await
            .unwrap();
        assert_eq!(record.role, Role::Doctor);
    }

    #[tokio::test]
    async fn test_all_credential_failures_look_alike() {
        let service = service();
        for (email, password) in [("", "pw"), ("doc@example.com", ""), ("nobody@x.com", "pw"), ("doc@example.com", "bad")] {
            let err = service
                .authorize(&Credentials::new(email, password))
                .await
                .unwrap_err();
            assert_eq!(err, ProviderError::InvalidCredentials);
        }
        service.deactivate("doc@example.com").unwrap();
        let err = service
            .authorize(&Credentials::new("doc@example.com", "pw"))
            .await
            .unwrap_err();
        assert_eq!(err, ProviderError::InvalidCredentials);
    }

    #[test]
    fn test_duplicate_registration_is_rejected() {
        let err = service()
            .register(NewUser::new("doc@example.com", "x", Role::Admin))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ResourceAlreadyExists);
    }

    #[tokio::test]
    async fn test_client_publishes_sign_in_and_out() {
        let client = service().client(None);
        let mut handle = client.session();
        assert!(handle.current().user().is_none());

        client
            .sign_in(&Credentials::new("doc@example.com", "pw"))
            .await
            .unwrap();
        assert_eq!(handle.current().user().unwrap().role(), Some(Role::Doctor));
        let token = client.token().await.unwrap();

        client.sign_out().await.unwrap();
        assert!(handle.current().user().is_none());
        assert!(client.token().await.is_none());
        assert!(client.service.resolve(&token).user().is_none());
    }

    #[test]
    fn test_expired_token_resolves_unauthenticated() {
        let service = LocalIdentityService::new(Duration::ZERO, 4);
        let user = service
            .register(NewUser::new("a@x.com", "pw", Role::Admin))
            .unwrap();
        let token = service.issue(user.id);
        assert!(service.resolve(&token).user().is_none());
    }

    #[tokio::test]
    async fn test_expired_tokens_are_purged_on_login() {
        let service = Arc::new(LocalIdentityService::new(Duration::ZERO, 4));
        service
            .register(NewUser::new("a@x.com", "pw", Role::Admin))
            .unwrap();
        for _ in 0..50 {
            service
                .client(None)
                .sign_in(&Credentials::new("a@x.com", "pw"))
                .await
                .unwrap();
        }
        // only the token issued by the last login is left
        assert_eq!(service.session_count(), 1);
    }

    #[test]
    fn test_live_tokens_survive_purge() {
        let service = service();
        let user = service.users()[0].clone();
        let first = service.issue(user.id);
        let second = service.issue(user.id);
        assert_eq!(service.session_count(), 2);
        assert!(service.resolve(&first).user().is_some());
        assert!(service.resolve(&second).user().is_some());
    }

    #[test]
    fn test_concurrent_registration_keeps_first_user() {
        let service = Arc::new(LocalIdentityService::new(Duration::from_secs(60), 4));
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let service = Arc::clone(&service);
                std::thread::spawn(move || {
                    service.register(NewUser::new("same@x.com", format!("pw{i}"), Role::Doctor))
                })
            })
            .collect();
        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        let winners: Vec<_> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
        assert_eq!(winners.len(), 1);
        assert_eq!(service.users().len(), 1);
        assert_eq!(service.users()[0].id, winners[0].id);
        assert!(results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(|e| e.code == ErrorCode::ResourceAlreadyExists));
    }

    #[test]
    fn test_sanitized_user_has_no_hash() {
        let json = serde_json::to_value(&service().users()[0]).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["email"], "doc@example.com");
    }
}
