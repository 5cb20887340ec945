// ABOUTME: Read-only handles onto the externally owned session store
// ABOUTME: Watch-channel publisher for providers and handles injected into guards and adapters
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Clinic Access Contributors

//! # Session Handles
//!
//! The session store belongs to the session provider. Everything else in the
//! crate receives a [`SessionHandle`] through its constructor and only ever
//! reads snapshots from it. Providers keep the matching [`SessionPublisher`]
//! and replace the state whenever a round-trip completes.

use clinic_core::models::{Session, SessionState};
use std::time::Duration;
use tokio::sync::watch;

/// Create a publisher/handle pair seeded with `initial`
#[must_use]
pub fn channel(initial: SessionState) -> (SessionPublisher, SessionHandle) {
    let (tx, rx) = watch::channel(initial);
    (SessionPublisher { tx }, SessionHandle { rx })
}

/// Write side of the session store, owned by a session provider
#[derive(Debug)]
pub struct SessionPublisher {
    tx: watch::Sender<SessionState>,
}

impl SessionPublisher {
    /// Create a publisher with the given initial state
    #[must_use]
    pub fn new(initial: SessionState) -> Self {
        channel(initial).0
    }

    /// Replace the current state and wake every handle
    pub fn publish(&self, state: SessionState) {
        // send_replace stores the value even when no handle is subscribed
        self.tx.send_replace(state);
    }

    /// New read-only handle onto this store
    #[must_use]
    pub fn subscribe(&self) -> SessionHandle {
        SessionHandle {
            rx: self.tx.subscribe(),
        }
    }

    /// Snapshot of the current state
    #[must_use]
    pub fn current(&self) -> SessionState {
        self.tx.borrow().clone()
    }
}

/// Read-only view of the session store
#[derive(Debug, Clone)]
pub struct SessionHandle {
    rx: watch::Receiver<SessionState>,
}

impl SessionHandle {
    /// Handle onto a store that never changes, for tests and one-shot checks
    #[must_use]
    pub fn fixed(state: SessionState) -> Self {
        let (tx, rx) = watch::channel(state);
        // Dropping the sender closes the channel; borrow() keeps returning the last value
        drop(tx);
        Self { rx }
    }

    /// Snapshot of the current state, marking it as seen
    #[must_use]
    pub fn current(&mut self) -> SessionState {
        self.rx.borrow_and_update().clone()
    }

    /// Snapshot of the current state without marking it as seen
    #[must_use]
    pub fn peek(&self) -> SessionState {
        self.rx.borrow().clone()
    }

    /// Wait for the next state change
    ///
    /// Returns `None` once the provider has dropped its publisher.
    pub async fn changed(&mut self) -> Option<SessionState> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    /// Mark the current state as seen without reading it
    pub fn mark_seen(&mut self) {
        drop(self.rx.borrow_and_update());
    }

    /// Wait for a state published after the last seen one that carries a user
    ///
    /// A user already in the store when the handle last looked does not count.
    /// Returns `None` when the timeout elapses or the provider goes away first.
    pub async fn wait_for_next_user(&mut self, timeout: Duration) -> Option<Session> {
        let next_user = async {
            loop {
                self.rx.changed().await.ok()?;
                let user = self.rx.borrow_and_update().user().cloned();
                if user.is_some() {
                    return user;
                }
            }
        };
        tokio::time::timeout(timeout, next_user).await.ok().flatten()
    }
}
