// ABOUTME: Transient toast-style notifications emitted by the auth adapter
// ABOUTME: Notifier trait with tracing-backed and broadcast-channel implementations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Clinic Access Contributors

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{info, warn};

/// Severity of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    /// Operation succeeded
    Success,
    /// Neutral information
    Info,
    /// Operation failed
    Error,
}

/// Short-lived message for the UI layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Severity
    pub level: NotificationLevel,
    /// Title line
    pub title: String,
    /// Body text
    pub description: String,
    /// How long the UI should show it
    pub duration_ms: u64,
}

impl Notification {
    /// Success toast, shown for three seconds
    #[must_use]
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            title: title.into(),
            description: description.into(),
            duration_ms: 3_000,
        }
    }

    /// Error toast, shown for five seconds
    #[must_use]
    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            title: title.into(),
            description: description.into(),
            duration_ms: 5_000,
        }
    }
}

/// Sink for notifications; must never block
pub trait Notifier: Send + Sync {
    /// Deliver a notification
    fn notify(&self, notification: Notification);
}

/// Writes notifications to the log, for headless deployments
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Error => warn!(
                title = %notification.title,
                "{}", notification.description
            ),
            NotificationLevel::Success | NotificationLevel::Info => info!(
                title = %notification.title,
                "{}", notification.description
            ),
        }
    }
}

/// Fans notifications out to every subscribed UI
#[derive(Debug, Clone)]
pub struct BroadcastNotifier {
    tx: broadcast::Sender<Notification>,
}

impl BroadcastNotifier {
    /// Channel keeping at most `capacity` undelivered notifications per subscriber
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Receive every notification sent after this call
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.tx.subscribe()
    }
}

impl Notifier for BroadcastNotifier {
    fn notify(&self, notification: Notification) {
        // No subscribers just means no UI is listening
        let _ = self.tx.send(notification);
    }
}
