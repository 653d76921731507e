//! # User Notifications
//!
//! Short messages the session raises for the user (toasts in the web UI).
//! The session never fails loudly on a store problem: it keeps its working
//! copy and reports through a [`NotificationSink`].

use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Info,
    Warning,
    Error,
}

/// A message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Notification {
            level,
            message: message.into(),
        }
    }
}

/// Receives notifications raised by the session.
///
/// Implement this in the UI layer to display toasts.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);

    fn success(&self, message: &str) {
        self.notify(Notification::new(NotificationLevel::Success, message));
    }

    fn info(&self, message: &str) {
        self.notify(Notification::new(NotificationLevel::Info, message));
    }

    fn warning(&self, message: &str) {
        self.notify(Notification::new(NotificationLevel::Warning, message));
    }

    fn error(&self, message: &str) {
        self.notify(Notification::new(NotificationLevel::Error, message));
    }
}

/// Discards every notification.
pub struct NoOpSink;

impl NotificationSink for NoOpSink {
    fn notify(&self, _notification: Notification) {}
}

/// Keeps every notification in order. Used by tests and by callers that
/// display notifications in batches.
#[derive(Debug, Default)]
pub struct CollectingSink {
    items: Mutex<Vec<Notification>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the collected notifications.
    pub fn notifications(&self) -> Vec<Notification> {
        self.items
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Removes and returns the collected notifications.
    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(
            &mut *self
                .items
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner()),
        )
    }

    /// Messages of the given level, in order.
    pub fn messages(&self, level: NotificationLevel) -> Vec<String> {
        self.notifications()
            .into_iter()
            .filter(|n| n.level == level)
            .map(|n| n.message)
            .collect()
    }
}

impl NotificationSink for CollectingSink {
    fn notify(&self, notification: Notification) {
        self.items
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(notification);
    }
}
