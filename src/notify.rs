//! User-facing notifications
//!
//! Fire-and-forget: callers never inspect the outcome of a notification.

use std::sync::Mutex;
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
}

pub trait Notifier: Send + Sync {
    fn notify(&self, kind: NotificationKind, title: &str, message: &str);
}

/// Writes notifications to the log
#[derive(Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, kind: NotificationKind, title: &str, message: &str) {
        match kind {
            NotificationKind::Info => info!(title = %title, "{}", message),
            NotificationKind::Error => error!(title = %title, "{}", message),
        }
    }
}

/// Keeps every notification in memory
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    sent: Mutex<Vec<Notification>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<Notification> {
        self.sent.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }

    pub fn errors(&self) -> Vec<Notification> {
        self.all()
            .into_iter()
            .filter(|n| n.kind == NotificationKind::Error)
            .collect()
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, kind: NotificationKind, title: &str, message: &str) {
        self.sent
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(Notification {
                kind,
                title: title.to_string(),
                message: message.to_string(),
            });
    }
}
