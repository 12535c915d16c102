//! Notification surface Trait

use crate::types::Notification;

/// Toast surface; fire-and-forget
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Notifier that only logs
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        log::info!("[notify:{:?}] {}", notification.kind, notification.message);
    }
}
