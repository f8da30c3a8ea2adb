use ragadmin_core::notify::{Notification, NotificationLevel, Notifier};

/// Notifier that forwards notifications to the tracing log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Success => tracing::info!("[Notify] {}", notification.message),
            NotificationLevel::Error => tracing::error!("[Notify] {}", notification.message),
        }
    }
}
