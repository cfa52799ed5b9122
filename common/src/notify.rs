use tracing::info;

use crate::aging::Reminder;

/// Delivery hook for low-stock reminders.
pub trait Notifier: Send + Sync {
    fn notify(&self, reminder: &Reminder, message: &str);
}

/// Records the reminder in the service log. No message leaves the process.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, reminder: &Reminder, message: &str) {
        info!(phone = %reminder.phone, "{}", message);
        info!(
            "SMS sent to {} regarding {}",
            reminder.phone, reminder.medicine
        );
    }
}
