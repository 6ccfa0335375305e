use crate::domain::backend::Notifier;
use crate::domain::models::Notification;

/// Prints run results to stdout, where the console user sees them.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        tracing::info!(title = %notification.title, "notification");
        println!(
            "[{}] {}\n{}",
            notification.timestamp.format("%H:%M:%S"),
            notification.title,
            notification.body.trim_end()
        );
    }
}
