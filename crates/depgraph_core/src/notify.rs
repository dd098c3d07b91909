use log::warn;

/// Sink for user-facing warnings (an editor popup, a CLI banner, ...).
pub trait Notifier: Send + Sync {
    fn warn(&self, message: &str);
}

/// Routes notifications to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn warn(&self, message: &str) {
        warn!("{}", message);
    }
}
