//! Where report messages go.

use tracing::info;

/// Sink for report notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

/// Writes each notification to stdout and to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str) {
        println!("{}", message);
        info!(target: "reports", "{}", message);
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use super::Notifier;

    /// Keeps every message for later assertions.
    #[derive(Default)]
    pub struct RecordingNotifier {
        messages: Mutex<Vec<String>>,
    }

    impl RecordingNotifier {
        pub fn messages(&self) -> Vec<String> {
            self.messages.lock().unwrap().clone()
        }
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, message: &str) {
            self.messages.lock().unwrap().push(message.to_string());
        }
    }
}
