//! Cooldown-gated alert dispatch.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::alert::notifier::Notifier;

/// Failure categories that can trigger a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlertEvent {
    /// The pool store could not be reached.
    StorageDisconnected,
}

impl fmt::Display for AlertEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertEvent::StorageDisconnected => write!(f, "STORAGE_DISCONNECTED"),
        }
    }
}

/// Gates notifications so each category fires at most once per cooldown
/// window.
pub struct AlertThrottle {
    cooldown: Duration,
    recipient: String,
    notifier: Arc<dyn Notifier>,
    last_sent: Mutex<HashMap<AlertEvent, Instant>>,
}

impl AlertThrottle {
    pub fn new(cooldown: Duration, recipient: &str, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            cooldown,
            recipient: recipient.to_string(),
            notifier,
            last_sent: Mutex::new(HashMap::new()),
        }
    }

    /// Send an alert unless one for this category went out within the
    /// cooldown window. The timestamp is claimed before delivery starts so
    /// concurrent triggers on the same failure cannot double-send.
    pub async fn notify(&self, event: AlertEvent, subject: &str, body: &str) {
        let claimed = {
            let mut last_sent = match self.last_sent.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            match last_sent.get(&event) {
                Some(last) if last.elapsed() <= self.cooldown => false,
                _ => {
                    last_sent.insert(event, Instant::now());
                    true
                }
            }
        };

        if !claimed {
            tracing::debug!(event = %event, "alert suppressed by cooldown");
            return;
        }

        if let Err(err) = self.notifier.send(&self.recipient, subject, body).await {
            tracing::warn!(event = %event, error = %err, "alert delivery failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::notifier::NotifyError;
    use async_trait::async_trait;

    /// Records every delivered alert.
    struct RecordingNotifier {
        sent: Mutex<Vec<(String, String)>>,
        fail: bool,
    }

    impl RecordingNotifier {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                sent: Mutex::new(Vec::new()),
                fail,
            })
        }

        fn sent(&self) -> Vec<(String, String)> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn send(&self, _to: &str, subject: &str, body: &str) -> Result<(), NotifyError> {
            if self.fail {
                return Err(NotifyError::Transport("smtp down".into()));
            }
            self.sent
                .lock()
                .unwrap()
                .push((subject.to_string(), body.to_string()));
            Ok(())
        }
    }

    #[tokio::test]
    async fn second_alert_inside_cooldown_is_suppressed() {
        let notifier = RecordingNotifier::new(false);
        let throttle = AlertThrottle::new(Duration::from_secs(60), "ops@example.com", notifier.clone());

        throttle
            .notify(AlertEvent::StorageDisconnected, "down", "first")
            .await;
        throttle
            .notify(AlertEvent::StorageDisconnected, "down", "second")
            .await;

        let sent = notifier.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].1, "first");
    }

    #[tokio::test]
    async fn alert_fires_again_after_the_cooldown_elapses() {
        let notifier = RecordingNotifier::new(false);
        let throttle =
            AlertThrottle::new(Duration::from_millis(20), "ops@example.com", notifier.clone());

        throttle
            .notify(AlertEvent::StorageDisconnected, "down", "first")
            .await;
        tokio::time::sleep(Duration::from_millis(50)).await;
        throttle
            .notify(AlertEvent::StorageDisconnected, "down", "second")
            .await;

        assert_eq!(notifier.sent().len(), 2);
    }

    #[tokio::test]
    async fn delivery_failure_is_swallowed() {
        let notifier = RecordingNotifier::new(true);
        let throttle = AlertThrottle::new(Duration::from_secs(60), "ops@example.com", notifier.clone());

        // Must not panic or propagate.
        throttle
            .notify(AlertEvent::StorageDisconnected, "down", "first")
            .await;
        assert!(notifier.sent().is_empty());
    }
}
