//! Notification delivery boundary.
//!
//! The actual mail transport lives outside this crate; implementations of
//! [`Notifier`] adapt it. The default implementation emits a structured
//! log event so deployments without a transport still surface alerts.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}

/// Delivery collaborator for infrastructure alerts.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), NotifyError>;
}

/// Notifier that writes alerts to the log stream.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), NotifyError> {
        tracing::warn!(to = %to, subject = %subject, body = %body, "infrastructure alert");
        Ok(())
    }
}
