//! Outbound customer notifications.
//!
//! The core talks to a [`Notifier`]; the production implementation delivers
//! order confirmations over SMTP.

mod email;

pub use email::EmailNotifier;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("invalid recipient address: {0}")]
    InvalidRecipient(String),
    #[error("failed to send email: {0}")]
    Send(String),
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(
        &self,
        recipient_name: &str,
        recipient_email: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), NotifyError>;
}
