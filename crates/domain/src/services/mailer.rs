//! Transactional email delivery seam.

use serde::Serialize;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// A rendered email ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Error type for email delivery.
#[derive(Debug, Error)]
pub enum MailError {
    #[error("Email transport error: {0}")]
    Transport(String),

    #[error("Email provider rejected the message with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Delivers rendered emails through a provider.
#[async_trait::async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailError>;
}

/// Mock mailer for development and testing.
///
/// Records every message it accepts instead of delivering it.
#[derive(Debug, Clone, Default)]
pub struct MockMailer {
    /// Whether to simulate provider failures.
    pub simulate_failure: bool,
    sent: Arc<Mutex<Vec<EmailMessage>>>,
}

impl MockMailer {
    /// Create a new mock mailer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock mailer that fails every send.
    pub fn failing() -> Self {
        Self {
            simulate_failure: true,
            sent: Arc::default(),
        }
    }

    /// Messages accepted so far, oldest first.
    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent
            .lock()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }

    /// Messages accepted for one recipient.
    pub fn sent_to(&self, to: &str) -> Vec<EmailMessage> {
        self.sent().into_iter().filter(|m| m.to == to).collect()
    }
}

#[async_trait::async_trait]
impl Mailer for MockMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailError> {
        if self.simulate_failure {
            tracing::warn!(to = %message.to, "Mock mailer simulating failure");
            return Err(MailError::Transport("Simulated failure".to_string()));
        }

        tracing::info!(
            to = %message.to,
            subject = %message.subject,
            "Mock: Would send email"
        );

        if let Ok(mut sent) = self.sent.lock() {
            sent.push(message.clone());
        }
        Ok(())
    }
}
