//! Email transports.
//!
//! - `console`: logs the message (development)
//! - `resend`: delivers through the Resend HTTP API

use domain::services::{EmailMessage, MailError, Mailer};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

use crate::config::EmailConfig;

const RESEND_TIMEOUT_SECS: u64 = 10;

/// Logs emails instead of sending them.
#[derive(Debug, Clone)]
pub struct ConsoleMailer {
    from: String,
}

impl ConsoleMailer {
    pub fn new(from: impl Into<String>) -> Self {
        Self { from: from.into() }
    }
}

#[async_trait::async_trait]
impl Mailer for ConsoleMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailError> {
        info!(
            from = %self.from,
            to = %message.to,
            subject = %message.subject,
            "Email (console provider)"
        );
        debug!(html_length = message.html.len(), "Email body (HTML)");
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct ResendPayload<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

/// Sends email through the Resend API.
#[derive(Debug, Clone)]
pub struct ResendMailer {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    from: String,
}

impl ResendMailer {
    pub fn new(
        api_url: &str,
        api_key: impl Into<String>,
        from: impl Into<String>,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(RESEND_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            endpoint: format!("{}/emails", api_url.trim_end_matches('/')),
            api_key: api_key.into(),
            from: from.into(),
        })
    }
}

#[async_trait::async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailError> {
        let payload = ResendPayload {
            from: &self.from,
            to: [&message.to],
            subject: &message.subject,
            html: &message.html,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| MailError::Transport(format!("Resend request failed: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            debug!(to = %message.to, "Email accepted by Resend");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        error!(status = %status, error = %body, "Resend API error");
        Err(MailError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

/// `"<sender_name> <sender_email>"`
pub fn sender_address(config: &EmailConfig) -> String {
    format!("{} <{}>", config.sender_name, config.sender_email)
}

/// Builds the transport named by `email.provider`.
pub fn build_mailer(config: &EmailConfig) -> Result<Arc<dyn Mailer>, MailError> {
    let from = sender_address(config);
    match config.provider.as_str() {
        "console" => Ok(Arc::new(ConsoleMailer::new(from))),
        "resend" => {
            let mailer = ResendMailer::new(&config.api_url, config.resend_api_key.clone(), from)
                .map_err(|e| MailError::Transport(format!("HTTP client setup failed: {}", e)))?;
            Ok(Arc::new(mailer))
        }
        provider => Err(MailError::Transport(format!(
            "Unknown email provider: {}",
            provider
        ))),
    }
}
