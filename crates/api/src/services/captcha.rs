//! Cloudflare Turnstile verification.

use domain::services::CaptchaVerifier;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

use crate::config::CaptchaConfig;

#[derive(Debug, Error)]
pub enum CaptchaError {
    #[error("Turnstile request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Turnstile returned status {0}")]
    Status(u16),
}

#[derive(Debug, Deserialize)]
struct SiteverifyResponse {
    success: bool,
    #[serde(default, rename = "error-codes")]
    error_codes: Vec<String>,
}

/// Verifies Turnstile tokens against the siteverify endpoint.
#[derive(Debug, Clone)]
pub struct TurnstileVerifier {
    client: reqwest::Client,
    secret_key: String,
    verify_url: String,
}

impl TurnstileVerifier {
    pub fn new(config: &CaptchaConfig) -> Result<Self, CaptchaError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            client,
            secret_key: config.secret_key.clone(),
            verify_url: config.verify_url.clone(),
        })
    }

    /// Asks Turnstile about one token. Undecodable bodies surface as transport errors.
    pub async fn check(&self, token: &str, remote_ip: &str) -> Result<bool, CaptchaError> {
        let form = [
            ("secret", self.secret_key.as_str()),
            ("response", token),
            ("remoteip", remote_ip),
        ];

        let response = self.client.post(&self.verify_url).form(&form).send().await?;
        if !response.status().is_success() {
            return Err(CaptchaError::Status(response.status().as_u16()));
        }

        let body: SiteverifyResponse = response.json().await?;
        if !body.success {
            warn!(error_codes = ?body.error_codes, "Turnstile rejected token");
        }
        Ok(body.success)
    }
}

#[async_trait::async_trait]
impl CaptchaVerifier for TurnstileVerifier {
    async fn verify(&self, token: &str, remote_ip: &str) -> bool {
        match self.check(token, remote_ip).await {
            Ok(success) => success,
            Err(e) => {
                warn!(error = %e, "Turnstile verification failed, rejecting");
                false
            }
        }
    }
}
