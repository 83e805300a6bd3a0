//! CAPTCHA verification seam.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Verifies a client-supplied challenge token.
///
/// Implementations fail closed: any transport or provider error is `false`.
#[async_trait::async_trait]
pub trait CaptchaVerifier: Send + Sync {
    async fn verify(&self, token: &str, remote_ip: &str) -> bool;
}

/// Mock verifier for development and testing.
#[derive(Debug, Clone, Default)]
pub struct MockCaptchaVerifier {
    /// Whether to reject every token.
    pub simulate_failure: bool,
    calls: Arc<AtomicUsize>,
}

impl MockCaptchaVerifier {
    /// Create a verifier that accepts any non-empty token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a verifier that rejects every token.
    pub fn failing() -> Self {
        Self {
            simulate_failure: true,
            calls: Arc::default(),
        }
    }

    /// Number of verifications attempted so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl CaptchaVerifier for MockCaptchaVerifier {
    async fn verify(&self, token: &str, remote_ip: &str) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.simulate_failure {
            tracing::warn!(remote_ip = %remote_ip, "Mock captcha verifier simulating failure");
            return false;
        }
        !token.is_empty()
    }
}
