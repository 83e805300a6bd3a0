//! Domain service seams for the enterprise portal.
//!
//! Traits describe the collaborators the account and agent workflows depend
//! on; mocks back them in tests and local development.

pub mod captcha;
pub mod mailer;
pub mod store;

pub use captcha::{CaptchaVerifier, MockCaptchaVerifier};
pub use mailer::{EmailMessage, MailError, Mailer, MockMailer};
pub use store::{AgentStore, EnterpriseStore, StoreError};
