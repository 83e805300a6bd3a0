//! Application services behind the HTTP handlers.

pub mod accounts;
pub mod admin;
pub mod agents;
pub mod captcha;
pub mod email;
pub mod mail_transport;

pub use accounts::{AccountError, AccountService};
pub use admin::{AdminError, AdminService};
pub use agents::{AgentError, AgentService};
pub use captcha::TurnstileVerifier;
pub use email::EmailService;
