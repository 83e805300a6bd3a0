//! Enterprise account lifecycle: registration, email verification, login.

use chrono::{Duration, Utc};
use domain::models::{Enterprise, EnterpriseProfile, EnterpriseStatus, EnterpriseSummary, NewEnterprise};
use domain::services::{CaptchaVerifier, EnterpriseStore, StoreError};
use shared::crypto::generate_verification_token;
use shared::jwt::{JwtConfig, JwtError, SessionClaims};
use shared::password::{hash_password, verify_against_dummy, verify_password};
use shared::validation::{
    email_domain, is_personal_email_domain, normalize_email, validate_email_shape,
    validate_password_strength,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::services::email::{EmailService, VERIFICATION_WINDOW_HOURS};

/// Errors that can occur during account operations.
#[derive(Debug, Error)]
pub enum AccountError {
    #[error("Missing required fields")]
    MissingFields,

    #[error("CAPTCHA verification failed")]
    CaptchaFailed,

    #[error("Invalid email address")]
    InvalidEmail,

    #[error("Personal email domain not accepted: {0}")]
    PersonalEmail(String),

    #[error("{0}")]
    WeakPassword(String),

    #[error("Email already registered")]
    EmailExists,

    #[error("Verification token missing")]
    MissingToken,

    #[error("Verification token not found")]
    InvalidToken,

    #[error("Verification token expired")]
    TokenExpired,

    #[error("Email and password are required")]
    MissingCredentials,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Email not verified")]
    UnverifiedEmail,

    #[error("Account pending review")]
    PendingReview,

    #[error("Account suspended")]
    Suspended,

    #[error("Account rejected")]
    Rejected,

    #[error("Account not found")]
    NotFound,

    #[error("Token error: {0}")]
    Token(#[from] JwtError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Registration form as submitted.
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub company: String,
    pub email: String,
    pub password: String,
    pub captcha_token: String,
    pub client_ip: String,
}

/// Result of following a verification link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyOutcome {
    Verified,
    AlreadyVerified,
}

/// A freshly issued session.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: String,
    pub user: EnterpriseSummary,
}

/// Orchestrates the enterprise account state machine.
#[derive(Clone)]
pub struct AccountService {
    enterprises: Arc<dyn EnterpriseStore>,
    captcha: Arc<dyn CaptchaVerifier>,
    email: EmailService,
    jwt: Arc<JwtConfig>,
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

impl AccountService {
    pub fn new(
        enterprises: Arc<dyn EnterpriseStore>,
        captcha: Arc<dyn CaptchaVerifier>,
        email: EmailService,
        jwt: Arc<JwtConfig>,
    ) -> Self {
        Self {
            enterprises,
            captcha,
            email,
            jwt,
        }
    }

    /// Registers a new enterprise in `pending_email` and sends the verification link.
    ///
    /// Checks run in a fixed order: field presence, CAPTCHA, email shape,
    /// personal domain, password strength, duplicate email.
    pub async fn register(&self, form: Registration) -> Result<Enterprise, AccountError> {
        if [&form.name, &form.company, &form.email, &form.password, &form.captcha_token]
            .iter()
            .any(|v| is_blank(v))
        {
            return Err(AccountError::MissingFields);
        }

        if !self
            .captcha
            .verify(&form.captcha_token, &form.client_ip)
            .await
        {
            return Err(AccountError::CaptchaFailed);
        }

        let email = normalize_email(&form.email);
        validate_email_shape(&email).map_err(|_| AccountError::InvalidEmail)?;
        let domain = email_domain(&email).ok_or(AccountError::InvalidEmail)?;
        if is_personal_email_domain(&domain) {
            return Err(AccountError::PersonalEmail(domain));
        }

        validate_password_strength(&form.password).map_err(|e| {
            AccountError::WeakPassword(
                e.message
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string()),
            )
        })?;

        if self.enterprises.find_by_email(&email).await?.is_some() {
            return Err(AccountError::EmailExists);
        }

        let password = form.password;
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| AccountError::Internal(format!("Password hashing task failed: {}", e)))?;

        let token = generate_verification_token();
        let new = NewEnterprise {
            name: form.name.trim().to_string(),
            company: form.company.trim().to_string(),
            email,
            email_domain: domain,
            password_hash,
            verification_token: token.clone(),
            token_expires_at: Utc::now() + Duration::hours(VERIFICATION_WINDOW_HOURS),
        };

        let enterprise = self.enterprises.create(new).await.map_err(|e| match e {
            StoreError::Conflict(_) => AccountError::EmailExists,
            other => AccountError::Store(other),
        })?;

        info!(
            enterprise_id = %enterprise.id,
            email_domain = %enterprise.email_domain,
            "Enterprise registered"
        );

        self.email
            .send_verification(&enterprise.email, &enterprise.name, &token)
            .await;

        Ok(enterprise)
    }

    /// Consumes a verification token, moving the account to `pending_review`.
    pub async fn verify_email(&self, token: Option<&str>) -> Result<VerifyOutcome, AccountError> {
        let token = token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AccountError::MissingToken)?;

        let enterprise = self
            .enterprises
            .find_by_verification_token(token)
            .await?
            .ok_or(AccountError::InvalidToken)?;

        match enterprise.status {
            EnterpriseStatus::PendingEmail => {}
            EnterpriseStatus::PendingReview | EnterpriseStatus::Active => {
                return Ok(VerifyOutcome::AlreadyVerified);
            }
            // Admin decided before the link was used; it no longer proves anything.
            EnterpriseStatus::Rejected | EnterpriseStatus::Suspended => {
                return Err(AccountError::InvalidToken);
            }
        }

        if enterprise.verification_expired(Utc::now()) {
            info!(enterprise_id = %enterprise.id, "Verification link expired");
            return Err(AccountError::TokenExpired);
        }

        if !self.enterprises.mark_email_verified(enterprise.id).await? {
            // A concurrent click got there first.
            return Ok(VerifyOutcome::AlreadyVerified);
        }

        info!(enterprise_id = %enterprise.id, "Enterprise email verified");
        Ok(VerifyOutcome::Verified)
    }

    /// Checks credentials and issues a session token for active accounts.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, AccountError> {
        if is_blank(email) || password.is_empty() {
            return Err(AccountError::MissingCredentials);
        }

        let email = normalize_email(email);
        let enterprise = self.enterprises.find_by_email(&email).await?;
        let password = password.to_string();

        let Some(enterprise) = enterprise else {
            // Same derivation cost as a real check.
            tokio::task::spawn_blocking(move || verify_against_dummy(&password))
                .await
                .map_err(|e| AccountError::Internal(format!("Password task failed: {}", e)))?;
            info!(reason = "unknown_email", "Login rejected");
            return Err(AccountError::InvalidCredentials);
        };

        let stored = enterprise.password_hash.clone();
        let matches = tokio::task::spawn_blocking(move || verify_password(&password, &stored))
            .await
            .map_err(|e| AccountError::Internal(format!("Password task failed: {}", e)))?
            .unwrap_or_else(|e| {
                warn!(enterprise_id = %enterprise.id, error = %e, "Stored password hash unusable");
                false
            });

        if !matches {
            info!(enterprise_id = %enterprise.id, reason = "wrong_password", "Login rejected");
            return Err(AccountError::InvalidCredentials);
        }

        let gate = match enterprise.status {
            EnterpriseStatus::Active => None,
            EnterpriseStatus::PendingEmail => Some(AccountError::UnverifiedEmail),
            EnterpriseStatus::PendingReview => Some(AccountError::PendingReview),
            EnterpriseStatus::Suspended => Some(AccountError::Suspended),
            EnterpriseStatus::Rejected => Some(AccountError::Rejected),
        };
        if let Some(err) = gate {
            info!(
                enterprise_id = %enterprise.id,
                status = %enterprise.status,
                "Login rejected"
            );
            return Err(err);
        }

        let token = self.jwt.issue_session(&SessionClaims {
            sub: enterprise.id.to_string(),
            email: enterprise.email.clone(),
            name: enterprise.name.clone(),
            company: enterprise.company.clone(),
        })?;

        info!(enterprise_id = %enterprise.id, "Enterprise logged in");
        Ok(LoginOutcome {
            token,
            user: EnterpriseSummary::from(&enterprise),
        })
    }

    /// The caller's own account record.
    pub async fn profile(&self, enterprise_id: Uuid) -> Result<EnterpriseProfile, AccountError> {
        self.enterprises
            .find_by_id(enterprise_id)
            .await?
            .map(|e| e.profile())
            .ok_or(AccountError::NotFound)
    }
}
