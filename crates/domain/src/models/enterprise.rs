//! Enterprise account domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Lifecycle status of an enterprise account.
///
/// `pending_email -> pending_review -> active | rejected`; `active <-> suspended`
/// by admin action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnterpriseStatus {
    PendingEmail,
    PendingReview,
    Active,
    Rejected,
    Suspended,
}

impl EnterpriseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnterpriseStatus::PendingEmail => "pending_email",
            EnterpriseStatus::PendingReview => "pending_review",
            EnterpriseStatus::Active => "active",
            EnterpriseStatus::Rejected => "rejected",
            EnterpriseStatus::Suspended => "suspended",
        }
    }
}

impl std::fmt::Display for EnterpriseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EnterpriseStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending_email" => Ok(EnterpriseStatus::PendingEmail),
            "pending_review" => Ok(EnterpriseStatus::PendingReview),
            "active" => Ok(EnterpriseStatus::Active),
            "rejected" => Ok(EnterpriseStatus::Rejected),
            "suspended" => Ok(EnterpriseStatus::Suspended),
            _ => Err(format!("Invalid enterprise status: {}", s)),
        }
    }
}

/// A registered business account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enterprise {
    pub id: Uuid,
    pub name: String,
    pub company: String,
    pub email: String,
    pub email_domain: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub status: EnterpriseStatus,
    #[serde(skip_serializing)]
    pub verification_token: Option<String>,
    #[serde(skip_serializing)]
    pub token_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Enterprise {
    /// Whether the verification window has closed at `now`.
    pub fn verification_expired(&self, now: DateTime<Utc>) -> bool {
        match self.token_expires_at {
            Some(expires_at) => expires_at < now,
            None => true,
        }
    }

    pub fn profile(&self) -> EnterpriseProfile {
        EnterpriseProfile {
            id: self.id,
            name: self.name.clone(),
            company: self.company.clone(),
            email: self.email.clone(),
            email_domain: self.email_domain.clone(),
            status: self.status,
            created_at: self.created_at,
        }
    }
}

/// Enterprise record as shown to its owner and to admins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnterpriseProfile {
    pub id: Uuid,
    pub name: String,
    pub company: String,
    pub email: String,
    pub email_domain: String,
    pub status: EnterpriseStatus,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created_at: DateTime<Utc>,
}

/// Public summary returned on login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnterpriseSummary {
    pub id: Uuid,
    pub name: String,
    pub company: String,
    pub email: String,
}

impl From<&Enterprise> for EnterpriseSummary {
    fn from(enterprise: &Enterprise) -> Self {
        Self {
            id: enterprise.id,
            name: enterprise.name.clone(),
            company: enterprise.company.clone(),
            email: enterprise.email.clone(),
        }
    }
}

/// Data for inserting a freshly registered enterprise in `pending_email`.
#[derive(Debug, Clone)]
pub struct NewEnterprise {
    pub name: String,
    pub company: String,
    pub email: String,
    pub email_domain: String,
    pub password_hash: String,
    pub verification_token: String,
    pub token_expires_at: DateTime<Utc>,
}
