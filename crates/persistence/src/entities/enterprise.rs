//! Enterprise entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{Enterprise, EnterpriseProfile, EnterpriseStatus};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for enterprise status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "enterprise_status", rename_all = "snake_case")]
pub enum EnterpriseStatusDb {
    PendingEmail,
    PendingReview,
    Active,
    Rejected,
    Suspended,
}

impl From<EnterpriseStatusDb> for EnterpriseStatus {
    fn from(db: EnterpriseStatusDb) -> Self {
        match db {
            EnterpriseStatusDb::PendingEmail => EnterpriseStatus::PendingEmail,
            EnterpriseStatusDb::PendingReview => EnterpriseStatus::PendingReview,
            EnterpriseStatusDb::Active => EnterpriseStatus::Active,
            EnterpriseStatusDb::Rejected => EnterpriseStatus::Rejected,
            EnterpriseStatusDb::Suspended => EnterpriseStatus::Suspended,
        }
    }
}

impl From<EnterpriseStatus> for EnterpriseStatusDb {
    fn from(status: EnterpriseStatus) -> Self {
        match status {
            EnterpriseStatus::PendingEmail => EnterpriseStatusDb::PendingEmail,
            EnterpriseStatus::PendingReview => EnterpriseStatusDb::PendingReview,
            EnterpriseStatus::Active => EnterpriseStatusDb::Active,
            EnterpriseStatus::Rejected => EnterpriseStatusDb::Rejected,
            EnterpriseStatus::Suspended => EnterpriseStatusDb::Suspended,
        }
    }
}

/// Database row mapping for the enterprises table.
#[derive(Debug, Clone, FromRow)]
pub struct EnterpriseEntity {
    pub id: Uuid,
    pub name: String,
    pub company: String,
    pub email: String,
    pub email_domain: String,
    pub password_hash: String,
    pub status: EnterpriseStatusDb,
    pub verification_token: Option<String>,
    pub token_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<EnterpriseEntity> for Enterprise {
    fn from(entity: EnterpriseEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            company: entity.company,
            email: entity.email,
            email_domain: entity.email_domain,
            password_hash: entity.password_hash,
            status: entity.status.into(),
            verification_token: entity.verification_token,
            token_expires_at: entity.token_expires_at,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Row for enterprise listings, without credentials.
#[derive(Debug, Clone, FromRow)]
pub struct EnterpriseProfileEntity {
    pub id: Uuid,
    pub name: String,
    pub company: String,
    pub email: String,
    pub email_domain: String,
    pub status: EnterpriseStatusDb,
    pub created_at: DateTime<Utc>,
}

impl From<EnterpriseProfileEntity> for EnterpriseProfile {
    fn from(entity: EnterpriseProfileEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            company: entity.company,
            email: entity.email,
            email_domain: entity.email_domain,
            status: entity.status.into(),
            created_at: entity.created_at,
        }
    }
}
