//! Enterprise repository for database operations.

use domain::models::{Enterprise, EnterpriseProfile, EnterpriseStatus, NewEnterprise};
use domain::services::{EnterpriseStore, StoreError};
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

use crate::entities::{EnterpriseEntity, EnterpriseProfileEntity, EnterpriseStatusDb};
use crate::metrics::QueryTimer;

/// Repository for enterprise account operations.
#[derive(Clone)]
pub struct EnterpriseRepository {
    pool: PgPool,
}

impl EnterpriseRepository {
    /// Creates a new EnterpriseRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait::async_trait]
impl EnterpriseStore for EnterpriseRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Enterprise>, StoreError> {
        let timer = QueryTimer::new("find_enterprise_by_email");
        let result = sqlx::query_as::<_, EnterpriseEntity>(
            r#"
            SELECT id, name, company, email, email_domain, password_hash, status,
                   verification_token, token_expires_at, created_at, updated_at
            FROM enterprises
            WHERE LOWER(email) = LOWER($1)
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        Ok(result?.map(Into::into))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Enterprise>, StoreError> {
        let timer = QueryTimer::new("find_enterprise_by_id");
        let result = sqlx::query_as::<_, EnterpriseEntity>(
            r#"
            SELECT id, name, company, email, email_domain, password_hash, status,
                   verification_token, token_expires_at, created_at, updated_at
            FROM enterprises
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        Ok(result?.map(Into::into))
    }

    async fn find_by_verification_token(
        &self,
        token: &str,
    ) -> Result<Option<Enterprise>, StoreError> {
        let timer = QueryTimer::new("find_enterprise_by_verification_token");
        let result = sqlx::query_as::<_, EnterpriseEntity>(
            r#"
            SELECT id, name, company, email, email_domain, password_hash, status,
                   verification_token, token_expires_at, created_at, updated_at
            FROM enterprises
            WHERE verification_token = $1 OR consumed_token = $1
            LIMIT 1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        Ok(result?.map(Into::into))
    }

    async fn create(&self, new: NewEnterprise) -> Result<Enterprise, StoreError> {
        let timer = QueryTimer::new("create_enterprise");
        let result = sqlx::query_as::<_, EnterpriseEntity>(
            r#"
            INSERT INTO enterprises (id, name, company, email, email_domain, password_hash,
                                     status, verification_token, token_expires_at)
            VALUES ($1, $2, $3, $4, $5, $6, 'pending_email', $7, $8)
            RETURNING id, name, company, email, email_domain, password_hash, status,
                      verification_token, token_expires_at, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new.name)
        .bind(&new.company)
        .bind(&new.email)
        .bind(&new.email_domain)
        .bind(&new.password_hash)
        .bind(&new.verification_token)
        .bind(new.token_expires_at)
        .fetch_one(&self.pool)
        .await;
        timer.record();

        match result.map_err(StoreError::from) {
            Ok(entity) => Ok(entity.into()),
            Err(StoreError::Conflict(detail)) => {
                warn!(
                    email_domain = %new.email_domain,
                    detail = %detail,
                    "Enterprise email already taken"
                );
                Err(StoreError::Conflict(detail))
            }
            Err(e) => Err(e),
        }
    }

    async fn mark_email_verified(&self, id: Uuid) -> Result<bool, StoreError> {
        let timer = QueryTimer::new("mark_enterprise_email_verified");
        let result = sqlx::query(
            r#"
            UPDATE enterprises
            SET status = 'pending_review',
                consumed_token = verification_token,
                verification_token = NULL,
                token_expires_at = NULL,
                updated_at = NOW()
            WHERE id = $1 AND status = 'pending_email'
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await;
        timer.record();
        Ok(result?.rows_affected() > 0)
    }

    async fn update_status(&self, id: Uuid, status: EnterpriseStatus) -> Result<(), StoreError> {
        let timer = QueryTimer::new("update_enterprise_status");
        let result = sqlx::query(
            r#"
            UPDATE enterprises
            SET status = $2,
                consumed_token = COALESCE(verification_token, consumed_token),
                verification_token = NULL,
                token_expires_at = NULL,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(EnterpriseStatusDb::from(status))
        .execute(&self.pool)
        .await;
        timer.record();

        if result?.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("enterprise {}", id)));
        }
        Ok(())
    }

    async fn list(
        &self,
        status: Option<EnterpriseStatus>,
    ) -> Result<Vec<EnterpriseProfile>, StoreError> {
        let timer = QueryTimer::new("list_enterprises");
        let result = sqlx::query_as::<_, EnterpriseProfileEntity>(
            r#"
            SELECT id, name, company, email, email_domain, status, created_at
            FROM enterprises
            WHERE ($1::enterprise_status IS NULL OR status = $1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(status.map(EnterpriseStatusDb::from))
        .fetch_all(&self.pool)
        .await;
        timer.record();
        Ok(result?.into_iter().map(Into::into).collect())
    }
}
