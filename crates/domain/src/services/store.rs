//! Storage seams for enterprises and agent instances.
//!
//! Services depend on these traits; the persistence crate provides a
//! PostgreSQL implementation and an in-memory one.

use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    AgentInstance, AgentInstanceStatus, AgentRequest, AgentType, AgentTypeSummary, Enterprise,
    EnterpriseProfile, EnterpriseStatus, NewAgentInstance, NewEnterprise, OwnedAgent,
};

/// Error type for store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness invariant rejected the write.
    #[error("Unique constraint violated: {0}")]
    Conflict(String),

    /// The row targeted by an update does not exist.
    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound("row not found".into()),
            sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
                Some("23505") => StoreError::Conflict(db_err.message().to_string()),
                _ => StoreError::Backend(db_err.to_string()),
            },
            other => StoreError::Backend(other.to_string()),
        }
    }
}

/// Enterprise account storage.
#[async_trait::async_trait]
pub trait EnterpriseStore: Send + Sync {
    /// Looks up an enterprise by normalized (lowercase) email.
    async fn find_by_email(&self, email: &str) -> Result<Option<Enterprise>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Enterprise>, StoreError>;

    /// Looks up an enterprise by its live verification token or by the token
    /// it already consumed.
    async fn find_by_verification_token(
        &self,
        token: &str,
    ) -> Result<Option<Enterprise>, StoreError>;

    /// Inserts a new enterprise in `pending_email`. Duplicate emails yield
    /// [`StoreError::Conflict`].
    async fn create(&self, new: NewEnterprise) -> Result<Enterprise, StoreError>;

    /// Moves `pending_email` to `pending_review` and consumes the live token.
    /// Returns `false` when the account had already left `pending_email`.
    async fn mark_email_verified(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Sets the status, clearing any live verification token.
    async fn update_status(&self, id: Uuid, status: EnterpriseStatus) -> Result<(), StoreError>;

    /// Lists enterprises newest first, optionally filtered by status.
    async fn list(
        &self,
        status: Option<EnterpriseStatus>,
    ) -> Result<Vec<EnterpriseProfile>, StoreError>;
}

/// Agent catalog and agent instance storage.
#[async_trait::async_trait]
pub trait AgentStore: Send + Sync {
    /// Active catalog entries ordered by name.
    async fn list_active_types(&self) -> Result<Vec<AgentTypeSummary>, StoreError>;

    async fn find_active_type(&self, id: &str) -> Result<Option<AgentType>, StoreError>;

    /// Finds a pending or active instance for the pair, if any.
    async fn find_outstanding(
        &self,
        enterprise_id: Uuid,
        agent_type_id: &str,
    ) -> Result<Option<AgentInstance>, StoreError>;

    /// Inserts a `pending` instance. A second outstanding instance for the same
    /// pair yields [`StoreError::Conflict`].
    async fn create_instance(&self, new: NewAgentInstance) -> Result<AgentInstance, StoreError>;

    /// Instances owned by the enterprise, most recent request first.
    async fn list_for_enterprise(&self, enterprise_id: Uuid)
        -> Result<Vec<OwnedAgent>, StoreError>;

    /// All instances joined with enterprise and agent type, most recent first.
    async fn list_requests(
        &self,
        status: Option<AgentInstanceStatus>,
    ) -> Result<Vec<AgentRequest>, StoreError>;

    async fn find_request(&self, id: Uuid) -> Result<Option<AgentRequest>, StoreError>;

    /// Sets `active`, `approved_at = now` and `approved_by`.
    async fn approve_instance(&self, id: Uuid, approved_by: &str) -> Result<(), StoreError>;

    /// Sets `rejected` and records who decided in `approved_by`.
    async fn reject_instance(&self, id: Uuid, decided_by: &str) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_sqlx_row_not_found() {
        let error: StoreError = sqlx::Error::RowNotFound.into();
        assert!(matches!(error, StoreError::NotFound(_)));
    }

    #[test]
    fn test_from_sqlx_other_error() {
        let error: StoreError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(error, StoreError::Backend(_)));
    }

    #[test]
    fn test_store_error_display() {
        assert_eq!(
            StoreError::Conflict("email".into()).to_string(),
            "Unique constraint violated: email"
        );
        assert!(StoreError::Backend("down".into()).to_string().contains("down"));
    }
}
