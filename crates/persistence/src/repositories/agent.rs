//! Agent catalog and agent instance repository.

use domain::models::{
    AgentInstance, AgentInstanceStatus, AgentRequest, AgentType, AgentTypeSummary,
    NewAgentInstance, OwnedAgent,
};
use domain::services::{AgentStore, StoreError};
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

use crate::entities::{
    AgentInstanceEntity, AgentInstanceStatusDb, AgentRequestEntity, AgentTypeEntity,
    OwnedAgentEntity,
};
use crate::metrics::QueryTimer;

/// Repository for agent types and agent instances.
#[derive(Clone)]
pub struct AgentRepository {
    pool: PgPool,
}

impl AgentRepository {
    /// Creates a new AgentRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl AgentStore for AgentRepository {
    async fn list_active_types(&self) -> Result<Vec<AgentTypeSummary>, StoreError> {
        let timer = QueryTimer::new("list_active_agent_types");
        let result = sqlx::query_as::<_, AgentTypeEntity>(
            r#"
            SELECT id, name, description, industry, status
            FROM agent_types
            WHERE status = 'active'
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        Ok(result?.into_iter().map(Into::into).collect())
    }

    async fn find_active_type(&self, id: &str) -> Result<Option<AgentType>, StoreError> {
        let timer = QueryTimer::new("find_active_agent_type");
        let result = sqlx::query_as::<_, AgentTypeEntity>(
            r#"
            SELECT id, name, description, industry, status
            FROM agent_types
            WHERE id = $1 AND status = 'active'
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        Ok(result?.map(Into::into))
    }

    async fn find_outstanding(
        &self,
        enterprise_id: Uuid,
        agent_type_id: &str,
    ) -> Result<Option<AgentInstance>, StoreError> {
        let timer = QueryTimer::new("find_outstanding_agent_instance");
        let result = sqlx::query_as::<_, AgentInstanceEntity>(
            r#"
            SELECT id, enterprise_id, agent_type_id, instance_name, status,
                   requested_at, approved_at, approved_by
            FROM agent_instances
            WHERE enterprise_id = $1 AND agent_type_id = $2
              AND status IN ('pending', 'active')
            LIMIT 1
            "#,
        )
        .bind(enterprise_id)
        .bind(agent_type_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        Ok(result?.map(Into::into))
    }

    async fn create_instance(&self, new: NewAgentInstance) -> Result<AgentInstance, StoreError> {
        let timer = QueryTimer::new("create_agent_instance");
        let result = sqlx::query_as::<_, AgentInstanceEntity>(
            r#"
            INSERT INTO agent_instances (id, enterprise_id, agent_type_id, instance_name, status)
            VALUES ($1, $2, $3, $4, 'pending')
            RETURNING id, enterprise_id, agent_type_id, instance_name, status,
                      requested_at, approved_at, approved_by
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new.enterprise_id)
        .bind(&new.agent_type_id)
        .bind(&new.instance_name)
        .fetch_one(&self.pool)
        .await;
        timer.record();

        match result.map_err(StoreError::from) {
            Ok(entity) => Ok(entity.into()),
            Err(StoreError::Conflict(detail)) => {
                warn!(
                    enterprise_id = %new.enterprise_id,
                    agent_type_id = %new.agent_type_id,
                    "Outstanding agent instance already exists"
                );
                Err(StoreError::Conflict(detail))
            }
            Err(e) => Err(e),
        }
    }

    async fn list_for_enterprise(
        &self,
        enterprise_id: Uuid,
    ) -> Result<Vec<OwnedAgent>, StoreError> {
        let timer = QueryTimer::new("list_enterprise_agents");
        let result = sqlx::query_as::<_, OwnedAgentEntity>(
            r#"
            SELECT ai.id, ai.instance_name, ai.status, ai.requested_at, ai.approved_at,
                   t.name AS agent_type_name, t.description, t.industry
            FROM agent_instances ai
            JOIN agent_types t ON t.id = ai.agent_type_id
            WHERE ai.enterprise_id = $1
            ORDER BY ai.requested_at DESC
            "#,
        )
        .bind(enterprise_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        Ok(result?.into_iter().map(Into::into).collect())
    }

    async fn list_requests(
        &self,
        status: Option<AgentInstanceStatus>,
    ) -> Result<Vec<AgentRequest>, StoreError> {
        let timer = QueryTimer::new("list_agent_requests");
        let result = sqlx::query_as::<_, AgentRequestEntity>(
            r#"
            SELECT ai.id, ai.enterprise_id, ai.agent_type_id, ai.instance_name, ai.status,
                   ai.requested_at, ai.approved_at, ai.approved_by,
                   e.name AS enterprise_name, e.company, e.email AS enterprise_email,
                   t.name AS agent_type_name, t.industry
            FROM agent_instances ai
            JOIN enterprises e ON e.id = ai.enterprise_id
            JOIN agent_types t ON t.id = ai.agent_type_id
            WHERE ($1::agent_instance_status IS NULL OR ai.status = $1)
            ORDER BY ai.requested_at DESC
            "#,
        )
        .bind(status.map(AgentInstanceStatusDb::from))
        .fetch_all(&self.pool)
        .await;
        timer.record();
        Ok(result?.into_iter().map(Into::into).collect())
    }

    async fn find_request(&self, id: Uuid) -> Result<Option<AgentRequest>, StoreError> {
        let timer = QueryTimer::new("find_agent_request");
        let result = sqlx::query_as::<_, AgentRequestEntity>(
            r#"
            SELECT ai.id, ai.enterprise_id, ai.agent_type_id, ai.instance_name, ai.status,
                   ai.requested_at, ai.approved_at, ai.approved_by,
                   e.name AS enterprise_name, e.company, e.email AS enterprise_email,
                   t.name AS agent_type_name, t.industry
            FROM agent_instances ai
            JOIN enterprises e ON e.id = ai.enterprise_id
            JOIN agent_types t ON t.id = ai.agent_type_id
            WHERE ai.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        Ok(result?.map(Into::into))
    }

    async fn approve_instance(&self, id: Uuid, approved_by: &str) -> Result<(), StoreError> {
        let timer = QueryTimer::new("approve_agent_instance");
        let result = sqlx::query(
            r#"
            UPDATE agent_instances
            SET status = 'active', approved_at = NOW(), approved_by = $2
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(approved_by)
        .execute(&self.pool)
        .await;
        timer.record();

        if result?.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("agent instance {}", id)));
        }
        Ok(())
    }

    async fn reject_instance(&self, id: Uuid, decided_by: &str) -> Result<(), StoreError> {
        let timer = QueryTimer::new("reject_agent_instance");
        let result = sqlx::query(
            r#"
            UPDATE agent_instances
            SET status = 'rejected', approved_by = $2
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(decided_by)
        .execute(&self.pool)
        .await;
        timer.record();

        if result?.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("agent instance {}", id)));
        }
        Ok(())
    }
}
