//! Agent catalog and enterprise agent requests.

use domain::models::{AgentTypeSummary, EnterpriseStatus, NewAgentInstance, OwnedAgent};
use domain::services::{AgentStore, EnterpriseStore, StoreError};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Agent type and instance name are required")]
    MissingFields,

    #[error("Account is not activated")]
    AccountNotActive,

    #[error("Agent type not found")]
    UnknownAgentType,

    #[error("An outstanding request already exists for this agent type")]
    Duplicate,

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

#[derive(Clone)]
pub struct AgentService {
    enterprises: Arc<dyn EnterpriseStore>,
    agents: Arc<dyn AgentStore>,
}

impl AgentService {
    pub fn new(enterprises: Arc<dyn EnterpriseStore>, agents: Arc<dyn AgentStore>) -> Self {
        Self {
            enterprises,
            agents,
        }
    }

    /// Active catalog entries, public.
    pub async fn list_types(&self) -> Result<Vec<AgentTypeSummary>, AgentError> {
        Ok(self.agents.list_active_types().await?)
    }

    /// Instances owned by the caller, newest request first.
    pub async fn list_own(&self, enterprise_id: Uuid) -> Result<Vec<OwnedAgent>, AgentError> {
        Ok(self.agents.list_for_enterprise(enterprise_id).await?)
    }

    /// Files a `pending` instance request for an active enterprise.
    pub async fn request(
        &self,
        enterprise_id: Uuid,
        agent_type_id: &str,
        instance_name: &str,
    ) -> Result<Uuid, AgentError> {
        let agent_type_id = agent_type_id.trim();
        let instance_name = instance_name.trim();
        if agent_type_id.is_empty() || instance_name.is_empty() {
            return Err(AgentError::MissingFields);
        }

        let active = self
            .enterprises
            .find_by_id(enterprise_id)
            .await?
            .is_some_and(|e| e.status == EnterpriseStatus::Active);
        if !active {
            return Err(AgentError::AccountNotActive);
        }

        if self.agents.find_active_type(agent_type_id).await?.is_none() {
            return Err(AgentError::UnknownAgentType);
        }

        if self
            .agents
            .find_outstanding(enterprise_id, agent_type_id)
            .await?
            .is_some()
        {
            return Err(AgentError::Duplicate);
        }

        let instance = self
            .agents
            .create_instance(NewAgentInstance {
                enterprise_id,
                agent_type_id: agent_type_id.to_string(),
                instance_name: instance_name.to_string(),
            })
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => AgentError::Duplicate,
                other => AgentError::Store(other),
            })?;

        info!(
            enterprise_id = %enterprise_id,
            instance_id = %instance.id,
            agent_type_id = %agent_type_id,
            "Agent instance requested"
        );
        Ok(instance.id)
    }
}
