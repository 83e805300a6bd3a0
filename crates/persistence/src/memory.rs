//! In-memory store for tests and local demos.
//!
//! Mirrors the PostgreSQL repositories, including the unique email index and
//! the one-outstanding-instance-per-agent-type index.

use chrono::{DateTime, Utc};
use domain::models::{
    AgentInstance, AgentInstanceStatus, AgentRequest, AgentType, AgentTypeStatus,
    AgentTypeSummary, Enterprise, EnterpriseProfile, EnterpriseStatus, NewAgentInstance,
    NewEnterprise, OwnedAgent,
};
use domain::services::{AgentStore, EnterpriseStore, StoreError};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Clone)]
struct EnterpriseRecord {
    enterprise: Enterprise,
    consumed_token: Option<String>,
}

#[derive(Debug, Default)]
struct State {
    enterprises: Vec<EnterpriseRecord>,
    agent_types: Vec<AgentType>,
    instances: Vec<AgentInstance>,
}

impl State {
    fn enterprise_mut(&mut self, id: Uuid) -> Result<&mut EnterpriseRecord, StoreError> {
        self.enterprises
            .iter_mut()
            .find(|r| r.enterprise.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("enterprise {}", id)))
    }

    fn instance_mut(&mut self, id: Uuid) -> Result<&mut AgentInstance, StoreError> {
        self.instances
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("agent instance {}", id)))
    }

    fn has_outstanding(&self, enterprise_id: Uuid, agent_type_id: &str, except: Option<Uuid>) -> bool {
        self.instances.iter().any(|i| {
            i.enterprise_id == enterprise_id
                && i.agent_type_id == agent_type_id
                && i.status.is_outstanding()
                && Some(i.id) != except
        })
    }

    fn join_request(&self, instance: &AgentInstance) -> Option<AgentRequest> {
        let enterprise = self
            .enterprises
            .iter()
            .find(|r| r.enterprise.id == instance.enterprise_id)?;
        let agent_type = self
            .agent_types
            .iter()
            .find(|t| t.id == instance.agent_type_id)?;

        Some(AgentRequest {
            id: instance.id,
            enterprise_id: instance.enterprise_id,
            agent_type_id: instance.agent_type_id.clone(),
            instance_name: instance.instance_name.clone(),
            status: instance.status,
            requested_at: instance.requested_at,
            approved_at: instance.approved_at,
            approved_by: instance.approved_by.clone(),
            enterprise_name: enterprise.enterprise.name.clone(),
            company: enterprise.enterprise.company.clone(),
            enterprise_email: enterprise.enterprise.email.clone(),
            agent_type_name: agent_type.name.clone(),
            industry: agent_type.industry.clone(),
        })
    }
}

/// Store holding every table in process memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<State>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a catalog entry.
    pub async fn seed_agent_type(&self, agent_type: AgentType) {
        let mut state = self.state.write().await;
        state.agent_types.retain(|t| t.id != agent_type.id);
        state.agent_types.push(agent_type);
    }

    /// Moves the verification deadline of an account, e.g. into the past.
    pub async fn set_token_expiry(
        &self,
        email: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        let record = state
            .enterprises
            .iter_mut()
            .find(|r| r.enterprise.email == email)
            .ok_or_else(|| StoreError::NotFound(format!("enterprise {}", email)))?;
        record.enterprise.token_expires_at = Some(expires_at);
        Ok(())
    }
}

#[async_trait::async_trait]
impl EnterpriseStore for InMemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Enterprise>, StoreError> {
        let email = email.to_lowercase();
        let state = self.state.read().await;
        Ok(state
            .enterprises
            .iter()
            .find(|r| r.enterprise.email.to_lowercase() == email)
            .map(|r| r.enterprise.clone()))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Enterprise>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .enterprises
            .iter()
            .find(|r| r.enterprise.id == id)
            .map(|r| r.enterprise.clone()))
    }

    async fn find_by_verification_token(
        &self,
        token: &str,
    ) -> Result<Option<Enterprise>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .enterprises
            .iter()
            .find(|r| {
                r.enterprise.verification_token.as_deref() == Some(token)
                    || r.consumed_token.as_deref() == Some(token)
            })
            .map(|r| r.enterprise.clone()))
    }

    async fn create(&self, new: NewEnterprise) -> Result<Enterprise, StoreError> {
        let mut state = self.state.write().await;
        let email = new.email.to_lowercase();
        if state
            .enterprises
            .iter()
            .any(|r| r.enterprise.email.to_lowercase() == email)
        {
            return Err(StoreError::Conflict(format!("email {}", email)));
        }

        let now = Utc::now();
        let enterprise = Enterprise {
            id: Uuid::new_v4(),
            name: new.name,
            company: new.company,
            email,
            email_domain: new.email_domain,
            password_hash: new.password_hash,
            status: EnterpriseStatus::PendingEmail,
            verification_token: Some(new.verification_token),
            token_expires_at: Some(new.token_expires_at),
            created_at: now,
            updated_at: now,
        };
        state.enterprises.push(EnterpriseRecord {
            enterprise: enterprise.clone(),
            consumed_token: None,
        });
        Ok(enterprise)
    }

    async fn mark_email_verified(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut state = self.state.write().await;
        let record = state.enterprise_mut(id)?;
        if record.enterprise.status != EnterpriseStatus::PendingEmail {
            return Ok(false);
        }

        record.enterprise.status = EnterpriseStatus::PendingReview;
        record.consumed_token = record.enterprise.verification_token.take();
        record.enterprise.token_expires_at = None;
        record.enterprise.updated_at = Utc::now();
        Ok(true)
    }

    async fn update_status(&self, id: Uuid, status: EnterpriseStatus) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        let record = state.enterprise_mut(id)?;
        if let Some(token) = record.enterprise.verification_token.take() {
            record.consumed_token = Some(token);
        }
        record.enterprise.token_expires_at = None;
        record.enterprise.status = status;
        record.enterprise.updated_at = Utc::now();
        Ok(())
    }

    async fn list(
        &self,
        status: Option<EnterpriseStatus>,
    ) -> Result<Vec<EnterpriseProfile>, StoreError> {
        let state = self.state.read().await;
        let mut profiles: Vec<EnterpriseProfile> = state
            .enterprises
            .iter()
            .rev()
            .filter(|r| status.map_or(true, |s| r.enterprise.status == s))
            .map(|r| r.enterprise.profile())
            .collect();
        profiles.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(profiles)
    }
}

#[async_trait::async_trait]
impl AgentStore for InMemoryStore {
    async fn list_active_types(&self) -> Result<Vec<AgentTypeSummary>, StoreError> {
        let state = self.state.read().await;
        let mut types: Vec<AgentTypeSummary> = state
            .agent_types
            .iter()
            .filter(|t| t.status == AgentTypeStatus::Active)
            .cloned()
            .map(Into::into)
            .collect();
        types.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(types)
    }

    async fn find_active_type(&self, id: &str) -> Result<Option<AgentType>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .agent_types
            .iter()
            .find(|t| t.id == id && t.status == AgentTypeStatus::Active)
            .cloned())
    }

    async fn find_outstanding(
        &self,
        enterprise_id: Uuid,
        agent_type_id: &str,
    ) -> Result<Option<AgentInstance>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .instances
            .iter()
            .find(|i| {
                i.enterprise_id == enterprise_id
                    && i.agent_type_id == agent_type_id
                    && i.status.is_outstanding()
            })
            .cloned())
    }

    async fn create_instance(&self, new: NewAgentInstance) -> Result<AgentInstance, StoreError> {
        let mut state = self.state.write().await;
        if state.has_outstanding(new.enterprise_id, &new.agent_type_id, None) {
            return Err(StoreError::Conflict(format!(
                "outstanding instance for {}",
                new.agent_type_id
            )));
        }

        let instance = AgentInstance {
            id: Uuid::new_v4(),
            enterprise_id: new.enterprise_id,
            agent_type_id: new.agent_type_id,
            instance_name: new.instance_name,
            status: AgentInstanceStatus::Pending,
            requested_at: Utc::now(),
            approved_at: None,
            approved_by: None,
        };
        state.instances.push(instance.clone());
        Ok(instance)
    }

    async fn list_for_enterprise(
        &self,
        enterprise_id: Uuid,
    ) -> Result<Vec<OwnedAgent>, StoreError> {
        let state = self.state.read().await;
        let mut agents: Vec<OwnedAgent> = state
            .instances
            .iter()
            .rev()
            .filter(|i| i.enterprise_id == enterprise_id)
            .filter_map(|i| {
                let agent_type = state.agent_types.iter().find(|t| t.id == i.agent_type_id)?;
                Some(OwnedAgent {
                    id: i.id,
                    instance_name: i.instance_name.clone(),
                    status: i.status,
                    requested_at: i.requested_at,
                    approved_at: i.approved_at,
                    agent_type_name: agent_type.name.clone(),
                    description: agent_type.description.clone(),
                    industry: agent_type.industry.clone(),
                })
            })
            .collect();
        agents.sort_by(|a, b| b.requested_at.cmp(&a.requested_at));
        Ok(agents)
    }

    async fn list_requests(
        &self,
        status: Option<AgentInstanceStatus>,
    ) -> Result<Vec<AgentRequest>, StoreError> {
        let state = self.state.read().await;
        let mut requests: Vec<AgentRequest> = state
            .instances
            .iter()
            .rev()
            .filter(|i| status.map_or(true, |s| i.status == s))
            .filter_map(|i| state.join_request(i))
            .collect();
        requests.sort_by(|a, b| b.requested_at.cmp(&a.requested_at));
        Ok(requests)
    }

    async fn find_request(&self, id: Uuid) -> Result<Option<AgentRequest>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .instances
            .iter()
            .find(|i| i.id == id)
            .and_then(|i| state.join_request(i)))
    }

    async fn approve_instance(&self, id: Uuid, approved_by: &str) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        let (enterprise_id, agent_type_id) = {
            let instance = state.instance_mut(id)?;
            (instance.enterprise_id, instance.agent_type_id.clone())
        };
        if state.has_outstanding(enterprise_id, &agent_type_id, Some(id)) {
            return Err(StoreError::Conflict(format!(
                "outstanding instance for {}",
                agent_type_id
            )));
        }

        let instance = state.instance_mut(id)?;
        instance.status = AgentInstanceStatus::Active;
        instance.approved_at = Some(Utc::now());
        instance.approved_by = Some(approved_by.to_string());
        Ok(())
    }

    async fn reject_instance(&self, id: Uuid, decided_by: &str) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        let instance = state.instance_mut(id)?;
        instance.status = AgentInstanceStatus::Rejected;
        instance.approved_by = Some(decided_by.to_string());
        Ok(())
    }
}
