//! Agent type and agent instance entities (database row mappings).

use chrono::{DateTime, Utc};
use domain::models::{
    AgentInstance, AgentInstanceStatus, AgentRequest, AgentType, AgentTypeStatus,
    AgentTypeSummary, OwnedAgent,
};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for agent type status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "agent_type_status", rename_all = "lowercase")]
pub enum AgentTypeStatusDb {
    Active,
    Inactive,
}

impl From<AgentTypeStatusDb> for AgentTypeStatus {
    fn from(db: AgentTypeStatusDb) -> Self {
        match db {
            AgentTypeStatusDb::Active => AgentTypeStatus::Active,
            AgentTypeStatusDb::Inactive => AgentTypeStatus::Inactive,
        }
    }
}

/// Database enum for agent instance status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "agent_instance_status", rename_all = "lowercase")]
pub enum AgentInstanceStatusDb {
    Pending,
    Active,
    Rejected,
}

impl From<AgentInstanceStatusDb> for AgentInstanceStatus {
    fn from(db: AgentInstanceStatusDb) -> Self {
        match db {
            AgentInstanceStatusDb::Pending => AgentInstanceStatus::Pending,
            AgentInstanceStatusDb::Active => AgentInstanceStatus::Active,
            AgentInstanceStatusDb::Rejected => AgentInstanceStatus::Rejected,
        }
    }
}

impl From<AgentInstanceStatus> for AgentInstanceStatusDb {
    fn from(status: AgentInstanceStatus) -> Self {
        match status {
            AgentInstanceStatus::Pending => AgentInstanceStatusDb::Pending,
            AgentInstanceStatus::Active => AgentInstanceStatusDb::Active,
            AgentInstanceStatus::Rejected => AgentInstanceStatusDb::Rejected,
        }
    }
}

/// Database row mapping for the agent_types table.
#[derive(Debug, Clone, FromRow)]
pub struct AgentTypeEntity {
    pub id: String,
    pub name: String,
    pub description: String,
    pub industry: String,
    pub status: AgentTypeStatusDb,
}

impl From<AgentTypeEntity> for AgentType {
    fn from(entity: AgentTypeEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            description: entity.description,
            industry: entity.industry,
            status: entity.status.into(),
        }
    }
}

impl From<AgentTypeEntity> for AgentTypeSummary {
    fn from(entity: AgentTypeEntity) -> Self {
        AgentType::from(entity).into()
    }
}

/// Database row mapping for the agent_instances table.
#[derive(Debug, Clone, FromRow)]
pub struct AgentInstanceEntity {
    pub id: Uuid,
    pub enterprise_id: Uuid,
    pub agent_type_id: String,
    pub instance_name: String,
    pub status: AgentInstanceStatusDb,
    pub requested_at: DateTime<Utc>,
    pub approved_at: Option<DateTime<Utc>>,
    pub approved_by: Option<String>,
}

impl From<AgentInstanceEntity> for AgentInstance {
    fn from(entity: AgentInstanceEntity) -> Self {
        Self {
            id: entity.id,
            enterprise_id: entity.enterprise_id,
            agent_type_id: entity.agent_type_id,
            instance_name: entity.instance_name,
            status: entity.status.into(),
            requested_at: entity.requested_at,
            approved_at: entity.approved_at,
            approved_by: entity.approved_by,
        }
    }
}

/// Instance joined with its agent type, as listed to the owner.
#[derive(Debug, Clone, FromRow)]
pub struct OwnedAgentEntity {
    pub id: Uuid,
    pub instance_name: String,
    pub status: AgentInstanceStatusDb,
    pub requested_at: DateTime<Utc>,
    pub approved_at: Option<DateTime<Utc>>,
    pub agent_type_name: String,
    pub description: String,
    pub industry: String,
}

impl From<OwnedAgentEntity> for OwnedAgent {
    fn from(entity: OwnedAgentEntity) -> Self {
        Self {
            id: entity.id,
            instance_name: entity.instance_name,
            status: entity.status.into(),
            requested_at: entity.requested_at,
            approved_at: entity.approved_at,
            agent_type_name: entity.agent_type_name,
            description: entity.description,
            industry: entity.industry,
        }
    }
}

/// Instance joined with enterprise and agent type, for admin review.
#[derive(Debug, Clone, FromRow)]
pub struct AgentRequestEntity {
    pub id: Uuid,
    pub enterprise_id: Uuid,
    pub agent_type_id: String,
    pub instance_name: String,
    pub status: AgentInstanceStatusDb,
    pub requested_at: DateTime<Utc>,
    pub approved_at: Option<DateTime<Utc>>,
    pub approved_by: Option<String>,
    pub enterprise_name: String,
    pub company: String,
    pub enterprise_email: String,
    pub agent_type_name: String,
    pub industry: String,
}

impl From<AgentRequestEntity> for AgentRequest {
    fn from(entity: AgentRequestEntity) -> Self {
        Self {
            id: entity.id,
            enterprise_id: entity.enterprise_id,
            agent_type_id: entity.agent_type_id,
            instance_name: entity.instance_name,
            status: entity.status.into(),
            requested_at: entity.requested_at,
            approved_at: entity.approved_at,
            approved_by: entity.approved_by,
            enterprise_name: entity.enterprise_name,
            company: entity.company,
            enterprise_email: entity.enterprise_email,
            agent_type_name: entity.agent_type_name,
            industry: entity.industry,
        }
    }
}
