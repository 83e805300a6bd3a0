//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod agent;
pub mod enterprise;

pub use agent::{
    AgentInstanceEntity, AgentInstanceStatusDb, AgentRequestEntity, AgentTypeEntity,
    AgentTypeStatusDb, OwnedAgentEntity,
};
pub use enterprise::{EnterpriseEntity, EnterpriseProfileEntity, EnterpriseStatusDb};
