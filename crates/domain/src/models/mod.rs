//! Domain models for the enterprise portal.

pub mod agent;
pub mod enterprise;

pub use agent::{
    AgentInstance, AgentInstanceStatus, AgentRequest, AgentType, AgentTypeStatus,
    AgentTypeSummary, NewAgentInstance, OwnedAgent, ADMIN_MARKER,
};
pub use enterprise::{
    Enterprise, EnterpriseProfile, EnterpriseStatus, EnterpriseSummary, NewEnterprise,
};
