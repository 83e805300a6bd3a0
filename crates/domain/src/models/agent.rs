//! Agent catalog and agent instance domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Marker recorded in `approved_by` for decisions taken through the admin surface.
pub const ADMIN_MARKER: &str = "admin";

/// Whether a catalog entry can be listed and requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentTypeStatus {
    Active,
    Inactive,
}

impl std::fmt::Display for AgentTypeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AgentTypeStatus::Active => write!(f, "active"),
            AgentTypeStatus::Inactive => write!(f, "inactive"),
        }
    }
}

/// A catalog entry for a kind of assistant an enterprise may request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentType {
    pub id: String,
    pub name: String,
    pub description: String,
    pub industry: String,
    pub status: AgentTypeStatus,
}

/// Public catalog listing entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentTypeSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    pub industry: String,
}

impl From<AgentType> for AgentTypeSummary {
    fn from(agent_type: AgentType) -> Self {
        Self {
            id: agent_type.id,
            name: agent_type.name,
            description: agent_type.description,
            industry: agent_type.industry,
        }
    }
}

/// Status of an agent instance request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentInstanceStatus {
    Pending,
    Active,
    Rejected,
}

impl AgentInstanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentInstanceStatus::Pending => "pending",
            AgentInstanceStatus::Active => "active",
            AgentInstanceStatus::Rejected => "rejected",
        }
    }

    /// Pending and active instances block a new request for the same agent type.
    pub fn is_outstanding(&self) -> bool {
        matches!(self, AgentInstanceStatus::Pending | AgentInstanceStatus::Active)
    }
}

impl std::fmt::Display for AgentInstanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AgentInstanceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(AgentInstanceStatus::Pending),
            "active" => Ok(AgentInstanceStatus::Active),
            "rejected" => Ok(AgentInstanceStatus::Rejected),
            _ => Err(format!("Invalid agent request status: {}", s)),
        }
    }
}

/// One enterprise's request to activate an agent type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentInstance {
    pub id: Uuid,
    pub enterprise_id: Uuid,
    pub agent_type_id: String,
    pub instance_name: String,
    pub status: AgentInstanceStatus,
    pub requested_at: DateTime<Utc>,
    pub approved_at: Option<DateTime<Utc>>,
    pub approved_by: Option<String>,
}

/// Data for inserting a new `pending` instance.
#[derive(Debug, Clone)]
pub struct NewAgentInstance {
    pub enterprise_id: Uuid,
    pub agent_type_id: String,
    pub instance_name: String,
}

/// An instance as listed to its owning enterprise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnedAgent {
    pub id: Uuid,
    pub instance_name: String,
    pub status: AgentInstanceStatus,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub requested_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_seconds_option")]
    pub approved_at: Option<DateTime<Utc>>,
    pub agent_type_name: String,
    pub description: String,
    pub industry: String,
}

/// An instance joined with its enterprise and agent type for admin review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentRequest {
    pub id: Uuid,
    pub enterprise_id: Uuid,
    pub agent_type_id: String,
    pub instance_name: String,
    pub status: AgentInstanceStatus,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub requested_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_seconds_option")]
    pub approved_at: Option<DateTime<Utc>>,
    pub approved_by: Option<String>,
    pub enterprise_name: String,
    pub company: String,
    pub enterprise_email: String,
    pub agent_type_name: String,
    pub industry: String,
}
