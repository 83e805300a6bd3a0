//! Routes for a signed-in enterprise.

use axum::{extract::State, http::StatusCode, Json};
use domain::models::{EnterpriseProfile, OwnedAgent};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::{ApiError, ErrorCode};
use crate::extractors::{EnterpriseAuth, JsonBody};
use crate::services::AgentError;

impl From<AgentError> for ApiError {
    fn from(err: AgentError) -> Self {
        match err {
            AgentError::MissingFields => ApiError::Validation(err.to_string()),
            AgentError::AccountNotActive => ApiError::Forbidden(err.to_string()),
            AgentError::UnknownAgentType => ApiError::NotFound(err.to_string()),
            AgentError::Duplicate => ApiError::coded(
                StatusCode::CONFLICT,
                ErrorCode::Duplicate,
                "You already have a pending or active instance of this agent type.",
            ),
            AgentError::Store(e) => ApiError::from(e),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub success: bool,
    pub profile: EnterpriseProfile,
}

#[derive(Debug, Serialize)]
pub struct OwnedAgentsResponse {
    pub success: bool,
    pub agents: Vec<OwnedAgent>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AgentRequestBody {
    pub agent_type_id: String,
    pub instance_name: String,
}

#[derive(Debug, Serialize)]
pub struct AgentRequestResponse {
    pub success: bool,
    pub message: String,
    pub id: Uuid,
}

/// GET /user/profile
pub async fn profile(
    State(state): State<AppState>,
    auth: EnterpriseAuth,
) -> Result<Json<ProfileResponse>, ApiError> {
    let profile = state.accounts.profile(auth.enterprise_id).await?;
    Ok(Json(ProfileResponse {
        success: true,
        profile,
    }))
}

/// GET /user/agents
pub async fn list_agents(
    State(state): State<AppState>,
    auth: EnterpriseAuth,
) -> Result<Json<OwnedAgentsResponse>, ApiError> {
    let agents = state.agents.list_own(auth.enterprise_id).await?;
    Ok(Json(OwnedAgentsResponse {
        success: true,
        agents,
    }))
}

/// POST /user/agents/request
pub async fn request_agent(
    State(state): State<AppState>,
    auth: EnterpriseAuth,
    JsonBody(body): JsonBody<AgentRequestBody>,
) -> Result<Json<AgentRequestResponse>, ApiError> {
    let id = state
        .agents
        .request(auth.enterprise_id, &body.agent_type_id, &body.instance_name)
        .await?;

    info!(enterprise = %auth.email, instance_id = %id, "Agent request submitted");
    Ok(Json(AgentRequestResponse {
        success: true,
        message: "Request submitted. Our team will activate your agent shortly.".to_string(),
        id,
    }))
}
