//! Public agent catalog.

use axum::{extract::State, Json};
use domain::models::AgentTypeSummary;
use serde::Serialize;

use crate::app::AppState;
use crate::error::ApiError;

#[derive(Debug, Serialize)]
pub struct AgentTypesResponse {
    pub success: bool,
    pub agents: Vec<AgentTypeSummary>,
}

/// GET /agents
pub async fn list_agent_types(
    State(state): State<AppState>,
) -> Result<Json<AgentTypesResponse>, ApiError> {
    let agents = state.agents.list_types().await?;
    Ok(Json(AgentTypesResponse {
        success: true,
        agents,
    }))
}
