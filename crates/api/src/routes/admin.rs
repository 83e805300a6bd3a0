//! Admin review routes, authorized by the shared admin secret.

use axum::{
    extract::{Path, State},
    Json,
};
use domain::models::{AgentRequest, EnterpriseProfile};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{AdminAuth, JsonBody, QueryParams};
use crate::routes::MessageResponse;
use crate::services::AdminError;

impl From<AdminError> for ApiError {
    fn from(err: AdminError) -> Self {
        match err {
            AdminError::InvalidFilter(_) => ApiError::Validation(err.to_string()),
            AdminError::EnterpriseNotFound | AdminError::RequestNotFound => {
                ApiError::NotFound(err.to_string())
            }
            AdminError::Conflict(message) => ApiError::Conflict(message.to_string()),
            AdminError::Store(e) => ApiError::from(e),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct StatusFilter {
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RejectBody {
    pub reason: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EnterpriseListResponse {
    pub success: bool,
    pub enterprises: Vec<EnterpriseProfile>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct AgentRequestListResponse {
    pub success: bool,
    pub requests: Vec<AgentRequest>,
    pub total: usize,
}

/// Path ids that are not UUIDs cannot name a record.
fn parse_id(raw: &str, missing: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound(missing.to_string()))
}

fn enterprise_id(raw: &str) -> Result<Uuid, ApiError> {
    parse_id(raw, "Account not found")
}

fn request_id(raw: &str) -> Result<Uuid, ApiError> {
    parse_id(raw, "Request not found")
}

/// GET /admin/enterprises?status=
pub async fn list_enterprises(
    State(state): State<AppState>,
    _admin: AdminAuth,
    QueryParams(filter): QueryParams<StatusFilter>,
) -> Result<Json<EnterpriseListResponse>, ApiError> {
    let enterprises = state
        .admin
        .list_enterprises(filter.status.as_deref())
        .await?;
    Ok(Json(EnterpriseListResponse {
        success: true,
        total: enterprises.len(),
        enterprises,
    }))
}

/// POST /admin/enterprises/:id/approve
pub async fn approve_enterprise(
    State(state): State<AppState>,
    _admin: AdminAuth,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let enterprise = state.admin.approve_enterprise(enterprise_id(&id)?).await?;
    Ok(Json(MessageResponse::ok(format!(
        "Account {} has been approved.",
        enterprise.email
    ))))
}

/// POST /admin/enterprises/:id/reject
///
/// The body is optional; `reason` is forwarded to the rejection email.
pub async fn reject_enterprise(
    State(state): State<AppState>,
    _admin: AdminAuth,
    Path(id): Path<String>,
    body: Option<JsonBody<RejectBody>>,
) -> Result<Json<MessageResponse>, ApiError> {
    let reason = body.and_then(|JsonBody(body)| body.reason);
    let enterprise = state
        .admin
        .reject_enterprise(enterprise_id(&id)?, reason.as_deref())
        .await?;
    Ok(Json(MessageResponse::ok(format!(
        "Account {} has been rejected.",
        enterprise.email
    ))))
}

/// POST /admin/enterprises/:id/suspend
pub async fn suspend_enterprise(
    State(state): State<AppState>,
    _admin: AdminAuth,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let enterprise = state.admin.suspend_enterprise(enterprise_id(&id)?).await?;
    Ok(Json(MessageResponse::ok(format!(
        "Account {} has been suspended.",
        enterprise.email
    ))))
}

/// POST /admin/enterprises/:id/unsuspend
pub async fn unsuspend_enterprise(
    State(state): State<AppState>,
    _admin: AdminAuth,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let enterprise = state
        .admin
        .unsuspend_enterprise(enterprise_id(&id)?)
        .await?;
    Ok(Json(MessageResponse::ok(format!(
        "Account {} has been reactivated.",
        enterprise.email
    ))))
}

/// GET /admin/agent-requests?status=
pub async fn list_agent_requests(
    State(state): State<AppState>,
    _admin: AdminAuth,
    QueryParams(filter): QueryParams<StatusFilter>,
) -> Result<Json<AgentRequestListResponse>, ApiError> {
    let requests = state
        .admin
        .list_agent_requests(filter.status.as_deref())
        .await?;
    Ok(Json(AgentRequestListResponse {
        success: true,
        total: requests.len(),
        requests,
    }))
}

/// POST /admin/agent-requests/:id/approve
pub async fn approve_agent_request(
    State(state): State<AppState>,
    _admin: AdminAuth,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let request = state.admin.approve_agent_request(request_id(&id)?).await?;
    Ok(Json(MessageResponse::ok(format!(
        "Agent {} for {} has been activated.",
        request.instance_name, request.company
    ))))
}

/// POST /admin/agent-requests/:id/reject
pub async fn reject_agent_request(
    State(state): State<AppState>,
    _admin: AdminAuth,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let request = state.admin.reject_agent_request(request_id(&id)?).await?;
    Ok(Json(MessageResponse::ok(format!(
        "Agent request {} has been rejected.",
        request.instance_name
    ))))
}
