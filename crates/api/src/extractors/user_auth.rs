//! Enterprise session extractor.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use tracing::debug;
use uuid::Uuid;

use super::bearer_token;
use crate::app::AppState;
use crate::error::ApiError;

/// Enterprise identified by a valid session token.
///
/// Missing, malformed, tampered and expired tokens are all rejected with the
/// same 401.
#[derive(Debug, Clone)]
pub struct EnterpriseAuth {
    pub enterprise_id: Uuid,
    pub email: String,
    pub name: String,
    pub company: String,
}

fn unauthorized() -> ApiError {
    ApiError::Unauthorized("Unauthorized".to_string())
}

#[async_trait]
impl FromRequestParts<AppState> for EnterpriseAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts, state).await.ok_or_else(unauthorized)?;

        let session = state.jwt.verify_session(&token).map_err(|e| {
            debug!(error = %e, "Session token rejected");
            unauthorized()
        })?;

        let enterprise_id = Uuid::parse_str(&session.claims.sub).map_err(|_| unauthorized())?;

        Ok(Self {
            enterprise_id,
            email: session.claims.email,
            name: session.claims.name,
            company: session.claims.company,
        })
    }
}
