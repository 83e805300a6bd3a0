//! Shared-secret admin authorization.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use shared::crypto::constant_time_eq;
use tracing::warn;

use super::bearer_token;
use crate::app::AppState;
use crate::error::ApiError;

/// Marker for requests carrying the admin secret as a bearer token.
#[derive(Debug, Clone, Copy)]
pub struct AdminAuth;

/// Constant-time secret check. An unset secret never matches.
pub fn is_admin_secret(configured: &str, presented: &str) -> bool {
    !configured.is_empty() && constant_time_eq(configured.as_bytes(), presented.as_bytes())
}

#[async_trait]
impl FromRequestParts<AppState> for AdminAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let presented = bearer_token(parts, state).await;

        match presented {
            Some(token) if is_admin_secret(&state.config.security.admin_secret, &token) => {
                Ok(AdminAuth)
            }
            _ => {
                warn!(path = %parts.uri.path(), "Admin authorization failed");
                Err(ApiError::Unauthorized("Unauthorized".to_string()))
            }
        }
    }
}
