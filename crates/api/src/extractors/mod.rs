//! Request extractors.

pub mod admin_auth;
pub mod client_ip;
pub mod json;
pub mod user_auth;

pub use admin_auth::AdminAuth;
pub use client_ip::ClientIp;
pub use json::{JsonBody, QueryParams};
pub use user_auth::EnterpriseAuth;

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};

/// The token of an `Authorization: Bearer` header, if one is present and well formed.
pub(crate) async fn bearer_token<S: Send + Sync>(parts: &mut Parts, state: &S) -> Option<String> {
    TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
        .await
        .ok()
        .map(|TypedHeader(Authorization(bearer))| bearer.token().to_string())
}
