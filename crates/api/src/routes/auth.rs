//! Public account routes: registration, email verification, login.

use axum::{extract::State, http::StatusCode, Json};
use domain::models::EnterpriseSummary;
use serde::{Deserialize, Serialize};

use crate::app::AppState;
use crate::error::{ApiError, ErrorCode};
use crate::extractors::{ClientIp, JsonBody, QueryParams};
use crate::routes::MessageResponse;
use crate::services::accounts::{AccountError, Registration, VerifyOutcome};

/// Request body for enterprise registration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterRequest {
    pub name: String,
    pub company: String,
    pub email: String,
    pub password: String,
    pub turnstile_token: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct VerifyQuery {
    pub token: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub already_verified: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
    pub user: EnterpriseSummary,
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::MissingFields => {
                ApiError::Validation("Please fill in all required fields".to_string())
            }
            AccountError::CaptchaFailed => {
                ApiError::Validation("CAPTCHA verification failed. Please try again.".to_string())
            }
            AccountError::InvalidEmail => ApiError::Validation("Invalid email address".to_string()),
            AccountError::PersonalEmail(domain) => ApiError::coded(
                StatusCode::BAD_REQUEST,
                ErrorCode::PersonalEmail,
                format!(
                    "Please use a business email. Addresses at @{} are not accepted.",
                    domain
                ),
            ),
            AccountError::WeakPassword(message) => ApiError::Validation(message),
            AccountError::EmailExists => ApiError::coded(
                StatusCode::CONFLICT,
                ErrorCode::EmailExists,
                "This email is already registered. Please sign in or use another email.",
            ),
            AccountError::MissingToken => ApiError::Validation("Invalid token".to_string()),
            AccountError::InvalidToken => ApiError::coded(
                StatusCode::NOT_FOUND,
                ErrorCode::InvalidToken,
                "Token does not exist or has already been used.",
            ),
            AccountError::TokenExpired => ApiError::coded(
                StatusCode::GONE,
                ErrorCode::TokenExpired,
                "Verification link has expired (24 hours). Please register again.",
            ),
            AccountError::MissingCredentials => {
                ApiError::Validation("Please enter your email and password".to_string())
            }
            AccountError::InvalidCredentials => {
                ApiError::Unauthorized("Email or password is incorrect".to_string())
            }
            AccountError::UnverifiedEmail => ApiError::coded(
                StatusCode::FORBIDDEN,
                ErrorCode::UnverifiedEmail,
                "Please verify your email before signing in.",
            ),
            AccountError::PendingReview => ApiError::coded(
                StatusCode::FORBIDDEN,
                ErrorCode::PendingReview,
                "Your account is awaiting review. We will notify you by email.",
            ),
            AccountError::Suspended => ApiError::coded(
                StatusCode::FORBIDDEN,
                ErrorCode::Suspended,
                "Your account has been suspended. Please contact support@aitrify.com.",
            ),
            AccountError::Rejected => ApiError::coded(
                StatusCode::FORBIDDEN,
                ErrorCode::Rejected,
                "Your account registration was not approved.",
            ),
            AccountError::NotFound => ApiError::NotFound("Account not found".to_string()),
            AccountError::Token(e) => ApiError::Internal(format!("Token error: {}", e)),
            AccountError::Store(e) => ApiError::from(e),
            AccountError::Internal(msg) => ApiError::Internal(msg),
        }
    }
}

/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    ClientIp(client_ip): ClientIp,
    JsonBody(request): JsonBody<RegisterRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .accounts
        .register(Registration {
            name: request.name,
            company: request.company,
            email: request.email,
            password: request.password,
            captcha_token: request.turnstile_token,
            client_ip,
        })
        .await?;

    Ok(Json(MessageResponse::ok(
        "Registration successful! Please check your email to verify your account.",
    )))
}

/// GET /auth/verify?token=...
pub async fn verify(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<VerifyQuery>,
) -> Result<Json<VerifyResponse>, ApiError> {
    let response = match state.accounts.verify_email(query.token.as_deref()).await? {
        VerifyOutcome::Verified => VerifyResponse {
            success: true,
            message: "Email verified! Your account is awaiting review. We will contact you within 1-2 business days.".to_string(),
            already_verified: None,
        },
        VerifyOutcome::AlreadyVerified => VerifyResponse {
            success: true,
            message: "Email was already verified.".to_string(),
            already_verified: Some(true),
        },
    };

    Ok(Json(response))
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let outcome = state
        .accounts
        .login(&request.email, &request.password)
        .await?;

    Ok(Json(LoginResponse {
        success: true,
        token: outcome.token,
        user: outcome.user,
    }))
}
