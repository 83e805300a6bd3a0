use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use domain::services::{AgentStore, CaptchaVerifier, EnterpriseStore, MailError, Mailer};
use persistence::{AgentRepository, EnterpriseRepository};
use shared::jwt::{JwtConfig, JwtError};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::warn;

use crate::config::Config;
use crate::error;
use crate::middleware::request_id;
use crate::routes::{admin, agents, auth, health, user};
use crate::services::captcha::CaptchaError;
use crate::services::mail_transport::build_mailer;
use crate::services::{
    AccountService, AdminService, AgentService, EmailService, TurnstileVerifier,
};

/// Failures while wiring the application together.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Invalid JWT configuration: {0}")]
    Jwt(#[from] JwtError),

    #[error("Failed to build CAPTCHA client: {0}")]
    Captcha(#[from] CaptchaError),

    #[error("Failed to build mailer: {0}")]
    Mailer(#[from] MailError),
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub jwt: Arc<JwtConfig>,
    /// Absent when the app runs on the in-memory store.
    pub pool: Option<PgPool>,
    pub accounts: AccountService,
    pub agents: AgentService,
    pub admin: AdminService,
}

impl AppState {
    /// Wires services over the given collaborators.
    pub fn new(
        config: Config,
        pool: Option<PgPool>,
        enterprises: Arc<dyn EnterpriseStore>,
        agent_store: Arc<dyn AgentStore>,
        captcha: Arc<dyn CaptchaVerifier>,
        mailer: Arc<dyn Mailer>,
    ) -> Result<Self, StartupError> {
        let config = Arc::new(config);
        let jwt = Arc::new(JwtConfig::with_leeway(
            &config.jwt.secret,
            config.jwt.session_expiry_secs,
            config.jwt.leeway_secs,
        )?);

        let email = EmailService::new(mailer, &config.email, config.frontend_base());
        let accounts =
            AccountService::new(enterprises.clone(), captcha, email.clone(), jwt.clone());
        let agents = AgentService::new(enterprises.clone(), agent_store.clone());
        let admin = AdminService::new(enterprises, agent_store, email);

        Ok(Self {
            config,
            jwt,
            pool,
            accounts,
            agents,
            admin,
        })
    }
}

/// Builds the production application over a PostgreSQL pool.
pub fn create_app(config: Config, pool: PgPool) -> Result<Router, StartupError> {
    let enterprises: Arc<dyn EnterpriseStore> = Arc::new(EnterpriseRepository::new(pool.clone()));
    let agent_store: Arc<dyn AgentStore> = Arc::new(AgentRepository::new(pool.clone()));
    let captcha: Arc<dyn CaptchaVerifier> = Arc::new(TurnstileVerifier::new(&config.captcha)?);
    let mailer = build_mailer(&config.email)?;

    let state = AppState::new(
        config,
        Some(pool),
        enterprises,
        agent_store,
        captcha,
        mailer,
    )?;
    Ok(create_router(state))
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins()
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .max_age(Duration::from_secs(86400))
}

/// Routes and global middleware over a prepared state.
pub fn create_router(state: AppState) -> Router {
    let config = state.config.clone();

    // Wrong methods on known paths get the JSON 404 as well
    let public_routes = Router::new()
        .route("/health", get(health::health_check).fallback(error::not_found))
        .route("/auth/register", post(auth::register).fallback(error::not_found))
        .route("/auth/verify", get(auth::verify).fallback(error::not_found))
        .route("/auth/login", post(auth::login).fallback(error::not_found))
        .route("/agents", get(agents::list_agent_types).fallback(error::not_found));

    // Session token checked by the EnterpriseAuth extractor
    let user_routes = Router::new()
        .route("/user/profile", get(user::profile).fallback(error::not_found))
        .route("/user/agents", get(user::list_agents).fallback(error::not_found))
        .route(
            "/user/agents/request",
            post(user::request_agent).fallback(error::not_found),
        );

    // Admin secret checked by the AdminAuth extractor
    let admin_routes = Router::new()
        .route(
            "/admin/enterprises",
            get(admin::list_enterprises).fallback(error::not_found),
        )
        .route(
            "/admin/enterprises/:id/approve",
            post(admin::approve_enterprise).fallback(error::not_found),
        )
        .route(
            "/admin/enterprises/:id/reject",
            post(admin::reject_enterprise).fallback(error::not_found),
        )
        .route(
            "/admin/enterprises/:id/suspend",
            post(admin::suspend_enterprise).fallback(error::not_found),
        )
        .route(
            "/admin/enterprises/:id/unsuspend",
            post(admin::unsuspend_enterprise).fallback(error::not_found),
        )
        .route(
            "/admin/agent-requests",
            get(admin::list_agent_requests).fallback(error::not_found),
        )
        .route(
            "/admin/agent-requests/:id/approve",
            post(admin::approve_agent_request).fallback(error::not_found),
        )
        .route(
            "/admin/agent-requests/:id/reject",
            post(admin::reject_agent_request).fallback(error::not_found),
        );

    Router::new()
        .merge(public_routes)
        .merge(user_routes)
        .merge(admin_routes)
        .fallback(error::not_found)
        // Global middleware (bottom layers run first)
        .layer(CatchPanicLayer::custom(error::panic_response))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config))
        .layer(middleware::from_fn(request_id))
        .with_state(state)
}
