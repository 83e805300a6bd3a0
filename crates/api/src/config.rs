use serde::Deserialize;
use std::net::{AddrParseError, SocketAddr};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub security: SecurityConfig,
    /// Session token signing configuration
    pub jwt: JwtAuthConfig,
    /// Turnstile CAPTCHA configuration
    pub captcha: CaptchaConfig,
    /// Transactional email configuration
    #[serde(default)]
    pub email: EmailConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Public site origin; used for email links and always allowed by CORS
    #[serde(default = "default_frontend_url")]
    pub frontend_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
}

impl DatabaseConfig {
    pub fn pool_config(&self) -> persistence::db::DatabaseConfig {
        persistence::db::DatabaseConfig {
            url: self.url.clone(),
            max_connections: self.max_connections,
            min_connections: self.min_connections,
            connect_timeout_secs: self.connect_timeout_secs,
            idle_timeout_secs: self.idle_timeout_secs,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// json, pretty or compact
    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    /// Extra origins allowed by CORS besides `server.frontend_url`
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Shared bearer secret for every admin endpoint
    #[serde(default)]
    pub admin_secret: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtAuthConfig {
    /// HMAC-SHA256 signing secret
    #[serde(default)]
    pub secret: String,

    /// Session lifetime in seconds (default: 604800 = 7 days)
    #[serde(default = "default_session_expiry")]
    pub session_expiry_secs: i64,

    /// Clock skew tolerance in seconds (default: 0)
    #[serde(default)]
    pub leeway_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CaptchaConfig {
    #[serde(default)]
    pub secret_key: String,

    #[serde(default = "default_captcha_verify_url")]
    pub verify_url: String,

    #[serde(default = "default_captcha_timeout_ms")]
    pub timeout_ms: u64,
}

/// Email delivery configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    /// Whether email sending is enabled
    #[serde(default)]
    pub enabled: bool,

    /// Email provider: resend, or console (for development)
    #[serde(default = "default_email_provider")]
    pub provider: String,

    /// Resend API key (for resend provider)
    #[serde(default)]
    pub resend_api_key: String,

    /// Resend API base URL
    #[serde(default = "default_resend_api_url")]
    pub api_url: String,

    #[serde(default = "default_sender_email")]
    pub sender_email: String,

    #[serde(default = "default_sender_name")]
    pub sender_name: String,

    /// Send on a detached task instead of awaiting delivery in the request
    #[serde(default)]
    pub background: bool,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            provider: default_email_provider(),
            resend_api_key: String::new(),
            api_url: default_resend_api_url(),
            sender_email: default_sender_email(),
            sender_name: default_sender_name(),
            background: false,
        }
    }
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_request_timeout() -> u64 {
    30
}
fn default_frontend_url() -> String {
    "https://aitrify.com".to_string()
}
fn default_max_connections() -> u32 {
    10
}
fn default_min_connections() -> u32 {
    1
}
fn default_connect_timeout() -> u64 {
    10
}
fn default_idle_timeout() -> u64 {
    600
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}
fn default_session_expiry() -> i64 {
    shared::jwt::DEFAULT_SESSION_EXPIRY_SECS
}
fn default_captcha_verify_url() -> String {
    "https://challenges.cloudflare.com/turnstile/v0/siteverify".to_string()
}
fn default_captcha_timeout_ms() -> u64 {
    5000
}
fn default_email_provider() -> String {
    "console".to_string()
}
fn default_resend_api_url() -> String {
    "https://api.resend.com".to_string()
}
fn default_sender_email() -> String {
    "noreply@aitrify.com".to_string()
}
fn default_sender_name() -> String {
    "AItrify".to_string()
}

/// Configuration validation error
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Loading order (later sources override earlier):
    /// 1. config/default.toml - base configuration with defaults
    /// 2. config/local.toml - local overrides (optional, not in git)
    /// 3. Environment variables with PORTAL__ prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("PORTAL").separator("__"))
            .build()?;

        let cfg: Self = config.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }

    /// Builds a config from embedded defaults plus overrides, without files.
    #[cfg(test)]
    pub fn load_for_test(overrides: &[(&str, &str)]) -> Result<Self, config::ConfigError> {
        let defaults = r#"
            [server]
            host = "0.0.0.0"
            port = 8080
            request_timeout_secs = 30
            frontend_url = "https://aitrify.com"

            [database]
            url = ""
            max_connections = 10
            min_connections = 1
            connect_timeout_secs = 10
            idle_timeout_secs = 600

            [logging]
            level = "info"
            format = "json"

            [security]
            cors_origins = []
            admin_secret = "test-admin-secret"

            [jwt]
            secret = "test-jwt-secret"
            session_expiry_secs = 604800
            leeway_secs = 0

            [captcha]
            secret_key = "test-turnstile-secret"
            verify_url = "https://challenges.cloudflare.com/turnstile/v0/siteverify"
            timeout_ms = 5000

            [email]
            enabled = false
            provider = "console"
            sender_email = "noreply@aitrify.com"
            sender_name = "AItrify"
        "#;

        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(defaults, config::FileFormat::Toml));

        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }

        builder.build()?.try_deserialize()
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.database.url.is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "PORTAL__DATABASE__URL environment variable must be set".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "Server port cannot be 0".to_string(),
            ));
        }

        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigValidationError::InvalidValue(
                "min_connections cannot exceed max_connections".to_string(),
            ));
        }

        if self.jwt.secret.is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "PORTAL__JWT__SECRET environment variable must be set".to_string(),
            ));
        }

        if self.security.admin_secret.is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "PORTAL__SECURITY__ADMIN_SECRET environment variable must be set".to_string(),
            ));
        }

        if self.email.provider == "resend" && self.email.resend_api_key.is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "PORTAL__EMAIL__RESEND_API_KEY is required for the resend provider".to_string(),
            ));
        }

        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, AddrParseError> {
        format!("{}:{}", self.server.host, self.server.port).parse()
    }

    /// CORS allowlist: configured origins plus the frontend origin, deduplicated.
    pub fn allowed_origins(&self) -> Vec<String> {
        let mut origins: Vec<String> = Vec::new();
        let frontend = self.server.frontend_url.trim_end_matches('/');
        for origin in self
            .security
            .cors_origins
            .iter()
            .map(|o| o.trim_end_matches('/'))
            .chain(std::iter::once(frontend))
        {
            if !origin.is_empty() && !origins.iter().any(|o| o == origin) {
                origins.push(origin.to_string());
            }
        }
        origins
    }

    /// Frontend URL without a trailing slash, for building links.
    pub fn frontend_base(&self) -> &str {
        self.server.frontend_url.trim_end_matches('/')
    }
}
