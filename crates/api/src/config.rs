use crate::auth::jwt::JwtConfig;

/// Value of `APP_ENV` that switches on production-only behaviour.
const PRODUCTION_ENV: &str = "production";

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have sensible defaults suitable for
/// local development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8080`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Whether the session cookie carries the `Secure` flag
    /// (`APP_ENV=production`).
    pub secure_cookies: bool,
    /// Prefix of the link placed in password-reset emails; the token is
    /// appended as `?token=`.
    pub reset_url_base: String,
    /// Token signing keys and lifetimes.
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                                |
    /// |------------------------|----------------------------------------|
    /// | `HOST`                 | `0.0.0.0`                              |
    /// | `PORT`                 | `8080`                                 |
    /// | `CORS_ORIGINS`         | `http://localhost:3000`                |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                                   |
    /// | `APP_ENV`              | `development`                          |
    /// | `RESET_URL_BASE`       | `http://localhost:3000/reset-password` |
    ///
    /// See [`JwtConfig::from_env`] for the token variables.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let secure_cookies = is_production(std::env::var("APP_ENV").ok().as_deref());

        let reset_url_base = std::env::var("RESET_URL_BASE")
            .unwrap_or_else(|_| "http://localhost:3000/reset-password".into());

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            secure_cookies,
            reset_url_base,
            jwt,
        }
    }
}

/// `APP_ENV` names production, ignoring case and surrounding whitespace.
fn is_production(app_env: Option<&str>) -> bool {
    app_env.is_some_and(|env| env.trim().eq_ignore_ascii_case(PRODUCTION_ENV))
}
