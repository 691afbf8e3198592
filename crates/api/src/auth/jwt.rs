//! Session and password-reset token generation/validation.
//!
//! Both token kinds are HS256-signed JWTs carrying a [`Claims`] payload with a
//! `purpose` claim. Each purpose is signed with its own key, so a session
//! token can never be replayed as a reset token (or vice versa) even before
//! the purpose check runs. Tokens are stateless: validity is signature plus
//! expiry, with no server-side revocation.

use hmac::{Hmac, Mac};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use uuid::Uuid;
use warden_core::types::DbId;

/// `purpose` claim of a session token.
pub const PURPOSE_SESSION: &str = "session";
/// `purpose` claim of a password-reset token.
pub const PURPOSE_PASSWORD_RESET: &str = "password-reset";

/// Default session token lifetime: 8 hours.
const DEFAULT_SESSION_EXPIRY_SECS: i64 = 8 * 60 * 60;
/// Default reset token lifetime: 1 hour.
const DEFAULT_RESET_EXPIRY_SECS: i64 = 60 * 60;

/// JWT claims embedded in every token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the user's internal database id.
    pub sub: DbId,
    /// The user's normalized email at issue time.
    pub email: String,
    /// What the token authorizes: [`PURPOSE_SESSION`] or [`PURPOSE_PASSWORD_RESET`].
    pub purpose: String,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Unique token identifier (UUID v4) for audit.
    pub jti: String,
}

/// Why a token was rejected.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// Malformed, badly signed, or expired.
    #[error("Token verification failed: {0}")]
    Invalid(#[from] jsonwebtoken::errors::Error),

    /// Verified, but issued for something else.
    #[error("Token purpose mismatch: expected {expected}, found {found}")]
    WrongPurpose {
        expected: &'static str,
        found: String,
    },
}

/// Configuration for token generation and validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret for session tokens.
    pub session_secret: String,
    /// HMAC-SHA256 secret for password-reset tokens. Never equal to
    /// `session_secret`.
    pub reset_secret: String,
    /// Session token lifetime in seconds (default: 8h).
    pub session_expiry_secs: i64,
    /// Reset token lifetime in seconds (default: 1h).
    pub reset_expiry_secs: i64,
}

impl JwtConfig {
    /// Load token configuration from environment variables.
    ///
    /// | Env Var                     | Required | Default              |
    /// |-----------------------------|----------|----------------------|
    /// | `JWT_SECRET`                | **yes**  | --                   |
    /// | `JWT_RESET_SECRET`          | no       | derived from above   |
    /// | `SESSION_TOKEN_EXPIRY_SECS` | no       | `28800`              |
    /// | `RESET_TOKEN_EXPIRY_SECS`   | no       | `3600`               |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or is empty, if the two secrets are
    /// equal, or if an expiry is not a valid i64.
    pub fn from_env() -> Self {
        let session_secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!session_secret.is_empty(), "JWT_SECRET must not be empty");

        let reset_secret = std::env::var("JWT_RESET_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| derive_reset_secret(&session_secret));
        assert_ne!(
            session_secret, reset_secret,
            "JWT_RESET_SECRET must differ from JWT_SECRET"
        );

        let session_expiry_secs: i64 = std::env::var("SESSION_TOKEN_EXPIRY_SECS")
            .unwrap_or_else(|_| DEFAULT_SESSION_EXPIRY_SECS.to_string())
            .parse()
            .expect("SESSION_TOKEN_EXPIRY_SECS must be a valid i64");

        let reset_expiry_secs: i64 = std::env::var("RESET_TOKEN_EXPIRY_SECS")
            .unwrap_or_else(|_| DEFAULT_RESET_EXPIRY_SECS.to_string())
            .parse()
            .expect("RESET_TOKEN_EXPIRY_SECS must be a valid i64");

        Self {
            session_secret,
            reset_secret,
            session_expiry_secs,
            reset_expiry_secs,
        }
    }

    /// Build a config from a single master secret, deriving the reset key.
    pub fn from_secret(secret: &str) -> Self {
        Self {
            session_secret: secret.to_string(),
            reset_secret: derive_reset_secret(secret),
            session_expiry_secs: DEFAULT_SESSION_EXPIRY_SECS,
            reset_expiry_secs: DEFAULT_RESET_EXPIRY_SECS,
        }
    }
}

type HmacSha256 = Hmac<Sha256>;

/// Derive the reset signing key from the session secret.
///
/// HMAC-SHA256 keyed by the session secret over the purpose label, hex
/// encoded. Knowing a reset key does not reveal the session key.
pub fn derive_reset_secret(session_secret: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(session_secret.as_bytes())
        .expect("HMAC accepts any key length");
    mac.update(PURPOSE_PASSWORD_RESET.as_bytes());
    format!("{:x}", mac.finalize().into_bytes())
}

/// Generate a session token for the given user.
pub fn generate_session_token(
    user_id: DbId,
    email: &str,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = build_claims(user_id, email, PURPOSE_SESSION, config.session_expiry_secs);
    sign(&claims, &config.session_secret)
}

/// Generate a password-reset token for the given user.
pub fn generate_reset_token(
    user_id: DbId,
    email: &str,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = build_claims(
        user_id,
        email,
        PURPOSE_PASSWORD_RESET,
        config.reset_expiry_secs,
    );
    sign(&claims, &config.reset_secret)
}

/// Validate a session token, returning its [`Claims`].
pub fn validate_session_token(token: &str, config: &JwtConfig) -> Result<Claims, TokenError> {
    verify(token, &config.session_secret, PURPOSE_SESSION)
}

/// Validate a password-reset token, returning its [`Claims`].
///
/// Signature and expiry failures yield [`TokenError::Invalid`]; a correctly
/// signed token with any other purpose yields [`TokenError::WrongPurpose`].
pub fn validate_reset_token(token: &str, config: &JwtConfig) -> Result<Claims, TokenError> {
    verify(token, &config.reset_secret, PURPOSE_PASSWORD_RESET)
}

fn build_claims(user_id: DbId, email: &str, purpose: &str, lifetime_secs: i64) -> Claims {
    let now = chrono::Utc::now().timestamp();
    Claims {
        sub: user_id,
        email: email.to_string(),
        purpose: purpose.to_string(),
        exp: now + lifetime_secs,
        iat: now,
        jti: Uuid::new_v4().to_string(),
    }
}

fn sign(claims: &Claims, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
    encode(
        &Header::default(), // HS256
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

fn verify(token: &str, secret: &str, expected: &'static str) -> Result<Claims, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    // Expiry is exact: a token is dead the second its window closes.
    validation.leeway = 0;

    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )?
    .claims;

    if claims.purpose != expected {
        return Err(TokenError::WrongPurpose {
            expected,
            found: claims.purpose,
        });
    }
    Ok(claims)
}
