//! Session-token authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use warden_core::error::CoreError;
use warden_core::types::DbId;

use crate::auth::cookie::session_token_from_headers;
use crate::auth::jwt::validate_session_token;
use crate::error::AppError;
use crate::state::AppState;

/// The single rejection every unauthenticated request gets, whether the token
/// was missing, forged, expired, or issued for another purpose.
const REJECTION_MESSAGE: &str = "Access denied. Please login to continue.";

/// Authenticated caller extracted from a verified session token.
///
/// The token is read from the `token` cookie; if no cookie is present, an
/// `Authorization: Bearer <token>` header is accepted instead. Use this as an
/// extractor parameter in any handler that requires authentication:
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's internal database id (from `claims.sub`).
    pub user_id: DbId,
    /// The email the token was issued for.
    pub email: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = session_token_from_headers(&parts.headers).or_else(|| bearer(parts))
        else {
            tracing::debug!("Request without session token");
            return Err(rejection());
        };

        let claims = validate_session_token(&token, &state.config.jwt).map_err(|e| {
            tracing::debug!(error = %e, "Session token rejected");
            rejection()
        })?;

        Ok(AuthUser {
            user_id: claims.sub,
            email: claims.email,
        })
    }
}

fn bearer(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

fn rejection() -> AppError {
    AppError::Core(CoreError::Unauthorized(REJECTION_MESSAGE.into()))
}
