//! Handlers for the `/auth` resource (signup, signin, password recovery,
//! logout, current user).

use std::sync::Arc;

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderName, StatusCode};
use axum::Json;
use serde::Deserialize;
use warden_core::error::CoreError;
use warden_core::roles::ROLE_GENERAL;
use warden_core::validation::{
    normalize_email, require, require_trimmed, validate_email, validate_password_length,
};
use warden_db::models::user::{CreateUser, User, UserResponse};
use warden_events::PasswordResetNotice;

use crate::auth::cookie::{clear_session_cookie, session_cookie};
use crate::auth::jwt::{
    generate_reset_token, generate_session_token, validate_reset_token, TokenError,
};
use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Returned by forgot-password whether or not the account exists.
pub const FORGOT_PASSWORD_MESSAGE: &str =
    "If an account with that email exists, we've sent password reset instructions.";

/// Response headers carrying the session cookie.
type CookieHeader = [(HeaderName, String); 1];

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

// Fields are optional so a missing value gets its own validation message;
// a mistyped field falls through to `AppJson`'s generic 400.

/// Request body for `POST /auth/signup`.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
}

/// Request body for `POST /auth/signin`.
#[derive(Debug, Deserialize)]
pub struct SigninRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Request body for `POST /auth/forgot-password`.
#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: Option<String>,
}

/// Request body for `POST /auth/reset-password`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub token: Option<String>,
    pub new_password: Option<String>,
    pub confirm_password: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/signup
///
/// Register a GENERAL account. Returns 201 with the public user record.
pub async fn signup(
    State(state): State<AppState>,
    AppJson(input): AppJson<SignupRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<UserResponse>>)> {
    // 1. Field presence, then shape.
    let email = require_trimmed(input.email.as_deref(), "Please provide email")?;
    let password = require(input.password.as_deref(), "Please provide password")?;
    let name = require_trimmed(input.name.as_deref(), "Please provide name")?;
    validate_password_length(password)?;
    let email = normalize_email(email);
    validate_email(&email)?;

    // 2. Reject a taken email. The store's uniqueness check still catches a
    //    concurrent signup that slips between this read and the insert.
    if state.store.find_by_email(&email).await?.is_some() {
        return Err(CoreError::Conflict("User already exists with this email".into()).into());
    }

    // 3. Hash and persist.
    let password_hash = hash_password(password)?;

    let user = state
        .store
        .create_user(&CreateUser {
            email,
            name: name.to_string(),
            password_hash,
            role: ROLE_GENERAL.to_string(),
        })
        .await?;

    tracing::info!(user_id = user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_data(
            "User created Successfully!",
            UserResponse::from(&user),
        )),
    ))
}

/// POST /api/v1/auth/signin
///
/// Verify credentials and issue a session token, both as the `token` cookie
/// and in the response body.
pub async fn signin(
    State(state): State<AppState>,
    AppJson(input): AppJson<SigninRequest>,
) -> AppResult<(CookieHeader, Json<ApiResponse<String>>)> {
    let email = require_trimmed(input.email.as_deref(), "Please provide email")?;
    let password = require(input.password.as_deref(), "Please provide password")?;
    let email = normalize_email(email);

    // 1. Find the account.
    let user = state
        .store
        .find_by_email(&email)
        .await?
        .ok_or(CoreError::NotFound { entity: "User" })?;

    // 2. Verify password.
    if !verify_password(password, &user.password_hash)? {
        tracing::info!(user_id = user.id, "Signin rejected: wrong password");
        return Err(CoreError::Unauthorized("Please check Password".into()).into());
    }

    // 3. Issue the session token.
    let jwt = &state.config.jwt;
    let token = generate_session_token(user.id, &user.email, jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;
    let cookie = session_cookie(&token, jwt.session_expiry_secs, state.config.secure_cookies);

    tracing::info!(user_id = user.id, "User signed in");

    Ok((
        [(SET_COOKIE, cookie)],
        Json(ApiResponse::with_data("Login successfully", token)),
    ))
}

/// POST /api/v1/auth/forgot-password
///
/// Start a password reset. The response is identical whether or not the
/// email belongs to an account; when it does, the reset token goes to the
/// notifier and never into the response.
pub async fn forgot_password(
    State(state): State<AppState>,
    AppJson(input): AppJson<ForgotPasswordRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    let email = require_trimmed(input.email.as_deref(), "Please provide email address")?;
    let email = normalize_email(email);
    validate_email(&email)?;

    match state.store.find_by_email(&email).await? {
        Some(user) => match generate_reset_token(user.id, &user.email, &state.config.jwt) {
            Ok(token) => dispatch_reset_notice(&state, &user, token),
            Err(e) => tracing::error!(user_id = user.id, error = %e, "Reset token generation failed"),
        },
        None => {
            // Same signing work as the hit path; the token is discarded.
            let _ = generate_reset_token(0, &email, &state.config.jwt);
            tracing::debug!("Password reset requested for unknown email");
        }
    }

    Ok(Json(ApiResponse::message(FORGOT_PASSWORD_MESSAGE)))
}

/// POST /api/v1/auth/reset-password
///
/// Replace the password of the account named by a valid reset token. All
/// input checks run before the token is looked at. Does not sign the user in.
pub async fn reset_password(
    State(state): State<AppState>,
    AppJson(input): AppJson<ResetPasswordRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    // 1. Input checks.
    let token = require(input.token.as_deref(), "Reset token is required")?;
    let new_password = require(input.new_password.as_deref(), "Please provide new password")?;
    let confirm_password = require(
        input.confirm_password.as_deref(),
        "Please confirm your new password",
    )?;
    if new_password != confirm_password {
        return Err(CoreError::Validation("Passwords do not match".into()).into());
    }
    validate_password_length(new_password)?;

    // 2. Token signature, expiry, and purpose.
    let claims = validate_reset_token(token, &state.config.jwt).map_err(|e| {
        tracing::info!(error = %e, "Reset token rejected");
        match e {
            TokenError::WrongPurpose { .. } => AppError::BadRequest("Invalid reset token".into()),
            TokenError::Invalid(_) => {
                AppError::BadRequest("Invalid or expired reset token".into())
            }
        }
    })?;

    // 3. The account must still exist.
    let user = state
        .store
        .find_by_id(claims.sub)
        .await?
        .ok_or(CoreError::NotFound { entity: "User" })?;

    // 4. Store the new hash.
    let password_hash = hash_password(new_password)?;
    if !state.store.update_password(user.id, &password_hash).await? {
        return Err(CoreError::NotFound { entity: "User" }.into());
    }

    tracing::info!(user_id = user.id, "Password reset completed");

    Ok(Json(ApiResponse::message(
        "Password reset successfully. Please login with your new password.",
    )))
}

/// POST /api/v1/auth/logout
///
/// Clear the session cookie. Tokens are stateless, so a copy of the token
/// held elsewhere stays valid until it expires.
pub async fn logout(State(state): State<AppState>) -> (CookieHeader, Json<ApiResponse<()>>) {
    (
        [(SET_COOKIE, clear_session_cookie(state.config.secure_cookies))],
        Json(ApiResponse::message("Logged out successfully")),
    )
}

/// GET /api/v1/auth/me
///
/// The signed-in user's public record.
pub async fn me(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    let user = state
        .store
        .find_by_id(auth_user.user_id)
        .await?
        .ok_or(CoreError::NotFound { entity: "User" })?;

    Ok(Json(ApiResponse::with_data(
        "User details",
        UserResponse::from(&user),
    )))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Hand the reset token to the notifier on a detached task, so delivery
/// latency and failures never reach the HTTP response.
fn dispatch_reset_notice(state: &AppState, user: &User, token: String) {
    let expires_at =
        chrono::Utc::now() + chrono::Duration::seconds(state.config.jwt.reset_expiry_secs);
    let notice = PasswordResetNotice {
        user_id: user.id,
        email: user.email.clone(),
        name: user.name.clone(),
        reset_url: format!("{}?token={token}", state.config.reset_url_base),
        token,
        expires_at,
    };

    let notifier = Arc::clone(&state.notifier);
    tokio::spawn(async move {
        if let Err(e) = notifier.send_password_reset(&notice).await {
            tracing::error!(
                user_id = notice.user_id,
                error = %e,
                "Failed to deliver password reset notice"
            );
        }
    });
}
