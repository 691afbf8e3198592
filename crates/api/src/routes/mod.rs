pub mod admin;
pub mod auth;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/signup                     register (public)
/// /auth/signin                     sign in, sets session cookie (public)
/// /auth/forgot-password            start password reset (public)
/// /auth/reset-password             finish password reset (public)
/// /auth/logout                     clear session cookie (public)
/// /auth/me                         current user (requires auth)
///
/// /admin/users                     list users (admin only)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/admin", admin::router())
}
