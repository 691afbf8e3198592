//! Route definitions for the `/admin` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// GET /users  -> list_users (admin only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/users", get(admin::list_users))
}
