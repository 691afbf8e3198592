//! Handlers for the `/admin` resource.
//!
//! All handlers require the `ADMIN` role via [`RequireAdmin`].

use axum::extract::State;
use axum::Json;
use warden_db::models::user::UserResponse;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::response::ApiResponse;
use crate::state::AppState;

/// GET /api/v1/admin/users
///
/// List every account, newest first, without password hashes.
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> AppResult<Json<ApiResponse<Vec<UserResponse>>>> {
    let users = state.store.list_users().await?;
    tracing::debug!(admin_id = admin.user_id, count = users.len(), "Listed users");

    let responses: Vec<UserResponse> = users.iter().map(UserResponse::from).collect();
    Ok(Json(ApiResponse::with_data("All users", responses)))
}
