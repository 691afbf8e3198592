//! Role-based access control (RBAC) extractors.
//!
//! The role is loaded from the credential store on every request rather than
//! trusted from the token, so a role change applies immediately.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use warden_core::error::CoreError;
use warden_core::roles::ROLE_ADMIN;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `ADMIN` role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(user): RequireAdmin) -> AppResult<Json<()>> {
///     // user is guaranteed to be an admin here
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;

        let is_admin = state
            .store
            .find_by_id(user.user_id)
            .await?
            .is_some_and(|record| record.role == ROLE_ADMIN);

        if !is_admin {
            tracing::warn!(user_id = user.user_id, "Non-admin denied admin route");
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin role required".into(),
            )));
        }
        Ok(RequireAdmin(user))
    }
}
