//! Request extractors shared by the handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;
use warden_core::error::CoreError;

use crate::error::AppError;

/// Message for a body that is not JSON, or whose fields have the wrong type.
pub const INVALID_BODY_MESSAGE: &str = "Please provide a valid JSON request body";

/// `axum::Json` whose rejection is an [`AppError`], so a malformed body gets
/// the same 400 envelope as a failed field check.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection.body_text(), "Request body rejected");
        AppError::Core(CoreError::Validation(INVALID_BODY_MESSAGE.into()))
    }
}
