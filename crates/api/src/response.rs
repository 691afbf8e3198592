//! Shared response envelope for API handlers.
//!
//! Every JSON response uses `{ "message", "data"?, "success", "error" }` so
//! the front-end can branch on `success` without inspecting status codes.
//! Error bodies are produced by [`crate::error::AppError`] in the same shape.

use serde::Serialize;

/// Standard success envelope.
///
/// # Example
///
/// ```ignore
/// Ok(Json(ApiResponse::with_data("User created Successfully!", user)))
/// ```
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub success: bool,
    pub error: bool,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn with_data(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
            success: true,
            error: false,
        }
    }
}

impl ApiResponse<()> {
    /// A success envelope with no `data` field.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            data: None,
            success: true,
            error: false,
        }
    }
}
