//! The reset-token delivery seam.

use async_trait::async_trait;
use warden_core::types::{DbId, Timestamp};

use crate::delivery::email::EmailError;

/// Everything a transport needs to tell a user how to reset their password.
#[derive(Debug, Clone)]
pub struct PasswordResetNotice {
    pub user_id: DbId,
    pub email: String,
    pub name: String,
    /// The signed reset token. Treat as a credential.
    pub token: String,
    /// Link embedding the token, built from `RESET_URL_BASE`.
    pub reset_url: String,
    pub expires_at: Timestamp,
}

/// Error type for notifier failures.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error(transparent)]
    Email(#[from] EmailError),
}

/// Delivers password-reset notices out of band.
///
/// Callers invoke this off the request path; a failure is logged and never
/// changes what the HTTP client sees.
#[async_trait]
pub trait ResetNotifier: Send + Sync {
    async fn send_password_reset(&self, notice: &PasswordResetNotice) -> Result<(), NotifyError>;
}

/// Development notifier: writes the reset link to the log instead of sending
/// it anywhere. Selected when SMTP is not configured.
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl ResetNotifier for LogNotifier {
    async fn send_password_reset(&self, notice: &PasswordResetNotice) -> Result<(), NotifyError> {
        tracing::info!(
            user_id = notice.user_id,
            reset_url = %notice.reset_url,
            expires_at = %notice.expires_at,
            "Password reset requested (SMTP not configured, link logged only)"
        );
        Ok(())
    }
}
