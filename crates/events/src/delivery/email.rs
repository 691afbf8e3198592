//! Password-reset delivery via SMTP.
//!
//! [`EmailDelivery`] wraps the `lettre` async SMTP transport to send plain-text
//! reset emails. Configuration is loaded from environment variables; if
//! `SMTP_HOST` is not set, [`EmailConfig::from_env`] returns `None` and the
//! server falls back to [`crate::LogNotifier`].

use async_trait::async_trait;
use lettre::message::header::{ContentTransferEncoding, ContentType};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::notifier::{NotifyError, PasswordResetNotice, ResetNotifier};

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for email delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),
}

// ---------------------------------------------------------------------------
// EmailConfig
// ---------------------------------------------------------------------------

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

/// Default sender address when `SMTP_FROM` is not set.
const DEFAULT_FROM_ADDRESS: &str = "noreply@warden.local";

const RESET_SUBJECT: &str = "Reset your password";

/// Configuration for the SMTP email delivery service.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// SMTP server hostname.
    pub smtp_host: String,
    /// SMTP server port (defaults to 587).
    pub smtp_port: u16,
    /// RFC 5322 "From" address.
    pub from_address: String,
    /// Optional SMTP username.
    pub smtp_user: Option<String>,
    /// Optional SMTP password.
    pub smtp_password: Option<String>,
}

impl EmailConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `SMTP_HOST` is not set, signalling that email
    /// delivery is not configured and should be skipped.
    ///
    /// | Variable        | Required | Default                 |
    /// |-----------------|----------|-------------------------|
    /// | `SMTP_HOST`     | yes      | --                      |
    /// | `SMTP_PORT`     | no       | `587`                   |
    /// | `SMTP_FROM`     | no       | `noreply@warden.local`  |
    /// | `SMTP_USER`     | no       | --                      |
    /// | `SMTP_PASSWORD` | no       | --                      |
    pub fn from_env() -> Option<Self> {
        let smtp_host = std::env::var("SMTP_HOST").ok()?;
        Some(Self {
            smtp_host,
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            from_address: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string()),
            smtp_user: std::env::var("SMTP_USER").ok(),
            smtp_password: std::env::var("SMTP_PASSWORD").ok(),
        })
    }
}

// ---------------------------------------------------------------------------
// EmailDelivery
// ---------------------------------------------------------------------------

/// Sends password-reset emails via SMTP.
pub struct EmailDelivery {
    config: EmailConfig,
}

impl EmailDelivery {
    /// Create a new email delivery service with the given configuration.
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Assemble the reset email without sending it.
    pub fn compose(&self, notice: &PasswordResetNotice) -> Result<Message, EmailError> {
        let body = format!(
            "Hello {name},\n\n\
             We received a request to reset the password for your account.\n\
             Open the link below to choose a new password:\n\n\
             {url}\n\n\
             The link expires at {expires} (UTC). If you did not ask for a reset,\n\
             you can ignore this email; your password has not changed.\n",
            name = notice.name,
            url = notice.reset_url,
            expires = notice.expires_at.format("%Y-%m-%d %H:%M"),
        );

        Message::builder()
            .from(self.config.from_address.parse()?)
            .to(notice.email.parse()?)
            .subject(RESET_SUBJECT)
            .header(ContentType::TEXT_PLAIN)
            // Base64 never soft-wraps or escapes the reset URL.
            .header(ContentTransferEncoding::Base64)
            .body(body)
            .map_err(|e| EmailError::Build(e.to_string()))
    }

    async fn send(&self, email: Message) -> Result<(), EmailError> {
        let mut transport_builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_host)?
                .port(self.config.smtp_port);

        if let (Some(user), Some(pass)) = (&self.config.smtp_user, &self.config.smtp_password) {
            transport_builder =
                transport_builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        let mailer = transport_builder.build();
        mailer.send(email).await?;
        Ok(())
    }
}

#[async_trait]
impl ResetNotifier for EmailDelivery {
    async fn send_password_reset(&self, notice: &PasswordResetNotice) -> Result<(), NotifyError> {
        let email = self.compose(notice)?;
        self.send(email).await?;

        tracing::info!(user_id = notice.user_id, "Password reset email sent");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;

    use super::*;

    fn test_delivery() -> EmailDelivery {
        EmailDelivery::new(EmailConfig {
            smtp_host: "smtp.invalid".to_string(),
            smtp_port: DEFAULT_SMTP_PORT,
            from_address: DEFAULT_FROM_ADDRESS.to_string(),
            smtp_user: None,
            smtp_password: None,
        })
    }

    fn test_notice(email: &str, reset_url: &str) -> PasswordResetNotice {
        PasswordResetNotice {
            user_id: 1,
            email: email.to_string(),
            name: "Ada".to_string(),
            token: "tok".to_string(),
            reset_url: reset_url.to_string(),
            expires_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn from_env_returns_none_without_smtp_host() {
        // Ensure SMTP_HOST is not set in the test environment.
        std::env::remove_var("SMTP_HOST");
        assert!(EmailConfig::from_env().is_none());
    }

    /// Split a formatted message into its header block and decoded body.
    fn decode(message: &Message) -> (String, String) {
        let raw = String::from_utf8(message.formatted()).unwrap();
        let (headers, body) = raw.split_once("\r\n\r\n").expect("header/body separator");
        let encoded: String = body.split_whitespace().collect();
        let decoded = STANDARD.decode(encoded).expect("body should be base64");
        (headers.to_string(), String::from_utf8(decoded).unwrap())
    }

    #[test]
    fn compose_addresses_the_account_owner() {
        let message = test_delivery()
            .compose(&test_notice("ada@example.com", "http://localhost/r?token=tok"))
            .expect("message should build");
        let (headers, body) = decode(&message);

        assert!(headers.contains("To: ada@example.com"));
        assert!(headers.contains("Subject: Reset your password"));
        assert!(headers.contains("Content-Transfer-Encoding: base64"));
        assert!(body.contains("Hello Ada,"));
        assert!(body.lines().any(|line| line == "http://localhost/r?token=tok"));
    }

    #[test]
    fn compose_keeps_long_reset_url_on_one_line() {
        let token = format!("eyJhbGciOiJIUzI1NiJ9.{}.{}", "x".repeat(180), "s".repeat(43));
        let url = format!("https://app.example.com/reset-password?token={token}");
        let message = test_delivery()
            .compose(&test_notice("ada@example.com", &url))
            .expect("message should build");
        let (_, body) = decode(&message);

        assert!(
            body.lines().any(|line| line == url),
            "reset URL must survive intact on its own line"
        );
    }

    #[test]
    fn compose_rejects_bad_recipient() {
        let err = test_delivery()
            .compose(&test_notice("not-an-email", "http://localhost/r?token=tok"))
            .unwrap_err();
        assert!(err.to_string().contains("Email address parse error"));
    }

    #[test]
    fn email_error_display_build() {
        let err = EmailError::Build("missing body".to_string());
        assert_eq!(err.to_string(), "Email build error: missing body");
    }
}
