//! Input rules for account credentials.
//!
//! Every auth endpoint runs its raw request fields through these helpers
//! before touching the credential store, so the messages returned to the
//! client are consistent across signup, signin, and password recovery.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

/// Minimum number of characters in an account password.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Basic `local@domain.tld` shape: no whitespace, exactly one `@`, and a dot
/// somewhere in the domain part.
pub const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMAIL_PATTERN).expect("valid regex"));

/// Return the field value, or a validation error carrying `message` when the
/// field is absent or empty.
pub fn require<'a>(value: Option<&'a str>, message: &str) -> Result<&'a str, CoreError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(CoreError::Validation(message.to_string())),
    }
}

/// Like [`require`], but trims the value first, so whitespace alone counts as
/// missing.
pub fn require_trimmed<'a>(value: Option<&'a str>, message: &str) -> Result<&'a str, CoreError> {
    require(value.map(str::trim), message)
}

/// Canonical form used for every email lookup and insert.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validate the email shape against [`EMAIL_PATTERN`].
pub fn validate_email(email: &str) -> Result<(), CoreError> {
    if !EMAIL_RE.is_match(email) {
        return Err(CoreError::Validation(
            "Please provide a valid email address".to_string(),
        ));
    }
    Ok(())
}

/// Enforce [`MIN_PASSWORD_LENGTH`], counted in characters rather than bytes.
pub fn validate_password_length(password: &str) -> Result<(), CoreError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(CoreError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters long"
        )));
    }
    Ok(())
}
