//! Out-of-band delivery for account events.
//!
//! The API layer never returns a password-reset token in an HTTP response.
//! It hands a [`PasswordResetNotice`] to a [`ResetNotifier`], which delivers
//! it through a channel only the account owner can read.
//!
//! - [`notifier`] -- the [`ResetNotifier`] seam and the log-only notifier.
//! - [`delivery`] -- concrete transports (SMTP email).

pub mod delivery;
pub mod notifier;

pub use delivery::email::{EmailConfig, EmailDelivery, EmailError};
pub use notifier::{LogNotifier, NotifyError, PasswordResetNotice, ResetNotifier};
