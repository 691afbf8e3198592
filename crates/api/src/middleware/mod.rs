//! Authentication and authorization middleware extractors.
//!
//! - [`auth::AuthUser`] -- Verifies the session token from the `token` cookie
//!   (or a Bearer header) and yields the caller's identity.
//! - [`rbac::RequireAdmin`] -- Requires the `ADMIN` role.

pub mod auth;
pub mod rbac;
