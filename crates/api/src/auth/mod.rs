//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- Purpose-tagged session and reset token issue/verify.
//! - [`cookie`] -- The `token` session cookie on the wire.

pub mod cookie;
pub mod jwt;
pub mod password;
