//! Well-known role name constants.
//!
//! These must match the `ck_users_role` check constraint in the users migration.

pub const ROLE_GENERAL: &str = "GENERAL";
pub const ROLE_ADMIN: &str = "ADMIN";
