//! Domain primitives shared by every Warden crate: the error taxonomy,
//! id/timestamp aliases, role names, and credential input rules.

pub mod error;
pub mod roles;
pub mod types;
pub mod validation;
