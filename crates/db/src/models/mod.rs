//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - A `Serialize` response struct safe to return to clients
//! - A create DTO for inserts

pub mod user;
