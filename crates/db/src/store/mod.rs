//! The credential store seam.
//!
//! Handlers never talk to a database driver directly; they hold an
//! `Arc<dyn CredentialStore>` so the same auth flow runs against PostgreSQL
//! in production and against [`MemoryCredentialStore`] in tests and local
//! development.

mod memory;
mod postgres;

use async_trait::async_trait;
use warden_core::types::DbId;

use crate::models::user::{CreateUser, User};

pub use memory::MemoryCredentialStore;
pub use postgres::PgCredentialStore;

/// Failures surfaced by a [`CredentialStore`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Another account already owns this (normalized) email.
    #[error("Email already registered: {0}")]
    DuplicateEmail(String),

    /// Driver-level failure from the PostgreSQL store.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Persistence operations behind signup, signin, and password recovery.
///
/// Implementations must treat `email` as an exact key: callers normalize it
/// with [`warden_core::validation::normalize_email`] first.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Insert a new user. Returns [`StoreError::DuplicateEmail`] when the
    /// email is taken, even if a concurrent insert won the race.
    async fn create_user(&self, input: &CreateUser) -> Result<User, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn find_by_id(&self, id: DbId) -> Result<Option<User>, StoreError>;

    /// Replace the stored hash. Returns `false` if the user no longer exists.
    async fn update_password(&self, id: DbId, password_hash: &str) -> Result<bool, StoreError>;

    /// All users, newest first.
    async fn list_users(&self) -> Result<Vec<User>, StoreError>;
}
