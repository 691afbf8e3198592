use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use warden_core::types::DbId;

use super::{CredentialStore, StoreError};
use crate::models::user::{CreateUser, User};

/// Process-local [`CredentialStore`].
///
/// Used by the integration tests and by the server when `DATABASE_URL` is
/// not configured. Contents are lost on restart.
#[derive(Default)]
pub struct MemoryCredentialStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    users: BTreeMap<DbId, User>,
    last_id: DbId,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn create_user(&self, input: &CreateUser) -> Result<User, StoreError> {
        let mut inner = self.inner.write().await;

        // Checked under the write lock, so concurrent signups cannot both pass.
        if inner.users.values().any(|u| u.email == input.email) {
            tracing::debug!("Duplicate email rejected by memory store");
            return Err(StoreError::DuplicateEmail(input.email.clone()));
        }

        inner.last_id += 1;
        let now = Utc::now();
        let user = User {
            id: inner.last_id,
            email: input.email.clone(),
            name: input.name.clone(),
            password_hash: input.password_hash.clone(),
            role: input.role.clone(),
            created_at: now,
            updated_at: now,
        };
        inner.users.insert(user.id, user.clone());
        tracing::debug!(user_id = user.id, "User stored in memory");
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<User>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.users.get(&id).cloned())
    }

    async fn update_password(&self, id: DbId, password_hash: &str) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        match inner.users.get_mut(&id) {
            Some(user) => {
                user.password_hash = password_hash.to_string();
                user.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let inner = self.inner.read().await;
        // Ids are assigned in insertion order, so reverse id order is newest first.
        Ok(inner.users.values().rev().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use assert_matches::assert_matches;
    use warden_core::roles::{ROLE_ADMIN, ROLE_GENERAL};

    use super::*;

    fn new_user(email: &str) -> CreateUser {
        CreateUser {
            email: email.to_string(),
            name: "Test".to_string(),
            password_hash: "$argon2id$placeholder".to_string(),
            role: ROLE_GENERAL.to_string(),
        }
    }

    #[tokio::test]
    async fn create_assigns_sequential_ids() {
        let store = MemoryCredentialStore::new();
        let a = store.create_user(&new_user("a@b.com")).await.unwrap();
        let b = store.create_user(&new_user("c@d.com")).await.unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(a.role, ROLE_GENERAL);
    }

    #[tokio::test]
    async fn duplicate_email_rejected() {
        let store = MemoryCredentialStore::new();
        store.create_user(&new_user("a@b.com")).await.unwrap();

        let mut again = new_user("a@b.com");
        again.name = "Someone else".to_string();
        again.role = ROLE_ADMIN.to_string();
        let err = store.create_user(&again).await.unwrap_err();
        assert_matches!(err, StoreError::DuplicateEmail(email) if email == "a@b.com");
    }

    #[tokio::test]
    async fn concurrent_signups_for_one_email_yield_one_user() {
        let store = Arc::new(MemoryCredentialStore::new());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store.create_user(&new_user("race@b.com")).await
            }));
        }

        let mut created = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                created += 1;
            }
        }
        assert_eq!(created, 1);
        assert_eq!(store.list_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn lookups_by_email_and_id() {
        let store = MemoryCredentialStore::new();
        let user = store.create_user(&new_user("a@b.com")).await.unwrap();

        let by_email = store.find_by_email("a@b.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, user.id);
        assert!(store.find_by_email("x@y.com").await.unwrap().is_none());

        let by_id = store.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "a@b.com");
        assert!(store.find_by_id(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_password_replaces_hash() {
        let store = MemoryCredentialStore::new();
        let user = store.create_user(&new_user("a@b.com")).await.unwrap();

        assert!(store.update_password(user.id, "new-hash").await.unwrap());
        let reloaded = store.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(reloaded.password_hash, "new-hash");

        assert!(!store.update_password(999, "new-hash").await.unwrap());
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let store = MemoryCredentialStore::new();
        store.create_user(&new_user("first@b.com")).await.unwrap();
        store.create_user(&new_user("second@b.com")).await.unwrap();

        let emails: Vec<String> = store
            .list_users()
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.email)
            .collect();
        assert_eq!(emails, ["second@b.com", "first@b.com"]);
    }
}
