//! # User Repository
//!
//! The credential list under `users`. A missing key is an empty list.

use std::sync::Arc;

use tracing::debug;

use shelf_core::User;

use super::{read_json, write_json};
use crate::error::DbResult;
use crate::keys;
use crate::store::KvStore;

/// Repository for credential records.
#[derive(Debug)]
pub struct UserRepository<S> {
    store: Arc<S>,
}

impl<S: KvStore> UserRepository<S> {
    /// Creates a new UserRepository.
    pub fn new(store: Arc<S>) -> Self {
        UserRepository { store }
    }

    /// Every registered user, in signup order.
    pub async fn list(&self) -> DbResult<Vec<User>> {
        let users: Vec<User> = read_json(&*self.store, keys::USERS).await?.unwrap_or_default();
        debug!(count = users.len(), "Loaded users");
        Ok(users)
    }

    /// Replaces the whole list.
    pub async fn save_all(&self, users: &[User]) -> DbResult<()> {
        debug!(count = users.len(), "Saving users");
        write_json(&*self.store, keys::USERS, users).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryKvStore;

    #[tokio::test]
    async fn test_missing_key_is_empty() {
        let repo = UserRepository::new(Arc::new(MemoryKvStore::new()));
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_and_list() {
        let store = Arc::new(MemoryKvStore::new());
        let repo = UserRepository::new(store.clone());
        let users = vec![User {
            username: "alice".to_string(),
            password: "pw".to_string(),
        }];

        repo.save_all(&users).await.unwrap();

        assert_eq!(repo.list().await.unwrap(), users);
        assert_eq!(
            store.get("users").await.unwrap().as_deref(),
            Some(r#"[{"username":"alice","password":"pw"}]"#)
        );
    }
}
