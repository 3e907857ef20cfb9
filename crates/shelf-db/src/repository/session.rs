//! # Session Repository
//!
//! The single `session` cookie, stored under `cookie_session`. There is one
//! cookie per database, the way a browser profile has one cookie jar.

use std::sync::Arc;

use tracing::debug;

use shelf_core::auth::SessionCookie;

use super::{read_json, write_json};
use crate::error::DbResult;
use crate::keys;
use crate::store::KvStore;

/// Repository for the session cookie.
#[derive(Debug)]
pub struct SessionRepository<S> {
    store: Arc<S>,
}

impl<S: KvStore> SessionRepository<S> {
    /// Creates a new SessionRepository.
    pub fn new(store: Arc<S>) -> Self {
        SessionRepository { store }
    }

    /// The stored cookie, expired or not.
    pub async fn get(&self) -> DbResult<Option<SessionCookie>> {
        read_json(&*self.store, keys::SESSION_COOKIE).await
    }

    pub async fn set(&self, cookie: &SessionCookie) -> DbResult<()> {
        debug!(username = %cookie.value, expires_at = %cookie.expires_at, "Storing session cookie");
        write_json(&*self.store, keys::SESSION_COOKIE, cookie).await
    }

    pub async fn clear(&self) -> DbResult<()> {
        debug!("Clearing session cookie");
        self.store.delete(keys::SESSION_COOKIE).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryKvStore;
    use chrono::{TimeZone, Utc};

    #[tokio::test]
    async fn test_set_get_clear() {
        let repo = SessionRepository::new(Arc::new(MemoryKvStore::new()));
        assert_eq!(repo.get().await.unwrap(), None);

        let cookie = SessionCookie::issue("alice", Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        repo.set(&cookie).await.unwrap();
        assert_eq!(repo.get().await.unwrap(), Some(cookie));

        repo.clear().await.unwrap();
        assert_eq!(repo.get().await.unwrap(), None);
    }
}
