//! # Repository Module
//!
//! One repository per persisted key family.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repositories over KvStore                            │
//! │                                                                         │
//! │  CLI command                                                           │
//! │       │  db.dashboards().get("alice")                                  │
//! │       ▼                                                                 │
//! │  DashboardRepository                                                   │
//! │  ├── key: user_alice_dashboard                                         │
//! │  ├── JSON ⇄ DashboardState                                             │
//! │  └── missing key → DashboardState::default()                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  KvStore (SQLite or memory)                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every repository also has a `stage` method that adds its write to a
//! [`WriteBatch`](crate::store::WriteBatch) instead of writing directly, for
//! operations that touch several keys at once.
//!
//! ## Available Repositories
//!
//! - [`UserRepository`](user::UserRepository) - `users`
//! - [`CatalogRepository`](catalog::CatalogRepository) - `books_state`
//! - [`LedgerRepository`](ledger::LedgerRepository) - `user_<name>_borrowed`
//! - [`DashboardRepository`](dashboard::DashboardRepository) - `user_<name>_dashboard`
//! - [`SessionRepository`](session::SessionRepository) - `cookie_session`

pub mod catalog;
pub mod dashboard;
pub mod ledger;
pub mod session;
pub mod user;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{DbError, DbResult};
use crate::store::KvStore;

/// Reads and parses the JSON value under `key`.
pub(crate) async fn read_json<S, T>(store: &S, key: &str) -> DbResult<Option<T>>
where
    S: KvStore,
    T: DeserializeOwned,
{
    match store.get(key).await? {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| DbError::corrupt(key, e)),
        None => Ok(None),
    }
}

/// Serializes `value` and writes it under `key`.
pub(crate) async fn write_json<S, T>(store: &S, key: &str, value: &T) -> DbResult<()>
where
    S: KvStore,
    T: Serialize + ?Sized,
{
    let json = serde_json::to_string(value)?;
    store.put(key, &json).await
}
