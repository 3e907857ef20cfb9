//! # Key-Value Store
//!
//! The storage seam. Repositories talk to a [`KvStore`]; which backend sits
//! behind it is decided once at startup.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          KvStore                                        │
//! │        get(key) • put(key, json) • delete(key) • commit(batch)         │
//! │                               │                                         │
//! │              ┌────────────────┴────────────────┐                       │
//! │              ▼                                 ▼                       │
//! │  ┌──────────────────────┐         ┌──────────────────────┐            │
//! │  │   SqliteKvStore      │         │   MemoryKvStore      │            │
//! │  │   kv_entries table   │         │   RwLock<HashMap>    │            │
//! │  │   (pool.rs)          │         │   (tests, demos)     │            │
//! │  └──────────────────────┘         └──────────────────────┘            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Values are JSON text. Single-key writes are last-write-wins; a
//! [`WriteBatch`] lands all of its keys or none of them.

use std::collections::HashMap;
use std::sync::RwLock;

use serde::Serialize;
use tracing::debug;

use crate::error::{DbError, DbResult};

// =============================================================================
// Store Trait
// =============================================================================

/// A string-keyed store of JSON text.
#[allow(async_fn_in_trait)]
pub trait KvStore: Send + Sync {
    /// Reads the value under `key`, if any.
    async fn get(&self, key: &str) -> DbResult<Option<String>>;

    /// Writes `value` under `key`, replacing what was there.
    async fn put(&self, key: &str, value: &str) -> DbResult<()>;

    /// Removes `key`. Removing a missing key is not an error.
    async fn delete(&self, key: &str) -> DbResult<()>;

    /// Writes every entry of `batch` atomically.
    async fn commit(&self, batch: WriteBatch) -> DbResult<()>;
}

// =============================================================================
// Write Batch
// =============================================================================

/// Writes that must land together, e.g. a return touching both the
/// dashboard and the borrow ledger.
///
/// A key staged twice keeps its last value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteBatch {
    entries: Vec<(String, String)>,
}

impl WriteBatch {
    pub fn new() -> Self {
        WriteBatch::default()
    }

    /// Stages a raw JSON value.
    pub fn put(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Serializes `value` and stages it.
    pub fn put_json<T: Serialize + ?Sized>(&mut self, key: impl Into<String>, value: &T) -> DbResult<()> {
        let json = serde_json::to_string(value)?;
        self.put(key, json);
        Ok(())
    }

    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// =============================================================================
// Memory Backend
// =============================================================================

/// Process-local store. Everything is gone when it is dropped.
#[derive(Debug, Default)]
pub struct MemoryKvStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        MemoryKvStore::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned() -> DbError {
    DbError::Internal("memory store lock poisoned".to_string())
}

impl KvStore for MemoryKvStore {
    async fn get(&self, key: &str) -> DbResult<Option<String>> {
        let entries = self.entries.read().map_err(|_| poisoned())?;
        Ok(entries.get(key).cloned())
    }

    async fn put(&self, key: &str, value: &str) -> DbResult<()> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> DbResult<()> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        entries.remove(key);
        Ok(())
    }

    async fn commit(&self, batch: WriteBatch) -> DbResult<()> {
        debug!(keys = batch.len(), "Committing batch to memory store");
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        for (key, value) in batch.entries {
            entries.insert(key, value);
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_keeps_last_value() {
        let mut batch = WriteBatch::new();
        batch.put("a", "1");
        batch.put("b", "2");
        batch.put("a", "3");

        assert_eq!(batch.len(), 2);
        assert_eq!(
            batch.entries(),
            &[("a".to_string(), "3".to_string()), ("b".to_string(), "2".to_string())]
        );
    }

    #[test]
    fn test_batch_put_json() {
        let mut batch = WriteBatch::new();
        batch.put_json("ids", &vec![1, 2]).unwrap();
        assert_eq!(batch.entries()[0].1, "[1,2]");
    }

    #[tokio::test]
    async fn test_memory_store_roundtrip() {
        let store = MemoryKvStore::new();
        assert_eq!(store.get("k").await.unwrap(), None);

        store.put("k", "\"v\"").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("\"v\""));

        store.delete("k").await.unwrap();
        store.delete("k").await.unwrap();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_memory_store_commit() {
        let store = MemoryKvStore::new();
        let mut batch = WriteBatch::new();
        batch.put("x", "1");
        batch.put("y", "2");

        store.commit(batch).await.unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("y").await.unwrap().as_deref(), Some("2"));
    }
}
