//! # Ledger Repository
//!
//! Per-member borrow ledgers under `user_<name>_borrowed`.

use std::sync::Arc;

use tracing::debug;

use shelf_core::BorrowLedger;

use super::{read_json, write_json};
use crate::error::DbResult;
use crate::keys;
use crate::store::{KvStore, WriteBatch};

/// Repository for borrow ledgers.
#[derive(Debug)]
pub struct LedgerRepository<S> {
    store: Arc<S>,
}

impl<S: KvStore> LedgerRepository<S> {
    /// Creates a new LedgerRepository.
    pub fn new(store: Arc<S>) -> Self {
        LedgerRepository { store }
    }

    /// The member's ledger; empty when nothing was ever borrowed.
    pub async fn get(&self, username: &str) -> DbResult<BorrowLedger> {
        let ledger: BorrowLedger = read_json(&*self.store, &keys::borrowed(username))
            .await?
            .unwrap_or_default();
        debug!(username = %username, held = ledger.len(), "Loaded ledger");
        Ok(ledger)
    }

    pub async fn save(&self, username: &str, ledger: &BorrowLedger) -> DbResult<()> {
        write_json(&*self.store, &keys::borrowed(username), ledger).await
    }

    /// Adds the ledger write to `batch`.
    pub fn stage(&self, batch: &mut WriteBatch, username: &str, ledger: &BorrowLedger) -> DbResult<()> {
        batch.put_json(keys::borrowed(username), ledger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryKvStore;

    #[tokio::test]
    async fn test_ledgers_are_per_member() {
        let repo = LedgerRepository::new(Arc::new(MemoryKvStore::new()));
        repo.save("alice", &BorrowLedger::from(vec![1, 3])).await.unwrap();

        assert_eq!(repo.get("alice").await.unwrap().ids(), &[1, 3]);
        assert!(repo.get("bob").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reads_plain_array() {
        let store = Arc::new(MemoryKvStore::new());
        store.put("user_alice_borrowed", "[2,5]").await.unwrap();

        let ledger = LedgerRepository::new(store).get("alice").await.unwrap();
        assert_eq!(ledger.ids(), &[2, 5]);
    }

    #[tokio::test]
    async fn test_stored_repeats_are_dropped() {
        let store = Arc::new(MemoryKvStore::new());
        store.put("user_alice_borrowed", "[2,2]").await.unwrap();

        let ledger = LedgerRepository::new(store).get("alice").await.unwrap();
        assert_eq!(ledger.ids(), &[2]);
    }
}
