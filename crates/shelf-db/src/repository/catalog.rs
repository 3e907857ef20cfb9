//! # Catalog Repository
//!
//! The shared book list under `books_state`.
//!
//! ```text
//! load()
//!   ├── key present  ──► parse [Book]
//!   └── key missing  ──► seed_books() ──► write ──► return
//! ```
//!
//! After the first load the stored list is authoritative; the seed is never
//! merged back in.

use std::sync::Arc;

use tracing::{debug, info};

use shelf_core::catalog::seed_books;
use shelf_core::Book;

use super::{read_json, write_json};
use crate::error::DbResult;
use crate::keys;
use crate::store::{KvStore, WriteBatch};

/// Repository for the shared catalog.
#[derive(Debug)]
pub struct CatalogRepository<S> {
    store: Arc<S>,
}

impl<S: KvStore> CatalogRepository<S> {
    /// Creates a new CatalogRepository.
    pub fn new(store: Arc<S>) -> Self {
        CatalogRepository { store }
    }

    /// The catalog, seeding it on first use.
    pub async fn load(&self) -> DbResult<Vec<Book>> {
        if let Some(books) = read_json::<_, Vec<Book>>(&*self.store, keys::BOOKS_STATE).await? {
            debug!(count = books.len(), "Loaded catalog");
            return Ok(books);
        }

        let books = seed_books();
        info!(count = books.len(), "Seeding catalog");
        self.save(&books).await?;
        Ok(books)
    }

    /// Whether the catalog has been written yet.
    pub async fn is_seeded(&self) -> DbResult<bool> {
        Ok(self.store.get(keys::BOOKS_STATE).await?.is_some())
    }

    pub async fn save(&self, books: &[Book]) -> DbResult<()> {
        write_json(&*self.store, keys::BOOKS_STATE, books).await
    }

    /// Adds the catalog write to `batch`.
    pub fn stage(&self, batch: &mut WriteBatch, books: &[Book]) -> DbResult<()> {
        batch.put_json(keys::BOOKS_STATE, books)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::store::MemoryKvStore;

    #[tokio::test]
    async fn test_first_load_seeds() {
        let repo = CatalogRepository::new(Arc::new(MemoryKvStore::new()));
        assert!(!repo.is_seeded().await.unwrap());

        let books = repo.load().await.unwrap();
        assert_eq!(books.len(), 5);
        assert!(repo.is_seeded().await.unwrap());
    }

    #[tokio::test]
    async fn test_stored_catalog_wins() {
        let repo = CatalogRepository::new(Arc::new(MemoryKvStore::new()));
        let mut books = repo.load().await.unwrap();
        books[0].available = 0;
        repo.save(&books).await.unwrap();

        let reloaded = repo.load().await.unwrap();
        assert_eq!(reloaded[0].available, 0);
    }

    #[tokio::test]
    async fn test_corrupt_catalog_reported() {
        let store = Arc::new(MemoryKvStore::new());
        store.put("books_state", "{not json").await.unwrap();

        let err = CatalogRepository::new(store).load().await.unwrap_err();
        assert!(matches!(err, DbError::CorruptValue { ref key, .. } if key == "books_state"));
    }
}
