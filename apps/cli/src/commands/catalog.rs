//! # Catalog Commands
//!
//! Browsing needs no login. Borrowing does.

use serde::{Deserialize, Serialize};
use shelf_core::catalog::{self, ALL_CATEGORIES};
use shelf_core::validation::validate_search_query;
use shelf_core::{Book, BookId, Clock};
use shelf_db::{KvStore, WriteBatch};
use tracing::{debug, info, warn};

use crate::commands::auth::{current_session, current_user};
use crate::error::ApiError;
use crate::state::DbState;

/// A catalog row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookDto {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub category: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub available: u32,
    pub total: u32,
    /// On the logged-in member's borrow-ledger
    pub borrowed: bool,
}

impl BookDto {
    fn from_book(book: &Book, borrowed: bool) -> Self {
        BookDto {
            id: book.id,
            title: book.title.clone(),
            author: book.author.clone(),
            category: book.category.clone(),
            description: book.description.clone(),
            image: book.image.clone(),
            available: book.available,
            total: book.total,
            borrowed,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogResponse {
    pub query: String,
    pub category: String,
    pub books: Vec<BookDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoriesResponse {
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorrowResponse {
    pub book_id: BookId,
    pub title: String,
    pub available: u32,
    pub message: String,
}

/// Lists books matching `query` within `category`.
///
/// ## Arguments
/// * `query` - Case-insensitive substring of title or author (trimmed; empty matches all)
/// * `category` - A category name, or `"All"`
pub async fn list_books<S: KvStore>(
    db: &DbState<S>,
    clock: &dyn Clock,
    query: Option<String>,
    category: Option<String>,
) -> Result<CatalogResponse, ApiError> {
    debug!(query = ?query, category = ?category, "list_books command");

    let query = validate_search_query(query.as_deref().unwrap_or_default())?;
    let category = category.unwrap_or_else(|| ALL_CATEGORIES.to_string());

    let books = db.inner().catalog().load().await?;

    let session = current_session(db, clock).await?;
    let ledger = match session.username() {
        Some(username) => db.inner().ledgers().get(username).await?,
        None => Default::default(),
    };

    let books = catalog::filter_books(&books, &query, &category)
        .into_iter()
        .map(|b| BookDto::from_book(b, ledger.contains(b.id)))
        .collect();

    Ok(CatalogResponse {
        query,
        category,
        books,
    })
}

pub async fn list_categories<S: KvStore>(db: &DbState<S>) -> Result<CategoriesResponse, ApiError> {
    let books = db.inner().catalog().load().await?;
    Ok(CategoriesResponse {
        categories: catalog::categories(&books),
    })
}

/// Takes one copy of `book_id` for the logged-in member.
///
/// The catalog and the member's ledger are written together.
pub async fn borrow<S: KvStore>(
    db: &DbState<S>,
    clock: &dyn Clock,
    book_id: BookId,
) -> Result<BorrowResponse, ApiError> {
    debug!(book_id = book_id, "borrow command");

    let username = current_user(db, clock).await?;
    let db_inner = db.inner();

    let mut books = db_inner.catalog().load().await?;
    let mut ledger = db_inner.ledgers().get(&username).await?;

    if let Err(err) = catalog::borrow_book(&mut books, &mut ledger, book_id) {
        warn!(username = %username, book_id = book_id, error = %err, "Borrow rejected");
        return Err(err.into());
    }

    let mut batch = WriteBatch::new();
    db_inner.catalog().stage(&mut batch, &books)?;
    db_inner.ledgers().stage(&mut batch, &username, &ledger)?;
    db_inner.commit(batch).await?;

    let (title, available) = catalog::find_book(&books, book_id)
        .map(|b| (b.title.clone(), b.available))
        .unwrap_or_default();

    info!(username = %username, book_id = book_id, available = available, "Book borrowed");

    Ok(BorrowResponse {
        book_id,
        title,
        available,
        message: "Book borrowed! Check your dashboard for details.".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::auth::{login, signup};
    use crate::error::ErrorCode;
    use chrono::{TimeZone, Utc};
    use shelf_core::FixedClock;
    use shelf_db::{Database, MemoryKvStore};

    async fn logged_in(username: &str) -> (DbState<MemoryKvStore>, FixedClock) {
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap());
        let db = DbState::new(Database::in_memory());
        signup(&db, username.into(), "pw".into()).await.unwrap();
        login(&db, &clock, username.into(), "pw".into()).await.unwrap();
        (db, clock)
    }

    #[tokio::test]
    async fn test_browse_without_login() {
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap());
        let db = DbState::new(Database::in_memory());

        let resp = list_books(&db, &clock, None, None).await.unwrap();
        assert_eq!(resp.books.len(), 5);
        assert!(resp.books.iter().all(|b| !b.borrowed));

        let resp = list_books(&db, &clock, Some("  CLEAN ".into()), Some("All".into()))
            .await
            .unwrap();
        assert_eq!(resp.query, "CLEAN");
        assert_eq!(resp.books.len(), 1);
        assert_eq!(resp.books[0].id, 3);

        let resp = list_books(&db, &clock, None, Some("Classic".into())).await.unwrap();
        assert_eq!(resp.books.len(), 1);
        assert_eq!(resp.books[0].title, "The Great Gatsby");
    }

    #[tokio::test]
    async fn test_overlong_search_is_rejected() {
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap());
        let db = DbState::new(Database::in_memory());

        let err = list_books(&db, &clock, Some("x".repeat(101)), None)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let resp = list_books(&db, &clock, Some("x".repeat(100)), None).await.unwrap();
        assert!(resp.books.is_empty());
    }

    #[tokio::test]
    async fn test_categories_start_with_all() {
        let db = DbState::new(Database::in_memory());
        let resp = list_categories(&db).await.unwrap();
        assert_eq!(
            resp.categories,
            vec!["All", "Self-Help", "Classic", "Programming", "Fantasy", "Business"]
        );
    }

    #[tokio::test]
    async fn test_borrow_requires_login() {
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap());
        let db = DbState::new(Database::in_memory());

        let err = borrow(&db, &clock, 1).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Unauthenticated);
        assert_eq!(db.inner().catalog().load().await.unwrap()[0].available, 3);
    }

    #[tokio::test]
    async fn test_borrow_updates_catalog_and_ledger() {
        let (db, clock) = logged_in("alice").await;

        let resp = borrow(&db, &clock, 1).await.unwrap();
        assert_eq!(resp.message, "Book borrowed! Check your dashboard for details.");
        assert_eq!(resp.available, 2);

        assert_eq!(db.inner().ledgers().get("alice").await.unwrap().ids(), &[1]);
        let listed = list_books(&db, &clock, None, None).await.unwrap();
        assert!(listed.books.iter().find(|b| b.id == 1).unwrap().borrowed);

        let err = borrow(&db, &clock, 1).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);
        assert_eq!(err.message, "You already borrowed this book.");
        assert_eq!(db.inner().catalog().load().await.unwrap()[0].available, 2);
    }

    #[tokio::test]
    async fn test_borrow_unavailable_changes_nothing() {
        let (db, clock) = logged_in("alice").await;

        let err = borrow(&db, &clock, 4).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Unavailable);
        assert_eq!(err.message, "Book not available.");

        let err = borrow(&db, &clock, 99).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Unavailable);

        assert!(db.inner().ledgers().get("alice").await.unwrap().is_empty());
    }
}
