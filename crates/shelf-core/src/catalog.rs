//! # Catalog
//!
//! The shared book list: seeding, browsing and taking a copy off the shelf.
//!
//! ## Borrow Decision
//! ```text
//! borrow_book(book_id)
//!      │
//!      ├── ledger already holds book_id ──► AlreadyBorrowed
//!      ├── unknown id or available == 0 ──► BookUnavailable
//!      │
//!      ▼
//! book.available -= 1      (every member sees this)
//! ledger.push(book_id)     (this member only)
//! ```
//!
//! Returning a book does not put the copy back unless the app asks for it
//! with [`restock`].

use crate::error::{CoreError, CoreResult};
use crate::types::{Book, BookId, BorrowLedger};

/// Category value that disables the category filter.
pub const ALL_CATEGORIES: &str = "All";

// =============================================================================
// Seed Data
// =============================================================================

/// The catalog written on first use.
pub fn seed_books() -> Vec<Book> {
    vec![
        book(
            1,
            "Atomic Habits",
            "James Clear",
            "Self-Help",
            "A practical guide to building good habits and breaking bad ones, with actionable strategies for lasting change.",
            "https://images.unsplash.com/photo-1512820790803-83ca734da794?auto=format&fit=crop&w=400&q=80",
            (3, 5),
        ),
        book(
            2,
            "The Great Gatsby",
            "F. Scott Fitzgerald",
            "Classic",
            "A classic novel set in the Roaring Twenties, exploring themes of wealth, love, and the American Dream.",
            "https://images.unsplash.com/photo-1524985069026-dd778a71c7b4?auto=format&fit=crop&w=400&q=80",
            (2, 2),
        ),
        book(
            3,
            "Clean Code",
            "Robert C. Martin",
            "Programming",
            "A handbook of agile software craftsmanship, teaching principles and best practices for writing clean code.",
            "https://images.unsplash.com/photo-1516979187457-637abb4f9353?auto=format&fit=crop&w=400&q=80",
            (1, 3),
        ),
        book(
            4,
            "Harry Potter",
            "J.K. Rowling",
            "Fantasy",
            "The magical journey of a young wizard and his friends at Hogwarts School of Witchcraft and Wizardry.",
            "https://images.unsplash.com/photo-1465101046530-73398c7f28ca?auto=format&fit=crop&w=400&q=80",
            (0, 1),
        ),
        book(
            5,
            "The Lean Startup",
            "Eric Ries",
            "Business",
            "A methodology for developing businesses and products, focusing on fast iteration and validated learning.",
            "https://images.unsplash.com/photo-1507842217343-583bb7270b66?auto=format&fit=crop&w=400&q=80",
            (2, 5),
        ),
    ]
}

fn book(
    id: BookId,
    title: &str,
    author: &str,
    category: &str,
    description: &str,
    image: &str,
    (available, total): (u32, u32),
) -> Book {
    Book {
        id,
        title: title.to_string(),
        author: author.to_string(),
        category: category.to_string(),
        description: Some(description.to_string()),
        image: Some(image.to_string()),
        available,
        total,
    }
}

// =============================================================================
// Browsing
// =============================================================================

/// `"All"` followed by each category once, in catalog order.
pub fn categories(books: &[Book]) -> Vec<String> {
    let mut out = vec![ALL_CATEGORIES.to_string()];
    for book in books {
        if !out[1..].contains(&book.category) {
            out.push(book.category.clone());
        }
    }
    out
}

/// Books in `category` (or any, for `"All"`) whose title or author contains
/// `query`, ignoring case. An empty query matches everything.
pub fn filter_books<'a>(books: &'a [Book], query: &str, category: &str) -> Vec<&'a Book> {
    let needle = query.to_lowercase();
    books
        .iter()
        .filter(|b| category == ALL_CATEGORIES || b.category == category)
        .filter(|b| {
            b.title.to_lowercase().contains(&needle) || b.author.to_lowercase().contains(&needle)
        })
        .collect()
}

pub fn find_book(books: &[Book], book_id: BookId) -> Option<&Book> {
    books.iter().find(|b| b.id == book_id)
}

// =============================================================================
// Borrow / Restock
// =============================================================================

/// Takes one copy of `book_id` for the member owning `ledger`.
///
/// Both arguments are left untouched on error.
pub fn borrow_book(books: &mut [Book], ledger: &mut BorrowLedger, book_id: BookId) -> CoreResult<()> {
    if ledger.contains(book_id) {
        return Err(CoreError::AlreadyBorrowed { book_id });
    }

    let book = books
        .iter_mut()
        .find(|b| b.id == book_id)
        .filter(|b| b.is_available())
        .ok_or(CoreError::BookUnavailable { book_id })?;

    book.available -= 1;
    ledger.add(book_id);
    Ok(())
}

/// Puts one copy of `book_id` back on the shelf, never above `total`.
///
/// ## Returns
/// Whether the count changed.
pub fn restock(books: &mut [Book], book_id: BookId) -> bool {
    match books.iter_mut().find(|b| b.id == book_id) {
        Some(book) if book.available < book.total => {
            book.available += 1;
            true
        }
        _ => false,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_catalog() {
        let books = seed_books();
        assert_eq!(books.len(), 5);
        assert!(books.iter().all(|b| b.available <= b.total));
        assert_eq!(find_book(&books, 4).unwrap().available, 0);
    }

    #[test]
    fn test_categories_in_catalog_order() {
        let mut books = seed_books();
        let extra = Book {
            id: 6,
            category: "Classic".to_string(),
            ..books[0].clone()
        };
        books.push(extra);

        assert_eq!(
            categories(&books),
            vec!["All", "Self-Help", "Classic", "Programming", "Fantasy", "Business"]
        );
    }

    #[test]
    fn test_filter_by_query_and_category() {
        let books = seed_books();

        let ids = |found: Vec<&Book>| found.iter().map(|b| b.id).collect::<Vec<_>>();

        assert_eq!(ids(filter_books(&books, "", "All")), vec![1, 2, 3, 4, 5]);
        assert_eq!(ids(filter_books(&books, "GATSBY", "All")), vec![2]);
        assert_eq!(ids(filter_books(&books, "rowling", "All")), vec![4]);
        assert_eq!(ids(filter_books(&books, "the", "Business")), vec![5]);
        assert!(filter_books(&books, "gatsby", "Fantasy").is_empty());
    }

    #[test]
    fn test_borrow_decrements_and_records() {
        let mut books = seed_books();
        let mut ledger = BorrowLedger::new();

        borrow_book(&mut books, &mut ledger, 1).unwrap();

        assert_eq!(find_book(&books, 1).unwrap().available, 2);
        assert_eq!(ledger.ids(), &[1]);
    }

    #[test]
    fn test_borrow_twice_rejected() {
        let mut books = seed_books();
        let mut ledger = BorrowLedger::new();
        borrow_book(&mut books, &mut ledger, 5).unwrap();

        let err = borrow_book(&mut books, &mut ledger, 5).unwrap_err();
        assert!(matches!(err, CoreError::AlreadyBorrowed { book_id: 5 }));
        assert_eq!(find_book(&books, 5).unwrap().available, 1);
    }

    #[test]
    fn test_borrow_unavailable_leaves_state() {
        let mut books = seed_books();
        let mut ledger = BorrowLedger::new();
        let before = books.clone();

        let err = borrow_book(&mut books, &mut ledger, 4).unwrap_err();
        assert!(matches!(err, CoreError::BookUnavailable { book_id: 4 }));

        let err = borrow_book(&mut books, &mut ledger, 99).unwrap_err();
        assert!(matches!(err, CoreError::BookUnavailable { book_id: 99 }));

        assert_eq!(books, before);
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_restock_capped_at_total() {
        let mut books = seed_books();
        assert!(restock(&mut books, 4));
        assert!(!restock(&mut books, 4));
        assert_eq!(find_book(&books, 4).unwrap().available, 1);
        assert!(!restock(&mut books, 99));
    }
}
