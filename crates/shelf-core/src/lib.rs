//! # shelf-core: Pure Business Logic for Shelf
//!
//! Everything a library member can do to their loans and fines, expressed as
//! functions over plain data. Storage, the system clock and the checkout
//! widget all live outside this crate.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Shelf Architecture                               │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    apps/cli (`shelf`)                           │   │
//! │  │    signup, login, borrow, dashboard, return, renew, pay        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ shelf-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   loan    │  │  catalog  │  │   auth    │  │   │
//! │  │   │ Book Loan │  │ reconcile │  │  borrow   │  │  login    │  │   │
//! │  │   │ Fine      │  │ return    │  │  browse   │  │  signup   │  │   │
//! │  │   └───────────┘  │ renew     │  └───────────┘  └───────────┘  │   │
//! │  │                  └───────────┘                                 │   │
//! │  │   fine • money • clock • payment • validation                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    shelf-db (Storage Layer)                     │   │
//! │  │        users, books_state, user_<name>_borrowed/_dashboard      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Stored records (Book, Loan, Fine, DashboardState, ...)
//! - [`loan`] - Reconciliation, return and renew
//! - [`catalog`] - Borrowing from the shared catalog, search, categories
//! - [`auth`] - Signup, login, session cookie
//! - [`fine`] - Overdue days and fine amounts
//! - [`money`] - Integer money in minor units
//! - [`clock`] - Injectable "now"
//! - [`payment`] - Paying fines through a checkout capability
//! - [`validation`] - Input checks
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::{Duration, TimeZone, Utc};
//! use shelf_core::fine::overdue_days;
//!
//! let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
//! let due = now - Duration::days(3);
//! assert_eq!(overdue_days(due, now), 3);
//! assert_eq!(overdue_days(now + Duration::days(1), now), 0);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod auth;
pub mod catalog;
pub mod clock;
pub mod error;
pub mod fine;
pub mod loan;
pub mod money;
pub mod payment;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Loan Policy
// =============================================================================

/// Days between borrowing a book and its first due date.
pub const LOAN_PERIOD_DAYS: i64 = 14;

/// Days added to the due date by one renewal.
pub const RENEWAL_EXTENSION_DAYS: i64 = 7;

/// Renewals allowed per loan.
pub const MAX_RENEWALS: u32 = 3;

/// Fine charged per full overdue day, in whole currency units.
pub const FINE_PER_DAY: i64 = 1;

/// Lifetime of the `session` cookie.
pub const SESSION_TTL_DAYS: i64 = 1;

/// Name of the session cookie.
pub const SESSION_COOKIE_NAME: &str = "session";

/// Document opened by "Read". Every book shows the same file.
pub const DEMO_DOCUMENT_PATH: &str = "/books/demoBook.pdf";

/// Book the demo fine is attached to.
pub const DEMO_FINE_BOOK_ID: BookId = 3;

/// Amount of the demo fine, in whole currency units.
pub const DEMO_FINE_AMOUNT: i64 = 5;
