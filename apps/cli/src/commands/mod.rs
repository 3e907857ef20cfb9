//! # Commands Module
//!
//! Everything `shelf` can do.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs        ◄─── You are here (exports)
//! ├── auth.rs       ◄─── signup, login, logout, whoami
//! ├── catalog.rs    ◄─── catalog, categories, borrow
//! ├── dashboard.rs  ◄─── dashboard, return, renew, read
//! └── fines.rs      ◄─── pay
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  $ shelf borrow 3                                                       │
//! │         │                                                               │
//! │         │ (clap parses Command::Borrow { book_id: 3 })                  │
//! │         ▼                                                               │
//! │  async fn borrow<S: KvStore>(                                           │
//! │      db: &DbState<S>,       ◄── SQLite in the binary, memory in tests   │
//! │      clock: &dyn Clock,     ◄── SystemClock / FixedClock                │
//! │      book_id: BookId,       ◄── From the command line                   │
//! │  ) -> Result<BorrowResponse, ApiError>                                  │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Report::render (text) or serde_json (--json) on stdout                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each command declares only the state it needs:
//! ```rust,ignore
//! // Only needs database
//! async fn list_categories(db: &DbState<S>)
//!
//! // Needs the session
//! async fn borrow(db: &DbState<S>, clock: &dyn Clock, ...)
//!
//! // Needs everything
//! async fn pay_fine(db, config, checkout, clock, index)
//! ```

pub mod auth;
pub mod catalog;
pub mod dashboard;
pub mod fines;
