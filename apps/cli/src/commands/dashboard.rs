//! # Dashboard Commands
//!
//! Loads the member's dashboard and acts on its loans.
//!
//! ## Load Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  shelf dashboard                                                        │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  user_<u>_dashboard ──┐                                                 │
//! │  user_<u>_borrowed ───┼──► reconcile_ledger ──► seed_demo_fine?         │
//! │                       │            │                   │                │
//! │                       │            └─── changed? ──────┘                │
//! │                       │                     │                           │
//! │                       │             yes ────┴──── no                    │
//! │                       │              │             │                    │
//! │                       │        save dashboard      │                    │
//! │                       │              └──────┬──────┘                    │
//! │                       │                     ▼                           │
//! │  books_state ─────────┴────────────►  DashboardView                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Return and renew load the reconciled dashboard first, so a book borrowed
//! since the last dashboard view can be returned straight away.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shelf_core::catalog;
use shelf_core::fine::calculate_fine;
use shelf_core::loan::{self, RenewReceipt, ReturnReceipt};
use shelf_core::{
    Book, BookId, Clock, CoreError, DashboardState, FineSummary, Loan, DEMO_DOCUMENT_PATH,
    MAX_RENEWALS,
};
use shelf_db::{KvStore, WriteBatch};
use tracing::{debug, info, warn};

use crate::commands::auth::current_user;
use crate::error::ApiError;
use crate::state::{ConfigState, DbState};

// =============================================================================
// Response Types
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanView {
    pub book_id: BookId,
    pub title: String,
    pub author: String,
    pub borrowed_at: String,
    pub due_date: String,
    pub returned: bool,
    pub returned_at: Option<String>,
    pub renew_count: u32,
    pub max_renewals: u32,
    /// What returning right now would cost
    pub fine_preview: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FineView {
    /// Position in the fines list; `shelf pay` takes this
    pub index: usize,
    pub book_id: BookId,
    pub title: String,
    pub amount: i64,
    pub paid: bool,
    pub returned_at: String,
    pub paid_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub username: String,
    pub active_loans: Vec<LoanView>,
    pub fines: Vec<FineView>,
    pub summary: FineSummary,
    pub history: Vec<LoanView>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnResponse {
    /// `None` when there was no open loan to return
    pub receipt: Option<ReturnReceipt>,
    pub restocked: bool,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenewResponse {
    /// `None` when there was no open loan to renew
    pub receipt: Option<RenewReceipt>,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadResponse {
    pub book_id: BookId,
    pub title: String,
    pub document: String,
}

// =============================================================================
// Loading
// =============================================================================

/// Reads the member's dashboard and folds in new borrows.
///
/// Writes back only when reconciliation or the demo fine changed something.
pub(crate) async fn load_reconciled<S: KvStore>(
    db: &DbState<S>,
    config: &ConfigState,
    username: &str,
    now: DateTime<Utc>,
) -> Result<DashboardState, ApiError> {
    let db_inner = db.inner();
    let mut state = db_inner.dashboards().get(username).await?;
    let ledger = db_inner.ledgers().get(username).await?;

    let added = loan::reconcile_ledger(&mut state, &ledger, now);
    let seeded = config.demo_fine && loan::seed_demo_fine(&mut state, now);

    if added > 0 || seeded {
        db_inner.dashboards().save(username, &state).await?;
        info!(username = %username, loans_added = added, demo_fine = seeded, "Dashboard reconciled");
    }

    Ok(state)
}

fn loan_view(books: &[Book], loan: &Loan, now: DateTime<Utc>) -> LoanView {
    let book = catalog::find_book(books, loan.book_id);
    LoanView {
        book_id: loan.book_id,
        title: book.map(|b| b.title.clone()).unwrap_or_default(),
        author: book.map(|b| b.author.clone()).unwrap_or_default(),
        borrowed_at: loan.borrowed_at.to_rfc3339(),
        due_date: loan.due_date.to_rfc3339(),
        returned: loan.returned,
        returned_at: loan.returned_at.map(|t| t.to_rfc3339()),
        renew_count: loan.renew_count,
        max_renewals: MAX_RENEWALS,
        fine_preview: if loan.is_open() {
            calculate_fine(loan.due_date, now)
        } else {
            0
        },
    }
}

/// Shows loans, fines and history for the logged-in member.
pub async fn load_dashboard<S: KvStore>(
    db: &DbState<S>,
    config: &ConfigState,
    clock: &dyn Clock,
) -> Result<DashboardView, ApiError> {
    debug!("load_dashboard command");

    let username = current_user(db, clock).await?;
    let now = clock.now();

    let state = load_reconciled(db, config, &username, now).await?;
    let books = db.inner().catalog().load().await?;

    let active_loans = state
        .active_loans()
        .map(|l| loan_view(&books, l, now))
        .collect();
    let history = state.loans.iter().map(|l| loan_view(&books, l, now)).collect();
    let fines = state
        .fines
        .iter()
        .enumerate()
        .map(|(index, f)| FineView {
            index,
            book_id: f.book_id,
            title: catalog::find_book(&books, f.book_id)
                .map(|b| b.title.clone())
                .unwrap_or_default(),
            amount: f.amount,
            paid: f.paid,
            returned_at: f.returned_at.to_rfc3339(),
            paid_at: f.paid_at.map(|t| t.to_rfc3339()),
        })
        .collect();

    Ok(DashboardView {
        username,
        active_loans,
        fines,
        summary: state.fine_summary(),
        history,
    })
}

// =============================================================================
// Return / Renew / Read
// =============================================================================

/// Returns `book_id`, charging for each full day past the due date.
///
/// Dashboard and ledger (and the catalog, when restocking) are written in
/// one batch.
pub async fn return_book<S: KvStore>(
    db: &DbState<S>,
    config: &ConfigState,
    clock: &dyn Clock,
    book_id: BookId,
) -> Result<ReturnResponse, ApiError> {
    debug!(book_id = book_id, "return_book command");

    let username = current_user(db, clock).await?;
    let now = clock.now();
    let db_inner = db.inner();

    let mut state = load_reconciled(db, config, &username, now).await?;
    let mut ledger = db_inner.ledgers().get(&username).await?;

    let Some(receipt) = loan::return_loan(&mut state, &mut ledger, book_id, now) else {
        debug!(username = %username, book_id = book_id, "Nothing to return");
        return Ok(ReturnResponse {
            receipt: None,
            restocked: false,
            message: "Nothing to return.".to_string(),
        });
    };

    let mut batch = WriteBatch::new();
    db_inner.dashboards().stage(&mut batch, &username, &state)?;
    db_inner.ledgers().stage(&mut batch, &username, &ledger)?;

    let mut restocked = false;
    if config.restock_on_return {
        let mut books = db_inner.catalog().load().await?;
        restocked = catalog::restock(&mut books, book_id);
        if restocked {
            db_inner.catalog().stage(&mut batch, &books)?;
        }
    }

    db_inner.commit(batch).await?;

    info!(
        username = %username,
        book_id = book_id,
        fine = receipt.fine_amount,
        restocked = restocked,
        "Book returned"
    );

    let message = if receipt.fine_amount > 0 {
        format!("Returned! Fine: {}", config.format_major(receipt.fine_amount))
    } else {
        "Returned successfully!".to_string()
    };

    Ok(ReturnResponse {
        receipt: Some(receipt),
        restocked,
        message,
    })
}

/// Extends the loan for `book_id` by a week, up to the renewal limit.
pub async fn renew_book<S: KvStore>(
    db: &DbState<S>,
    config: &ConfigState,
    clock: &dyn Clock,
    book_id: BookId,
) -> Result<RenewResponse, ApiError> {
    debug!(book_id = book_id, "renew_book command");

    let username = current_user(db, clock).await?;
    let mut state = load_reconciled(db, config, &username, clock.now()).await?;

    let receipt = match loan::renew_loan(&mut state, book_id) {
        Ok(receipt) => receipt,
        Err(err) => {
            warn!(username = %username, book_id = book_id, error = %err, "Renewal rejected");
            return Err(err.into());
        }
    };

    let Some(receipt) = receipt else {
        debug!(username = %username, book_id = book_id, "Nothing to renew");
        return Ok(RenewResponse {
            receipt: None,
            message: "Nothing to renew.".to_string(),
        });
    };

    db.inner().dashboards().save(&username, &state).await?;

    info!(
        username = %username,
        book_id = book_id,
        renew_count = receipt.renew_count,
        due_date = %receipt.due_date,
        "Loan renewed"
    );

    Ok(RenewResponse {
        receipt: Some(receipt),
        message: "Book renewed for 7 more days!".to_string(),
    })
}

/// The document for a book on an active loan.
pub async fn read_book<S: KvStore>(
    db: &DbState<S>,
    config: &ConfigState,
    clock: &dyn Clock,
    book_id: BookId,
) -> Result<ReadResponse, ApiError> {
    debug!(book_id = book_id, "read_book command");

    let username = current_user(db, clock).await?;
    let state = load_reconciled(db, config, &username, clock.now()).await?;

    if state.open_loan(book_id).is_none() {
        return Err(CoreError::NoActiveLoan { book_id }.into());
    }

    let books = db.inner().catalog().load().await?;
    let title = catalog::find_book(&books, book_id)
        .map(|b| b.title.clone())
        .unwrap_or_default();

    Ok(ReadResponse {
        book_id,
        title,
        document: DEMO_DOCUMENT_PATH.to_string(),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
