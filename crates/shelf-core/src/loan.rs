//! # Loan Lifecycle
//!
//! The member-side state machine: ledger reconciliation, return and renew.
//! Paying fines lives in [`crate::payment`].
//!
//! ## Loan States
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Loan Lifecycle                                    │
//! │                                                                         │
//! │  catalog borrow                                                         │
//! │     └── ledger gets book id                                             │
//! │                                                                         │
//! │  1. RECONCILE (dashboard load)                                         │
//! │     └── reconcile_ledger() → Loan { returned: false, renewCount: 0 }   │
//! │                                                                         │
//! │  2. RENEW (0..=3 times)                                                │
//! │     └── renew_loan() → dueDate + 7 days, renewCount + 1                │
//! │                                                                         │
//! │  3. RETURN                                                             │
//! │     └── return_loan() → Loan { returned: true, returnedAt }            │
//! │                       → Fine { paid: false } when late                 │
//! │                       → ledger loses the book id                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Loans are matched by book id alone during reconciliation: once any loan
//! exists for a book, the ledger never creates a second one for it, even
//! after the first was returned.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::fine::calculate_fine;
use crate::types::{BookId, BorrowLedger, DashboardState, Fine, Loan};
use crate::{DEMO_FINE_AMOUNT, DEMO_FINE_BOOK_ID, MAX_RENEWALS, RENEWAL_EXTENSION_DAYS};

// =============================================================================
// Reconciliation
// =============================================================================

/// Opens a loan for every ledger id that has no loan record yet.
///
/// ## Returns
/// Number of loans added. Zero means nothing needs to be persisted.
///
/// ## Example
/// ```rust
/// use chrono::Utc;
/// use shelf_core::loan::reconcile_ledger;
/// use shelf_core::{BorrowLedger, DashboardState};
///
/// let mut state = DashboardState::default();
/// let ledger = BorrowLedger::from(vec![1, 5]);
/// let now = Utc::now();
///
/// assert_eq!(reconcile_ledger(&mut state, &ledger, now), 2);
/// assert_eq!(reconcile_ledger(&mut state, &ledger, now), 0);
/// ```
pub fn reconcile_ledger(state: &mut DashboardState, ledger: &BorrowLedger, now: DateTime<Utc>) -> usize {
    let mut added = 0;
    for &book_id in ledger.ids() {
        if state.loans.iter().any(|l| l.book_id == book_id) {
            continue;
        }
        state.loans.push(Loan::open(book_id, now));
        added += 1;
    }
    added
}

/// Adds the demo fine unless an unpaid one for the same book is present.
///
/// ## Returns
/// Whether a fine was added.
pub fn seed_demo_fine(state: &mut DashboardState, now: DateTime<Utc>) -> bool {
    let present = state
        .fines
        .iter()
        .any(|f| f.book_id == DEMO_FINE_BOOK_ID && !f.paid);
    if present {
        return false;
    }
    state
        .fines
        .push(Fine::unpaid(DEMO_FINE_BOOK_ID, DEMO_FINE_AMOUNT, now));
    true
}

// =============================================================================
// Return
// =============================================================================

/// What a return did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ReturnReceipt {
    pub book_id: BookId,
    #[ts(as = "String")]
    pub returned_at: DateTime<Utc>,
    /// Whole currency units; zero when returned on time.
    pub fine_amount: i64,
}

/// Returns the open loan for `book_id`.
///
/// ## Effects (all or nothing)
/// 1. Fine = overdue days against the loan's due date
/// 2. Loan marked returned at `now`
/// 3. Unpaid `Fine` appended when the fine is positive
/// 4. `book_id` removed from the ledger
///
/// ## Returns
/// `None` when no open loan exists; nothing changes in that case, so
/// returning twice is harmless.
pub fn return_loan(
    state: &mut DashboardState,
    ledger: &mut BorrowLedger,
    book_id: BookId,
    now: DateTime<Utc>,
) -> Option<ReturnReceipt> {
    let loan = state.open_loan_mut(book_id)?;

    let fine_amount = calculate_fine(loan.due_date, now);
    loan.returned = true;
    loan.returned_at = Some(now);

    if fine_amount > 0 {
        state.fines.push(Fine::unpaid(book_id, fine_amount, now));
    }
    ledger.remove(book_id);

    Some(ReturnReceipt {
        book_id,
        returned_at: now,
        fine_amount,
    })
}

// =============================================================================
// Renew
// =============================================================================

/// What a renewal did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RenewReceipt {
    pub book_id: BookId,
    #[ts(as = "String")]
    pub due_date: DateTime<Utc>,
    pub renew_count: u32,
}

/// Pushes the due date of the open loan for `book_id` back by one extension.
///
/// ## Returns
/// * `Ok(Some(receipt))` - renewed
/// * `Ok(None)` - no open loan, nothing changed
/// * `Err(CoreError::RenewalLimitReached)` - already renewed `MAX_RENEWALS` times
pub fn renew_loan(state: &mut DashboardState, book_id: BookId) -> CoreResult<Option<RenewReceipt>> {
    let Some(loan) = state.open_loan_mut(book_id) else {
        return Ok(None);
    };

    if !loan.can_renew() {
        return Err(CoreError::RenewalLimitReached {
            book_id,
            max: MAX_RENEWALS,
        });
    }

    loan.due_date += Duration::days(RENEWAL_EXTENSION_DAYS);
    loan.renew_count += 1;

    Ok(Some(RenewReceipt {
        book_id,
        due_date: loan.due_date,
        renew_count: loan.renew_count,
    }))
}

// =============================================================================
// Unit Tests
// =============================================================================
