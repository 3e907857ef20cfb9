//! # Domain Types
//!
//! Records persisted by Shelf, in the JSON shapes they are stored with.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      User       │   │      Book       │   │  BorrowLedger   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  username       │   │  id             │   │  [book ids]     │       │
//! │  │  password       │   │  available      │   │  per member     │       │
//! │  └─────────────────┘   │  total          │   └─────────────────┘       │
//! │                        └─────────────────┘                              │
//! │  ┌───────────────────────────────────────────────────────────────┐     │
//! │  │                   DashboardState (per member)                 │     │
//! │  │   loans: [Loan]       reservations: [..]      fines: [Fine]   │     │
//! │  └───────────────────────────────────────────────────────────────┘     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! Field names are camelCase (`bookId`, `dueDate`, `renewCount`) and
//! timestamps are RFC 3339 strings, so blobs written by the browser demo
//! load unchanged.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::{LOAN_PERIOD_DAYS, MAX_RENEWALS};

/// Catalog identifier of a book.
pub type BookId = i64;

// =============================================================================
// User
// =============================================================================

/// A credential record. Passwords are stored as typed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct User {
    pub username: String,
    pub password: String,
}

// =============================================================================
// Book
// =============================================================================

/// A catalog entry. `available` copies are shared by every member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub image: Option<String>,
    /// Copies on the shelf right now.
    pub available: u32,
    /// Copies the library owns.
    pub total: u32,
}

impl Book {
    /// Checks if at least one copy can be lent.
    #[inline]
    pub fn is_available(&self) -> bool {
        self.available >= 1
    }
}

// =============================================================================
// Borrow Ledger
// =============================================================================

/// Book ids a member currently holds. Never contains duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, TS)]
#[serde(transparent)]
#[ts(export)]
pub struct BorrowLedger(Vec<BookId>);

impl BorrowLedger {
    pub fn new() -> Self {
        BorrowLedger(Vec::new())
    }

    pub fn contains(&self, book_id: BookId) -> bool {
        self.0.contains(&book_id)
    }

    /// Appends `book_id` unless it is already held. Returns whether it was added.
    pub fn add(&mut self, book_id: BookId) -> bool {
        if self.contains(book_id) {
            return false;
        }
        self.0.push(book_id);
        true
    }

    /// Removes `book_id`. Returns whether it was present.
    pub fn remove(&mut self, book_id: BookId) -> bool {
        let before = self.0.len();
        self.0.retain(|id| *id != book_id);
        self.0.len() != before
    }

    pub fn ids(&self) -> &[BookId] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<BookId>> for BorrowLedger {
    /// Builds a ledger, dropping repeated ids.
    fn from(ids: Vec<BookId>) -> Self {
        let mut ledger = BorrowLedger::new();
        for id in ids {
            ledger.add(id);
        }
        ledger
    }
}

/// Stored ledgers go through the same dedupe as [`BorrowLedger::add`].
impl<'de> Deserialize<'de> for BorrowLedger {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<BookId>::deserialize(deserializer).map(BorrowLedger::from)
    }
}

// =============================================================================
// Loan
// =============================================================================

/// One member borrowing one book. Loans are never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Loan {
    pub book_id: BookId,
    #[ts(as = "String")]
    pub borrowed_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub due_date: DateTime<Utc>,
    pub returned: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>", optional)]
    pub returned_at: Option<DateTime<Utc>>,
    /// Older records have no counter; they count as never renewed.
    #[serde(default)]
    pub renew_count: u32,
}

impl Loan {
    /// Opens a loan at `now`, due one loan period later.
    pub fn open(book_id: BookId, now: DateTime<Utc>) -> Self {
        Loan {
            book_id,
            borrowed_at: now,
            due_date: now + Duration::days(LOAN_PERIOD_DAYS),
            returned: false,
            returned_at: None,
            renew_count: 0,
        }
    }

    /// Checks if the book is still out.
    #[inline]
    pub fn is_open(&self) -> bool {
        !self.returned
    }

    /// Checks if another renewal is allowed.
    #[inline]
    pub fn can_renew(&self) -> bool {
        self.renew_count < MAX_RENEWALS
    }
}

// =============================================================================
// Fine
// =============================================================================

/// A penalty for a late return. Only `paid`/`paid_at` ever change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Fine {
    pub book_id: BookId,
    /// Whole currency units, never negative.
    pub amount: i64,
    pub paid: bool,
    #[ts(as = "String")]
    pub returned_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>", optional)]
    pub paid_at: Option<DateTime<Utc>>,
}

impl Fine {
    /// Creates an unpaid fine. Negative amounts are clamped to zero.
    pub fn unpaid(book_id: BookId, amount: i64, returned_at: DateTime<Utc>) -> Self {
        Fine {
            book_id,
            amount: amount.max(0),
            paid: false,
            returned_at,
            paid_at: None,
        }
    }

    /// Returns the fine as Money.
    #[inline]
    pub fn money(&self) -> Money {
        Money::from_major(self.amount)
    }
}

// =============================================================================
// Dashboard State
// =============================================================================

/// Everything the dashboard shows for one member.
///
/// `reservations` is carried as opaque JSON: it is round-tripped untouched
/// and nothing reads it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DashboardState {
    #[serde(default)]
    pub loans: Vec<Loan>,
    #[serde(default)]
    #[ts(type = "Array<unknown>")]
    pub reservations: Vec<serde_json::Value>,
    #[serde(default)]
    pub fines: Vec<Fine>,
}

impl DashboardState {
    /// First loan for `book_id` that is still out.
    pub fn open_loan(&self, book_id: BookId) -> Option<&Loan> {
        self.loans.iter().find(|l| l.book_id == book_id && l.is_open())
    }

    pub(crate) fn open_loan_mut(&mut self, book_id: BookId) -> Option<&mut Loan> {
        self.loans
            .iter_mut()
            .find(|l| l.book_id == book_id && l.is_open())
    }

    /// Loans still out, in borrowing order.
    pub fn active_loans(&self) -> impl Iterator<Item = &Loan> {
        self.loans.iter().filter(|l| l.is_open())
    }

    /// Pending/paid totals over all fines.
    pub fn fine_summary(&self) -> FineSummary {
        FineSummary::from(self.fines.as_slice())
    }
}

// =============================================================================
// Fine Summary
// =============================================================================

/// Totals shown above the fines list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct FineSummary {
    pub pending_count: usize,
    pub total_pending: Money,
    pub total_paid: Money,
}

impl From<&[Fine]> for FineSummary {
    fn from(fines: &[Fine]) -> Self {
        let (paid, pending): (Vec<&Fine>, Vec<&Fine>) = fines.iter().partition(|f| f.paid);
        FineSummary {
            pending_count: pending.len(),
            total_pending: pending.iter().map(|f| f.money()).sum(),
            total_paid: paid.iter().map(|f| f.money()).sum(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
