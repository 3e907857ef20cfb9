//! # Fine Payment
//!
//! Paying a fine goes through a [`PaymentGateway`]: the caller builds a
//! [`PaymentRequest`] carrying a fresh correlation id, the gateway returns a
//! [`PaymentOutcome`], and the fine is only marked paid when the outcome is a
//! capture of that same correlation id.
//!
//! ## Flow
//! ```text
//! pay_fine(index)
//!      │
//!      ├── fine missing or already paid ──► Ok(None), nothing happens
//!      │
//!      ├── gateway.is_ready() == false ───► GatewayNotReady
//!      │
//!      ▼
//! PaymentRequest { correlation_id, amount × 100, "INR", ... }
//!      │
//!      ▼
//! gateway.initiate(&request)
//!      │
//!      ├── Captured { id == correlation_id } ──► fine.paid = true, paidAt = now
//!      ├── Captured { id != correlation_id } ──► PaymentMismatch
//!      └── Cancelled / Failed ─────────────────► PaymentNotCaptured
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{BookId, DashboardState};

// =============================================================================
// Checkout Profile
// =============================================================================

/// Merchant-side fields copied into every payment request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CheckoutProfile {
    /// ISO 4217 code, e.g. "INR".
    pub currency: String,
    pub merchant_name: String,
    pub description: String,
    /// Accent color for the checkout widget.
    pub theme_color: String,
}

impl Default for CheckoutProfile {
    fn default() -> Self {
        CheckoutProfile {
            currency: "INR".to_string(),
            merchant_name: "Library Fine Payment".to_string(),
            description: "Pay your library fine".to_string(),
            theme_color: "#2563eb".to_string(),
        }
    }
}

// =============================================================================
// Request / Outcome
// =============================================================================

/// Who is paying, shown pre-filled in the checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Prefill {
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// One attempt to collect one fine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PaymentRequest {
    #[ts(as = "String")]
    pub correlation_id: Uuid,
    pub book_id: BookId,
    /// Minor units (paise for INR).
    pub amount: Money,
    pub currency: String,
    pub name: String,
    pub description: String,
    pub prefill: Prefill,
    pub theme_color: String,
}

impl PaymentRequest {
    pub fn new(
        profile: &CheckoutProfile,
        correlation_id: Uuid,
        book_id: BookId,
        amount: Money,
        prefill: Prefill,
    ) -> Self {
        PaymentRequest {
            correlation_id,
            book_id,
            amount,
            currency: profile.currency.clone(),
            name: profile.merchant_name.clone(),
            description: profile.description.clone(),
            prefill,
            theme_color: profile.theme_color.clone(),
        }
    }
}

/// How a checkout ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "status", rename_all = "snake_case")]
#[ts(export)]
pub enum PaymentOutcome {
    /// Money taken. `correlation_id` echoes the request it belongs to.
    Captured {
        #[ts(as = "String")]
        correlation_id: Uuid,
        payment_id: String,
    },
    /// The member closed the checkout.
    Cancelled,
    /// The provider declined or errored.
    Failed { reason: String },
}

// =============================================================================
// Gateway Capability
// =============================================================================

/// A checkout provider.
///
/// `initiate` runs the whole checkout and reports how it ended; there is no
/// callback to wait for.
pub trait PaymentGateway: Send + Sync {
    /// Whether the provider can take a payment right now.
    fn is_ready(&self) -> bool;

    fn initiate(&self, request: &PaymentRequest) -> PaymentOutcome;
}

// =============================================================================
// Pay Fine
// =============================================================================

/// A fine that was just settled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PaymentReceipt {
    pub index: usize,
    pub book_id: BookId,
    pub amount: Money,
    pub payment_id: String,
    #[ts(as = "String")]
    pub paid_at: DateTime<Utc>,
}

/// Collects the fine at `index` through `gateway`.
///
/// ## Returns
/// * `Ok(Some(receipt))` - captured and marked paid
/// * `Ok(None)` - no such fine, or it is already paid
/// * `Err(GatewayNotReady | PaymentNotCaptured | PaymentMismatch)` - fine stays unpaid
pub fn pay_fine(
    state: &mut DashboardState,
    index: usize,
    gateway: &dyn PaymentGateway,
    profile: &CheckoutProfile,
    prefill: Prefill,
    correlation_id: Uuid,
    now: DateTime<Utc>,
) -> CoreResult<Option<PaymentReceipt>> {
    let Some(fine) = state.fines.get_mut(index) else {
        return Ok(None);
    };
    if fine.paid {
        return Ok(None);
    }

    if !gateway.is_ready() {
        return Err(CoreError::GatewayNotReady);
    }

    let request = PaymentRequest::new(profile, correlation_id, fine.book_id, fine.money(), prefill);

    let payment_id = match gateway.initiate(&request) {
        PaymentOutcome::Captured {
            correlation_id: received,
            payment_id,
        } => {
            if received != correlation_id {
                return Err(CoreError::PaymentMismatch {
                    expected: correlation_id,
                    received,
                });
            }
            payment_id
        }
        PaymentOutcome::Cancelled => {
            return Err(CoreError::PaymentNotCaptured {
                reason: "cancelled".to_string(),
            })
        }
        PaymentOutcome::Failed { reason } => return Err(CoreError::PaymentNotCaptured { reason }),
    };

    fine.paid = true;
    fine.paid_at = Some(now);

    Ok(Some(PaymentReceipt {
        index,
        book_id: fine.book_id,
        amount: request.amount,
        payment_id,
        paid_at: now,
    }))
}

// =============================================================================
// Unit Tests
// =============================================================================
