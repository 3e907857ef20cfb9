//! # Fine Commands
//!
//! Pays a fine through the configured checkout.
//!
//! ## Payment Flow
//! ```text
//! shelf pay 0
//!      │
//!      ├── fine missing or paid? ─────────────► "Nothing to pay." (no change)
//!      ├── gateway not ready? ────────────────► PAYMENT_ERROR    (no change)
//!      ▼
//! PaymentRequest{correlation_id = new v4, amount ×100, ...}
//!      │
//!      ▼
//! gateway.initiate ──► Captured(same id) ─────► fine paid, dashboard saved
//!                  └─► Cancelled/Failed/other id ► PAYMENT_ERROR (no change)
//! ```

use serde::{Deserialize, Serialize};
use shelf_core::payment::{self, PaymentReceipt, Prefill};
use shelf_core::Clock;
use shelf_db::KvStore;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::commands::auth::current_user;
use crate::commands::dashboard::load_reconciled;
use crate::error::ApiError;
use crate::state::{CheckoutState, ConfigState, DbState};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayFineResponse {
    /// `None` when there was nothing to pay at that index
    pub receipt: Option<PaymentReceipt>,
    pub message: String,
}

/// Pays the fine at `index` in the member's fines list.
pub async fn pay_fine<S: KvStore>(
    db: &DbState<S>,
    config: &ConfigState,
    checkout: &CheckoutState,
    clock: &dyn Clock,
    index: usize,
) -> Result<PayFineResponse, ApiError> {
    debug!(index = index, "pay_fine command");

    let username = current_user(db, clock).await?;
    let now = clock.now();
    let mut state = load_reconciled(db, config, &username, now).await?;

    let correlation_id = Uuid::new_v4();
    let prefill = Prefill {
        name: username.clone(),
        email: config.checkout_email.clone(),
    };

    let outcome = payment::pay_fine(
        &mut state,
        index,
        checkout.gateway(),
        checkout.profile(),
        prefill,
        correlation_id,
        now,
    );

    let receipt = match outcome {
        Ok(Some(receipt)) => receipt,
        Ok(None) => {
            debug!(username = %username, index = index, "Nothing to pay");
            return Ok(PayFineResponse {
                receipt: None,
                message: "Nothing to pay.".to_string(),
            });
        }
        Err(err) => {
            warn!(
                username = %username,
                index = index,
                correlation_id = %correlation_id,
                error = %err,
                "Payment rejected"
            );
            return Err(err.into());
        }
    };

    db.inner().dashboards().save(&username, &state).await?;

    info!(
        username = %username,
        book_id = receipt.book_id,
        amount = receipt.amount.minor_units(),
        payment_id = %receipt.payment_id,
        correlation_id = %correlation_id,
        "Fine paid"
    );

    Ok(PayFineResponse {
        receipt: Some(receipt),
        message: "Fine paid successfully!".to_string(),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::auth::{login, signup};
    use crate::commands::catalog::borrow;
    use crate::commands::dashboard::{load_dashboard, return_book};
    use crate::error::ErrorCode;
    use crate::state::DemoCheckout;
    use chrono::{Duration, TimeZone, Utc};
    use shelf_core::payment::{CheckoutProfile, PaymentGateway, PaymentOutcome, PaymentRequest};
    use shelf_core::{FixedClock, Money};
    use shelf_db::{Database, MemoryKvStore};
    use std::sync::{Arc, Mutex};

    /// Answers with a fixed outcome, or captures echoing the request's id.
    struct ScriptedGateway {
        outcome: Option<PaymentOutcome>,
        seen: Arc<Mutex<Vec<PaymentRequest>>>,
    }

    impl ScriptedGateway {
        fn echoing(seen: Arc<Mutex<Vec<PaymentRequest>>>) -> Self {
            ScriptedGateway {
                outcome: None,
                seen,
            }
        }

        fn answering(outcome: PaymentOutcome) -> Self {
            ScriptedGateway {
                outcome: Some(outcome),
                seen: Arc::default(),
            }
        }
    }

    impl PaymentGateway for ScriptedGateway {
        fn is_ready(&self) -> bool {
            true
        }

        fn initiate(&self, request: &PaymentRequest) -> PaymentOutcome {
            self.seen.lock().unwrap().push(request.clone());
            match &self.outcome {
                Some(outcome) => outcome.clone(),
                None => PaymentOutcome::Captured {
                    correlation_id: request.correlation_id,
                    payment_id: "pay_test".to_string(),
                },
            }
        }
    }

    async fn member() -> (DbState<MemoryKvStore>, FixedClock) {
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap());
        let db = DbState::new(Database::in_memory());
        signup(&db, "alice".into(), "pw".into()).await.unwrap();
        login(&db, &clock, "alice".into(), "pw".into()).await.unwrap();
        (db, clock)
    }

    #[tokio::test]
    async fn test_pay_demo_fine() {
        let (db, clock) = member().await;
        let config = ConfigState::default();
        let checkout = CheckoutState::from_config(&config);

        let resp = pay_fine(&db, &config, &checkout, &clock, 0).await.unwrap();
        assert_eq!(resp.message, "Fine paid successfully!");
        let receipt = resp.receipt.unwrap();
        assert_eq!(receipt.book_id, 3);
        assert_eq!(receipt.amount, Money::from_minor(500));
        assert_eq!(receipt.paid_at, clock.now());

        // The next load seeds a fresh demo fine beside the paid one.
        let view = load_dashboard(&db, &config, &clock).await.unwrap();
        assert_eq!(view.fines.len(), 2);
        assert!(view.fines[0].paid);
        assert!(!view.fines[1].paid);
        assert_eq!(view.summary.total_paid, Money::from_major(5));
        assert_eq!(view.summary.total_pending, Money::from_major(5));

        // Paying again does nothing.
        let resp = pay_fine(&db, &config, &checkout, &clock, 0).await.unwrap();
        assert!(resp.receipt.is_none());
    }

    #[tokio::test]
    async fn test_request_carries_checkout_fields() {
        let (db, clock) = member().await;
        let config = ConfigState::default();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let checkout = CheckoutState::new(
            Box::new(ScriptedGateway::echoing(Arc::clone(&seen))),
            config.checkout_profile(),
        );

        let resp = pay_fine(&db, &config, &checkout, &clock, 0).await.unwrap();
        assert_eq!(resp.receipt.unwrap().payment_id, "pay_test");

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        let request = &seen[0];
        assert_eq!(request.amount, Money::from_minor(500));
        assert_eq!(request.currency, "INR");
        assert_eq!(request.name, "Library Fine Payment");
        assert_eq!(request.description, "Pay your library fine");
        assert_eq!(request.theme_color, "#2563eb");
        assert_eq!(request.prefill.name, "alice");
        assert_eq!(request.prefill.email, "user@example.com");
    }

    #[tokio::test]
    async fn test_unready_gateway_leaves_fine_unpaid() {
        let (db, clock) = member().await;
        let config = ConfigState {
            checkout_ready: false,
            ..ConfigState::default()
        };
        let checkout = CheckoutState::from_config(&config);

        let err = pay_fine(&db, &config, &checkout, &clock, 0).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::PaymentError);
        assert_eq!(err.message, "Payment gateway not loaded. Please try again.");

        let state = db.inner().dashboards().get("alice").await.unwrap();
        assert!(!state.fines[0].paid);
    }

    #[tokio::test]
    async fn test_cancelled_and_mismatched_payments() {
        let (db, clock) = member().await;
        let config = ConfigState::default();

        let cancelled = CheckoutState::new(
            Box::new(ScriptedGateway::answering(PaymentOutcome::Cancelled)),
            CheckoutProfile::default(),
        );
        let err = pay_fine(&db, &config, &cancelled, &clock, 0).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::PaymentError);

        let foreign = CheckoutState::new(
            Box::new(ScriptedGateway::answering(PaymentOutcome::Captured {
                correlation_id: Uuid::new_v4(),
                payment_id: "pay_other".to_string(),
            })),
            CheckoutProfile::default(),
        );
        let err = pay_fine(&db, &config, &foreign, &clock, 0).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::PaymentError);

        let state = db.inner().dashboards().get("alice").await.unwrap();
        assert!(!state.fines[0].paid);
    }

    /// Borrow, run late, return, pay.
    #[tokio::test]
    async fn test_overdue_fine_lifecycle() {
        let (db, clock) = member().await;
        let config = ConfigState {
            demo_fine: false,
            ..ConfigState::default()
        };
        let checkout = CheckoutState::new(
            Box::new(DemoCheckout::new(true, None)),
            config.checkout_profile(),
        );

        borrow(&db, &clock, 5).await.unwrap();
        load_dashboard(&db, &config, &clock).await.unwrap();

        clock.advance(Duration::days(16));
        login(&db, &clock, "alice".into(), "pw".into()).await.unwrap();
        let resp = return_book(&db, &config, &clock, 5).await.unwrap();
        assert_eq!(resp.receipt.unwrap().fine_amount, 2);

        let resp = pay_fine(&db, &config, &checkout, &clock, 0).await.unwrap();
        assert_eq!(resp.receipt.unwrap().amount, Money::from_minor(200));

        let view = load_dashboard(&db, &config, &clock).await.unwrap();
        assert_eq!(view.summary.pending_count, 0);
        assert_eq!(view.summary.total_paid, Money::from_major(2));
    }

    #[tokio::test]
    async fn test_pay_missing_index() {
        let (db, clock) = member().await;
        let config = ConfigState::default();
        let checkout = CheckoutState::from_config(&config);

        let resp = pay_fine(&db, &config, &checkout, &clock, 7).await.unwrap();
        assert!(resp.receipt.is_none());
    }
}
