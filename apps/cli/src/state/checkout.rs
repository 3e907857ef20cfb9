//! # Checkout State
//!
//! The payment capability handed to `pay_fine`, plus the merchant profile
//! copied into every request.
//!
//! The bundled [`DemoCheckout`] never talks to a provider: when ready, it
//! captures immediately and echoes the request's correlation id.

use shelf_core::payment::{CheckoutProfile, PaymentGateway, PaymentOutcome, PaymentRequest};
use tracing::info;

use super::ConfigState;

/// Payment gateway and merchant profile.
pub struct CheckoutState {
    gateway: Box<dyn PaymentGateway>,
    profile: CheckoutProfile,
}

impl CheckoutState {
    pub fn new(gateway: Box<dyn PaymentGateway>, profile: CheckoutProfile) -> Self {
        CheckoutState { gateway, profile }
    }

    /// The demo checkout configured from `SHELF_CHECKOUT_*`.
    pub fn from_config(config: &ConfigState) -> Self {
        let gateway = DemoCheckout::new(config.checkout_ready, config.checkout_key_id.clone());
        CheckoutState::new(Box::new(gateway), config.checkout_profile())
    }

    pub fn gateway(&self) -> &dyn PaymentGateway {
        self.gateway.as_ref()
    }

    pub fn profile(&self) -> &CheckoutProfile {
        &self.profile
    }
}

impl std::fmt::Debug for CheckoutState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckoutState")
            .field("ready", &self.gateway.is_ready())
            .field("profile", &self.profile)
            .finish()
    }
}

// =============================================================================
// Demo Checkout
// =============================================================================

/// A checkout that approves every payment.
#[derive(Debug, Clone)]
pub struct DemoCheckout {
    ready: bool,
    key_id: Option<String>,
}

impl DemoCheckout {
    pub fn new(ready: bool, key_id: Option<String>) -> Self {
        DemoCheckout { ready, key_id }
    }
}

impl PaymentGateway for DemoCheckout {
    fn is_ready(&self) -> bool {
        self.ready
    }

    fn initiate(&self, request: &PaymentRequest) -> PaymentOutcome {
        let payment_id = format!("pay_demo_{}", &request.correlation_id.simple().to_string()[..14]);
        info!(
            correlation_id = %request.correlation_id,
            payment_id = %payment_id,
            amount = request.amount.minor_units(),
            currency = %request.currency,
            key_configured = self.key_id.is_some(),
            "Demo checkout captured payment"
        );
        PaymentOutcome::Captured {
            correlation_id: request.correlation_id,
            payment_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelf_core::payment::Prefill;
    use shelf_core::Money;
    use uuid::Uuid;

    #[test]
    fn test_demo_checkout_echoes_correlation_id() {
        let checkout = DemoCheckout::new(true, None);
        let id = Uuid::new_v4();
        let request = PaymentRequest::new(
            &CheckoutProfile::default(),
            id,
            3,
            Money::from_major(5),
            Prefill::default(),
        );

        match checkout.initiate(&request) {
            PaymentOutcome::Captured {
                correlation_id,
                payment_id,
            } => {
                assert_eq!(correlation_id, id);
                assert!(payment_id.starts_with("pay_demo_"));
                assert_eq!(payment_id.len(), "pay_demo_".len() + 14);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_from_config_readiness() {
        let config = ConfigState {
            checkout_ready: false,
            ..ConfigState::default()
        };
        assert!(!CheckoutState::from_config(&config).gateway().is_ready());
        assert!(CheckoutState::from_config(&ConfigState::default()).gateway().is_ready());
    }
}
