//! # Configuration State
//!
//! Application configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`SHELF_*`)
//! 2. Defaults (this file)
//!
//! The database path is a clap argument (`--db` / `SHELF_DB_PATH`), see `cli.rs`.
//! Read-only after startup.

use serde::{Deserialize, Serialize};
use shelf_core::payment::CheckoutProfile;
use shelf_core::Money;

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigState {
    /// Currency code (ISO 4217) sent to the checkout
    pub currency_code: String,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// Add the demo fine on dashboard load
    pub demo_fine: bool,

    /// Put a copy back on the shelf when a book is returned
    pub restock_on_return: bool,

    /// Public key of the checkout provider, if one is configured
    pub checkout_key_id: Option<String>,

    /// Whether the checkout reports itself ready
    pub checkout_ready: bool,

    /// Email pre-filled in the checkout
    pub checkout_email: String,
}

impl Default for ConfigState {
    /// ## Default Values
    /// - Currency: INR (₹)
    /// - Demo fine: on
    /// - Restock on return: off
    /// - Checkout: ready, no key
    fn default() -> Self {
        ConfigState {
            currency_code: "INR".to_string(),
            currency_symbol: "₹".to_string(),
            demo_fine: true,
            restock_on_return: false,
            checkout_key_id: None,
            checkout_ready: true,
            checkout_email: "user@example.com".to_string(),
        }
    }
}

impl ConfigState {
    /// Creates a new ConfigState from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `SHELF_CURRENCY_CODE`, `SHELF_CURRENCY_SYMBOL`
    /// - `SHELF_DEMO_FINE`, `SHELF_RESTOCK_ON_RETURN`, `SHELF_CHECKOUT_READY`: `true`/`false`
    /// - `SHELF_CHECKOUT_KEY_ID`, `SHELF_CHECKOUT_EMAIL`
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) over any variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = ConfigState::default();

        if let Some(code) = lookup("SHELF_CURRENCY_CODE") {
            config.currency_code = code;
        }

        if let Some(symbol) = lookup("SHELF_CURRENCY_SYMBOL") {
            config.currency_symbol = symbol;
        }

        if let Some(flag) = lookup("SHELF_DEMO_FINE").as_deref().and_then(parse_flag) {
            config.demo_fine = flag;
        }

        if let Some(flag) = lookup("SHELF_RESTOCK_ON_RETURN").as_deref().and_then(parse_flag) {
            config.restock_on_return = flag;
        }

        if let Some(key) = lookup("SHELF_CHECKOUT_KEY_ID").filter(|k| !k.is_empty()) {
            config.checkout_key_id = Some(key);
        }

        if let Some(flag) = lookup("SHELF_CHECKOUT_READY").as_deref().and_then(parse_flag) {
            config.checkout_ready = flag;
        }

        if let Some(email) = lookup("SHELF_CHECKOUT_EMAIL") {
            config.checkout_email = email;
        }

        config
    }

    /// Merchant fields for payment requests.
    pub fn checkout_profile(&self) -> CheckoutProfile {
        CheckoutProfile {
            currency: self.currency_code.clone(),
            ..CheckoutProfile::default()
        }
    }

    /// Formats whole currency units, the way fines are stored.
    pub fn format_major(&self, amount: i64) -> String {
        format!("{}{}", self.currency_symbol, amount)
    }

    /// Formats an amount with the currency symbol.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let config = ConfigState::default();
    /// assert_eq!(config.format_money(Money::from_minor(1234)), "₹12.34");
    /// ```
    pub fn format_money(&self, money: Money) -> String {
        let minor = money.minor_units();
        format!(
            "{}{}{}",
            if minor < 0 { "-" } else { "" },
            self.currency_symbol,
            Money::from_minor(minor.abs())
        )
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_format_money() {
        let config = ConfigState::default();
        assert_eq!(config.format_money(Money::from_minor(1234)), "₹12.34");
        assert_eq!(config.format_money(Money::from_major(5)), "₹5.00");
        assert_eq!(config.format_money(Money::from_minor(-1234)), "-₹12.34");
        assert_eq!(config.format_major(5), "₹5");

        let config = ConfigState::from_lookup(lookup(&[("SHELF_CURRENCY_SYMBOL", "$")]));
        assert_eq!(config.format_money(Money::from_minor(50)), "$0.50");
    }

    #[test]
    fn test_env_overrides() {
        let config = ConfigState::from_lookup(lookup(&[
            ("SHELF_DEMO_FINE", "off"),
            ("SHELF_RESTOCK_ON_RETURN", "TRUE"),
            ("SHELF_CHECKOUT_READY", "0"),
            ("SHELF_CURRENCY_CODE", "USD"),
        ]));

        assert!(!config.demo_fine);
        assert!(config.restock_on_return);
        assert!(!config.checkout_ready);
        assert_eq!(config.checkout_profile().currency, "USD");
    }

    #[test]
    fn test_bad_flag_keeps_default() {
        let config = ConfigState::from_lookup(lookup(&[("SHELF_DEMO_FINE", "maybe")]));
        assert!(config.demo_fine);
    }
}
