//! # State Module
//!
//! The state a command can ask for. Each command declares only the pieces
//! it needs.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────┐  ┌──────────────────┐  ┌──────────────────┐          │
//! │  │   DbState    │  │   ConfigState    │  │  CheckoutState   │          │
//! │  │              │  │                  │  │                  │          │
//! │  │  Database<S> │  │  SHELF_* vars    │  │  PaymentGateway  │          │
//! │  │  (KvStore)   │  │  currency, flags │  │  CheckoutProfile │          │
//! │  └──────────────┘  └──────────────────┘  └──────────────────┘          │
//! │                                                                         │
//! │  plus a `&dyn Clock` passed to every command that reads "now"          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod checkout;
mod config;
mod db;

pub use checkout::{CheckoutState, DemoCheckout};
pub use config::ConfigState;
pub use db::DbState;
