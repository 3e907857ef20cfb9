//! # Shelf Entry Point
//!
//! ## Application Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        shelf (CLI)                                      │
//! │                                                                         │
//! │  main.rs ────► Starts the tokio runtime                                │
//! │                                                                         │
//! │  lib.rs ─────► Logging, config, database, dispatch                     │
//! │                                                                         │
//! │  commands/ ──► signup, login, borrow, dashboard, return, renew, pay    │
//! │                                                                         │
//! │  state/ ─────► DbState, ConfigState, CheckoutState                     │
//! │                                 │                                       │
//! │                                 ▼                                       │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                         SQLite Database                          │  │
//! │  │  shelf.db (local file, WAL mode, kv_entries table)               │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    // The actual setup is in lib.rs for better testability
    shelf_cli_lib::run().await
}
