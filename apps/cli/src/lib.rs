//! # Shelf CLI Library
//!
//! Core library for the `shelf` command line application.
//! `main.rs` only calls [`run`].
//!
//! ## Module Organization
//! ```text
//! shelf_cli_lib/
//! ├── lib.rs          ◄─── You are here (startup & dispatch)
//! ├── cli.rs          ◄─── clap definition
//! ├── output.rs       ◄─── Text rendering of responses
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── db.rs       ◄─── Database state wrapper
//! │   ├── config.rs   ◄─── Configuration state
//! │   └── checkout.rs ◄─── Payment gateway state
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports
//! │   ├── auth.rs     ◄─── Signup/login/logout
//! │   ├── catalog.rs  ◄─── Browse and borrow
//! │   ├── dashboard.rs◄─── Loans: view, return, renew, read
//! │   └── fines.rs    ◄─── Fine payment
//! └── error.rs        ◄─── API error type for commands
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;
pub mod state;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use directories::ProjectDirs;
use serde::Serialize;
use shelf_core::{Clock, SystemClock};
use shelf_db::{Database, DbConfig};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};
use commands::{auth, catalog, dashboard, fines};
use error::ApiError;
use output::Report;
use state::{CheckoutState, ConfigState, DbState};

/// Runs one `shelf` invocation.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Application Startup                               │
/// │                                                                         │
/// │  1. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber with env filter, written to stderr             │
/// │     • Default: INFO, can be overridden with RUST_LOG                    │
/// │                                                                         │
/// │  2. Parse Arguments & Load Config ────────────────────────────────────► │
/// │     • clap derive                                                       │
/// │     • SHELF_* environment variables                                     │
/// │                                                                         │
/// │  3. Determine Database Path ──────────────────────────────────────────► │
/// │     • --db, then SHELF_DB_PATH                                          │
/// │     • Linux: ~/.local/share/library/shelf.db (platform data dir)        │
/// │                                                                         │
/// │  4. Connect to Database ──────────────────────────────────────────────► │
/// │     • SQLite with WAL mode                                              │
/// │     • Run pending migrations                                            │
/// │                                                                         │
/// │  5. Run Command ──────────────────────────────────────────────────────► │
/// │     • Text or JSON on stdout, errors on stderr, exit code 1            │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    let config = ConfigState::from_env();

    let db_path = match get_database_path(cli.db.clone()) {
        Ok(path) => path,
        Err(err) => return fail(&ApiError::internal(err.to_string()), cli.json),
    };
    debug!(?db_path, "Database path determined");

    let db = match Database::open(DbConfig::new(db_path)).await {
        Ok(db) => db,
        Err(err) => return fail(&ApiError::from(err), cli.json),
    };
    info!("Database connected and migrations applied");

    let db = DbState::new(db);
    let checkout = CheckoutState::from_config(&config);
    let clock = SystemClock;

    let code = dispatch(cli.command, cli.json, &db, &config, &checkout, &clock).await;
    db.inner().store().close().await;
    code
}

async fn dispatch(
    command: Command,
    json: bool,
    db: &DbState,
    config: &ConfigState,
    checkout: &CheckoutState,
    clock: &dyn Clock,
) -> ExitCode {
    match command {
        Command::Signup { username, password } => {
            emit(auth::signup(db, username, password).await, json, config)
        }
        Command::Login { username, password } => {
            emit(auth::login(db, clock, username, password).await, json, config)
        }
        Command::Logout => emit(auth::logout(db, clock).await, json, config),
        Command::Whoami => emit(auth::whoami(db, clock).await, json, config),
        Command::Catalog { search, category } => emit(
            catalog::list_books(db, clock, search, Some(category)).await,
            json,
            config,
        ),
        Command::Categories => emit(catalog::list_categories(db).await, json, config),
        Command::Borrow { book_id } => emit(catalog::borrow(db, clock, book_id).await, json, config),
        Command::Dashboard => emit(dashboard::load_dashboard(db, config, clock).await, json, config),
        Command::Return { book_id } => emit(
            dashboard::return_book(db, config, clock, book_id).await,
            json,
            config,
        ),
        Command::Renew { book_id } => emit(
            dashboard::renew_book(db, config, clock, book_id).await,
            json,
            config,
        ),
        Command::Pay { index } => emit(
            fines::pay_fine(db, config, checkout, clock, index).await,
            json,
            config,
        ),
        Command::Read { book_id } => emit(
            dashboard::read_book(db, config, clock, book_id).await,
            json,
            config,
        ),
    }
}

/// Prints a command result and picks the exit code.
fn emit<T: Serialize + Report>(result: Result<T, ApiError>, json: bool, config: &ConfigState) -> ExitCode {
    match result {
        Ok(value) => {
            if json {
                match serde_json::to_string_pretty(&value) {
                    Ok(text) => println!("{}", text),
                    Err(err) => return fail(&ApiError::internal(err.to_string()), true),
                }
            } else {
                println!("{}", value.render(config));
            }
            ExitCode::SUCCESS
        }
        Err(err) => fail(&err, json),
    }
}

fn fail(err: &ApiError, json: bool) -> ExitCode {
    if json {
        match serde_json::to_string(err) {
            Ok(text) => eprintln!("{}", text),
            Err(_) => eprintln!("{}", err),
        }
    } else {
        eprintln!("{}", err);
    }
    ExitCode::FAILURE
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=shelf=trace` - Show trace for shelf crates only
/// - Default: INFO level
///
/// Logs go to stderr; stdout carries command output only.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,shelf=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Determines the database file path.
///
/// ## Platform-Specific Paths
/// - **macOS**: `~/Library/Application Support/com.shelf.library/shelf.db`
/// - **Windows**: `%APPDATA%\shelf\library\data\shelf.db`
/// - **Linux**: `~/.local/share/library/shelf.db`
///
/// ## Overrides
/// `--db`, or the `SHELF_DB_PATH` environment variable (resolved by clap).
fn get_database_path(flag: Option<PathBuf>) -> Result<PathBuf, Box<dyn std::error::Error>> {
    if let Some(path) = flag {
        return Ok(path);
    }

    let proj_dirs = ProjectDirs::from("com", "shelf", "library")
        .ok_or("Could not determine app data directory")?;

    let data_dir = proj_dirs.data_dir();

    std::fs::create_dir_all(data_dir)?;

    Ok(data_dir.join("shelf.db"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_db_path_is_used_as_is() {
        let path = get_database_path(Some(PathBuf::from("/tmp/flag.db"))).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/flag.db"));
    }
}
