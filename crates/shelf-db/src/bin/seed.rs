//! # Seed Data Generator
//!
//! Prepares a demo database: writes the catalog and, optionally, members.
//!
//! ## Usage
//! ```bash
//! # Catalog only
//! cargo run -p shelf-db --bin seed
//!
//! # Catalog plus two members
//! cargo run -p shelf-db --bin seed -- --user alice:pw1 --user bob:pw2
//!
//! # Specify database path
//! cargo run -p shelf-db --bin seed -- --db ./data/shelf.db
//! ```
//!
//! Existing members and an existing catalog are left as they are.

use std::env;

use shelf_core::auth::signup;
use shelf_core::CoreError;
use shelf_db::{Database, DbConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./shelf_dev.db");
    let mut members: Vec<(String, String)> = Vec::new();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--user" | "-u" => {
                if i + 1 < args.len() {
                    match args[i + 1].split_once(':') {
                        Some((name, password)) => members.push((name.to_string(), password.to_string())),
                        None => eprintln!("Ignoring '{}': expected NAME:PASSWORD", args[i + 1]),
                    }
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Shelf Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>          Database file path (default: ./shelf_dev.db)");
                println!("  -u, --user <NAME:PASS>   Register a member (repeatable)");
                println!("  -h, --help               Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("📚 Shelf Seed Data Generator");
    println!("============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::open(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    if db.catalog().is_seeded().await? {
        println!("⚠ Catalog already present, leaving it untouched");
    } else {
        let books = db.catalog().load().await?;
        println!("✓ Wrote {} books", books.len());
    }

    if !members.is_empty() {
        let mut users = db.users().list().await?;
        for (name, password) in &members {
            match signup(&mut users, name, password) {
                Ok(()) => println!("✓ Registered {}", name),
                Err(CoreError::UsernameTaken(_)) => println!("⚠ {} already exists, skipped", name),
                Err(e) => eprintln!("✗ {}: {}", name, e),
            }
        }
        db.users().save_all(&users).await?;
    }

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
