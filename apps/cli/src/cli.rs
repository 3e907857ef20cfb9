//! Command line definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use shelf_core::catalog::ALL_CATEGORIES;
use shelf_core::BookId;

/// Library catalog, loans and fines.
#[derive(Debug, Parser)]
#[command(name = "shelf", version, about)]
pub struct Cli {
    /// Database file (defaults to the platform data directory)
    #[arg(long, global = true, value_name = "PATH", env = "SHELF_DB_PATH")]
    pub db: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Register a new member
    Signup { username: String, password: String },

    /// Log in and store the session cookie
    Login { username: String, password: String },

    /// Clear the session cookie
    Logout,

    /// Show who is logged in
    Whoami,

    /// Browse the catalog
    Catalog {
        /// Match title or author (case-insensitive)
        #[arg(short, long)]
        search: Option<String>,

        #[arg(short, long, default_value = ALL_CATEGORIES)]
        category: String,
    },

    /// List categories
    Categories,

    /// Borrow a book
    Borrow { book_id: BookId },

    /// Show loans and fines
    Dashboard,

    /// Return a borrowed book
    Return { book_id: BookId },

    /// Extend a loan by 7 days
    Renew { book_id: BookId },

    /// Pay the fine at INDEX (as listed by `dashboard`)
    Pay { index: usize },

    /// Open a borrowed book
    Read { book_id: BookId },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{CommandFactory, FromArgMatches};

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_globals_after_subcommand() {
        let cli = Cli::try_parse_from(["shelf", "borrow", "3", "--json", "--db", "/tmp/s.db"]).unwrap();
        assert!(cli.json);
        assert_eq!(cli.db, Some(PathBuf::from("/tmp/s.db")));
        assert!(matches!(cli.command, Command::Borrow { book_id: 3 }));
    }

    #[test]
    fn test_db_flag_wins_over_env() {
        let db_arg = Cli::command()
            .get_arguments()
            .find(|arg| arg.get_id() == "db")
            .and_then(|arg| arg.get_env().map(|env| env.to_os_string()));
        assert_eq!(db_arg, Some("SHELF_DB_PATH".into()));

        // Renamed so the test does not depend on the caller's environment.
        let cmd = Cli::command().mut_arg("db", |arg| arg.env("SHELF_TEST_DB_PATH"));
        std::env::set_var("SHELF_TEST_DB_PATH", "/tmp/env.db");

        let matches = cmd.clone().try_get_matches_from(["shelf", "whoami"]).unwrap();
        let cli = Cli::from_arg_matches(&matches).unwrap();
        assert_eq!(cli.db, Some(PathBuf::from("/tmp/env.db")));

        let matches = cmd
            .try_get_matches_from(["shelf", "whoami", "--db", "/tmp/flag.db"])
            .unwrap();
        let cli = Cli::from_arg_matches(&matches).unwrap();
        assert_eq!(cli.db, Some(PathBuf::from("/tmp/flag.db")));

        std::env::remove_var("SHELF_TEST_DB_PATH");
    }

    #[test]
    fn test_catalog_defaults_to_all() {
        let cli = Cli::try_parse_from(["shelf", "catalog"]).unwrap();
        match cli.command {
            Command::Catalog { search, category } => {
                assert_eq!(search, None);
                assert_eq!(category, "All");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
