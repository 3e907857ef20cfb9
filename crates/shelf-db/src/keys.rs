//! Storage key names.
//!
//! These are the exact keys the browser demo used in `localStorage`, so an
//! exported browser profile can be loaded key-for-key.

/// Credential records: `[User]`.
pub const USERS: &str = "users";

/// The shared catalog: `[Book]`.
pub const BOOKS_STATE: &str = "books_state";

/// The current session cookie.
pub const SESSION_COOKIE: &str = "cookie_session";

/// Borrow ledger of one member: `[BookId]`.
pub fn borrowed(username: &str) -> String {
    format!("user_{username}_borrowed")
}

/// Dashboard state of one member.
pub fn dashboard(username: &str) -> String {
    format!("user_{username}_dashboard")
}
