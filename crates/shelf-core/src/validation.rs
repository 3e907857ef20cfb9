//! # Validation Module
//!
//! Input checks run before any state is read or written.
//!
//! ```text
//! signup form ──► validate_credentials() ──► Required? "Please fill all fields."
//! search box  ──► validate_search_query() ─► trimmed query, at most 100 chars
//! ```
//!
//! Credentials are checked exactly as typed: a username of a single space is
//! accepted, an empty one is not.

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted search query.
pub const MAX_SEARCH_LEN: usize = 100;

/// Checks that both signup fields were filled in.
///
/// ```rust
/// use shelf_core::validation::validate_credentials;
///
/// assert!(validate_credentials("alice", "pw1").is_ok());
/// assert!(validate_credentials("", "pw1").is_err());
/// assert!(validate_credentials("alice", "").is_err());
/// ```
pub fn validate_credentials(username: &str, password: &str) -> ValidationResult<()> {
    if username.is_empty() {
        return Err(ValidationError::Required {
            field: "username".to_string(),
        });
    }
    if password.is_empty() {
        return Err(ValidationError::Required {
            field: "password".to_string(),
        });
    }
    Ok(())
}

/// Validates a catalog search query.
///
/// ## Rules
/// - Can be empty (matches every book)
/// - At most [`MAX_SEARCH_LEN`] characters after trimming
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > MAX_SEARCH_LEN {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: MAX_SEARCH_LEN,
        });
    }

    Ok(query.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_required() {
        assert!(matches!(
            validate_credentials("", ""),
            Err(ValidationError::Required { field }) if field == "username"
        ));
        assert!(matches!(
            validate_credentials("bob", ""),
            Err(ValidationError::Required { field }) if field == "password"
        ));
        // Taken as typed, no trimming.
        assert!(validate_credentials(" ", " ").is_ok());
    }

    #[test]
    fn test_search_query() {
        assert_eq!(validate_search_query("  gatsby ").unwrap(), "gatsby");
        assert_eq!(validate_search_query("").unwrap(), "");
        assert!(validate_search_query(&"x".repeat(101)).is_err());
        assert!(validate_search_query(&"x".repeat(100)).is_ok());
    }
}
