//! # API Error Type
//!
//! Unified error type for CLI commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Shelf                                  │
//! │                                                                         │
//! │  shelf renew 3                                                         │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Storage Error? ─── DbError::QueryFailed("...") ───┐            │  │
//! │  │         │                                          │            │  │
//! │  │         ▼                                          ▼            │  │
//! │  │  Rule broken? ─── CoreError::RenewalLimitReached ─ ApiError ───►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  stderr: "Renewal limit reached (3 times)."        exit code 1         │
//! │  --json: {"code":"RENEWAL_LIMIT","message":"..."}                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use shelf_core::{CoreError, ValidationError};
use shelf_db::DbError;

/// Error returned from CLI commands.
///
/// ## Serialization
/// What `--json` prints when a command fails:
/// ```json
/// {
///   "code": "UNAVAILABLE",
///   "message": "Book not available."
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for scripts
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for command failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// No open loan for the requested book
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Storage operation failed
    DatabaseError,

    /// Internal error
    Internal,

    /// The command needs a logged-in member
    Unauthenticated,

    /// Username/password pair did not match
    InvalidCredentials,

    /// Username taken or book already held
    Conflict,

    /// No copies left
    Unavailable,

    /// Loan renewed the maximum number of times
    RenewalLimit,

    /// Checkout not ready, cancelled, failed or mismatched
    PaymentError,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts storage errors to API errors.
///
/// Details are logged; the user gets a generic message.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::ConnectionFailed(e) => {
                tracing::error!("Database connection failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(e) => {
                tracing::error!("Migration failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::TransactionFailed(e) => {
                tracing::error!("Transaction failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database transaction failed")
            }
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::CorruptValue { key, reason } => {
                tracing::error!(key = %key, "Stored value unreadable: {}", reason);
                ApiError::new(
                    ErrorCode::DatabaseError,
                    format!("Stored data under '{}' is unreadable", key),
                )
            }
            DbError::Serialization(e) => {
                tracing::error!("Serialization failed: {}", e);
                ApiError::new(ErrorCode::Internal, "Could not save data")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal storage error: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts core errors to API errors. The core message is shown as is.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let code = match &err {
            CoreError::NotAuthenticated => ErrorCode::Unauthenticated,
            CoreError::InvalidCredentials => ErrorCode::InvalidCredentials,
            CoreError::UsernameTaken(_) | CoreError::AlreadyBorrowed { .. } => ErrorCode::Conflict,
            CoreError::BookUnavailable { .. } => ErrorCode::Unavailable,
            CoreError::NoActiveLoan { .. } => ErrorCode::NotFound,
            CoreError::RenewalLimitReached { .. } => ErrorCode::RenewalLimit,
            CoreError::GatewayNotReady
            | CoreError::PaymentNotCaptured { .. }
            | CoreError::PaymentMismatch { .. } => ErrorCode::PaymentError,
            CoreError::Validation(_) => ErrorCode::ValidationError,
        };
        ApiError::new(code, err.to_string())
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::from(CoreError::from(err))
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_errors_keep_message() {
        let err = ApiError::from(CoreError::RenewalLimitReached { book_id: 1, max: 3 });
        assert_eq!(err.code, ErrorCode::RenewalLimit);
        assert_eq!(err.message, "Renewal limit reached (3 times).");

        let err = ApiError::from(CoreError::UsernameTaken("alice".to_string()));
        assert_eq!(err.code, ErrorCode::Conflict);
        assert_eq!(err.message, "Username already exists.");
    }

    #[test]
    fn test_db_errors_are_generic() {
        let err = ApiError::from(DbError::QueryFailed("no such table: kv_entries".to_string()));
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert_eq!(err.message, "Database operation failed");
    }

    #[test]
    fn test_validation_errors_map_to_validation_code() {
        let err = ApiError::from(ValidationError::TooLong {
            field: "search".to_string(),
            max: 100,
        });
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(err.message.contains("search"));
    }

    #[test]
    fn test_json_shape() {
        let err = ApiError::from(CoreError::BookUnavailable { book_id: 4 });
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            serde_json::json!({"code": "UNAVAILABLE", "message": "Book not available."})
        );
    }
}
