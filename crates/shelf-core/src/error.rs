//! # Error Types
//!
//! Domain-specific error types for shelf-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  shelf-core errors (this file)                                         │
//! │  ├── CoreError        - Rule violations the member is told about       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  shelf-db errors (separate crate)                                      │
//! │  └── DbError          - Storage failures                               │
//! │                                                                         │
//! │  CLI errors (in app)                                                   │
//! │  └── ApiError         - What the user sees (code + message)            │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → terminal               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every variant leaves state untouched: the check runs before any mutation.

use thiserror::Error;
use uuid::Uuid;

use crate::types::BookId;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The action needs a logged-in member.
    #[error("Please log in to continue")]
    NotAuthenticated,

    /// No credential record matches the username/password pair.
    #[error("Invalid username or password.")]
    InvalidCredentials,

    /// Signup with a username that is already registered.
    #[error("Username already exists.")]
    UsernameTaken(String),

    /// No copies left to lend.
    ///
    /// ## User Workflow
    /// ```text
    /// Borrow "Harry Potter"
    ///      │
    ///      ▼
    /// Check catalog: available=0
    ///      │
    ///      ▼
    /// BookUnavailable { book_id: 4 }
    ///      │
    ///      ▼
    /// "Book not available."
    /// ```
    #[error("Book not available.")]
    BookUnavailable { book_id: BookId },

    /// The member's ledger already holds this book.
    #[error("You already borrowed this book.")]
    AlreadyBorrowed { book_id: BookId },

    /// The member has no open loan for this book.
    #[error("No active loan for book {book_id}")]
    NoActiveLoan { book_id: BookId },

    /// The loan has been renewed the maximum number of times.
    #[error("Renewal limit reached ({max} times).")]
    RenewalLimitReached { book_id: BookId, max: u32 },

    /// The checkout widget is not available yet.
    #[error("Payment gateway not loaded. Please try again.")]
    GatewayNotReady,

    /// The checkout finished without capturing the payment.
    #[error("Payment not completed: {reason}")]
    PaymentNotCaptured { reason: String },

    /// The checkout confirmed a different payment than the one we started.
    #[error("Payment confirmation {received} does not match request {expected}")]
    PaymentMismatch { expected: Uuid, received: Uuid },

    /// Validation error (wraps ValidationError).
    #[error("{0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("Please fill all fields.")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::RenewalLimitReached { book_id: 2, max: 3 };
        assert_eq!(err.to_string(), "Renewal limit reached (3 times).");

        let err = CoreError::BookUnavailable { book_id: 4 };
        assert_eq!(err.to_string(), "Book not available.");

        assert_eq!(
            CoreError::GatewayNotReady.to_string(),
            "Payment gateway not loaded. Please try again."
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "username".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
        assert_eq!(core_err.to_string(), "Please fill all fields.");
    }
}
