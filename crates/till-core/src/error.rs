//! # Error Types
//!
//! Domain-specific error types for till-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  till-core errors (this file)                                          │
//! │  ├── CoreError        - Domain failures (drawer, invoice, response)    │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  till-checkout errors                                                  │
//! │  ├── GatewayError     - Transport failures talking to the backend      │
//! │  └── ApiError         - What the UI sees (serialized)                  │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → UI notification        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Cart operations themselves never fail; everything here comes from entry
//! validation, document building, drawer bookkeeping, or a malformed
//! backend response.

use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A document was requested from a cart with no lines.
    #[error("Cart is empty")]
    EmptyCart,

    /// Payment or payout amount is invalid.
    #[error("Invalid payment amount: {reason}")]
    InvalidPaymentAmount { reason: String },

    /// The drawer session was already closed.
    ///
    /// ## When This Occurs
    /// - Recording a sale after end-of-shift close
    /// - Closing the same session twice
    #[error("Cash drawer session {session_id} is closed")]
    DrawerClosed { session_id: String },

    /// A payout would take more cash than the drawer should hold.
    #[error("Payout of {requested} exceeds expected drawer cash {available}")]
    InsufficientDrawerCash { available: Money, requested: Money },

    /// The backend answered with a body that matches no known schema.
    #[error("Malformed backend response: {0}")]
    MalformedResponse(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any cart mutation or submission, so a failure never
/// changes state.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g. non-numeric quantity).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
