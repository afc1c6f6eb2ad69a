//! # API Error Type
//!
//! Unified error type for checkout commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Till                                   │
//! │                                                                         │
//! │  Validation failure ─── ValidationError ──┐                             │
//! │  Drawer / document  ─── CoreError ────────┼──► ApiError ──► UI toast    │
//! │  Network failure    ─── GatewayError ─────┤                             │
//! │  Backend said no    ─── SaleRejected ─────┘                             │
//! │                                                                         │
//! │  None of these mutate the cart: the user fixes input or retries.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Serialization
//! The UI receives a machine-readable `code` and a human-readable `message`:
//! ```json
//! { "code": "VALIDATION_ERROR", "message": "payment method is required" }
//! ```

use serde::Serialize;
use till_core::{CoreError, ValidationError};

use crate::gateway::GatewayError;

/// Convenience alias for command results.
pub type ApiResult<T> = Result<T, ApiError>;

/// Error returned from checkout commands.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for command responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input validation failed; nothing changed
    ValidationError,

    /// No session; the user must log in again
    Unauthenticated,

    /// Cart operation could not be completed (e.g. empty cart)
    CartError,

    /// A sale submission is already in flight
    SubmissionInFlight,

    /// The backend rejected the sale with a message
    SaleRejected,

    /// The backend could not be reached or timed out
    NetworkError,

    /// The backend answered with an unexpected body
    MalformedResponse,

    /// Cash drawer bookkeeping failed
    DrawerError,

    /// Payment amount problems
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

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates a cart error.
    pub fn cart(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::CartError, message)
    }

    pub fn unauthenticated() -> Self {
        ApiError::new(ErrorCode::Unauthenticated, "Session expired, please log in")
    }

    pub fn drawer(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::DrawerError, message)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::EmptyCart => ApiError::cart("Cart is empty"),
            CoreError::InvalidPaymentAmount { reason } => ApiError::new(
                ErrorCode::PaymentError,
                format!("Invalid payment amount: {}", reason),
            ),
            err @ (CoreError::DrawerClosed { .. } | CoreError::InsufficientDrawerCash { .. }) => {
                ApiError::drawer(err.to_string())
            }
            CoreError::MalformedResponse(detail) => {
                tracing::error!(%detail, "Backend response did not match schema");
                ApiError::new(
                    ErrorCode::MalformedResponse,
                    "Unexpected response from server",
                )
            }
            CoreError::Validation(e) => e.into(),
        }
    }
}

/// Converts transport errors to API errors.
impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        tracing::error!(error = %err, "Backend call failed");
        match err {
            GatewayError::Timeout { secs } => ApiError::new(
                ErrorCode::NetworkError,
                format!("Server did not answer within {} seconds", secs),
            ),
            GatewayError::Unauthorized => ApiError::unauthenticated(),
            GatewayError::Transport(_) | GatewayError::Status { .. } => {
                ApiError::new(ErrorCode::NetworkError, "Could not reach server")
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}
