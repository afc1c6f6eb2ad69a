//! # Sale Gateway
//!
//! The seam between the checkout flow and the REST transport.
//!
//! The transport (HTTP client, auth header placement, base URL) lives
//! outside this workspace. It implements [`SaleGateway`] and returns the raw
//! response body; parsing and validation against the response schema happen
//! here, in [`till_core::sale::SaleResponse::parse`].

use std::future::Future;

use thiserror::Error;
use till_core::sale::SaleRequest;

use crate::state::SessionContext;

/// Transport-level failures.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    /// Connection refused, DNS, TLS, etc.
    #[error("Transport failure: {0}")]
    Transport(String),

    /// The backend rejected the session token.
    #[error("Session rejected by backend")]
    Unauthorized,

    /// Non-success HTTP status. `body` may still carry an error payload.
    #[error("Backend returned status {status}")]
    Status { status: u16, body: String },

    /// No answer within the configured timeout.
    #[error("Timed out after {secs}s")]
    Timeout { secs: u64 },
}

/// Submits sales to the backend.
pub trait SaleGateway: Send + Sync {
    /// Sends `request` on behalf of `session` and returns the raw body of a
    /// success response.
    fn submit_sale(
        &self,
        session: &SessionContext,
        request: &SaleRequest,
    ) -> impl Future<Output = Result<String, GatewayError>> + Send;
}
