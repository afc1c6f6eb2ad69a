//! # Session State
//!
//! The authenticated user's context: token, user id and company id.
//!
//! ## Lifecycle
//! ```text
//! ┌──────────────┐  login(ctx)   ┌───────────────┐
//! │  LoggedOut   │──────────────►│   LoggedIn    │
//! │  (None)      │◄──────────────│  (ctx)        │
//! └──────────────┘   logout()    └───────────────┘
//! ```
//!
//! Commands that talk to the backend take the context from here and pass
//! it to the gateway explicitly.

use std::fmt;
use std::sync::{PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ApiError, ApiResult};

/// Credentials and tenancy for backend calls.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionContext {
    pub token: String,
    pub user_id: String,
    pub company_id: String,
}

impl SessionContext {
    pub fn new(
        token: impl Into<String>,
        user_id: impl Into<String>,
        company_id: impl Into<String>,
    ) -> Self {
        SessionContext {
            token: token.into(),
            user_id: user_id.into(),
            company_id: company_id.into(),
        }
    }

    /// Value for an `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

// Keep tokens out of logs.
impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionContext")
            .field("token", &"<redacted>")
            .field("user_id", &self.user_id)
            .field("company_id", &self.company_id)
            .finish()
    }
}

/// Holds the current session, if any.
#[derive(Debug, Default)]
pub struct SessionState {
    current: RwLock<Option<SessionContext>>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the context produced by a successful login.
    pub fn login(&self, ctx: SessionContext) -> ApiResult<()> {
        if ctx.token.trim().is_empty() {
            return Err(ApiError::validation("token is required"));
        }
        if ctx.user_id.trim().is_empty() {
            return Err(ApiError::validation("user is required"));
        }

        info!(user_id = %ctx.user_id, company_id = %ctx.company_id, "Session started");
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(ctx);
        Ok(())
    }

    /// Drops the session. Safe to call when already logged out.
    pub fn logout(&self) {
        let previous = self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(ctx) = previous {
            info!(user_id = %ctx.user_id, "Session ended");
        }
    }

    /// Returns the active context or `UNAUTHENTICATED`.
    pub fn current(&self) -> ApiResult<SessionContext> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or_else(ApiError::unauthenticated)
    }

    pub fn is_authenticated(&self) -> bool {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}
