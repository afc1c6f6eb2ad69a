//! # Session Commands
//!
//! Login and logout bookkeeping. Authentication itself happens in the
//! transport; these commands only store or drop the resulting context.

use tracing::debug;

use crate::error::ApiResult;
use crate::state::{CartState, SessionContext, SessionState};

/// Stores the context returned by a successful login.
pub fn start_session(session: &SessionState, ctx: SessionContext) -> ApiResult<()> {
    debug!(user_id = %ctx.user_id, "start_session command");
    session.login(ctx)
}

/// Ends the session. The in-progress cart is discarded with it.
pub fn end_session(session: &SessionState, cart: &CartState) {
    debug!("end_session command");
    cart.with_cart_mut(|c| c.clear());
    session.logout();
}
