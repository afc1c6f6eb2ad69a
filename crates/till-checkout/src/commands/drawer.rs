//! # Drawer Commands
//!
//! Cash drawer shift: open with a float, take payouts, close against a count.
//!
//! ```text
//! open_drawer("100") ──► submit_sale ... record_payout("25", "milk") ──►
//!     drawer_summary() ──► close_drawer("174.50") ──► variance
//! ```

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use till_core::drawer::{DrawerClosing, DrawerSession};
use till_core::validation::parse_amount;
use till_core::{Money, ValidationError};

use crate::error::{ApiError, ApiResult};
use crate::state::{DrawerState, SessionState};

/// Drawer session plus the figures the shift screen shows.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawerSummary {
    pub session: DrawerSession,
    pub expected_cash: Money,
    pub total_payouts: Money,
}

impl From<&DrawerSession> for DrawerSummary {
    fn from(session: &DrawerSession) -> Self {
        DrawerSummary {
            session: session.clone(),
            expected_cash: session.expected_cash(),
            total_payouts: session.total_payouts(),
        }
    }
}

fn no_open_drawer() -> ApiError {
    ApiError::drawer("No drawer session is open")
}

/// Opens a drawer session for the logged-in cashier.
///
/// A previous closed session is replaced; an open one must be closed first.
pub fn open_drawer(
    drawer: &DrawerState,
    session: &SessionState,
    opening_float: &str,
) -> ApiResult<DrawerSummary> {
    debug!(opening_float = %opening_float, "open_drawer command");
    let ctx = session.current()?;
    let float = parse_amount("opening float", opening_float)?;
    if float.is_negative() {
        return Err(ValidationError::MustBePositive {
            field: "opening float".to_string(),
        }
        .into());
    }

    drawer.with_drawer_mut(|slot| {
        if slot.as_ref().is_some_and(DrawerSession::is_open) {
            return Err(ApiError::drawer("A drawer session is already open"));
        }

        let shift = slot.insert(DrawerSession::open(
            Uuid::new_v4().to_string(),
            ctx.user_id.clone(),
            Utc::now(),
            float,
        ));
        info!(session_id = %shift.id, opened_by = %shift.opened_by, float = %float, "Drawer opened");
        Ok(DrawerSummary::from(&*shift))
    })
}

/// Records cash taken out of the open drawer.
pub fn record_payout(drawer: &DrawerState, amount: &str, reason: &str) -> ApiResult<DrawerSummary> {
    debug!(amount = %amount, reason = %reason, "record_payout command");
    let amount = parse_amount("payout", amount)?;
    let reason = reason.trim();
    if reason.is_empty() {
        return Err(ValidationError::Required {
            field: "reason".to_string(),
        }
        .into());
    }

    drawer.with_drawer_mut(|slot| -> ApiResult<DrawerSummary> {
        let shift = slot.as_mut().ok_or_else(no_open_drawer)?;
        shift.record_payout(amount, reason)?;
        info!(session_id = %shift.id, amount = %amount, "Payout recorded");
        Ok(DrawerSummary::from(&*shift))
    })
}

/// Closes the open drawer against the counted cash.
pub fn close_drawer(drawer: &DrawerState, counted: &str) -> ApiResult<DrawerClosing> {
    debug!(counted = %counted, "close_drawer command");
    let counted = parse_amount("counted cash", counted)?;

    drawer.with_drawer_mut(|slot| -> ApiResult<DrawerClosing> {
        let shift = slot.as_mut().ok_or_else(no_open_drawer)?;
        let session_id = shift.id.clone();
        let closing = shift.close(counted, Utc::now())?.clone();

        if closing.variance.is_zero() {
            info!(session_id = %session_id, expected = %closing.expected, "Drawer closed");
        } else {
            warn!(
                session_id = %session_id,
                expected = %closing.expected,
                counted = %closing.counted,
                variance = %closing.variance,
                "Drawer closed with variance"
            );
        }
        Ok(closing)
    })
}

/// Current (or last closed) drawer session, if any.
pub fn drawer_summary(drawer: &DrawerState) -> Option<DrawerSummary> {
    debug!("drawer_summary command");
    drawer.with_drawer(|slot| slot.map(DrawerSummary::from))
}
