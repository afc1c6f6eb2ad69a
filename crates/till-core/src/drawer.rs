//! # Cash Drawer Session
//!
//! Bookkeeping for one till shift, from opening float to end-of-shift count.
//!
//! ## Shift Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  open(float) ──► record_sale() / record_payout() ... ──► close(counted) │
//! │                                                                         │
//! │  expected cash = float + cash sales − payouts                          │
//! │  variance      = counted − expected   (negative = drawer is short)     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Timestamps are supplied by the caller; this module never reads the clock.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::PaymentMethod;

/// Cash taken out of the drawer during a shift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payout {
    pub amount: Money,
    pub reason: String,
}

/// Result of closing a drawer session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawerClosing {
    pub expected: Money,
    pub counted: Money,
    /// `counted - expected`.
    pub variance: Money,
    pub closed_at: DateTime<Utc>,
}

/// One cash-drawer session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawerSession {
    pub id: String,
    pub opened_by: String,
    pub opened_at: DateTime<Utc>,
    pub opening_float: Money,
    pub cash_sales: Money,
    pub non_cash_sales: Money,
    pub sale_count: u32,
    pub payouts: Vec<Payout>,
    pub closing: Option<DrawerClosing>,
}

impl DrawerSession {
    /// Opens a session with the cash placed in the drawer at shift start.
    ///
    /// A negative float is treated as zero.
    pub fn open(
        id: impl Into<String>,
        opened_by: impl Into<String>,
        opened_at: DateTime<Utc>,
        opening_float: Money,
    ) -> Self {
        DrawerSession {
            id: id.into(),
            opened_by: opened_by.into(),
            opened_at,
            opening_float: opening_float.max(Money::zero()),
            cash_sales: Money::zero(),
            non_cash_sales: Money::zero(),
            sale_count: 0,
            payouts: Vec::new(),
            closing: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.closing.is_none()
    }

    fn ensure_open(&self) -> CoreResult<()> {
        if self.is_open() {
            Ok(())
        } else {
            Err(CoreError::DrawerClosed {
                session_id: self.id.clone(),
            })
        }
    }

    /// Records a settled sale. Only cash changes what the drawer should hold.
    pub fn record_sale(&mut self, method: PaymentMethod, amount: Money) -> CoreResult<()> {
        self.ensure_open()?;
        if amount.is_negative() {
            return Err(CoreError::InvalidPaymentAmount {
                reason: "sale amount cannot be negative".to_string(),
            });
        }

        if method.is_cash() {
            self.cash_sales += amount;
        } else {
            self.non_cash_sales += amount;
        }
        self.sale_count += 1;
        Ok(())
    }

    /// Records cash leaving the drawer (supplier paid at the door, etc.).
    pub fn record_payout(&mut self, amount: Money, reason: impl Into<String>) -> CoreResult<()> {
        self.ensure_open()?;
        if !amount.is_positive() {
            return Err(CoreError::InvalidPaymentAmount {
                reason: "payout must be positive".to_string(),
            });
        }

        let available = self.expected_cash();
        if amount > available {
            return Err(CoreError::InsufficientDrawerCash {
                available,
                requested: amount,
            });
        }

        self.payouts.push(Payout {
            amount,
            reason: reason.into(),
        });
        Ok(())
    }

    pub fn total_payouts(&self) -> Money {
        self.payouts.iter().map(|p| p.amount).sum()
    }

    /// Cash that should be in the drawer right now.
    pub fn expected_cash(&self) -> Money {
        self.opening_float + self.cash_sales - self.total_payouts()
    }

    /// Closes the session against the counted cash.
    pub fn close(&mut self, counted: Money, closed_at: DateTime<Utc>) -> CoreResult<&DrawerClosing> {
        self.ensure_open()?;
        if counted.is_negative() {
            return Err(CoreError::InvalidPaymentAmount {
                reason: "counted cash cannot be negative".to_string(),
            });
        }

        let expected = self.expected_cash();
        Ok(&*self.closing.insert(DrawerClosing {
            expected,
            counted,
            variance: counted - expected,
            closed_at,
        }))
    }
}
