//! # Domain Types
//!
//! Core domain types shared by the cart, the sale payloads and the drawer.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    TaxCode      │   │ PaymentMethod   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  "16%"          │   │  cash           │       │
//! │  │  name           │   │  "exempt"       │   │  card           │       │
//! │  │  price_cents    │   │  "included"     │   │  transfer       │       │
//! │  │  batch_id?      │   └─────────────────┘   │  credit         │       │
//! │  └─────────────────┘                         └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐                                                   │
//! │  │    TaxRate      │   Flat sale-level rate, basis points              │
//! │  │  1600 = 16%     │                                                   │
//! │  └─────────────────┘                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// 1 basis point = 0.01%, so 1600 bps = 16%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage (for config input).
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::from_bps(crate::DEFAULT_SALE_TAX_RATE_BPS)
    }
}

// =============================================================================
// Tax Code
// =============================================================================

/// Per-line tax annotation chosen in the cart UI.
///
/// The sale total ignores it (one flat rate for the whole sale); itemized
/// documents forward it line by line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum TaxCode {
    /// Standard 16% VAT.
    #[serde(rename = "16%")]
    Standard,
    /// Not subject to tax.
    #[serde(rename = "exempt")]
    Exempt,
    /// Tax already included in the unit price.
    #[serde(rename = "included")]
    Included,
}

impl TaxCode {
    /// Wire spelling of the code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            TaxCode::Standard => "16%",
            TaxCode::Exempt => "exempt",
            TaxCode::Included => "included",
        }
    }
}

impl fmt::Display for TaxCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaxCode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "16%" | "16" => Ok(TaxCode::Standard),
            "exempt" => Ok(TaxCode::Exempt),
            "included" => Ok(TaxCode::Included),
            _ => Err(ValidationError::NotAllowed {
                field: "tax".to_string(),
                allowed: vec!["16%".into(), "exempt".into(), "included".into()],
            }),
        }
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How the customer settles the sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash; the only method that produces change.
    Cash,
    /// Card on an external terminal.
    Card,
    /// Bank transfer.
    Transfer,
    /// Sold on account (paid later).
    Credit,
}

impl PaymentMethod {
    /// Whether the drawer receives the money and change may be owed.
    #[inline]
    pub const fn is_cash(&self) -> bool {
        matches!(self, PaymentMethod::Cash)
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
            PaymentMethod::Transfer => "transfer",
            PaymentMethod::Credit => "credit",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cash" => Ok(PaymentMethod::Cash),
            "card" | "credit_card" | "debit" => Ok(PaymentMethod::Card),
            "transfer" | "bank_transfer" => Ok(PaymentMethod::Transfer),
            "credit" | "on_account" => Ok(PaymentMethod::Credit),
            _ => Err(ValidationError::NotAllowed {
                field: "payment method".to_string(),
                allowed: vec![
                    "cash".into(),
                    "card".into(),
                    "transfer".into(),
                    "credit".into(),
                ],
            }),
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product as offered by the sale screen's picker.
///
/// The catalog itself belongs to the backend; this is only the slice the
/// cart needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Backend identifier, opaque to us.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Current selling price in cents.
    pub price_cents: i64,

    /// Inventory batch the sale should draw from, if one was picked.
    #[serde(default)]
    pub batch_id: Option<String>,

    /// Catalog tax annotation; seeds the cart line's tax code.
    #[serde(default)]
    pub tax_code: Option<TaxCode>,
}

impl Product {
    /// Creates a product not tied to any batch.
    pub fn new(id: impl Into<String>, name: impl Into<String>, price_cents: i64) -> Self {
        Product {
            id: id.into(),
            name: name.into(),
            price_cents,
            batch_id: None,
            tax_code: None,
        }
    }

    /// Attributes the product to an inventory batch.
    pub fn with_batch(mut self, batch_id: impl Into<String>) -> Self {
        self.batch_id = Some(batch_id.into());
        self
    }

    /// Sets the catalog tax annotation.
    pub fn with_tax_code(mut self, tax_code: TaxCode) -> Self {
        self.tax_code = Some(tax_code);
        self
    }

    /// Returns the price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
