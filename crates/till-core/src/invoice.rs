//! # Invoice Payload
//!
//! Builds an itemized invoice from the same cart the sale screen uses.
//!
//! Each line forwards its tax annotation (`"included"` when none was
//! picked). Totals are the cart's own totals, so an invoice and a receipt
//! issued for the same cart always agree on the amount due.

use serde::{Deserialize, Serialize};

use crate::cart::Cart;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::{major_units, Money};
use crate::types::TaxCode;

/// One itemized invoice line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceLine {
    pub product_id: String,
    pub description: String,
    pub quantity: i64,
    #[serde(with = "major_units")]
    pub unit_price: Money,
    #[serde(with = "major_units")]
    pub line_total: Money,
    pub tax: TaxCode,
}

/// The invoice issuance payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceRequest {
    pub customer_id: String,
    pub lines: Vec<InvoiceLine>,
    #[serde(with = "major_units")]
    pub subtotal: Money,
    #[serde(with = "major_units")]
    pub tax: Money,
    #[serde(with = "major_units")]
    pub discount: Money,
    #[serde(with = "major_units")]
    pub total: Money,
}

/// Builds the invoice payload for `customer_id` from `cart`.
///
/// ## Errors
/// - `Validation(Required)` when `customer_id` is blank
/// - `EmptyCart` when the cart has no lines
pub fn build_invoice_request(cart: &Cart, customer_id: &str) -> CoreResult<InvoiceRequest> {
    let customer_id = customer_id.trim();
    if customer_id.is_empty() {
        return Err(ValidationError::Required {
            field: "customer".to_string(),
        }
        .into());
    }
    if cart.is_empty() {
        return Err(CoreError::EmptyCart);
    }

    let totals = cart.totals();

    Ok(InvoiceRequest {
        customer_id: customer_id.to_string(),
        lines: cart
            .lines()
            .iter()
            .map(|l| InvoiceLine {
                product_id: l.product_id.clone(),
                description: l.name.clone(),
                quantity: l.quantity,
                unit_price: l.unit_price,
                line_total: l.line_total(),
                tax: l.tax_code.unwrap_or(TaxCode::Included),
            })
            .collect(),
        subtotal: totals.subtotal,
        tax: totals.tax,
        discount: totals.discount,
        total: totals.payable,
    })
}
