//! # Cart Commands
//!
//! Commands for cart manipulation.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Lifecycle                                       │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │  Empty   │────►│ NonEmpty │────►│Submitting│────►│ Confirmed│       │
//! │  │  Cart    │     │          │     │          │     │  (clear) │       │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘       │
//! │                        │                 │                              │
//! │                   add_to_cart       submit_sale                        │
//! │                   update_cart_item  (sale.rs)                          │
//! │                   remove_from_cart       │ failure                     │
//! │                   set_discount           ▼                              │
//! │                        │            back to NonEmpty, unchanged        │
//! │                        ▼                                                │
//! │                   clear_cart ──────────────────────►                   │
//! │                                                      (back to empty)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use tracing::{debug, info};

use till_core::validation::{
    parse_amount, parse_quantity, validate_price_cents, validate_product_id, validate_quantity,
};
use till_core::{Cart, CartLine, Money, PaymentMethod, Product, SaleTotals, TaxCode};

use crate::error::ApiResult;
use crate::state::CartState;

/// Cart response including items and totals.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub items: Vec<CartLine>,
    pub totals: SaleTotals,
    pub pending_quantity: i64,
}

impl From<&Cart> for CartResponse {
    fn from(cart: &Cart) -> Self {
        CartResponse {
            items: cart.lines().to_vec(),
            totals: cart.totals(),
            pending_quantity: cart.pending_quantity(),
        }
    }
}

/// Change owed for an amount the cashier is typing, before submission.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeQuote {
    pub payable: Money,
    pub tendered: Money,
    pub change: Money,
}

/// Gets the current cart contents.
pub fn get_cart(cart: &CartState) -> CartResponse {
    debug!("get_cart command");
    cart.with_cart(|c| CartResponse::from(c))
}

/// Adds a product to the cart.
///
/// ## Behavior
/// - Product already in cart: its quantity is replaced (last write wins)
/// - Product not in cart: added as a new line
/// - `quantity` omitted: the pending "quantity to add" selector is used
/// - Price is captured at add time; negative prices are floored to 0 and
///   prices above `MAX_PRICE_CENTS` are rejected
pub fn add_to_cart(
    cart: &CartState,
    product: &Product,
    quantity: Option<i64>,
) -> ApiResult<CartResponse> {
    debug!(product_id = %product.id, ?quantity, "add_to_cart command");
    validate_product_id(&product.id)?;
    validate_price_cents(product.price_cents.max(0))?;
    if let Some(qty) = quantity {
        validate_quantity(qty)?;
    }

    Ok(cart.with_cart_mut(|c| {
        match quantity {
            Some(qty) => c.add_item(product, qty),
            None => c.add_pending(product),
        }
        CartResponse::from(&*c)
    }))
}

/// Sets the "quantity to add" selector next to the product picker.
pub fn set_quantity_to_add(cart: &CartState, quantity: &str) -> ApiResult<CartResponse> {
    debug!(quantity = %quantity, "set_quantity_to_add command");
    let quantity = parse_quantity(quantity)?;

    Ok(cart.with_cart_mut(|c| {
        c.set_pending_quantity(quantity);
        CartResponse::from(&*c)
    }))
}

/// Replaces the quantity of a line from the quantity field.
///
/// ## Behavior
/// - Non-numeric input: `VALIDATION_ERROR`, cart unchanged
/// - Quantity 0 or negative: the line is removed
/// - Unknown product id: no-op
pub fn update_cart_item(
    cart: &CartState,
    product_id: &str,
    quantity: &str,
) -> ApiResult<CartResponse> {
    debug!(product_id = %product_id, quantity = %quantity, "update_cart_item command");
    let quantity = parse_quantity(quantity)?;

    Ok(cart.with_cart_mut(|c| {
        if !c.change_quantity(product_id, quantity) {
            debug!(product_id = %product_id, "update_cart_item: no matching line");
        }
        CartResponse::from(&*c)
    }))
}

/// Removes a line from the cart. Unknown ids are a no-op.
pub fn remove_from_cart(cart: &CartState, product_id: &str) -> CartResponse {
    debug!(product_id = %product_id, "remove_from_cart command");

    cart.with_cart_mut(|c| {
        c.remove_item(product_id);
        CartResponse::from(&*c)
    })
}

/// Sets or clears a line's tax annotation.
///
/// `None` or an empty string clears it. Sale totals are unaffected; the code
/// is forwarded on invoices.
pub fn set_item_tax(
    cart: &CartState,
    product_id: &str,
    tax_code: Option<&str>,
) -> ApiResult<CartResponse> {
    debug!(product_id = %product_id, ?tax_code, "set_item_tax command");

    let tax_code = match tax_code.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => Some(raw.parse::<TaxCode>()?),
        None => None,
    };

    Ok(cart.with_cart_mut(|c| {
        c.change_tax(product_id, tax_code);
        CartResponse::from(&*c)
    }))
}

/// Sets the sale discount from the discount field.
///
/// Amounts are clamped to `[0, subtotal + tax]`: a negative entry becomes
/// zero and an oversized one becomes a full offset.
pub fn set_discount(cart: &CartState, amount: &str) -> ApiResult<CartResponse> {
    debug!(amount = %amount, "set_discount command");
    let requested = parse_amount("discount", amount)?;

    Ok(cart.with_cart_mut(|c| {
        let stored = c.set_discount(requested);
        if stored != requested {
            debug!(requested = %requested, stored = %stored, "Discount clamped");
        }
        CartResponse::from(&*c)
    }))
}

/// Quotes the change owed for a typed tendered amount.
///
/// Only cash produces change. Tendered amounts below the payable total
/// quote zero change; they are not rejected.
pub fn quote_change(
    cart: &CartState,
    method: PaymentMethod,
    tendered: &str,
) -> ApiResult<ChangeQuote> {
    debug!(method = %method, tendered = %tendered, "quote_change command");
    let tendered = parse_amount("amount tendered", tendered)?;

    Ok(cart.with_cart(|c| ChangeQuote {
        payable: c.payable(),
        tendered,
        change: c.change_due(method, tendered),
    }))
}

/// Clears all lines and the discount.
pub fn clear_cart(cart: &CartState) -> CartResponse {
    debug!("clear_cart command");

    cart.with_cart_mut(|c| {
        c.clear();
        info!("Cart cleared");
        CartResponse::from(&*c)
    })
}
