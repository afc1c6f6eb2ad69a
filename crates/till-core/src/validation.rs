//! # Validation Module
//!
//! Entry validation for values typed or picked on the sale screen.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Browser input controls                                       │
//! │  ├── numeric inputs with min=1                                         │
//! │  └── immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: till-checkout commands                                       │
//! │  └── THIS MODULE: reject bad input before the cart is touched          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Cart model                                                   │
//! │  └── clamps anything that still slips through (qty ≥ 1, price ≥ 0)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use till_core::validation::{parse_quantity, require_payment_method};
//! use till_core::PaymentMethod;
//!
//! assert_eq!(parse_quantity(" 3 ").unwrap(), 3);
//! assert!(parse_quantity("three").is_err());
//! assert!(require_payment_method(None).is_err());
//! assert!(require_payment_method(Some(PaymentMethod::Cash)).is_ok());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::PaymentMethod;
use crate::{MAX_ITEM_QUANTITY, MAX_PRICE_CENTS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Identifiers
// =============================================================================

/// Validates a product id coming from the UI.
///
/// ## Rules
/// - Must not be empty or whitespace
/// - At most 64 characters
pub fn validate_product_id(id: &str) -> ValidationResult<()> {
    let id = id.trim();

    if id.is_empty() {
        return Err(ValidationError::Required {
            field: "product".to_string(),
        });
    }

    if id.len() > 64 {
        return Err(ValidationError::TooLong {
            field: "product".to_string(),
            max: 64,
        });
    }

    Ok(())
}

// =============================================================================
// Quantities
// =============================================================================

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Parses a quantity typed into the quantity input.
///
/// ## User Workflow
/// ```text
/// User types "2" ──► parse_quantity("2") ──► Ok(2) ──► change_quantity()
/// User types "x" ──► parse_quantity("x") ──► InvalidFormat ──► inline warning
/// ```
///
/// Zero and negatives parse fine: the cart treats them as "remove line".
pub fn parse_quantity(input: &str) -> ValidationResult<i64> {
    let qty: i64 = input
        .trim()
        .parse()
        .map_err(|_| ValidationError::InvalidFormat {
            field: "quantity".to_string(),
            reason: "must be a whole number".to_string(),
        })?;

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(qty)
}

// =============================================================================
// Amounts
// =============================================================================

/// Validates a price in cents. Zero is allowed (free items).
///
/// The upper bound keeps `price × MAX_ITEM_QUANTITY` and its tax far from
/// the `i64` limits.
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if !(0..=MAX_PRICE_CENTS).contains(&cents) {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: MAX_PRICE_CENTS,
        });
    }

    Ok(())
}

/// Validates a payment amount (tendered cash, payout).
pub fn validate_payment_amount(amount: Money) -> ValidationResult<()> {
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "payment amount".to_string(),
        });
    }

    Ok(())
}

/// Parses an amount typed in major units (`"300"`, `"12.50"`).
///
/// Negative amounts parse; the caller decides whether to clamp (discount)
/// or reject (tendered cash).
pub fn parse_amount(field: &str, input: &str) -> ValidationResult<Money> {
    if input.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    Money::from_major_str(input).ok_or_else(|| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be an amount with at most two decimals".to_string(),
    })
}

/// Validates a tax rate in basis points (0% to 100%).
pub fn validate_tax_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10000 {
        return Err(ValidationError::OutOfRange {
            field: "tax_rate".to_string(),
            min: 0,
            max: 10000,
        });
    }

    Ok(())
}

// =============================================================================
// Selections
// =============================================================================

/// Requires that a payment method was selected before submitting.
pub fn require_payment_method(method: Option<PaymentMethod>) -> ValidationResult<PaymentMethod> {
    method.ok_or_else(|| ValidationError::Required {
        field: "payment method".to_string(),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
