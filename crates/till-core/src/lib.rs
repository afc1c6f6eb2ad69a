//! # till-core: Pure Business Logic for Till
//!
//! Cart math, sale and invoice payloads, and cash-drawer arithmetic as pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Till Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Browser back office                          │   │
//! │  │    Product picker ──► Cart UI ──► Payment UI ──► Receipt        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ UI events                              │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    till-checkout commands                       │   │
//! │  │    add_to_cart, set_discount, submit_sale, close_drawer, ...   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ till-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌────────┐ ┌───────┐ ┌──────┐ ┌──────┐ ┌───────┐ ┌────────┐  │   │
//! │  │   │ types  │ │ money │ │ cart │ │ sale │ │invoice│ │ drawer │  │   │
//! │  │   └────────┘ └───────┘ └──────┘ └──────┘ └───────┘ └────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • PURE FUNCTIONS                          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, TaxRate, TaxCode, PaymentMethod)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`cart`] - The in-progress sale and its derived totals
//! - [`sale`] - Outbound sale request and the validated backend response
//! - [`invoice`] - Itemized invoice payload built from a cart
//! - [`drawer`] - Cash-drawer session tracking
//! - [`error`] - Domain error types
//! - [`validation`] - Entry validation for user input
//!
//! ## Example Usage
//!
//! ```rust
//! use till_core::cart::Cart;
//! use till_core::money::Money;
//! use till_core::types::{PaymentMethod, Product};
//!
//! let mut cart = Cart::new();
//! cart.add_item(&Product::new("A", "Notebook", 10_000), 2);
//!
//! assert_eq!(cart.subtotal(), Money::from_cents(20_000));
//! assert_eq!(cart.tax(), Money::from_cents(3_200));
//! assert_eq!(cart.payable(), Money::from_cents(23_200));
//! assert_eq!(
//!     cart.change_due(PaymentMethod::Cash, Money::from_cents(30_000)),
//!     Money::from_cents(6_800)
//! );
//! ```

pub mod cart;
pub mod drawer;
pub mod error;
pub mod invoice;
pub mod money;
pub mod sale;
pub mod types;
pub mod validation;

pub use cart::{Cart, CartLine, CartStatus, SaleTotals};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

/// Flat tax rate applied to every sale, in basis points (16%).
///
/// Line-level tax codes never change this; they are carried through to
/// itemized documents only.
pub const DEFAULT_SALE_TAX_RATE_BPS: u32 = 1600;

/// Maximum quantity accepted from the quantity input.
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Maximum unit price accepted into the cart, in cents (9,999,999.99).
pub const MAX_PRICE_CENTS: i64 = 999_999_999;
