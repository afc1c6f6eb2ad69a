//! # Cart
//!
//! The in-progress sale: a list of lines plus the discount and the flat
//! sale tax rate, with every total derived on demand.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  UI Action               Operation               Cart Change            │
//! │  ─────────               ─────────               ───────────            │
//! │                                                                         │
//! │  Pick product ─────────► add_item() ───────────► set or push line      │
//! │  Edit quantity ────────► change_quantity() ────► qty = n (≤0 removes)  │
//! │  Pick tax code ────────► change_tax() ─────────► annotation only       │
//! │  Click remove ─────────► remove_item() ────────► filter line           │
//! │  Type discount ────────► set_discount() ───────► clamp + store         │
//! │  Sale confirmed ───────► clear() ──────────────► back to Empty         │
//! │                                                                         │
//! │  Totals (subtotal, tax, payable, change) are never cached.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Lines are unique by `product_id`
//! - Every line has `quantity >= 1`
//! - Every line has `unit_price >= 0`
//! - `0 <= discount() <= total_with_tax()`

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::sale::{SaleItemRequest, SaleRequest};
use crate::types::{PaymentMethod, Product, TaxCode, TaxRate};

// =============================================================================
// Cart Line
// =============================================================================

/// One product entry in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Line key; unique within the cart.
    pub product_id: String,

    /// Display label, not used in computation.
    pub name: String,

    /// Unit price captured when the product was added.
    pub unit_price: Money,

    /// Always at least 1.
    pub quantity: i64,

    /// Optional tax annotation. Does not affect sale totals.
    pub tax_code: Option<TaxCode>,

    /// Inventory batch to draw from, passed through to the backend.
    pub batch_id: Option<String>,
}

impl CartLine {
    fn from_product(product: &Product, quantity: i64) -> Self {
        CartLine {
            product_id: product.id.clone(),
            name: product.name.clone(),
            unit_price: product.price().max(Money::zero()),
            quantity,
            tax_code: product.tax_code,
            batch_id: product.batch_id.clone(),
        }
    }

    /// Unit price × quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Totals
// =============================================================================

/// Derived totals for display and for the outbound payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SaleTotals {
    pub item_count: usize,
    pub total_quantity: i64,
    pub subtotal: Money,
    pub tax: Money,
    pub discount: Money,
    pub payable: Money,
}

/// The two states a cart can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CartStatus {
    Empty,
    NonEmpty,
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart for one sale session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    lines: Vec<CartLine>,

    /// Discount as entered, already clamped at entry time.
    discount: Money,

    /// Flat rate applied to the whole subtotal.
    tax_rate: TaxRate,

    /// The "quantity to add" selector bound to the product picker.
    pending_quantity: i64,
}

impl Default for Cart {
    fn default() -> Self {
        Cart::new()
    }
}

impl Cart {
    /// Creates an empty cart taxed at the default sale rate (16%).
    pub fn new() -> Self {
        Cart::with_tax_rate(TaxRate::default())
    }

    /// Creates an empty cart taxed at `tax_rate`.
    pub fn with_tax_rate(tax_rate: TaxRate) -> Self {
        Cart {
            lines: Vec::new(),
            discount: Money::zero(),
            tax_rate,
            pending_quantity: 1,
        }
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn line(&self, product_id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.product_id == product_id)
    }

    pub fn tax_rate(&self) -> TaxRate {
        self.tax_rate
    }

    pub fn status(&self) -> CartStatus {
        if self.lines.is_empty() {
            CartStatus::Empty
        } else {
            CartStatus::NonEmpty
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct lines.
    pub fn item_count(&self) -> usize {
        self.lines.len()
    }

    /// Sum of all line quantities.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    // -------------------------------------------------------------------------
    // Mutations
    // -------------------------------------------------------------------------

    /// Adds a product, or overwrites the quantity of its existing line.
    ///
    /// ## Behavior
    /// - Product already in cart: quantity becomes `quantity` (last write
    ///   wins, not additive)
    /// - Product not in cart: a new line is appended
    /// - `quantity < 1` is clamped to 1; callers validate input first
    /// - The pending "quantity to add" selector resets to 1
    pub fn add_item(&mut self, product: &Product, quantity: i64) {
        let quantity = quantity.max(1);

        match self.lines.iter_mut().find(|l| l.product_id == product.id) {
            Some(line) => line.quantity = quantity,
            None => self.lines.push(CartLine::from_product(product, quantity)),
        }

        self.pending_quantity = 1;
    }

    /// Adds a product using the pending "quantity to add" selector.
    pub fn add_pending(&mut self, product: &Product) {
        self.add_item(product, self.pending_quantity);
    }

    /// Sets the "quantity to add" selector (at least 1).
    pub fn set_pending_quantity(&mut self, quantity: i64) {
        self.pending_quantity = quantity.max(1);
    }

    pub fn pending_quantity(&self) -> i64 {
        self.pending_quantity
    }

    /// Removes the line for `product_id`.
    ///
    /// Returns whether a line was removed; a missing id is a no-op.
    pub fn remove_item(&mut self, product_id: &str) -> bool {
        let initial_len = self.lines.len();
        self.lines.retain(|l| l.product_id != product_id);
        self.lines.len() != initial_len
    }

    /// Replaces the quantity on a line.
    ///
    /// `quantity <= 0` removes the line. Returns whether a line matched.
    pub fn change_quantity(&mut self, product_id: &str, quantity: i64) -> bool {
        if quantity <= 0 {
            return self.remove_item(product_id);
        }

        match self.lines.iter_mut().find(|l| l.product_id == product_id) {
            Some(line) => {
                line.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Sets or clears the tax annotation on a line.
    pub fn change_tax(&mut self, product_id: &str, tax_code: Option<TaxCode>) -> bool {
        match self.lines.iter_mut().find(|l| l.product_id == product_id) {
            Some(line) => {
                line.tax_code = tax_code;
                true
            }
            None => false,
        }
    }

    /// Stores a discount clamped into `[0, total_with_tax()]` and returns
    /// the stored value.
    ///
    /// An amount above the current total becomes a full offset rather than
    /// being rejected.
    pub fn set_discount(&mut self, amount: Money) -> Money {
        self.discount = amount.clamp_to(Money::zero(), self.total_with_tax());
        self.discount
    }

    /// Drops all lines and the discount.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.discount = Money::zero();
        self.pending_quantity = 1;
    }

    /// Removes what a confirmed sale sold and keeps everything else.
    ///
    /// `sold` is the snapshot the sale was built from. Lines added while the
    /// sale was in flight stay; a line whose quantity was raised in flight
    /// keeps the difference. The discount belonged to the sold sale and is
    /// dropped.
    ///
    /// ```text
    /// snapshot:  A×2            cart now:  A×3, B×1
    /// settle ──► A×1, B×1
    /// ```
    pub fn settle(&mut self, sold: &[CartLine]) {
        for sold_line in sold {
            let pos = self
                .lines
                .iter()
                .position(|l| l.product_id == sold_line.product_id);
            if let Some(pos) = pos {
                let remaining = self.lines[pos].quantity - sold_line.quantity;
                if remaining > 0 {
                    self.lines[pos].quantity = remaining;
                } else {
                    self.lines.remove(pos);
                }
            }
        }

        self.discount = Money::zero();
        if self.lines.is_empty() {
            self.pending_quantity = 1;
        }
    }

    // -------------------------------------------------------------------------
    // Derived totals
    // -------------------------------------------------------------------------

    /// Σ(unit price × quantity).
    pub fn subtotal(&self) -> Money {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Flat sale rate applied to the subtotal, independent of line tax codes.
    pub fn tax(&self) -> Money {
        self.subtotal().calculate_tax(self.tax_rate)
    }

    pub fn total_with_tax(&self) -> Money {
        self.subtotal() + self.tax()
    }

    /// Stored discount, re-clamped in case lines were removed after it was set.
    pub fn discount(&self) -> Money {
        self.discount.clamp_to(Money::zero(), self.total_with_tax())
    }

    /// Subtotal + tax − discount. Never negative.
    pub fn payable(&self) -> Money {
        self.total_with_tax() - self.discount()
    }

    /// `max(0, tendered − payable)`, with payable recomputed now.
    pub fn compute_change(&self, tendered: Money) -> Money {
        (tendered - self.payable()).max(Money::zero())
    }

    /// Change owed for the given payment method; only cash produces change.
    pub fn change_due(&self, method: PaymentMethod, tendered: Money) -> Money {
        if method.is_cash() {
            self.compute_change(tendered)
        } else {
            Money::zero()
        }
    }

    pub fn totals(&self) -> SaleTotals {
        SaleTotals {
            item_count: self.item_count(),
            total_quantity: self.total_quantity(),
            subtotal: self.subtotal(),
            tax: self.tax(),
            discount: self.discount(),
            payable: self.payable(),
        }
    }

    // -------------------------------------------------------------------------
    // Outbound payload
    // -------------------------------------------------------------------------

    /// Packages the cart into the sale submission payload.
    ///
    /// Unit prices are left out: the backend prices the sale at settlement.
    /// Performs no I/O.
    pub fn build_sale_request(
        &self,
        payment_method: PaymentMethod,
        customer: Option<String>,
    ) -> SaleRequest {
        SaleRequest {
            discount: self.discount(),
            sale_items: self
                .lines
                .iter()
                .map(|l| SaleItemRequest {
                    product_id: l.product_id.clone(),
                    batch_id: l.batch_id.clone(),
                    quantity: l.quantity,
                })
                .collect(),
            total_amount: self.payable(),
            payment_method,
            customer: customer.filter(|c| !c.trim().is_empty()),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn product(id: &str, price_cents: i64) -> Product {
        Product::new(id, format!("Product {}", id), price_cents)
    }

    fn assert_subtotal_matches_lines(cart: &Cart) {
        let expected: i64 = cart
            .lines()
            .iter()
            .map(|l| l.unit_price.cents() * l.quantity)
            .sum();
        assert_eq!(cart.subtotal().cents(), expected);
    }

    #[test]
    fn test_new_cart_is_empty() {
        let cart = Cart::new();
        assert_eq!(cart.status(), CartStatus::Empty);
        assert_eq!(cart.subtotal(), Money::zero());
        assert_eq!(cart.payable(), Money::zero());
        assert_eq!(cart.pending_quantity(), 1);
    }

    #[test]
    fn test_worked_example_totals_and_change() {
        let mut cart = Cart::new();
        cart.add_item(&product("A", 10_000), 2);

        assert_eq!(cart.subtotal().cents(), 20_000);
        assert_eq!(cart.tax().cents(), 3_200);
        assert_eq!(cart.payable().cents(), 23_200);
        assert_eq!(
            cart.change_due(PaymentMethod::Cash, Money::from_cents(30_000)).cents(),
            6_800
        );
    }

    #[test]
    fn test_add_existing_product_overwrites_quantity() {
        let mut cart = Cart::new();
        let a = product("A", 1_000);

        cart.add_item(&a, 1);
        cart.add_item(&a, 5);

        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.line("A").unwrap().quantity, 5);
        assert_eq!(cart.subtotal().cents(), 5_000);
    }

    #[test]
    fn test_add_clamps_quantity_and_negative_price() {
        let mut cart = Cart::new();
        cart.add_item(&product("A", 500), 0);
        cart.add_item(&product("B", -200), 3);

        assert_eq!(cart.line("A").unwrap().quantity, 1);
        assert_eq!(cart.line("B").unwrap().unit_price, Money::zero());
        assert_eq!(cart.subtotal().cents(), 500);
    }

    #[test]
    fn test_add_keeps_batch_and_resets_pending_quantity() {
        let mut cart = Cart::new();
        cart.set_pending_quantity(4);
        cart.add_pending(&product("A", 250).with_batch("lot-7"));

        let line = cart.line("A").unwrap();
        assert_eq!(line.quantity, 4);
        assert_eq!(line.batch_id.as_deref(), Some("lot-7"));
        assert!(line.tax_code.is_none());
        assert_eq!(cart.pending_quantity(), 1);

        cart.set_pending_quantity(-3);
        assert_eq!(cart.pending_quantity(), 1);
    }

    #[test]
    fn test_add_seeds_tax_code_from_product() {
        let mut cart = Cart::new();
        cart.add_item(&product("A", 250).with_tax_code(TaxCode::Exempt), 1);
        cart.add_item(&product("B", 250), 1);

        assert_eq!(cart.line("A").unwrap().tax_code, Some(TaxCode::Exempt));
        assert!(cart.line("B").unwrap().tax_code.is_none());

        // Annotation only: the flat sale rate still applies to both lines.
        assert_eq!(cart.tax().cents(), 80);
    }

    #[test]
    fn test_huge_prices_saturate_instead_of_panicking() {
        let mut cart = Cart::new();
        cart.add_item(&product("A", i64::MAX / 2), 3);
        cart.add_item(&product("B", i64::MAX / 2), 1);

        assert_eq!(cart.line("A").unwrap().line_total().cents(), i64::MAX);
        assert_eq!(cart.subtotal().cents(), i64::MAX);
        assert_eq!(cart.total_with_tax().cents(), i64::MAX);
    }

    #[test]
    fn test_remove_missing_item_is_noop() {
        let mut cart = Cart::new();
        cart.add_item(&product("A", 1_000), 2);
        let before = cart.clone();

        assert!(!cart.remove_item("missing-id"));
        assert_eq!(cart, before);

        assert!(cart.remove_item("A"));
        assert_eq!(cart.status(), CartStatus::Empty);
    }

    #[test]
    fn test_change_quantity() {
        let mut cart = Cart::new();
        cart.add_item(&product("A", 1_000), 1);
        cart.add_item(&product("B", 300), 1);

        assert!(cart.change_quantity("A", 3));
        assert_eq!(cart.subtotal().cents(), 3_300);

        assert!(cart.change_quantity("B", 0));
        assert!(cart.line("B").is_none());

        assert!(!cart.change_quantity("missing", 2));
        assert!(!cart.change_quantity("missing", -1));
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn test_subtotal_tracks_every_mutation() {
        let mut cart = Cart::new();
        let steps: Vec<Box<dyn Fn(&mut Cart)>> = vec![
            Box::new(|c| c.add_item(&product("A", 199), 3)),
            Box::new(|c| c.add_item(&product("B", 1_050), 1)),
            Box::new(|c| {
                c.change_quantity("A", 7);
            }),
            Box::new(|c| c.add_item(&product("C", 0), 9)),
            Box::new(|c| {
                c.remove_item("B");
            }),
            Box::new(|c| c.add_item(&product("A", 199), 2)),
            Box::new(|c| {
                c.change_quantity("C", -4);
            }),
        ];

        for step in steps {
            step(&mut cart);
            assert_subtotal_matches_lines(&cart);
            let ids: HashSet<_> = cart.lines().iter().map(|l| &l.product_id).collect();
            assert_eq!(ids.len(), cart.item_count());
        }
    }

    #[test]
    fn test_tax_ignores_line_tax_codes() {
        let mut cart = Cart::new();
        cart.add_item(&product("A", 1_234), 3);
        cart.add_item(&product("B", 999), 1);
        let before = cart.tax();

        cart.change_tax("A", Some(TaxCode::Exempt));
        cart.change_tax("B", Some(TaxCode::Included));

        assert_eq!(cart.tax(), before);
        // 4701 × 16% = 752.16 → 752
        assert_eq!(cart.tax().cents(), 752);
        assert_eq!(cart.line("A").unwrap().tax_code, Some(TaxCode::Exempt));
        assert!(!cart.change_tax("missing", Some(TaxCode::Standard)));
    }

    #[test]
    fn test_discount_clamping() {
        let mut cart = Cart::new();
        cart.add_item(&product("A", 10_000), 2);

        assert_eq!(cart.set_discount(Money::from_cents(-1_000)), Money::zero());

        assert_eq!(cart.set_discount(Money::from_cents(2_000)).cents(), 2_000);
        assert_eq!(cart.payable().cents(), 21_200);

        let full = cart.set_discount(Money::from_cents(1_000_000));
        assert_eq!(full, cart.total_with_tax());
        assert_eq!(cart.payable(), Money::zero());
    }

    #[test]
    fn test_discount_reclamped_after_cart_shrinks() {
        let mut cart = Cart::new();
        cart.add_item(&product("A", 10_000), 1);
        cart.add_item(&product("B", 1_000), 1);
        cart.set_discount(Money::from_cents(12_000));

        cart.remove_item("A");

        assert_eq!(cart.discount().cents(), 1_160);
        assert_eq!(cart.payable(), Money::zero());
    }

    #[test]
    fn test_change_is_never_negative() {
        let mut cart = Cart::new();
        cart.add_item(&product("A", 10_000), 2);

        assert_eq!(cart.compute_change(Money::from_cents(10_000)), Money::zero());
        assert_eq!(cart.compute_change(Money::from_cents(23_200)), Money::zero());
        assert_eq!(cart.compute_change(Money::from_cents(23_201)).cents(), 1);
        assert_eq!(
            cart.change_due(PaymentMethod::Card, Money::from_cents(30_000)),
            Money::zero()
        );
    }

    #[test]
    fn test_change_uses_current_discount() {
        let mut cart = Cart::new();
        cart.add_item(&product("A", 10_000), 2);
        cart.set_discount(Money::from_cents(3_200));

        assert_eq!(cart.compute_change(Money::from_cents(30_000)).cents(), 10_000);
    }

    #[test]
    fn test_build_sale_request() {
        let mut cart = Cart::new();
        cart.add_item(&product("A", 10_000).with_batch("lot-1"), 2);
        cart.add_item(&product("B", 500), 1);
        cart.set_discount(Money::from_cents(1_000));

        let request = cart.build_sale_request(PaymentMethod::Cash, Some("cust-9".into()));

        assert_eq!(request.sale_items.len(), 2);
        assert_eq!(request.sale_items[0].batch_id.as_deref(), Some("lot-1"));
        assert_eq!(request.sale_items[1].quantity, 1);
        assert_eq!(request.discount.cents(), 1_000);
        // (20_500 + 3_280) − 1_000
        assert_eq!(request.total_amount.cents(), 22_780);
        assert_eq!(request.customer.as_deref(), Some("cust-9"));

        let blank = cart.build_sale_request(PaymentMethod::Card, Some("  ".into()));
        assert!(blank.customer.is_none());
    }

    #[test]
    fn test_clear_returns_to_empty() {
        let mut cart = Cart::new();
        cart.add_item(&product("A", 999), 2);
        cart.set_discount(Money::from_cents(100));
        cart.set_pending_quantity(3);

        cart.clear();

        assert_eq!(cart.status(), CartStatus::Empty);
        assert_eq!(cart.discount(), Money::zero());
        assert_eq!(cart.pending_quantity(), 1);
    }

    #[test]
    fn test_settle_keeps_lines_added_after_snapshot() {
        let mut cart = Cart::new();
        cart.add_item(&product("A", 1_000), 2);
        cart.add_item(&product("C", 300), 1);
        cart.set_discount(Money::from_cents(100));
        let snapshot = cart.clone();

        cart.add_item(&product("A", 1_000), 3);
        cart.add_item(&product("B", 500), 1);
        cart.settle(snapshot.lines());

        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.line("A").unwrap().quantity, 1);
        assert_eq!(cart.line("B").unwrap().quantity, 1);
        assert!(cart.line("C").is_none());
        assert_eq!(cart.discount(), Money::zero());
        assert_subtotal_matches_lines(&cart);
    }

    #[test]
    fn test_settle_untouched_cart_empties_it() {
        let mut cart = Cart::new();
        cart.add_item(&product("A", 1_000), 2);
        cart.set_pending_quantity(5);
        let snapshot = cart.clone();

        cart.settle(snapshot.lines());

        assert_eq!(cart.status(), CartStatus::Empty);
        assert_eq!(cart.pending_quantity(), 1);
    }

    #[test]
    fn test_custom_tax_rate() {
        let mut cart = Cart::with_tax_rate(TaxRate::from_bps(825));
        cart.add_item(&product("A", 1_000), 1);
        assert_eq!(cart.tax().cents(), 83);
        assert_eq!(cart.totals().payable.cents(), 1_083);
    }
}
