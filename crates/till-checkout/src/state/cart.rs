//! # Cart State
//!
//! Holds the cart of the active sale session.
//!
//! The cart is created empty when the sale screen mounts, mutated by UI
//! events, and cleared after a confirmed sale or when the session ends. It
//! is never persisted.

use std::sync::{Arc, Mutex, PoisonError};

use till_core::{Cart, TaxRate};

/// Shared handle to the session's cart.
///
/// ## Thread Safety
/// `Arc<Mutex<Cart>>` so the submission task and UI handlers never mutate
/// the cart at the same time. Every cart operation leaves the cart
/// consistent, so a poisoned lock is recovered rather than propagated.
#[derive(Debug, Clone)]
pub struct CartState {
    cart: Arc<Mutex<Cart>>,
}

impl CartState {
    /// Creates an empty cart taxed at `tax_rate`.
    pub fn new(tax_rate: TaxRate) -> Self {
        CartState {
            cart: Arc::new(Mutex::new(Cart::with_tax_rate(tax_rate))),
        }
    }

    /// Executes a function with read access to the cart.
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        let cart = self.cart.lock().unwrap_or_else(PoisonError::into_inner);
        f(&cart)
    }

    /// Executes a function with write access to the cart.
    pub fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Cart) -> R,
    {
        let mut cart = self.cart.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut cart)
    }
}

impl Default for CartState {
    fn default() -> Self {
        Self::new(TaxRate::default())
    }
}
