//! # Invoice Commands
//!
//! Prepares an itemized invoice payload from the current cart. Delivery to
//! the document service belongs to the transport; the cart is not cleared.

use tracing::{debug, info};

use till_core::invoice::{build_invoice_request, InvoiceRequest};

use crate::error::ApiResult;
use crate::state::{CartState, SessionState};

/// Builds the invoice payload for `customer_id`.
///
/// ## Errors
/// - `UNAUTHENTICATED` when logged out
/// - `VALIDATION_ERROR` when `customer_id` is blank
/// - `CART_ERROR` when the cart is empty
pub fn prepare_invoice(
    cart: &CartState,
    session: &SessionState,
    customer_id: &str,
) -> ApiResult<InvoiceRequest> {
    debug!(customer_id = %customer_id, "prepare_invoice command");
    session.current()?;

    let invoice = cart.with_cart(|c| build_invoice_request(c, customer_id))?;

    info!(
        customer_id = %invoice.customer_id,
        lines = invoice.lines.len(),
        total = %invoice.total,
        "Invoice prepared"
    );
    Ok(invoice)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::state::SessionContext;
    use till_core::{Product, TaxCode};

    fn logged_in() -> SessionState {
        let session = SessionState::new();
        session
            .login(SessionContext::new("tok", "cashier-1", "company-1"))
            .unwrap();
        session
    }

    #[test]
    fn test_invoice_matches_cart_and_keeps_it() {
        let cart = CartState::default();
        cart.with_cart_mut(|c| {
            c.add_item(&Product::new("A", "Widget", 10_000), 2);
            c.change_tax("A", Some(TaxCode::Standard));
        });

        let invoice = prepare_invoice(&cart, &logged_in(), "cust-7").unwrap();

        assert_eq!(invoice.total.cents(), 23_200);
        assert_eq!(invoice.lines[0].tax, TaxCode::Standard);
        assert!(!cart.with_cart(|c| c.is_empty()));
    }

    #[test]
    fn test_invoice_errors() {
        let cart = CartState::default();
        let session = logged_in();

        let err = prepare_invoice(&cart, &session, "cust-7").unwrap_err();
        assert_eq!(err.code, ErrorCode::CartError);

        cart.with_cart_mut(|c| c.add_item(&Product::new("A", "Widget", 100), 1));
        let err = prepare_invoice(&cart, &session, " ").unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        session.logout();
        let err = prepare_invoice(&cart, &session, "cust-7").unwrap_err();
        assert_eq!(err.code, ErrorCode::Unauthenticated);
    }
}
