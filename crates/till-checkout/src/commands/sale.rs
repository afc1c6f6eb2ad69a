//! # Sale Commands
//!
//! Submits the cart as a sale and settles the session on confirmation.
//!
//! ## Submission Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    submit_sale                                          │
//! │                                                                         │
//! │  1. Entry validation ── cart non-empty, method chosen, tendered parses │
//! │         │ fail: VALIDATION_ERROR / CART_ERROR, nothing changes          │
//! │         ▼                                                               │
//! │  2. Session ─────────── UNAUTHENTICATED if logged out                   │
//! │         ▼                                                               │
//! │  3. Busy flag ───────── SUBMISSION_IN_FLIGHT if already submitting      │
//! │         ▼                                                               │
//! │  4. Build SaleRequest from the cart, call gateway under timeout         │
//! │         │                                                               │
//! │         ├── transport error / timeout ──► NETWORK_ERROR, cart kept      │
//! │         ├── { status: "error" } ────────► SALE_REJECTED, cart kept      │
//! │         ├── unexpected body ────────────► MALFORMED_RESPONSE, cart kept │
//! │         ▼                                                               │
//! │  5. { status: "success" } ── settle cart, record in drawer, receipt    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! There is no automatic retry: submitting again resends the unchanged cart.
//!
//! The cart stays editable while a sale is in flight. Settling removes only
//! the lines that were sent, so an item scanned during the call survives
//! into the next sale.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use till_core::sale::{Document, SaleResponse};
use till_core::validation::{parse_amount, require_payment_method, validate_payment_amount};
use till_core::{CartLine, CoreError, Money, PaymentMethod, SaleTotals};

use crate::error::{ApiError, ApiResult, ErrorCode};
use crate::gateway::{GatewayError, SaleGateway};
use crate::state::{CartState, CheckoutConfig, DrawerState, SessionState, SubmissionState};

/// What the tender form sends on submit.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitSaleInput {
    /// `None` until the cashier picks one.
    pub payment_method: Option<PaymentMethod>,

    /// Optional customer id for credit sales and receipts.
    #[serde(default)]
    pub customer: Option<String>,

    /// Cash handed over, as typed. Ignored for non-cash methods.
    #[serde(default)]
    pub amount_tendered: Option<String>,
}

/// Receipt data for a confirmed sale.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleReceipt {
    pub sale_id: Option<String>,
    pub receipt_number: Option<String>,
    pub store_name: String,
    pub payment_method: PaymentMethod,
    pub items: Vec<CartLine>,
    pub totals: SaleTotals,
    pub amount_tendered: Option<Money>,
    pub change: Money,
    /// Generated document to hand to the print/download collaborator.
    pub document: Option<Document>,
    pub completed_at: DateTime<Utc>,
}

/// Submits the current cart as a sale.
///
/// ## Arguments
/// * `gateway` - Transport that delivers the request and returns the raw body
/// * `input` - Payment method, optional customer, tendered cash
///
/// ## Returns
/// Receipt with totals, change and any returned document. On any error the
/// cart is left exactly as it was.
pub async fn submit_sale<G: SaleGateway>(
    gateway: &G,
    cart: &CartState,
    session: &SessionState,
    submission: &SubmissionState,
    drawer: &DrawerState,
    config: &CheckoutConfig,
    input: SubmitSaleInput,
) -> ApiResult<SaleReceipt> {
    debug!(payment_method = ?input.payment_method, "submit_sale command");

    // 1. Entry validation
    if cart.with_cart(|c| c.is_empty()) {
        return Err(CoreError::EmptyCart.into());
    }
    let method = require_payment_method(input.payment_method)?;
    let tendered = parse_tendered(method, input.amount_tendered.as_deref())?;

    // 2. Session
    let ctx = session.current()?;

    // 3. Busy flag, released when `_busy` drops on every path below
    let _busy = submission.try_begin().ok_or_else(|| {
        ApiError::new(
            ErrorCode::SubmissionInFlight,
            "A sale is already being submitted",
        )
    })?;

    // 4. Build and send
    let (request, snapshot) = cart.with_cart(|c| {
        (
            c.build_sale_request(method, input.customer.clone()),
            c.clone(),
        )
    });

    info!(
        items = request.sale_items.len(),
        total = %request.total_amount,
        discount = %request.discount,
        method = %method,
        "Submitting sale"
    );

    let body = match tokio::time::timeout(
        config.submit_timeout(),
        gateway.submit_sale(&ctx, &request),
    )
    .await
    {
        Ok(Ok(body)) => body,
        Ok(Err(GatewayError::Status { status, body })) => {
            // Rejections may also arrive with a 4xx status.
            return Err(match SaleResponse::parse(&body) {
                Ok(SaleResponse::Error { message }) => rejected(message),
                _ => GatewayError::Status { status, body }.into(),
            });
        }
        Ok(Err(e)) => return Err(e.into()),
        Err(_) => {
            return Err(GatewayError::Timeout {
                secs: config.submit_timeout_secs,
            }
            .into())
        }
    };

    let confirmation = SaleResponse::parse(&body)?
        .into_result()
        .map_err(rejected)?;

    // 5. Settle
    let kept = cart.with_cart_mut(|c| {
        c.settle(snapshot.lines());
        c.item_count()
    });
    if kept > 0 {
        debug!(kept, "Lines added during submission kept in cart");
    }

    let totals = snapshot.totals();
    let change = tendered
        .map(|t| snapshot.change_due(method, t))
        .unwrap_or(Money::zero());

    drawer.with_drawer_mut(|slot| {
        if let Some(shift) = slot.as_mut().filter(|s| s.is_open()) {
            if let Err(e) = shift.record_sale(method, totals.payable) {
                warn!(error = %e, "Sale not recorded in drawer");
            }
        }
    });

    info!(
        sale_id = ?confirmation.sale_id,
        total = %totals.payable,
        change = %change,
        has_document = confirmation.document.is_some(),
        "Sale confirmed"
    );

    Ok(SaleReceipt {
        sale_id: confirmation.sale_id,
        receipt_number: confirmation.receipt_number,
        store_name: config.store_name.clone(),
        payment_method: method,
        items: snapshot.lines().to_vec(),
        totals,
        amount_tendered: tendered,
        change,
        document: confirmation.document,
        completed_at: Utc::now(),
    })
}

/// Parses tendered cash. A missing amount is allowed (no change computed);
/// a present one must be a positive amount.
fn parse_tendered(method: PaymentMethod, raw: Option<&str>) -> ApiResult<Option<Money>> {
    let raw = match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) if method.is_cash() => raw,
        _ => return Ok(None),
    };

    let amount = parse_amount("amount tendered", raw)?;
    validate_payment_amount(amount)?;
    Ok(Some(amount))
}

fn rejected(message: String) -> ApiError {
    warn!(%message, "Sale rejected by backend");
    ApiError::new(ErrorCode::SaleRejected, message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use till_core::sale::SaleRequest;
    use till_core::Product;

    use crate::state::SessionContext;

    const SUCCESS: &str = r#"{
        "status": "success",
        "saleId": "sale-42",
        "receiptNumber": "R-0042",
        "document": { "fileName": "receipt.pdf", "contentType": "application/pdf", "content": [37, 80, 68, 70] }
    }"#;

    /// Answers every call with a canned result and records what it was sent.
    struct FakeGateway {
        response: Result<String, GatewayError>,
        delay: Option<Duration>,
        calls: AtomicUsize,
        last_request: Mutex<Option<SaleRequest>>,
    }

    impl FakeGateway {
        fn answering(body: &str) -> Self {
            Self::failing_with(Ok(body.to_string()))
        }

        fn failing_with(response: Result<String, GatewayError>) -> Self {
            FakeGateway {
                response,
                delay: None,
                calls: AtomicUsize::new(0),
                last_request: Mutex::new(None),
            }
        }

        fn slow(delay: Duration) -> Self {
            FakeGateway {
                delay: Some(delay),
                ..Self::answering(SUCCESS)
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn last_request(&self) -> SaleRequest {
            self.last_request.lock().unwrap().clone().unwrap()
        }
    }

    impl SaleGateway for FakeGateway {
        async fn submit_sale(
            &self,
            _session: &SessionContext,
            request: &SaleRequest,
        ) -> Result<String, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_request.lock().unwrap() = Some(request.clone());
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.response.clone()
        }
    }

    struct Till {
        cart: CartState,
        session: SessionState,
        submission: SubmissionState,
        drawer: DrawerState,
        config: CheckoutConfig,
    }

    impl Till {
        /// Logged in, with two units of a 100.00 product in the cart.
        fn ready() -> Self {
            let till = Till {
                cart: CartState::default(),
                session: SessionState::new(),
                submission: SubmissionState::new(),
                drawer: DrawerState::new(),
                config: CheckoutConfig::default(),
            };
            till.session
                .login(SessionContext::new("tok", "cashier-1", "company-1"))
                .unwrap();
            till.cart
                .with_cart_mut(|c| c.add_item(&Product::new("A", "Widget", 10_000), 2));
            till
        }

        async fn submit(&self, gateway: &FakeGateway, input: SubmitSaleInput) -> ApiResult<SaleReceipt> {
            submit_sale(
                gateway,
                &self.cart,
                &self.session,
                &self.submission,
                &self.drawer,
                &self.config,
                input,
            )
            .await
        }

        fn cart_payable(&self) -> i64 {
            self.cart.with_cart(|c| c.payable().cents())
        }
    }

    fn cash(tendered: &str) -> SubmitSaleInput {
        SubmitSaleInput {
            payment_method: Some(PaymentMethod::Cash),
            customer: None,
            amount_tendered: Some(tendered.to_string()),
        }
    }

    #[tokio::test]
    async fn test_confirmed_sale_clears_cart_and_returns_change() {
        let till = Till::ready();
        let gateway = FakeGateway::answering(SUCCESS);

        let receipt = till.submit(&gateway, cash("300")).await.unwrap();

        assert_eq!(receipt.totals.payable.cents(), 23_200);
        assert_eq!(receipt.change.cents(), 6_800);
        assert_eq!(receipt.sale_id.as_deref(), Some("sale-42"));
        assert_eq!(receipt.document.unwrap().file_name, "receipt.pdf");
        assert!(till.cart.with_cart(|c| c.is_empty()));
        assert!(!till.submission.is_submitting());

        let sent = gateway.last_request();
        assert_eq!(sent.total_amount.cents(), 23_200);
        assert_eq!(sent.sale_items[0].quantity, 2);
        assert_eq!(sent.payment_method, PaymentMethod::Cash);
    }

    #[tokio::test]
    async fn test_card_sale_owes_no_change() {
        let till = Till::ready();
        let gateway = FakeGateway::answering(SUCCESS);

        let input = SubmitSaleInput {
            payment_method: Some(PaymentMethod::Card),
            customer: Some("  ".to_string()),
            amount_tendered: Some("500".to_string()),
        };
        let receipt = till.submit(&gateway, input).await.unwrap();

        assert_eq!(receipt.change, Money::zero());
        assert!(receipt.amount_tendered.is_none());
        assert!(gateway.last_request().customer.is_none());
    }

    #[tokio::test]
    async fn test_cash_without_tendered_amount_owes_no_change() {
        let till = Till::ready();
        let gateway = FakeGateway::answering(SUCCESS);

        let input = SubmitSaleInput {
            payment_method: Some(PaymentMethod::Cash),
            ..SubmitSaleInput::default()
        };
        let receipt = till.submit(&gateway, input).await.unwrap();
        assert_eq!(receipt.change, Money::zero());
    }

    #[tokio::test]
    async fn test_rejection_keeps_cart() {
        let till = Till::ready();
        let gateway =
            FakeGateway::answering(r#"{"status":"error","message":"Batch lot-1 has no stock"}"#);

        let err = till.submit(&gateway, cash("300")).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::SaleRejected);
        assert_eq!(err.message, "Batch lot-1 has no stock");
        assert_eq!(till.cart_payable(), 23_200);
        assert!(!till.submission.is_submitting());
    }

    #[tokio::test]
    async fn test_rejection_in_error_status_body() {
        let till = Till::ready();
        let gateway = FakeGateway::failing_with(Err(GatewayError::Status {
            status: 422,
            body: r#"{"status":"error","message":"Customer has no credit"}"#.to_string(),
        }));

        let err = till.submit(&gateway, cash("300")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::SaleRejected);
        assert_eq!(err.message, "Customer has no credit");
    }

    #[tokio::test]
    async fn test_server_error_is_network_error() {
        let till = Till::ready();
        let gateway = FakeGateway::failing_with(Err(GatewayError::Status {
            status: 502,
            body: "<html>Bad Gateway</html>".to_string(),
        }));

        let err = till.submit(&gateway, cash("300")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NetworkError);
        assert_eq!(till.cart_payable(), 23_200);
    }

    #[tokio::test]
    async fn test_malformed_response_keeps_cart() {
        let till = Till::ready();
        let gateway = FakeGateway::answering(r#"{"ok":true}"#);

        let err = till.submit(&gateway, cash("300")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::MalformedResponse);
        assert_eq!(till.cart_payable(), 23_200);
    }

    #[tokio::test]
    async fn test_unauthorized_maps_to_unauthenticated() {
        let till = Till::ready();
        let gateway = FakeGateway::failing_with(Err(GatewayError::Unauthorized));

        let err = till.submit(&gateway, cash("300")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Unauthenticated);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_reports_failure_and_releases_flag() {
        let till = Till::ready();
        let gateway = FakeGateway::slow(Duration::from_secs(120));

        let err = till.submit(&gateway, cash("300")).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::NetworkError);
        assert_eq!(err.message, "Server did not answer within 30 seconds");
        assert_eq!(till.cart_payable(), 23_200);
        assert!(!till.submission.is_submitting());
    }

    #[tokio::test(start_paused = true)]
    async fn test_item_added_during_submission_survives() {
        let till = Till::ready();
        let gateway = FakeGateway::slow(Duration::from_millis(50));

        let scan_during_call = async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            crate::commands::add_to_cart(&till.cart, &Product::new("B", "Gadget", 500), Some(1))
                .unwrap();
        };
        let (receipt, ()) = tokio::join!(till.submit(&gateway, cash("300")), scan_during_call);
        let receipt = receipt.unwrap();

        assert_eq!(receipt.items.len(), 1);
        assert_eq!(receipt.items[0].product_id, "A");
        assert_eq!(receipt.totals.payable.cents(), 23_200);

        till.cart.with_cart(|c| {
            assert_eq!(c.item_count(), 1);
            assert!(c.line("A").is_none());
            assert_eq!(c.line("B").unwrap().quantity, 1);
        });
        assert!(!till.submission.is_submitting());
    }

    #[tokio::test]
    async fn test_entry_validation_happens_before_any_call() {
        let till = Till::ready();
        let gateway = FakeGateway::answering(SUCCESS);

        let err = till
            .submit(&gateway, SubmitSaleInput::default())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = till.submit(&gateway, cash("abc")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = till.submit(&gateway, cash("-5")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        assert_eq!(gateway.calls(), 0);
        assert_eq!(till.cart_payable(), 23_200);
    }

    #[tokio::test]
    async fn test_empty_cart_is_rejected() {
        let till = Till::ready();
        till.cart.with_cart_mut(|c| c.clear());
        let gateway = FakeGateway::answering(SUCCESS);

        let err = till.submit(&gateway, cash("300")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::CartError);
        assert_eq!(gateway.calls(), 0);
    }

    #[tokio::test]
    async fn test_requires_session() {
        let till = Till::ready();
        till.session.logout();
        let gateway = FakeGateway::answering(SUCCESS);

        let err = till.submit(&gateway, cash("300")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Unauthenticated);
        assert_eq!(gateway.calls(), 0);
    }

    #[tokio::test]
    async fn test_second_submission_while_in_flight() {
        let till = Till::ready();
        let gateway = FakeGateway::answering(SUCCESS);

        let _first = till.submission.try_begin().unwrap();
        let err = till.submit(&gateway, cash("300")).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::SubmissionInFlight);
        assert_eq!(gateway.calls(), 0);
    }

    #[tokio::test]
    async fn test_retry_after_failure_resends_same_cart() {
        let till = Till::ready();

        let failing = FakeGateway::failing_with(Err(GatewayError::Transport("refused".into())));
        assert!(till.submit(&failing, cash("300")).await.is_err());

        let working = FakeGateway::answering(SUCCESS);
        till.submit(&working, cash("300")).await.unwrap();

        assert_eq!(failing.last_request(), working.last_request());
    }

    #[tokio::test]
    async fn test_confirmed_cash_sale_is_recorded_in_open_drawer() {
        let till = Till::ready();
        till.drawer.with_drawer_mut(|slot| {
            *slot = Some(till_core::drawer::DrawerSession::open(
                "shift-1",
                "cashier-1",
                Utc::now(),
                Money::from_cents(5_000),
            ))
        });
        let gateway = FakeGateway::answering(SUCCESS);

        till.submit(&gateway, cash("300")).await.unwrap();

        let expected = till
            .drawer
            .with_drawer(|d| d.map(|s| s.expected_cash().cents()));
        assert_eq!(expected, Some(28_200));
    }
}
