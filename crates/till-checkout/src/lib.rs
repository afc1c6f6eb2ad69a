//! # Till Checkout
//!
//! Session-level orchestration for the sale screen: holds the cart and the
//! session, runs UI commands against them, and submits finished sales
//! through a [`SaleGateway`].
//!
//! ## Module Organization
//! ```text
//! till_checkout/
//! ├── lib.rs          ◄─── You are here (Checkout wiring & logging)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── cart.rs     ◄─── Cart behind a mutex
//! │   ├── session.rs  ◄─── Token / user / company context
//! │   ├── submission.rs ◄─ Busy flag for in-flight sales
//! │   ├── drawer.rs   ◄─── Cash drawer shift
//! │   └── config.rs   ◄─── Configuration from env
//! ├── commands/       ◄─── Handlers invoked by UI events
//! ├── gateway.rs      ◄─── Transport seam (trait) + transport errors
//! └── error.rs        ◄─── API error type for commands
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. init_tracing()              RUST_LOG or "info,till=debug"          │
//! │  2. CheckoutConfig::from_env()  TILL_* overrides on top of defaults    │
//! │  3. Checkout::new(config, gw)   empty cart at the configured tax rate  │
//! │  4. UI events ──► commands::*   (login, cart edits, submit, drawer)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod error;
pub mod gateway;
pub mod state;

use tracing::info;
use tracing_subscriber::EnvFilter;

pub use error::{ApiError, ApiResult, ErrorCode};
pub use gateway::{GatewayError, SaleGateway};
pub use state::{
    CartState, CheckoutConfig, DrawerState, SessionContext, SessionState, SubmissionState,
};

use commands::{SaleReceipt, SubmitSaleInput};

/// Everything one till needs for a sale session.
///
/// Commands that only touch one piece of state can be called directly with
/// the public fields; `submit_sale` needs all of them and is wrapped here.
pub struct Checkout<G> {
    pub gateway: G,
    pub config: CheckoutConfig,
    pub cart: CartState,
    pub session: SessionState,
    pub submission: SubmissionState,
    pub drawer: DrawerState,
}

impl<G: SaleGateway> Checkout<G> {
    pub fn new(config: CheckoutConfig, gateway: G) -> Self {
        info!(
            store = %config.store_name,
            tax_rate_bps = config.sale_tax_rate_bps,
            api = %config.api_base_url,
            "Checkout initialized"
        );

        Checkout {
            cart: CartState::new(config.sale_tax_rate()),
            session: SessionState::new(),
            submission: SubmissionState::new(),
            drawer: DrawerState::new(),
            gateway,
            config,
        }
    }

    /// Submits the current cart. See [`commands::submit_sale`].
    pub async fn submit_sale(&self, input: SubmitSaleInput) -> ApiResult<SaleReceipt> {
        commands::submit_sale(
            &self.gateway,
            &self.cart,
            &self.session,
            &self.submission,
            &self.drawer,
            &self.config,
            input,
        )
        .await
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=till=trace` - Show trace for till crates only
/// - Default: INFO, DEBUG for till crates
///
/// Calling it again after a subscriber is installed is a no-op.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,till=debug"));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
