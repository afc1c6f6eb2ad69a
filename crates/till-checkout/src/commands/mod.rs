//! # Commands Module
//!
//! Handlers invoked by UI events on the sale screen.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (exports)
//! ├── cart.rs     ◄─── Cart manipulation, discount, change quote
//! ├── sale.rs     ◄─── Sale submission
//! ├── invoice.rs  ◄─── Invoice payload
//! ├── drawer.rs   ◄─── Cash drawer shift
//! ├── session.rs  ◄─── Login / logout bookkeeping
//! └── config.rs   ◄─── Configuration retrieval
//! ```
//!
//! ## State Injection
//! Each command declares only the state it needs:
//! ```rust,ignore
//! // Only needs the cart
//! fn get_cart(cart: &CartState) -> CartResponse
//!
//! // Needs everything the submission touches
//! async fn submit_sale(gateway: &G, cart: &CartState, session: &SessionState, ...)
//! ```
//!
//! Every command returns `Result<T, ApiError>` (or `T` when it cannot fail),
//! so the UI always gets either data or `{ code, message }`.

pub mod cart;
pub mod config;
pub mod drawer;
pub mod invoice;
pub mod sale;
pub mod session;

pub use cart::*;
pub use config::*;
pub use drawer::*;
pub use invoice::*;
pub use sale::*;
pub use session::*;
