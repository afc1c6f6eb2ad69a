//! # State Module
//!
//! Per-session state for the sale screen.
//!
//! ## Why Multiple State Types?
//! Each command takes only the state it needs, so a cart edit never touches
//! the session and a drawer close never touches the cart.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────┐ ┌──────────────┐ ┌──────────────┐ ┌──────────────┐   │
//! │  │  CartState   │ │ SessionState │ │ Submission-  │ │ DrawerState  │   │
//! │  │              │ │              │ │ State        │ │              │   │
//! │  │  Arc<Mutex<  │ │  RwLock<     │ │  AtomicBool  │ │  Mutex<      │   │
//! │  │    Cart>>    │ │   Option<..>>│ │  busy flag   │ │   Option<..>>│   │
//! │  └──────────────┘ └──────────────┘ └──────────────┘ └──────────────┘   │
//! │                                                                         │
//! │  ┌──────────────┐                                                       │
//! │  │CheckoutConfig│  read-only after startup                              │
//! │  └──────────────┘                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cart;
mod config;
mod drawer;
mod session;
mod submission;

pub use cart::CartState;
pub use config::CheckoutConfig;
pub use drawer::DrawerState;
pub use session::{SessionContext, SessionState};
pub use submission::{SubmissionGuard, SubmissionState};
