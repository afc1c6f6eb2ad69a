//! # Config Commands

use tracing::debug;

use crate::state::CheckoutConfig;

/// Gets the checkout configuration for the front end (store name, currency,
/// tax rate).
pub fn get_config(config: &CheckoutConfig) -> CheckoutConfig {
    debug!("get_config command");
    config.clone()
}
