//! # Checkout Configuration
//!
//! Settings loaded once at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`TILL_*`)
//! 2. Defaults (this file)
//!
//! Read-only after initialization, so no lock is needed.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use till_core::validation::validate_tax_rate_bps;
use till_core::{TaxRate, DEFAULT_SALE_TAX_RATE_BPS};
use tracing::warn;

/// Most decimal places `format_currency` will render.
pub const MAX_CURRENCY_DECIMALS: u8 = 4;

/// Checkout configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutConfig {
    /// Store name (printed on receipts)
    pub store_name: String,

    /// Currency code (ISO 4217)
    pub currency_code: String,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// Number of decimal places for currency (at most `MAX_CURRENCY_DECIMALS`)
    pub currency_decimals: u8,

    /// Flat sale tax rate in basis points (1600 = 16%)
    pub sale_tax_rate_bps: u32,

    /// Base URL handed to the transport implementation
    pub api_base_url: String,

    /// How long a sale submission may take before it is reported as failed
    pub submit_timeout_secs: u64,
}

impl Default for CheckoutConfig {
    /// Returns defaults suitable for development.
    ///
    /// ## Default Values
    /// - Store: "Till Dev Store"
    /// - Currency: USD ($)
    /// - Tax: 16% flat
    /// - Backend: http://localhost:8080/api
    /// - Submit timeout: 30s
    fn default() -> Self {
        CheckoutConfig {
            store_name: "Till Dev Store".to_string(),
            currency_code: "USD".to_string(),
            currency_symbol: "$".to_string(),
            currency_decimals: 2,
            sale_tax_rate_bps: DEFAULT_SALE_TAX_RATE_BPS,
            api_base_url: "http://localhost:8080/api".to_string(),
            submit_timeout_secs: 30,
        }
    }
}

impl CheckoutConfig {
    /// Creates a config from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `TILL_STORE_NAME`: Override store name
    /// - `TILL_TAX_RATE`: Sale tax rate in percent (e.g., "16" or "8.25")
    /// - `TILL_CURRENCY_CODE`, `TILL_CURRENCY_SYMBOL`: Currency display
    /// - `TILL_API_BASE_URL`: Backend base URL
    /// - `TILL_SUBMIT_TIMEOUT_SECS`: Submission timeout
    ///
    /// Unparseable values are logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = CheckoutConfig::default();

        if let Some(store_name) = lookup("TILL_STORE_NAME") {
            config.store_name = store_name;
        }

        if let Some(code) = lookup("TILL_CURRENCY_CODE") {
            config.currency_code = code;
        }

        if let Some(symbol) = lookup("TILL_CURRENCY_SYMBOL") {
            config.currency_symbol = symbol;
        }

        if let Some(url) = lookup("TILL_API_BASE_URL") {
            config.api_base_url = url.trim_end_matches('/').to_string();
        }

        if let Some(raw) = lookup("TILL_TAX_RATE") {
            match raw.trim().parse::<f64>() {
                Ok(pct) if pct >= 0.0 => {
                    let bps = TaxRate::from_percentage(pct).bps();
                    match validate_tax_rate_bps(bps) {
                        Ok(()) => config.sale_tax_rate_bps = bps,
                        Err(e) => warn!(value = %raw, error = %e, "Ignoring TILL_TAX_RATE"),
                    }
                }
                _ => warn!(value = %raw, "Ignoring unparseable TILL_TAX_RATE"),
            }
        }

        if let Some(raw) = lookup("TILL_SUBMIT_TIMEOUT_SECS") {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.submit_timeout_secs = secs,
                _ => warn!(value = %raw, "Ignoring invalid TILL_SUBMIT_TIMEOUT_SECS"),
            }
        }

        config
    }

    pub fn sale_tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.sale_tax_rate_bps)
    }

    pub fn submit_timeout(&self) -> Duration {
        Duration::from_secs(self.submit_timeout_secs)
    }

    /// Formats a cent amount as a currency string.
    ///
    /// `currency_decimals` is capped at [`MAX_CURRENCY_DECIMALS`].
    pub fn format_currency(&self, cents: i64) -> String {
        let decimals = self.currency_decimals.min(MAX_CURRENCY_DECIMALS);
        let divisor = 10_u64.pow(u32::from(decimals));
        let magnitude = cents.unsigned_abs();
        let whole = magnitude / divisor;
        let frac = magnitude % divisor;

        format!(
            "{}{}{}",
            if cents < 0 { "-" } else { "" },
            self.currency_symbol,
            if decimals > 0 {
                format!("{}.{:0width$}", whole, frac, width = usize::from(decimals))
            } else {
                whole.to_string()
            }
        )
    }
}
