// =============================================================================
// Client Configuration
// =============================================================================
//
// Runtime settings for the client: where the backend lives, how the store
// presents itself, and how long each cached resource stays fresh. Values
// come from defaults overridable through MOSTRADOR_* environment variables.
//
// =============================================================================

use std::time::Duration;

use mostrador_api::ApiConfig;
use mostrador_core::Money;

/// How long each cached resource is served without a refetch.
///
/// Fast-moving data gets short windows (top sellers change with every
/// sale), slow-moving data gets long ones (categories rarely change).
#[derive(Debug, Clone, Copy)]
pub struct TtlPolicy {
    pub products: Duration,
    pub customers: Duration,
    pub categories: Duration,
    pub top_selling: Duration,
}

impl Default for TtlPolicy {
    fn default() -> Self {
        TtlPolicy {
            products: Duration::from_secs(30),
            customers: Duration::from_secs(15),
            categories: Duration::from_secs(60),
            top_selling: Duration::from_secs(10),
        }
    }
}

/// Client configuration with sensible defaults.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the backend REST API.
    pub api_url: String,
    /// Store name shown on screens and receipts.
    pub store_name: String,
    /// Currency symbol for formatting prices.
    pub currency_symbol: String,
    /// Request timeout for gateway calls.
    pub request_timeout: Duration,
    /// Cache freshness windows per resource.
    pub ttl: TtlPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            api_url: "http://localhost:3000".to_string(),
            store_name: "Mostrador".to_string(),
            currency_symbol: "$".to_string(),
            request_timeout: Duration::from_secs(15),
            ttl: TtlPolicy::default(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset or unparseable.
    ///
    /// Recognized variables:
    /// - `MOSTRADOR_API_URL` - backend base URL
    /// - `MOSTRADOR_STORE_NAME` - store display name
    /// - `MOSTRADOR_CURRENCY_SYMBOL` - currency symbol
    /// - `MOSTRADOR_TIMEOUT_SECS` - gateway request timeout
    /// - `MOSTRADOR_PRODUCTS_TTL_SECS` - product cache window
    /// - `MOSTRADOR_CUSTOMERS_TTL_SECS` - customer cache window
    /// - `MOSTRADOR_CATEGORIES_TTL_SECS` - category cache window
    /// - `MOSTRADOR_TOP_SELLING_TTL_SECS` - top sellers cache window
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("MOSTRADOR_API_URL") {
            config.api_url = url;
        }

        if let Ok(name) = std::env::var("MOSTRADOR_STORE_NAME") {
            config.store_name = name;
        }

        if let Ok(symbol) = std::env::var("MOSTRADOR_CURRENCY_SYMBOL") {
            config.currency_symbol = symbol;
        }

        if let Some(secs) = env_secs("MOSTRADOR_TIMEOUT_SECS") {
            config.request_timeout = secs;
        }

        if let Some(secs) = env_secs("MOSTRADOR_PRODUCTS_TTL_SECS") {
            config.ttl.products = secs;
        }

        if let Some(secs) = env_secs("MOSTRADOR_CUSTOMERS_TTL_SECS") {
            config.ttl.customers = secs;
        }

        if let Some(secs) = env_secs("MOSTRADOR_CATEGORIES_TTL_SECS") {
            config.ttl.categories = secs;
        }

        if let Some(secs) = env_secs("MOSTRADOR_TOP_SELLING_TTL_SECS") {
            config.ttl.top_selling = secs;
        }

        config
    }

    /// Format a money value with the configured currency symbol.
    pub fn format_currency(&self, amount: Money) -> String {
        let sign = if amount.is_negative() { "-" } else { "" };
        format!(
            "{}{}{}.{:02}",
            sign,
            self.currency_symbol,
            amount.pesos().abs(),
            amount.cents_part()
        )
    }

    /// Gateway configuration derived from these settings.
    pub fn api_config(&self) -> ApiConfig {
        ApiConfig::new(&self.api_url).with_timeout(self.request_timeout)
    }
}

fn env_secs(var: &str) -> Option<Duration> {
    let raw = std::env::var(var).ok()?;
    raw.parse().ok().map(Duration::from_secs)
}

// =============================================================================
// Tests
// =============================================================================
