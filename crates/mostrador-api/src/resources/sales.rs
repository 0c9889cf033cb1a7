//! # Sales Client
//!
//! Counter sales: one POST with the whole order. The backend decrements
//! stock and, for cuenta corriente sales, charges the customer's account in
//! the same transaction; there is no partial success to handle client-side.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use mostrador_core::money::Money;
use mostrador_core::types::PaymentMethod;

use crate::client::Gateway;
use crate::error::ApiResult;
use crate::resources::OrderItem;

/// Body for `POST /sales`.
#[derive(Debug, Clone, Serialize)]
pub struct NewSale {
    /// The buying customer; walk-in sales use the sentinel customer's id.
    pub customer_id: String,
    pub items: Vec<OrderItem>,
    pub total: Money,
    pub payment_method: PaymentMethod,
    /// Free-form payment metadata (amount tendered, card last digits, ...).
    pub payment_data: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A posted sale, as the backend returns it.
#[derive(Debug, Clone, Deserialize)]
pub struct Sale {
    pub id: String,
    pub customer_id: String,
    pub total: Money,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Client for the `/sales` endpoints.
#[derive(Debug, Clone)]
pub struct SalesClient {
    gateway: Gateway,
}

impl SalesClient {
    pub fn new(gateway: Gateway) -> Self {
        SalesClient { gateway }
    }

    /// `POST /sales`.
    pub async fn create(&self, sale: &NewSale) -> ApiResult<Sale> {
        debug!(
            customer_id = %sale.customer_id,
            items = sale.items.len(),
            total = %sale.total,
            "Posting sale"
        );
        self.gateway.post("/sales", sale).await
    }
}
