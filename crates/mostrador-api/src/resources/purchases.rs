//! # Purchases Client
//!
//! Stock intake from suppliers. Lines are priced at cost rather than
//! retail; the backend adds the received quantities to stock. Suppliers
//! themselves are a local-only catalog (see the store layer), so only the
//! supplier id travels.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use mostrador_core::money::Money;

use crate::client::Gateway;
use crate::error::ApiResult;
use crate::resources::OrderItem;

/// Body for `POST /purchases`.
#[derive(Debug, Clone, Serialize)]
pub struct NewPurchase {
    pub supplier_id: String,
    pub items: Vec<OrderItem>,
    pub total: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A posted purchase, as the backend returns it.
#[derive(Debug, Clone, Deserialize)]
pub struct Purchase {
    pub id: String,
    pub supplier_id: String,
    pub total: Money,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Client for the `/purchases` endpoints.
#[derive(Debug, Clone)]
pub struct PurchasesClient {
    gateway: Gateway,
}

impl PurchasesClient {
    pub fn new(gateway: Gateway) -> Self {
        PurchasesClient { gateway }
    }

    /// `POST /purchases`.
    pub async fn create(&self, purchase: &NewPurchase) -> ApiResult<Purchase> {
        debug!(
            supplier_id = %purchase.supplier_id,
            items = purchase.items.len(),
            total = %purchase.total,
            "Posting purchase"
        );
        self.gateway.post("/purchases", purchase).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_purchase_wire_shape() {
        let purchase = NewPurchase {
            supplier_id: "s1".to_string(),
            items: Vec::new(),
            total: Money::from_pesos(56_000),
            notes: None,
        };

        let json = serde_json::to_value(&purchase).unwrap();
        assert_eq!(json["supplier_id"], "s1");
        assert_eq!(json["total"], 56_000.0);
        assert!(json.get("notes").is_none());
    }
}
