//! # Deliveries Client
//!
//! Delivery orders: a sale that leaves the shop with a driver. Same line
//! shape as sales plus the assigned driver and a status lifecycle the
//! dispatch screen walks through.
//!
//! These endpoints live under the `/api` prefix on the backend, unlike
//! every other resource family.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use mostrador_core::money::Money;
use mostrador_core::types::PaymentMethod;

use crate::client::{Gateway, Paginated};
use crate::error::ApiResult;
use crate::resources::OrderItem;

/// Where a delivery is in its lifecycle. Wire names are the backend's
/// Spanish identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeliveryStatus {
    #[serde(rename = "pendiente")]
    Pending,
    #[serde(rename = "en_camino")]
    InTransit,
    #[serde(rename = "entregado")]
    Delivered,
    #[serde(rename = "cancelado")]
    Cancelled,
}

impl DeliveryStatus {
    /// The backend's wire identifier.
    pub const fn as_str(&self) -> &'static str {
        match self {
            DeliveryStatus::Pending => "pendiente",
            DeliveryStatus::InTransit => "en_camino",
            DeliveryStatus::Delivered => "entregado",
            DeliveryStatus::Cancelled => "cancelado",
        }
    }
}

impl std::fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body for `POST /api/deliveries`.
#[derive(Debug, Clone, Serialize)]
pub struct NewDelivery {
    pub customer_id: String,
    pub driver_id: String,
    pub items: Vec<OrderItem>,
    pub total: Money,
    pub payment_method: PaymentMethod,
    /// Free-form payment metadata.
    pub payment_data: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A delivery order, as the backend returns it.
#[derive(Debug, Clone, Deserialize)]
pub struct Delivery {
    pub id: String,
    pub customer_id: String,
    pub driver_id: String,
    pub status: DeliveryStatus,
    pub total: Money,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Filters for `GET /api/deliveries`.
#[derive(Debug, Clone, Default)]
pub struct DeliveryQuery {
    pub status: Option<DeliveryStatus>,
    pub driver_id: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl DeliveryQuery {
    /// Query parameters in wire form.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(status) = self.status {
            pairs.push(("status", status.as_str().to_string()));
        }
        if let Some(driver_id) = &self.driver_id {
            pairs.push(("driver_id", driver_id.clone()));
        }
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        pairs
    }
}

#[derive(Serialize)]
struct StatusBody {
    status: DeliveryStatus,
}

/// Client for the `/api/deliveries` endpoints.
#[derive(Debug, Clone)]
pub struct DeliveriesClient {
    gateway: Gateway,
}

impl DeliveriesClient {
    pub fn new(gateway: Gateway) -> Self {
        DeliveriesClient { gateway }
    }

    /// `POST /api/deliveries`.
    pub async fn create(&self, delivery: &NewDelivery) -> ApiResult<Delivery> {
        debug!(
            customer_id = %delivery.customer_id,
            driver_id = %delivery.driver_id,
            total = %delivery.total,
            "Posting delivery"
        );
        self.gateway.post("/api/deliveries", delivery).await
    }

    /// `GET /api/deliveries` with filters and pagination.
    pub async fn list(&self, query: &DeliveryQuery) -> ApiResult<Paginated<Delivery>> {
        self.gateway
            .get_paged("/api/deliveries", &query.to_pairs())
            .await
    }

    /// `PUT /api/deliveries/:id/status`.
    pub async fn update_status(&self, id: &str, status: DeliveryStatus) -> ApiResult<Delivery> {
        debug!(id = %id, status = %status, "Updating delivery status");
        self.gateway
            .put(&format!("/api/deliveries/{}/status", id), &StatusBody { status })
            .await
            .map_err(|e| e.for_missing("Delivery", id))
    }
}
