//! # Products Client
//!
//! Catalog endpoints: paginated listing with filters, the top-selling
//! shortcut the quick-sale grid uses, and CRUD. Deletion is a soft delete;
//! the backend flips `is_active` and the product drops out of filtered
//! lists.

use serde::Serialize;
use tracing::debug;

use mostrador_core::forms::NewProduct;
use mostrador_core::money::Money;
use mostrador_core::quantity::{Quantity, UnitType};
use mostrador_core::types::Product;

use crate::client::{Gateway, Paginated};
use crate::error::ApiResult;

/// Filters for `GET /products`.
#[derive(Debug, Clone, Default)]
pub struct ProductQuery {
    /// Substring search across name and barcode, server side.
    pub search: Option<String>,
    /// Restrict to one category.
    pub category_id: Option<String>,
    /// Only active products. The catalog grid always sets this.
    pub active_only: bool,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl ProductQuery {
    /// Query parameters in wire form. Also the cache signature input.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        if let Some(category_id) = &self.category_id {
            pairs.push(("category_id", category_id.clone()));
        }
        if self.active_only {
            pairs.push(("active", "true".to_string()));
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

/// Partial update for `PUT /products/:id`. Omitted fields stay unchanged.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProductPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_type: Option<UnitType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_level_2: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_level_3: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<Quantity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_stock: Option<Quantity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Client for the `/products` endpoints.
#[derive(Debug, Clone)]
pub struct ProductsClient {
    gateway: Gateway,
}

impl ProductsClient {
    pub fn new(gateway: Gateway) -> Self {
        ProductsClient { gateway }
    }

    /// `GET /products` with filters and pagination.
    pub async fn list(&self, query: &ProductQuery) -> ApiResult<Paginated<Product>> {
        self.gateway.get_paged("/products", &query.to_pairs()).await
    }

    /// `GET /products/top-selling?limit=N`.
    ///
    /// The quick-sale grid shows these; the backend ranks by recent sales
    /// volume and the response carries plain products.
    pub async fn top_selling(&self, limit: u32) -> ApiResult<Vec<Product>> {
        self.gateway
            .get_with("/products/top-selling", &[("limit", limit.to_string())])
            .await
    }

    /// `GET /products/:id`.
    pub async fn get(&self, id: &str) -> ApiResult<Product> {
        self.gateway
            .get(&format!("/products/{}", id))
            .await
            .map_err(|e| e.for_missing("Product", id))
    }

    /// `POST /products`.
    pub async fn create(&self, product: &NewProduct) -> ApiResult<Product> {
        debug!(name = %product.name, "Creating product");
        self.gateway.post("/products", product).await
    }

    /// `PUT /products/:id` with a partial body.
    pub async fn update(&self, id: &str, patch: &ProductPatch) -> ApiResult<Product> {
        debug!(id = %id, "Updating product");
        self.gateway
            .put(&format!("/products/{}", id), patch)
            .await
            .map_err(|e| e.for_missing("Product", id))
    }

    /// `DELETE /products/:id` (soft delete, backend clears `is_active`).
    pub async fn deactivate(&self, id: &str) -> ApiResult<()> {
        debug!(id = %id, "Deactivating product");
        self.gateway
            .delete(&format!("/products/{}", id))
            .await
            .map_err(|e| e.for_missing("Product", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_pairs() {
        let query = ProductQuery {
            search: Some("queso".to_string()),
            active_only: true,
            page: Some(2),
            ..ProductQuery::default()
        };
        assert_eq!(
            query.to_pairs(),
            vec![
                ("search", "queso".to_string()),
                ("active", "true".to_string()),
                ("page", "2".to_string()),
            ]
        );

        assert!(ProductQuery::default().to_pairs().is_empty());
    }

    #[test]
    fn test_patch_serializes_only_set_fields() {
        let patch = ProductPatch {
            price: Some(Money::from_pesos(1450)),
            stock: Some(Quantity::from_hundredths(850)),
            ..ProductPatch::default()
        };

        let json = serde_json::to_value(&patch).unwrap();
        let object = json.as_object().unwrap();
        assert_eq!(object.len(), 2);
        assert_eq!(json["price"], 1450.0);
        assert_eq!(json["stock"], 8.5);
    }
}
