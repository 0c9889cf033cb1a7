//! # Categories Client
//!
//! The category list is small and unpaginated. Unlike products and
//! customers, categories are hard-deleted; the store layer drops them from
//! its cache rather than flagging them inactive.

use serde::Serialize;
use tracing::debug;

use mostrador_core::forms::NewCategory;
use mostrador_core::types::Category;

use crate::client::Gateway;
use crate::error::ApiResult;

/// Partial update for `PUT /categories/:id`. Omitted fields stay unchanged.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CategoryPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Client for the `/categories` endpoints.
#[derive(Debug, Clone)]
pub struct CategoriesClient {
    gateway: Gateway,
}

impl CategoriesClient {
    pub fn new(gateway: Gateway) -> Self {
        CategoriesClient { gateway }
    }

    /// `GET /categories`, the full list.
    pub async fn list(&self) -> ApiResult<Vec<Category>> {
        self.gateway.get("/categories").await
    }

    /// `POST /categories`.
    pub async fn create(&self, category: &NewCategory) -> ApiResult<Category> {
        debug!(name = %category.name, "Creating category");
        self.gateway.post("/categories", category).await
    }

    /// `PUT /categories/:id` with a partial body.
    pub async fn update(&self, id: &str, patch: &CategoryPatch) -> ApiResult<Category> {
        debug!(id = %id, "Updating category");
        self.gateway
            .put(&format!("/categories/{}", id), patch)
            .await
            .map_err(|e| e.for_missing("Category", id))
    }

    /// `DELETE /categories/:id` (hard delete).
    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        debug!(id = %id, "Deleting category");
        self.gateway
            .delete(&format!("/categories/{}", id))
            .await
            .map_err(|e| e.for_missing("Category", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_color_only() {
        let patch = CategoryPatch {
            color: Some("#00aa55".to_string()),
            ..CategoryPatch::default()
        };
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json.as_object().unwrap().len(), 1);
        assert_eq!(json["color"], "#00aa55");
    }
}
