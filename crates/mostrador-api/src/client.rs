//! # Gateway
//!
//! The one HTTP client every resource client shares. It owns the reqwest
//! connection pool, attaches the bearer token, unwraps the backend's
//! response envelope and turns failures into [`ApiError`].
//!
//! ## Response Envelope
//! Every endpoint answers in one of two shapes:
//! ```text
//! { "data": <payload> }
//! { "data": [<items>], "pagination": { page, limit, total, total_pages } }
//! ```
//! Error bodies carry `{ "error": "..." }` or `{ "message": "..." }`;
//! whichever is present becomes the [`ApiError::Status`] message.

use std::sync::{Arc, RwLock};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult};

// =============================================================================
// Pagination
// =============================================================================

/// Backend pagination metadata, echoed verbatim on list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
}

impl Pagination {
    /// Metadata for an empty, unpaginated result.
    pub fn empty() -> Self {
        Pagination {
            page: 1,
            limit: 0,
            total: 0,
            total_pages: 0,
        }
    }
}

/// A page of items plus its metadata.
#[derive(Debug, Clone)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

// =============================================================================
// Envelope Shapes
// =============================================================================

#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Deserialize)]
struct PagedEnvelope<T> {
    data: Vec<T>,
    pagination: Pagination,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

// =============================================================================
// Gateway
// =============================================================================

/// Shared HTTP gateway to the Mostrador backend.
///
/// Cheap to clone; all clones share the connection pool and see bearer
/// token changes made through [`Gateway::set_bearer`] (the session store
/// calls it on login and logout).
///
/// ## Usage
/// ```rust,ignore
/// let gateway = Gateway::new(ApiConfig::new("http://localhost:3000"))?;
/// let products = ProductsClient::new(gateway.clone());
/// let page = products.list(&ProductQuery::default()).await?;
/// ```
#[derive(Debug, Clone)]
pub struct Gateway {
    http: reqwest::Client,
    base_url: String,
    bearer: Arc<RwLock<Option<String>>>,
}

impl Gateway {
    /// Builds the gateway and its connection pool.
    pub fn new(config: ApiConfig) -> ApiResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Gateway {
            http,
            base_url: config.base_url,
            bearer: Arc::new(RwLock::new(config.bearer)),
        })
    }

    /// Installs or clears the bearer token for all subsequent requests.
    pub fn set_bearer(&self, token: Option<String>) {
        let mut bearer = self.bearer.write().expect("bearer lock poisoned");
        *bearer = token;
    }

    /// Whether a bearer token is currently installed.
    pub fn has_bearer(&self) -> bool {
        self.bearer.read().expect("bearer lock poisoned").is_some()
    }

    /// The configured base URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // =========================================================================
    // Request Helpers
    // =========================================================================

    /// `GET path`, expecting `{ data }`.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.get_with(path, &[]).await
    }

    /// `GET path?query`, expecting `{ data }`.
    pub async fn get_with<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> ApiResult<T> {
        debug!(path = %path, "GET");
        let resp = self
            .send(self.http.get(self.url(path)).query(query))
            .await?;
        let envelope: Envelope<T> = resp.json().await?;
        Ok(envelope.data)
    }

    /// `GET path?query`, expecting `{ data: [..], pagination }`.
    pub async fn get_paged<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> ApiResult<Paginated<T>> {
        debug!(path = %path, "GET (paged)");
        let resp = self
            .send(self.http.get(self.url(path)).query(query))
            .await?;
        let envelope: PagedEnvelope<T> = resp.json().await?;
        Ok(Paginated {
            items: envelope.data,
            pagination: envelope.pagination,
        })
    }

    /// `POST path` with a JSON body, expecting `{ data }`.
    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        debug!(path = %path, "POST");
        let resp = self.send(self.http.post(self.url(path)).json(body)).await?;
        let envelope: Envelope<T> = resp.json().await?;
        Ok(envelope.data)
    }

    /// `PUT path` with a JSON body, expecting `{ data }`.
    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        debug!(path = %path, "PUT");
        let resp = self.send(self.http.put(self.url(path)).json(body)).await?;
        let envelope: Envelope<T> = resp.json().await?;
        Ok(envelope.data)
    }

    /// `DELETE path`. The body, if any, is discarded.
    pub async fn delete(&self, path: &str) -> ApiResult<()> {
        debug!(path = %path, "DELETE");
        self.send(self.http.delete(self.url(path))).await?;
        Ok(())
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let bearer = self.bearer.read().expect("bearer lock poisoned");
        match bearer.as_deref() {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn send(&self, req: reqwest::RequestBuilder) -> ApiResult<reqwest::Response> {
        let resp = self.authorize(req).send().await?;
        self.check_status(resp).await
    }

    /// Success statuses pass through; 401 and everything else become typed
    /// errors, with the backend's own message read from the error body.
    async fn check_status(&self, resp: reqwest::Response) -> ApiResult<reqwest::Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }

        let fallback = status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string();
        let message = match resp.json::<ErrorBody>().await {
            Ok(body) => body.error.or(body.message).unwrap_or(fallback),
            Err(_) => fallback,
        };

        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
