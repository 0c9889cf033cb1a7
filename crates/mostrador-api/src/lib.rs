//! # mostrador-api: HTTP Gateway Client for Mostrador
//!
//! Typed access to the Mostrador REST backend. The store layer
//! (mostrador-store) is the only intended consumer; it owns caching and
//! draft state, this crate owns the wire.
//!
//! ## Request Path
//! ```text
//! resource client (ProductsClient, ...)
//!      │  builds path + query/body from typed inputs
//!      ▼
//! Gateway  ── bearer auth, timeout, envelope decode, error mapping
//!      ▼
//! Mostrador backend (REST, JSON envelope { data } / { data, pagination })
//! ```
//!
//! ## Module Organization
//!
//! - [`config`] - Base URL, timeout and initial bearer token
//! - [`client`] - The shared [`Gateway`] and envelope/pagination types
//! - [`error`] - [`ApiError`] and the reqwest error mapping
//! - [`resources`] - One client per endpoint family, plus payload types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mostrador_api::{ApiConfig, Gateway, ProductsClient, ProductQuery};
//!
//! let gateway = Gateway::new(ApiConfig::new("http://localhost:3000"))?;
//! let products = ProductsClient::new(gateway.clone());
//!
//! let page = products.list(&ProductQuery {
//!     active_only: true,
//!     ..ProductQuery::default()
//! }).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod client;
pub mod config;
pub mod error;
pub mod resources;

// =============================================================================
// Re-exports
// =============================================================================

pub use client::{Gateway, Paginated, Pagination};
pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};

// Resource client re-exports for convenience
pub use resources::{
    CategoriesClient, CustomersClient, DeliveriesClient, ProductsClient, PurchasesClient,
    SalesClient,
};
pub use resources::{CustomerQuery, DeliveryQuery, ProductQuery};

// Payload and response types, so consumers rarely need the resources:: path
pub use resources::{
    order_items, BalanceInfo, CashRegistration, CategoryPatch, CustomerPatch, Delivery,
    DeliveryStatus, NewDelivery, NewPurchase, NewSale, OrderItem, ProductPatch, Purchase, Sale,
    TransactionReceipt,
};
