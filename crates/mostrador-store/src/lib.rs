//! # mostrador-store: Client State Layer for Mostrador
//!
//! Everything between the pure business logic (mostrador-core) and the
//! wire (mostrador-api): cached resource stores, the per-flow order
//! drafts, the authenticated session, and locally persisted state.
//!
//! ## State Flow
//! ```text
//! screen / caller
//!      │  fetch(query, force) / search(term) / add_line(...)
//!      ▼
//! resource stores ──── TTL + signature cache, seq-guarded fetches
//! draft stores    ──── one per checkout flow, submit preconditions
//!      │  gateway calls (mostrador-api)
//!      ▼
//! backend REST API          local JSON documents (session, suppliers)
//! ```
//!
//! ## Construction
//!
//! All stores are cheap-clone handles built once by [`Stores::new`] and
//! passed down to whoever needs them. There are no globals: two [`Stores`]
//! values are two fully independent clients.
//!
//! ```rust,ignore
//! use mostrador_store::{ClientConfig, Stores};
//!
//! let config = ClientConfig::from_env();
//! let stores = Stores::new(&config)?;
//!
//! let products = stores.products.fetch(&Default::default(), false).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cache;
pub mod categories;
pub mod config;
pub mod customers;
pub mod drafts;
pub mod error;
pub mod events;
pub mod products;
pub mod session;
pub mod storage;
pub mod suppliers;

// =============================================================================
// Re-exports
// =============================================================================

pub use cache::{CacheEntry, SeqGuard};
pub use categories::CategoryStore;
pub use config::{ClientConfig, TtlPolicy};
pub use customers::CustomerStore;
pub use drafts::{DeliveryDraftStore, PurchaseDraftStore, SaleDraftStore};
pub use error::{StoreError, StoreResult};
pub use events::{EventBus, StoreEvent};
pub use products::ProductStore;
pub use session::{Session, SessionStore};
pub use storage::Storage;
pub use suppliers::{NewSupplier, SupplierStore};

use mostrador_api::Gateway;

// =============================================================================
// Store Container
// =============================================================================

/// All client state, wired together once.
///
/// The container owns nothing exclusive: every field is a cheap-clone
/// handle, so callers keep the container and hand out clones of the
/// individual stores as needed.
#[derive(Debug, Clone)]
pub struct Stores {
    /// The shared HTTP gateway (bearer travels with every clone).
    pub gateway: Gateway,
    /// Authenticated session, persisted locally.
    pub session: SessionStore,
    /// Cached product catalog.
    pub products: ProductStore,
    /// Cached customer list and cuenta corriente operations.
    pub customers: CustomerStore,
    /// Cached category catalog.
    pub categories: CategoryStore,
    /// Locally persisted supplier catalog.
    pub suppliers: SupplierStore,
    /// The counter sale in progress.
    pub sales: SaleDraftStore,
    /// The delivery order in progress.
    pub deliveries: DeliveryDraftStore,
    /// The purchase order in progress.
    pub purchases: PurchaseDraftStore,
    /// Broadcast channel for cross-store notifications.
    pub events: EventBus,
}

impl Stores {
    /// Wire the full store stack from configuration, using the platform
    /// data directory for persisted state.
    pub fn new(config: &ClientConfig) -> StoreResult<Self> {
        Stores::with_storage(config, Storage::open_default()?)
    }

    /// Wire the full store stack over an explicit storage location.
    pub fn with_storage(config: &ClientConfig, storage: Storage) -> StoreResult<Self> {
        let gateway = Gateway::new(config.api_config())?;
        let events = EventBus::new();

        let products = ProductStore::new(gateway.clone(), config.ttl);
        let customers = CustomerStore::new(gateway.clone(), config.ttl, events.clone());
        let categories = CategoryStore::new(gateway.clone(), config.ttl);
        let suppliers = SupplierStore::new(storage.clone())?;
        let session = SessionStore::new(storage, gateway.clone())?;

        let sales = SaleDraftStore::new(gateway.clone(), products.clone(), events.clone());
        let deliveries =
            DeliveryDraftStore::new(gateway.clone(), products.clone(), events.clone());
        let purchases =
            PurchaseDraftStore::new(gateway.clone(), products.clone(), events.clone());

        Ok(Stores {
            gateway,
            session,
            products,
            customers,
            categories,
            suppliers,
            sales,
            deliveries,
            purchases,
            events,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_wires_independent_clients() {
        let dir_a = tempfile::tempdir().unwrap();
        let dir_b = tempfile::tempdir().unwrap();
        let config = ClientConfig::default();

        let a = Stores::with_storage(&config, Storage::open(dir_a.path()).unwrap()).unwrap();
        let b = Stores::with_storage(&config, Storage::open(dir_b.path()).unwrap()).unwrap();

        // Sessions are independent, not global.
        a.session.login("tok-a", "Ana").unwrap();
        assert!(a.session.is_authenticated());
        assert!(!b.session.is_authenticated());
        assert!(a.gateway.has_bearer());
        assert!(!b.gateway.has_bearer());
    }

    #[test]
    fn test_draft_submit_announces_on_container_bus() {
        let dir = tempfile::tempdir().unwrap();
        let stores =
            Stores::with_storage(&ClientConfig::default(), Storage::open(dir.path()).unwrap())
                .unwrap();

        // The customer store and the draft stores share the container's bus.
        let mut rx = stores.events.subscribe();
        stores.events.emit(StoreEvent::SalePosted {
            sale_id: "s-1".to_string(),
            total: mostrador_core::Money::from_pesos(100),
            payment_method: mostrador_core::PaymentMethod::Cash,
        });
        assert!(rx.try_recv().is_ok());
    }
}
