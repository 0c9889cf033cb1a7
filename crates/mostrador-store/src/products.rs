// =============================================================================
// Product Store
// =============================================================================
//
// Cached product catalog backing the sale grid and the product admin
// screens. Holds the result of the last list request keyed by its query
// signature, plus a separate short-lived cache for the top-selling strip.
//
// Fetches follow the lock-decide, await, re-lock-apply shape: the state
// lock is never held across a network call, and every fetch carries a
// sequence ticket so a slow response cannot overwrite a newer one.
//
// =============================================================================

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use mostrador_api::{Gateway, Pagination, ProductPatch, ProductQuery, ProductsClient};
use mostrador_core::{NewProduct, Product};
use tracing::{debug, info, warn};

use crate::cache::{signature_of, CacheEntry, SeqGuard};
use crate::config::TtlPolicy;
use crate::error::StoreResult;

#[derive(Debug, Default)]
struct ProductCache {
    list: Option<CacheEntry<Vec<Product>>>,
    pagination: Option<Pagination>,
    top: Option<CacheEntry<Vec<Product>>>,
    list_seq: SeqGuard,
    top_seq: SeqGuard,
    loading: bool,
    error: Option<String>,
}

impl ProductCache {
    fn apply_created(&mut self, product: Product) {
        if let Some(entry) = self.list.as_mut() {
            entry.value_mut().push(product);
        }
    }

    /// Replace the product in every cached collection that holds it.
    fn apply_updated(&mut self, product: &Product) {
        for entry in [self.list.as_mut(), self.top.as_mut()].into_iter().flatten() {
            if let Some(slot) = entry.value_mut().iter_mut().find(|p| p.id == product.id) {
                *slot = product.clone();
            }
        }
    }

    /// Soft delete: flip the active flag wherever the product is cached.
    fn apply_deactivated(&mut self, id: &str) {
        for entry in [self.list.as_mut(), self.top.as_mut()].into_iter().flatten() {
            if let Some(slot) = entry.value_mut().iter_mut().find(|p| p.id == id) {
                slot.is_active = false;
            }
        }
    }

    fn cached_list(&self) -> Vec<Product> {
        match &self.list {
            Some(entry) => entry.value().clone(),
            None => Vec::new(),
        }
    }
}

/// Cloneable handle to the cached product catalog.
#[derive(Debug, Clone)]
pub struct ProductStore {
    api: ProductsClient,
    ttl: TtlPolicy,
    inner: Arc<Mutex<ProductCache>>,
}

impl ProductStore {
    pub fn new(gateway: Gateway, ttl: TtlPolicy) -> Self {
        ProductStore {
            api: ProductsClient::new(gateway),
            ttl,
            inner: Arc::new(Mutex::new(ProductCache::default())),
        }
    }

    // =========================================================================
    // Fetching
    // =========================================================================

    /// Fetch products for `query`, serving from cache while the last result
    /// for the same query is fresh. `force` always goes to the backend.
    ///
    /// On failure the previous cache is left intact and the error is kept
    /// for [`last_error`](Self::last_error).
    pub async fn fetch(&self, query: &ProductQuery, force: bool) -> StoreResult<Vec<Product>> {
        let signature = signature_of(&query.to_pairs());

        let seq = {
            let mut cache = self.lock();
            if !force {
                if let Some(entry) = &cache.list {
                    if entry.is_fresh(Utc::now(), self.ttl.products, &signature) {
                        debug!("Product cache hit");
                        return Ok(entry.value().clone());
                    }
                }
            }
            cache.loading = true;
            cache.list_seq.begin()
        };

        match self.api.list(query).await {
            Ok(page) => {
                let mut cache = self.lock();
                if !cache.list_seq.try_apply(seq) {
                    debug!(seq, "Product fetch superseded, discarding");
                    return Ok(match &cache.list {
                        Some(entry) => entry.value().clone(),
                        None => page.items,
                    });
                }
                cache.loading = false;
                cache.error = None;
                cache.pagination = Some(page.pagination);
                cache.list = Some(CacheEntry::new(page.items.clone(), signature));
                debug!(count = page.items.len(), "Products cached");
                Ok(page.items)
            }
            Err(e) => {
                let mut cache = self.lock();
                if cache.list_seq.try_apply(seq) {
                    cache.loading = false;
                    cache.error = Some(e.to_string());
                }
                warn!(error = %e, "Product fetch failed");
                Err(e.into())
            }
        }
    }

    /// Fetch the top sellers, cached separately with a short window so the
    /// strip follows the morning rush without hammering the backend.
    ///
    /// Failures keep the previous top sellers and are recorded for
    /// [`last_error`](Self::last_error), like `fetch`.
    pub async fn top_selling(&self, limit: u32, force: bool) -> StoreResult<Vec<Product>> {
        let signature = signature_of(&[("limit", limit.to_string())]);

        let seq = {
            let mut cache = self.lock();
            if !force {
                if let Some(entry) = &cache.top {
                    if entry.is_fresh(Utc::now(), self.ttl.top_selling, &signature) {
                        debug!("Top sellers cache hit");
                        return Ok(entry.value().clone());
                    }
                }
            }
            cache.loading = true;
            cache.top_seq.begin()
        };

        match self.api.top_selling(limit).await {
            Ok(products) => {
                let mut cache = self.lock();
                if !cache.top_seq.try_apply(seq) {
                    debug!(seq, "Top sellers fetch superseded, discarding");
                    return Ok(match &cache.top {
                        Some(entry) => entry.value().clone(),
                        None => products,
                    });
                }
                cache.loading = false;
                cache.error = None;
                cache.top = Some(CacheEntry::new(products.clone(), signature));
                Ok(products)
            }
            Err(e) => {
                let mut cache = self.lock();
                if cache.top_seq.try_apply(seq) {
                    cache.loading = false;
                    cache.error = Some(e.to_string());
                }
                warn!(error = %e, "Top sellers fetch failed");
                Err(e.into())
            }
        }
    }

    /// Drop cached data so the next fetch goes to the backend. Called after
    /// an order posts, since stock levels just moved.
    pub fn invalidate(&self) {
        let mut cache = self.lock();
        cache.list = None;
        cache.top = None;
        debug!("Product cache invalidated");
    }

    // =========================================================================
    // Synchronous views over the cache
    // =========================================================================

    /// The cached product list (empty before the first fetch).
    pub fn cached(&self) -> Vec<Product> {
        self.lock().cached_list()
    }

    /// Pagination of the last successful list fetch.
    pub fn pagination(&self) -> Option<Pagination> {
        self.lock().pagination
    }

    pub fn is_loading(&self) -> bool {
        self.lock().loading
    }

    /// The error of the most recent fetch, if it failed.
    pub fn last_error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    /// Case-insensitive substring search over cached names and barcodes.
    /// An empty term returns the active products.
    pub fn search(&self, term: &str) -> Vec<Product> {
        let term = term.trim().to_lowercase();
        let cache = self.lock();
        if term.is_empty() {
            return cache
                .cached_list()
                .into_iter()
                .filter(|p| p.is_active)
                .collect();
        }
        cache
            .cached_list()
            .into_iter()
            .filter(|p| {
                p.name.to_lowercase().contains(&term)
                    || p.barcode.as_deref().is_some_and(|b| b.contains(&term))
            })
            .collect()
    }

    /// Look up a cached product by id.
    pub fn get_by_id(&self, id: &str) -> Option<Product> {
        self.lock()
            .cached_list()
            .into_iter()
            .find(|p| p.id == id)
    }

    /// Exact barcode lookup over the cache (the scanner path).
    pub fn get_by_barcode(&self, barcode: &str) -> Option<Product> {
        self.lock()
            .cached_list()
            .into_iter()
            .find(|p| p.barcode.as_deref() == Some(barcode))
    }

    /// Cached products belonging to a category.
    pub fn get_by_category(&self, category_id: &str) -> Vec<Product> {
        self.lock()
            .cached_list()
            .into_iter()
            .filter(|p| p.category_id.as_deref() == Some(category_id))
            .collect()
    }

    /// Cached active products at or below their low-stock threshold.
    pub fn low_stock(&self) -> Vec<Product> {
        self.lock()
            .cached_list()
            .into_iter()
            .filter(|p| p.is_active && p.is_low_stock())
            .collect()
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Create a product and add it to the cached list.
    pub async fn create(&self, product: &NewProduct) -> StoreResult<Product> {
        let created = self.api.create(product).await?;
        self.lock().apply_created(created.clone());
        info!(id = %created.id, name = %created.name, "Product created");
        Ok(created)
    }

    /// Update a product and replace it in the cached collections.
    pub async fn update(&self, id: &str, patch: &ProductPatch) -> StoreResult<Product> {
        let updated = self.api.update(id, patch).await?;
        self.lock().apply_updated(&updated);
        Ok(updated)
    }

    /// Deactivate a product and flip its cached active flag.
    pub async fn deactivate(&self, id: &str) -> StoreResult<()> {
        self.api.deactivate(id).await?;
        self.lock().apply_deactivated(id);
        info!(id = %id, "Product deactivated");
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, ProductCache> {
        self.inner.lock().expect("Product cache mutex poisoned")
    }
}

// =============================================================================
// Tests
// =============================================================================
