// =============================================================================
// Category Store
// =============================================================================
//
// Cached category catalog. Categories change rarely, so the list gets the
// longest freshness window of the resource stores and no pagination: the
// backend returns the whole set at once.
//
// Unlike products and customers, deleting a category is a hard delete on
// the backend, so removal drops the entry from the cache instead of
// flipping an active flag.
//
// =============================================================================

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::Utc;
use mostrador_api::{CategoriesClient, CategoryPatch, Gateway};
use mostrador_core::{Category, NewCategory};
use tracing::{debug, info, warn};

use crate::cache::{CacheEntry, SeqGuard};
use crate::config::TtlPolicy;
use crate::error::StoreResult;

/// Cache signature for the one list request this store makes.
const LIST_SIGNATURE: &str = "categories";

#[derive(Debug, Default)]
struct CategoryCache {
    list: Option<CacheEntry<Vec<Category>>>,
    seq: SeqGuard,
    loading: bool,
    error: Option<String>,
}

impl CategoryCache {
    fn apply_created(&mut self, category: Category) {
        if let Some(entry) = self.list.as_mut() {
            entry.value_mut().push(category);
        }
    }

    fn apply_updated(&mut self, category: Category) {
        if let Some(entry) = self.list.as_mut() {
            if let Some(slot) = entry.value_mut().iter_mut().find(|c| c.id == category.id) {
                *slot = category;
            }
        }
    }

    fn apply_removed(&mut self, id: &str) {
        if let Some(entry) = self.list.as_mut() {
            entry.value_mut().retain(|c| c.id != id);
        }
    }
}

/// Cloneable handle to the cached category catalog.
#[derive(Debug, Clone)]
pub struct CategoryStore {
    api: CategoriesClient,
    ttl: Duration,
    inner: Arc<Mutex<CategoryCache>>,
}

impl CategoryStore {
    pub fn new(gateway: Gateway, ttl: TtlPolicy) -> Self {
        CategoryStore {
            api: CategoriesClient::new(gateway),
            ttl: ttl.categories,
            inner: Arc::new(Mutex::new(CategoryCache::default())),
        }
    }

    /// Fetch the category list, serving from cache while it is fresh.
    /// `force` busts the cache and always goes to the backend.
    pub async fn fetch(&self, force: bool) -> StoreResult<Vec<Category>> {
        let seq = {
            let mut cache = self.lock();
            if !force {
                if let Some(entry) = &cache.list {
                    if entry.is_fresh(Utc::now(), self.ttl, LIST_SIGNATURE) {
                        debug!("Category cache hit");
                        return Ok(entry.value().clone());
                    }
                }
            }
            cache.loading = true;
            cache.seq.begin()
        };

        match self.api.list().await {
            Ok(categories) => {
                let mut cache = self.lock();
                if !cache.seq.try_apply(seq) {
                    debug!(seq, "Category fetch superseded, discarding");
                    return Ok(match &cache.list {
                        Some(entry) => entry.value().clone(),
                        None => categories,
                    });
                }
                cache.loading = false;
                cache.error = None;
                cache.list = Some(CacheEntry::new(categories.clone(), LIST_SIGNATURE));
                Ok(categories)
            }
            Err(e) => {
                let mut cache = self.lock();
                if cache.seq.try_apply(seq) {
                    cache.loading = false;
                    cache.error = Some(e.to_string());
                }
                warn!(error = %e, "Category fetch failed");
                Err(e.into())
            }
        }
    }

    /// All cached categories (empty before the first fetch).
    pub fn cached(&self) -> Vec<Category> {
        match &self.lock().list {
            Some(entry) => entry.value().clone(),
            None => Vec::new(),
        }
    }

    /// Look up a cached category by id.
    pub fn get_by_id(&self, id: &str) -> Option<Category> {
        self.lock().list.as_ref().and_then(|entry| {
            entry.value().iter().find(|c| c.id == id).cloned()
        })
    }

    pub fn is_loading(&self) -> bool {
        self.lock().loading
    }

    /// The error of the last failed fetch, if the most recent fetch failed.
    pub fn last_error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    /// Create a category and add it to the cached list.
    pub async fn create(&self, category: &NewCategory) -> StoreResult<Category> {
        debug!(name = %category.name, "Creating category");
        let created = self.api.create(category).await?;
        self.lock().apply_created(created.clone());
        info!(id = %created.id, name = %created.name, "Category created");
        Ok(created)
    }

    /// Update a category and replace it in the cached list.
    pub async fn update(&self, id: &str, patch: &CategoryPatch) -> StoreResult<Category> {
        debug!(id = %id, "Updating category");
        let updated = self.api.update(id, patch).await?;
        self.lock().apply_updated(updated.clone());
        Ok(updated)
    }

    /// Delete a category and drop it from the cached list.
    pub async fn delete(&self, id: &str) -> StoreResult<()> {
        debug!(id = %id, "Deleting category");
        self.api.delete(id).await?;
        self.lock().apply_removed(id);
        info!(id = %id, "Category deleted");
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, CategoryCache> {
        self.inner.lock().expect("Category cache mutex poisoned")
    }
}

// =============================================================================
// Tests
// =============================================================================
