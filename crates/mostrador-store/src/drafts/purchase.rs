// =============================================================================
// Purchase Draft Store
// =============================================================================
//
// Stock intake in progress. Purchase lines reuse the core draft but price
// against the product's cost, not its retail price, and the quantity being
// ordered has nothing to do with what is currently on the shelf: the line
// snapshot gets its stock ceiling lifted to the global line maximum, so
// ordering 50 units of something with 3 left is perfectly fine.
//
// Price tiers do not apply to purchases; every line sits on the base level.
//
// =============================================================================

use std::sync::{Arc, Mutex, MutexGuard};

use mostrador_api::{order_items, Gateway, NewPurchase, Purchase, PurchasesClient};
use mostrador_core::{
    Draft, DraftLine, Money, PriceLevel, Product, Quantity, Supplier, MAX_LINE_QUANTITY,
};
use tracing::{debug, info};

use crate::drafts::{rejected, sale::trimmed};
use crate::error::{StoreError, StoreResult};
use crate::events::{EventBus, StoreEvent};
use crate::products::ProductStore;

/// The product as the purchase draft sees it: cost as the unit price, no
/// tiers, and the on-hand stock replaced by the line maximum.
fn cost_basis(product: &Product) -> Product {
    let mut snapshot = product.clone();
    snapshot.price = product.cost.unwrap_or(product.price);
    snapshot.price_level_2 = None;
    snapshot.price_level_3 = None;
    snapshot.stock = MAX_LINE_QUANTITY;
    snapshot
}

#[derive(Debug, Default)]
struct PurchaseDraftInner {
    draft: Draft,
    supplier: Option<Supplier>,
    notes: String,
}

impl PurchaseDraftInner {
    fn reset(&mut self) {
        self.draft.clear();
        self.supplier = None;
        self.notes.clear();
    }
}

/// Cloneable handle to the in-progress purchase order.
#[derive(Debug, Clone)]
pub struct PurchaseDraftStore {
    api: PurchasesClient,
    products: ProductStore,
    events: EventBus,
    inner: Arc<Mutex<PurchaseDraftInner>>,
}

impl PurchaseDraftStore {
    pub fn new(gateway: Gateway, products: ProductStore, events: EventBus) -> Self {
        PurchaseDraftStore {
            api: PurchasesClient::new(gateway),
            products,
            events,
            inner: Arc::new(Mutex::new(PurchaseDraftInner::default())),
        }
    }

    // =========================================================================
    // Line mutations
    // =========================================================================

    /// Put a line at exactly `quantity` of the product, at cost.
    pub fn set_line(&self, product: &Product, quantity: Quantity) -> StoreResult<()> {
        self.lock()
            .draft
            .set_line(&cost_basis(product), quantity, PriceLevel::BASE)
            .map_err(|e| rejected(&product.name, e))
    }

    /// Add `quantity` on top of any existing line for the product.
    pub fn add_line(&self, product: &Product, quantity: Quantity) -> StoreResult<()> {
        self.lock()
            .draft
            .add_line(&cost_basis(product), quantity, PriceLevel::BASE)
            .map_err(|e| rejected(&product.name, e))
    }

    /// Set a line's quantity. Zero or negative removes the line.
    pub fn update_quantity(&self, product_id: &str, quantity: Quantity) -> StoreResult<()> {
        self.lock()
            .draft
            .update_quantity(product_id, PriceLevel::BASE, quantity)
            .map_err(|e| rejected(product_id, e))
    }

    /// Remove a line. Removing an absent line is a no-op.
    pub fn remove_line(&self, product_id: &str) {
        self.lock().draft.remove_line(product_id, PriceLevel::BASE);
    }

    /// Throw the whole draft away, supplier included.
    pub fn clear(&self) {
        self.lock().reset();
        debug!("Purchase draft cleared");
    }

    // =========================================================================
    // Counterparty
    // =========================================================================

    pub fn set_supplier(&self, supplier: Option<Supplier>) {
        self.lock().supplier = supplier;
    }

    pub fn set_notes(&self, notes: impl Into<String>) {
        self.lock().notes = notes.into();
    }

    // =========================================================================
    // Views
    // =========================================================================

    pub fn lines(&self) -> Vec<DraftLine> {
        self.lock().draft.lines().to_vec()
    }

    pub fn total(&self) -> Money {
        self.lock().draft.total()
    }

    pub fn supplier(&self) -> Option<Supplier> {
        self.lock().supplier.clone()
    }

    pub fn notes(&self) -> String {
        self.lock().notes.clone()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().draft.is_empty()
    }

    pub fn line_count(&self) -> usize {
        self.lock().draft.line_count()
    }

    /// Whether submit would pass its preconditions right now.
    pub fn can_submit(&self) -> bool {
        let inner = self.lock();
        !inner.draft.is_empty() && inner.supplier.is_some()
    }

    // =========================================================================
    // Submit
    // =========================================================================

    /// Post the purchase order. The backend adds the received quantities to
    /// stock, so the product cache is invalidated on success.
    pub async fn submit(&self) -> StoreResult<Purchase> {
        debug!("Submitting purchase draft");

        let request = {
            let inner = self.lock();
            if inner.draft.is_empty() {
                return Err(StoreError::EmptyDraft);
            }
            let supplier = inner.supplier.as_ref().ok_or(StoreError::MissingSupplier)?;

            NewPurchase {
                supplier_id: supplier.id.clone(),
                items: order_items(inner.draft.lines()),
                total: inner.draft.total(),
                notes: trimmed(&inner.notes),
            }
        };

        let purchase = self.api.create(&request).await?;

        self.lock().reset();
        self.products.invalidate();
        self.events.emit(StoreEvent::PurchasePosted {
            purchase_id: purchase.id.clone(),
            total: purchase.total,
        });

        info!(
            purchase_id = %purchase.id,
            supplier_id = %purchase.supplier_id,
            total = %purchase.total,
            "Purchase posted"
        );
        Ok(purchase)
    }

    fn lock(&self) -> MutexGuard<'_, PurchaseDraftInner> {
        self.inner.lock().expect("Purchase draft mutex poisoned")
    }
}

// =============================================================================
// Tests
// =============================================================================
