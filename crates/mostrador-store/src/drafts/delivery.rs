// =============================================================================
// Delivery Draft Store
// =============================================================================
//
// A delivery order in progress. Same line discipline as the sale draft,
// with a second party: the assigned driver. The dispatch board reads
// existing orders through the passthroughs at the bottom; those are plain
// gateway calls, the board refetches on its own schedule.
//
// =============================================================================

use std::sync::{Arc, Mutex, MutexGuard};

use mostrador_api::{
    order_items, DeliveriesClient, Delivery, DeliveryQuery, DeliveryStatus, Gateway, NewDelivery,
    Paginated,
};
use mostrador_core::{
    Customer, Draft, DraftLine, Driver, Money, PaymentMethod, PriceLevel, Product, Quantity,
};
use tracing::{debug, info};

use crate::drafts::{rejected, sale::trimmed};
use crate::error::{StoreError, StoreResult};
use crate::events::{EventBus, StoreEvent};
use crate::products::ProductStore;

#[derive(Debug, Default)]
struct DeliveryDraftInner {
    draft: Draft,
    customer: Option<Customer>,
    driver: Option<Driver>,
    payment_method: PaymentMethod,
    notes: String,
}

impl DeliveryDraftInner {
    fn reset(&mut self) {
        self.draft.clear();
        self.customer = None;
        self.driver = None;
        self.payment_method = PaymentMethod::default();
        self.notes.clear();
    }
}

/// Cloneable handle to the in-progress delivery order.
#[derive(Debug, Clone)]
pub struct DeliveryDraftStore {
    api: DeliveriesClient,
    products: ProductStore,
    events: EventBus,
    inner: Arc<Mutex<DeliveryDraftInner>>,
}

impl DeliveryDraftStore {
    pub fn new(gateway: Gateway, products: ProductStore, events: EventBus) -> Self {
        DeliveryDraftStore {
            api: DeliveriesClient::new(gateway),
            products,
            events,
            inner: Arc::new(Mutex::new(DeliveryDraftInner::default())),
        }
    }

    // =========================================================================
    // Line mutations
    // =========================================================================

    pub fn set_line(
        &self,
        product: &Product,
        quantity: Quantity,
        level: PriceLevel,
    ) -> StoreResult<()> {
        self.lock()
            .draft
            .set_line(product, quantity, level)
            .map_err(|e| rejected(&product.name, e))
    }

    pub fn add_line(
        &self,
        product: &Product,
        quantity: Quantity,
        level: PriceLevel,
    ) -> StoreResult<()> {
        self.lock()
            .draft
            .add_line(product, quantity, level)
            .map_err(|e| rejected(&product.name, e))
    }

    /// Amount entry, as on the sale grid. Returns the derived quantity.
    pub fn add_by_amount(
        &self,
        product: &Product,
        amount: Money,
        level: PriceLevel,
    ) -> StoreResult<Quantity> {
        let quantity = Quantity::from_amount(amount, product.price_for(level));
        self.add_line(product, quantity, level)?;
        Ok(quantity)
    }

    pub fn update_quantity(
        &self,
        product_id: &str,
        level: PriceLevel,
        quantity: Quantity,
    ) -> StoreResult<()> {
        self.lock()
            .draft
            .update_quantity(product_id, level, quantity)
            .map_err(|e| rejected(product_id, e))
    }

    pub fn change_price_level(
        &self,
        product_id: &str,
        from: PriceLevel,
        to: PriceLevel,
    ) -> StoreResult<()> {
        self.lock()
            .draft
            .change_price_level(product_id, from, to)
            .map_err(|e| rejected(product_id, e))
    }

    pub fn remove_line(&self, product_id: &str, level: PriceLevel) {
        self.lock().draft.remove_line(product_id, level);
    }

    /// Throw the whole draft away, driver included.
    pub fn clear(&self) {
        self.lock().reset();
        debug!("Delivery draft cleared");
    }

    // =========================================================================
    // Parties and payment
    // =========================================================================

    pub fn set_customer(&self, customer: Option<Customer>) {
        self.lock().customer = customer;
    }

    pub fn set_driver(&self, driver: Option<Driver>) {
        self.lock().driver = driver;
    }

    pub fn set_payment_method(&self, method: PaymentMethod) {
        self.lock().payment_method = method;
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

    pub fn customer(&self) -> Option<Customer> {
        self.lock().customer.clone()
    }

    pub fn driver(&self) -> Option<Driver> {
        self.lock().driver.clone()
    }

    pub fn payment_method(&self) -> PaymentMethod {
        self.lock().payment_method
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
        if inner.draft.is_empty() || inner.driver.is_none() {
            return false;
        }
        let Some(customer) = &inner.customer else {
            return false;
        };
        if inner.payment_method.requires_customer_account() {
            return customer.can_use_account()
                && !customer.exceeds_credit_limit(inner.draft.total());
        }
        true
    }

    // =========================================================================
    // Submit
    // =========================================================================

    /// Post the delivery order. Resets the draft and emits
    /// [`StoreEvent::DeliveryPosted`] on success; leaves everything intact
    /// on failure.
    pub async fn submit(&self, payment_data: serde_json::Value) -> StoreResult<Delivery> {
        debug!("Submitting delivery draft");

        let request = {
            let inner = self.lock();
            if inner.draft.is_empty() {
                return Err(StoreError::EmptyDraft);
            }
            let customer = inner.customer.as_ref().ok_or(StoreError::MissingCustomer)?;
            let driver = inner.driver.as_ref().ok_or(StoreError::MissingDriver)?;
            let total = inner.draft.total();

            if inner.payment_method.requires_customer_account() {
                if !customer.can_use_account() {
                    return Err(StoreError::WalkInNotAllowed);
                }
                if customer.exceeds_credit_limit(total) {
                    return Err(StoreError::CreditLimitExceeded {
                        balance: customer.current_balance,
                        limit: customer.credit_limit,
                        total,
                    });
                }
            }

            NewDelivery {
                customer_id: customer.id.clone(),
                driver_id: driver.id.clone(),
                items: order_items(inner.draft.lines()),
                total,
                payment_method: inner.payment_method,
                payment_data,
                notes: trimmed(&inner.notes),
            }
        };

        let delivery = self.api.create(&request).await?;

        self.lock().reset();
        self.products.invalidate();
        self.events.emit(StoreEvent::DeliveryPosted {
            delivery_id: delivery.id.clone(),
            total: delivery.total,
        });

        info!(
            delivery_id = %delivery.id,
            driver_id = %delivery.driver_id,
            total = %delivery.total,
            "Delivery posted"
        );
        Ok(delivery)
    }

    // =========================================================================
    // Dispatch board passthroughs
    // =========================================================================

    /// Existing delivery orders, straight from the backend.
    pub async fn list(&self, query: &DeliveryQuery) -> StoreResult<Paginated<Delivery>> {
        Ok(self.api.list(query).await?)
    }

    /// Move an order through its lifecycle (pendiente → en_camino → ...).
    pub async fn update_status(
        &self,
        id: &str,
        status: DeliveryStatus,
    ) -> StoreResult<Delivery> {
        let delivery = self.api.update_status(id, status).await?;
        info!(id = %id, status = %status, "Delivery status updated");
        Ok(delivery)
    }

    fn lock(&self) -> MutexGuard<'_, DeliveryDraftInner> {
        self.inner.lock().expect("Delivery draft mutex poisoned")
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use mostrador_api::ApiConfig;
    use mostrador_core::UnitType;

    use crate::config::TtlPolicy;

    fn test_store() -> DeliveryDraftStore {
        let gateway = Gateway::new(ApiConfig::new("http://127.0.0.1:9")).unwrap();
        let products = ProductStore::new(gateway.clone(), TtlPolicy::default());
        DeliveryDraftStore::new(gateway, products, EventBus::new())
    }

    fn test_product(id: &str) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Producto {id}"),
            barcode: None,
            description: None,
            unit_type: UnitType::Unidades,
            price: Money::from_pesos(800),
            price_level_2: None,
            price_level_3: None,
            cost: None,
            stock: Quantity::from_units(20),
            min_stock: Quantity::from_units(2),
            category_id: None,
            image_url: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn test_customer() -> Customer {
        Customer {
            id: "c-1".to_string(),
            name: "Maria Lopez".to_string(),
            document_number: "30123456".to_string(),
            email: None,
            phone: None,
            address: Some("Av. Rivadavia 1234".to_string()),
            current_balance: Money::zero(),
            credit_limit: Money::from_pesos(5000),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn test_driver() -> Driver {
        Driver {
            id: "d-1".to_string(),
            name: "Jorge Paz".to_string(),
            phone: Some("1155556666".to_string()),
            vehicle: Some("Fiorino AB123CD".to_string()),
            is_active: true,
        }
    }

    #[tokio::test]
    async fn test_submit_requires_driver() {
        let store = test_store();
        store
            .add_line(&test_product("p-1"), Quantity::from_units(2), PriceLevel::BASE)
            .unwrap();
        store.set_customer(Some(test_customer()));

        assert!(!store.can_submit());
        assert!(matches!(
            store.submit(serde_json::json!({})).await,
            Err(StoreError::MissingDriver)
        ));

        store.set_driver(Some(test_driver()));
        assert!(store.can_submit());
    }

    #[tokio::test]
    async fn test_failed_submit_keeps_draft_and_parties() {
        let store = test_store();
        store
            .add_line(&test_product("p-1"), Quantity::from_units(2), PriceLevel::BASE)
            .unwrap();
        store.set_customer(Some(test_customer()));
        store.set_driver(Some(test_driver()));

        // Preconditions pass; the post fails because nothing is listening.
        assert!(matches!(
            store.submit(serde_json::json!({})).await,
            Err(StoreError::Api(_))
        ));
        assert_eq!(store.line_count(), 1);
        assert!(store.driver().is_some());
        assert!(store.customer().is_some());
    }

    #[test]
    fn test_clear_drops_driver_too() {
        let store = test_store();
        store
            .add_line(&test_product("p-1"), Quantity::from_units(1), PriceLevel::BASE)
            .unwrap();
        store.set_driver(Some(test_driver()));

        store.clear();
        assert!(store.is_empty());
        assert!(store.driver().is_none());
    }
}
