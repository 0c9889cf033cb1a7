// =============================================================================
// Sale Draft Store
// =============================================================================
//
// The counter sale in progress: lines picked from the grid or scanned,
// the customer it posts against (the walk-in sentinel for anonymous
// sales), and how it will be paid.
//
// Cuenta corriente gets an advisory credit check against the customer
// snapshot before the draft leaves the client; the backend re-checks
// authoritatively when the sale posts.
//
// =============================================================================

use std::sync::{Arc, Mutex, MutexGuard};

use mostrador_api::{order_items, Gateway, NewSale, Sale, SalesClient};
use mostrador_core::{
    Customer, Draft, DraftLine, Money, PaymentMethod, PriceLevel, Product, Quantity,
};
use tracing::{debug, info};

use crate::drafts::rejected;
use crate::error::{StoreError, StoreResult};
use crate::events::{EventBus, StoreEvent};
use crate::products::ProductStore;

#[derive(Debug, Default)]
struct SaleDraftInner {
    draft: Draft,
    customer: Option<Customer>,
    payment_method: PaymentMethod,
    notes: String,
}

impl SaleDraftInner {
    fn reset(&mut self) {
        self.draft.clear();
        self.customer = None;
        self.payment_method = PaymentMethod::default();
        self.notes.clear();
    }
}

/// Cloneable handle to the in-progress counter sale.
#[derive(Debug, Clone)]
pub struct SaleDraftStore {
    api: SalesClient,
    products: ProductStore,
    events: EventBus,
    inner: Arc<Mutex<SaleDraftInner>>,
}

impl SaleDraftStore {
    pub fn new(gateway: Gateway, products: ProductStore, events: EventBus) -> Self {
        SaleDraftStore {
            api: SalesClient::new(gateway),
            products,
            events,
            inner: Arc::new(Mutex::new(SaleDraftInner::default())),
        }
    }

    // =========================================================================
    // Line mutations
    // =========================================================================

    /// Put a line at exactly `quantity`, replacing any line for the same
    /// product and level.
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

    /// Add `quantity` on top of any existing line for the product and level.
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

    /// Amount entry: derive the quantity that `amount` buys at the level's
    /// unit price and add it. Returns the derived quantity so the modal can
    /// echo it ("$1500 ≈ 1.50 kg").
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

    /// Set a line's quantity. Zero or negative removes the line.
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

    /// Move a line to a different price tier, repricing from its snapshot.
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

    /// Remove a line. Removing an absent line is a no-op.
    pub fn remove_line(&self, product_id: &str, level: PriceLevel) {
        self.lock().draft.remove_line(product_id, level);
    }

    /// Throw the whole draft away: lines, customer, payment method, notes.
    pub fn clear(&self) {
        self.lock().reset();
        debug!("Sale draft cleared");
    }

    // =========================================================================
    // Counterparty and payment
    // =========================================================================

    pub fn set_customer(&self, customer: Option<Customer>) {
        self.lock().customer = customer;
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

    /// Whether submit would pass its preconditions right now. Drives the
    /// submit button without producing an error.
    pub fn can_submit(&self) -> bool {
        let inner = self.lock();
        if inner.draft.is_empty() {
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

    /// Post the sale. On success the draft resets and a
    /// [`StoreEvent::SalePosted`] goes out; on failure the draft is left
    /// exactly as it was so the operator can retry.
    ///
    /// `payment_data` carries method-specific details (amount tendered,
    /// card reference) straight through to the backend.
    pub async fn submit(&self, payment_data: serde_json::Value) -> StoreResult<Sale> {
        debug!("Submitting sale draft");

        let (request, line_count) = {
            let inner = self.lock();
            if inner.draft.is_empty() {
                return Err(StoreError::EmptyDraft);
            }
            let customer = inner.customer.as_ref().ok_or(StoreError::MissingCustomer)?;
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

            let request = NewSale {
                customer_id: customer.id.clone(),
                items: order_items(inner.draft.lines()),
                total,
                payment_method: inner.payment_method,
                payment_data,
                notes: trimmed(&inner.notes),
            };
            (request, inner.draft.line_count())
        };

        let sale = self.api.create(&request).await?;

        self.lock().reset();
        self.products.invalidate();
        self.events.emit(StoreEvent::SalePosted {
            sale_id: sale.id.clone(),
            total: sale.total,
            payment_method: sale.payment_method,
        });

        info!(
            sale_id = %sale.id,
            total = %sale.total,
            items = line_count,
            "Sale posted"
        );
        Ok(sale)
    }

    fn lock(&self) -> MutexGuard<'_, SaleDraftInner> {
        self.inner.lock().expect("Sale draft mutex poisoned")
    }
}

/// Notes travel as `None` when the field was left blank.
pub(crate) fn trimmed(notes: &str) -> Option<String> {
    let notes = notes.trim();
    if notes.is_empty() {
        None
    } else {
        Some(notes.to_string())
    }
}

// =============================================================================
// Tests
// =============================================================================
