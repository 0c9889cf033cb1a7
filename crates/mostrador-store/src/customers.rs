// =============================================================================
// Customer Store
// =============================================================================
//
// Cached customer list plus the cuenta corriente operations. Posting a
// transaction patches the cached customer's balance in place and announces
// the movement on the event bus, so the cash register and any open account
// screens learn about it without polling.
//
// The walk-in sentinel ("Consumidor Final") is a real backend record that
// anonymous sales post against. It is not editable, not deletable and not
// an account customer, and this store refuses those operations locally
// before they reach the backend.
//
// =============================================================================

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::Utc;
use mostrador_api::{
    BalanceInfo, CustomerPatch, CustomerQuery, CustomersClient, Gateway, Pagination,
    TransactionReceipt,
};
use mostrador_core::{Customer, Money, NewCustomer, NewTransaction};
use tracing::{debug, info, warn};

use crate::cache::{signature_of, CacheEntry, SeqGuard};
use crate::config::TtlPolicy;
use crate::error::{StoreError, StoreResult};
use crate::events::{EventBus, StoreEvent};

#[derive(Debug, Default)]
struct CustomerCache {
    list: Option<CacheEntry<Vec<Customer>>>,
    pagination: Option<Pagination>,
    seq: SeqGuard,
    loading: bool,
    error: Option<String>,
}

impl CustomerCache {
    fn apply_created(&mut self, customer: Customer) {
        if let Some(entry) = self.list.as_mut() {
            entry.value_mut().push(customer);
        }
    }

    fn apply_updated(&mut self, customer: &Customer) {
        if let Some(entry) = self.list.as_mut() {
            if let Some(slot) = entry.value_mut().iter_mut().find(|c| c.id == customer.id) {
                *slot = customer.clone();
            }
        }
    }

    fn apply_deactivated(&mut self, id: &str) {
        if let Some(entry) = self.list.as_mut() {
            if let Some(slot) = entry.value_mut().iter_mut().find(|c| c.id == id) {
                slot.is_active = false;
            }
        }
    }

    fn apply_balance(&mut self, id: &str, balance: Money) {
        if let Some(entry) = self.list.as_mut() {
            if let Some(slot) = entry.value_mut().iter_mut().find(|c| c.id == id) {
                slot.current_balance = balance;
            }
        }
    }

    fn cached_list(&self) -> Vec<Customer> {
        match &self.list {
            Some(entry) => entry.value().clone(),
            None => Vec::new(),
        }
    }

    fn find(&self, id: &str) -> Option<Customer> {
        self.list
            .as_ref()
            .and_then(|entry| entry.value().iter().find(|c| c.id == id).cloned())
    }
}

/// Cloneable handle to the cached customer list and account operations.
#[derive(Debug, Clone)]
pub struct CustomerStore {
    api: CustomersClient,
    ttl: Duration,
    events: EventBus,
    inner: Arc<Mutex<CustomerCache>>,
}

impl CustomerStore {
    pub fn new(gateway: Gateway, ttl: TtlPolicy, events: EventBus) -> Self {
        CustomerStore {
            api: CustomersClient::new(gateway),
            ttl: ttl.customers,
            events,
            inner: Arc::new(Mutex::new(CustomerCache::default())),
        }
    }

    // =========================================================================
    // Fetching
    // =========================================================================

    /// Fetch customers for `query`, serving from cache while the last
    /// result for the same query is fresh. `force` always goes to the
    /// backend. Failures leave the previous cache intact.
    pub async fn fetch(&self, query: &CustomerQuery, force: bool) -> StoreResult<Vec<Customer>> {
        let signature = signature_of(&query.to_pairs());

        let seq = {
            let mut cache = self.lock();
            if !force {
                if let Some(entry) = &cache.list {
                    if entry.is_fresh(Utc::now(), self.ttl, &signature) {
                        debug!("Customer cache hit");
                        return Ok(entry.value().clone());
                    }
                }
            }
            cache.loading = true;
            cache.seq.begin()
        };

        match self.api.list(query).await {
            Ok(page) => {
                let mut cache = self.lock();
                if !cache.seq.try_apply(seq) {
                    debug!(seq, "Customer fetch superseded, discarding");
                    return Ok(match &cache.list {
                        Some(entry) => entry.value().clone(),
                        None => page.items,
                    });
                }
                cache.loading = false;
                cache.error = None;
                cache.pagination = Some(page.pagination);
                cache.list = Some(CacheEntry::new(page.items.clone(), signature));
                Ok(page.items)
            }
            Err(e) => {
                let mut cache = self.lock();
                if cache.seq.try_apply(seq) {
                    cache.loading = false;
                    cache.error = Some(e.to_string());
                }
                warn!(error = %e, "Customer fetch failed");
                Err(e.into())
            }
        }
    }

    // =========================================================================
    // Synchronous views over the cache
    // =========================================================================

    /// The cached customer list (empty before the first fetch).
    pub fn cached(&self) -> Vec<Customer> {
        self.lock().cached_list()
    }

    /// Pagination of the last successful fetch.
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

    /// Case-insensitive substring search over cached names, documents,
    /// emails and phones. An empty term returns the active customers.
    pub fn search(&self, term: &str) -> Vec<Customer> {
        let term = term.trim().to_lowercase();
        let cached = self.lock().cached_list();
        if term.is_empty() {
            return cached.into_iter().filter(|c| c.is_active).collect();
        }
        cached
            .into_iter()
            .filter(|c| {
                c.name.to_lowercase().contains(&term)
                    || c.document_number.contains(&term)
                    || c.email.as_deref().is_some_and(|e| e.to_lowercase().contains(&term))
                    || c.phone.as_deref().is_some_and(|p| p.contains(&term))
            })
            .collect()
    }

    /// Look up a cached customer by id.
    pub fn get_by_id(&self, id: &str) -> Option<Customer> {
        self.lock().find(id)
    }

    /// The cached walk-in sentinel, the default counterparty for anonymous
    /// sales.
    pub fn walk_in(&self) -> Option<Customer> {
        self.lock()
            .cached_list()
            .into_iter()
            .find(|c| c.is_walk_in())
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Create a customer and add it to the cached list.
    pub async fn create(&self, customer: &NewCustomer) -> StoreResult<Customer> {
        let created = self.api.create(customer).await?;
        self.lock().apply_created(created.clone());
        info!(id = %created.id, name = %created.name, "Customer created");
        Ok(created)
    }

    /// Update a customer and replace it in the cached list. Refused for
    /// the walk-in sentinel.
    pub async fn update(&self, id: &str, patch: &CustomerPatch) -> StoreResult<Customer> {
        self.refuse_walk_in(id)?;
        let updated = self.api.update(id, patch).await?;
        self.lock().apply_updated(&updated);
        Ok(updated)
    }

    /// Deactivate a customer and flip its cached active flag. Refused for
    /// the walk-in sentinel.
    pub async fn deactivate(&self, id: &str) -> StoreResult<()> {
        self.refuse_walk_in(id)?;
        self.api.deactivate(id).await?;
        self.lock().apply_deactivated(id);
        info!(id = %id, "Customer deactivated");
        Ok(())
    }

    // =========================================================================
    // Cuenta corriente
    // =========================================================================

    /// Fetch fresh balance figures and patch them into the cache.
    pub async fn balance(&self, id: &str) -> StoreResult<BalanceInfo> {
        let info = self.api.balance(id).await?;
        self.lock().apply_balance(id, info.current_balance);
        Ok(info)
    }

    /// Post an account movement. On success the cached balance is patched
    /// and a [`StoreEvent::TransactionPosted`] goes out on the event bus.
    ///
    /// Refused locally for the walk-in sentinel; the backend remains the
    /// authority on the credit limit.
    pub async fn post_transaction(
        &self,
        transaction: &NewTransaction,
    ) -> StoreResult<TransactionReceipt> {
        self.refuse_walk_in(&transaction.customer_id)?;

        let receipt = self.api.post_transaction(transaction).await?;
        self.lock()
            .apply_balance(&receipt.customer_id, receipt.new_balance);

        self.events.emit(StoreEvent::TransactionPosted {
            customer_id: receipt.customer_id.clone(),
            kind: receipt.kind,
            amount: receipt.amount,
            new_balance: receipt.new_balance,
            affects_physical_cash: receipt
                .cash_registration
                .map(|c| c.affects_physical_cash)
                .unwrap_or(false),
        });

        info!(
            customer_id = %receipt.customer_id,
            kind = %receipt.kind,
            new_balance = %receipt.new_balance,
            "Account transaction posted"
        );
        Ok(receipt)
    }

    /// Refuse an operation when the target is the cached walk-in sentinel.
    /// Unknown ids pass through; the backend still has the final say.
    fn refuse_walk_in(&self, id: &str) -> StoreResult<()> {
        match self.lock().find(id) {
            Some(customer) if customer.is_walk_in() => {
                warn!(id = %id, "Operation refused for walk-in customer");
                Err(StoreError::WalkInNotAllowed)
            }
            _ => Ok(()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, CustomerCache> {
        self.inner.lock().expect("Customer cache mutex poisoned")
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use mostrador_api::ApiConfig;
    use mostrador_core::{TransactionType, WALK_IN_DOCUMENT, WALK_IN_NAME};

    fn test_store() -> CustomerStore {
        let gateway = Gateway::new(ApiConfig::new("http://127.0.0.1:9")).unwrap();
        CustomerStore::new(gateway, TtlPolicy::default(), EventBus::new())
    }

    fn test_customer(id: &str, name: &str, document: &str) -> Customer {
        Customer {
            id: id.to_string(),
            name: name.to_string(),
            document_number: document.to_string(),
            email: None,
            phone: None,
            address: None,
            current_balance: Money::zero(),
            credit_limit: Money::from_pesos(5000),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn walk_in_customer() -> Customer {
        test_customer("c-0", WALK_IN_NAME, WALK_IN_DOCUMENT)
    }

    fn prime(store: &CustomerStore, query: &CustomerQuery, customers: Vec<Customer>) {
        let signature = signature_of(&query.to_pairs());
        store.inner.lock().unwrap().list = Some(CacheEntry::new(customers, signature));
    }

    #[tokio::test]
    async fn test_fresh_cache_serves_without_network() {
        let store = test_store();
        let query = CustomerQuery::default();
        prime(&store, &query, vec![test_customer("c-1", "Maria Lopez", "30123456")]);

        // No backend exists, so an Ok result proves the cache answered.
        let customers = store.fetch(&query, false).await.unwrap();
        assert_eq!(customers.len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_failure_keeps_previous_data() {
        let store = test_store();
        let query = CustomerQuery::default();
        prime(&store, &query, vec![test_customer("c-1", "Maria Lopez", "30123456")]);

        assert!(store.fetch(&query, true).await.is_err());
        assert_eq!(store.cached().len(), 1);
        assert!(store.last_error().is_some());
    }

    #[test]
    fn test_search_covers_all_identity_fields() {
        let store = test_store();
        let mut with_contacts = test_customer("c-2", "Carlos Gimenez", "27876543");
        with_contacts.email = Some("carlos@example.com".to_string());
        with_contacts.phone = Some("1144449999".to_string());
        prime(
            &store,
            &CustomerQuery::default(),
            vec![test_customer("c-1", "Maria Lopez", "30123456"), with_contacts],
        );

        assert_eq!(store.search("maria").len(), 1);
        assert_eq!(store.search("27876").len(), 1);
        assert_eq!(store.search("carlos@").len(), 1);
        assert_eq!(store.search("4444").len(), 1);
        assert!(store.search("nadie").is_empty());
    }

    #[test]
    fn test_search_empty_term_returns_active() {
        let store = test_store();
        let mut inactive = test_customer("c-2", "Cerrado", "20111222");
        inactive.is_active = false;
        prime(
            &store,
            &CustomerQuery::default(),
            vec![test_customer("c-1", "Maria Lopez", "30123456"), inactive],
        );

        let results = store.search("");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "c-1");
    }

    #[test]
    fn test_walk_in_lookup() {
        let store = test_store();
        prime(
            &store,
            &CustomerQuery::default(),
            vec![test_customer("c-1", "Maria Lopez", "30123456"), walk_in_customer()],
        );

        assert_eq!(store.walk_in().unwrap().id, "c-0");
    }

    #[tokio::test]
    async fn test_walk_in_cannot_be_updated_or_deactivated() {
        let store = test_store();
        prime(&store, &CustomerQuery::default(), vec![walk_in_customer()]);

        let patch = CustomerPatch {
            name: Some("Otro Nombre".to_string()),
            ..CustomerPatch::default()
        };
        assert!(matches!(
            store.update("c-0", &patch).await,
            Err(StoreError::WalkInNotAllowed)
        ));
        assert!(matches!(
            store.deactivate("c-0").await,
            Err(StoreError::WalkInNotAllowed)
        ));
    }

    #[tokio::test]
    async fn test_walk_in_cannot_receive_transactions() {
        let store = test_store();
        prime(&store, &CustomerQuery::default(), vec![walk_in_customer()]);

        let tx = NewTransaction {
            customer_id: "c-0".to_string(),
            kind: TransactionType::Payment,
            amount: Money::from_pesos(100),
            description: "pago".to_string(),
            reference: None,
            payment_method: None,
        };
        assert!(matches!(
            store.post_transaction(&tx).await,
            Err(StoreError::WalkInNotAllowed)
        ));
    }

    #[test]
    fn test_balance_reconciliation() {
        let store = test_store();
        prime(
            &store,
            &CustomerQuery::default(),
            vec![test_customer("c-1", "Maria Lopez", "30123456")],
        );

        store
            .inner
            .lock()
            .unwrap()
            .apply_balance("c-1", Money::from_pesos(4400));
        assert_eq!(
            store.get_by_id("c-1").unwrap().current_balance,
            Money::from_pesos(4400)
        );
    }
}
