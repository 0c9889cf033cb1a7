// =============================================================================
// Supplier Store
// =============================================================================
//
// The purchase counterparties. Unlike every other resource, suppliers have
// no backend endpoint: the catalog lives entirely in local storage as the
// `supplier-storage` document and is seeded with a small demo set the
// first time the client runs.
//
// Mutations persist synchronously, so the file on disk always matches
// what is in memory.
//
// =============================================================================

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use mostrador_core::validation::{validate_email, validate_name, validate_phone};
use mostrador_core::Supplier;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::storage::Storage;

/// Document name the catalog persists under.
const SUPPLIER_DOC: &str = "supplier-storage";

/// Input for creating or updating a supplier.
#[derive(Debug, Clone, Default)]
pub struct NewSupplier {
    pub name: String,
    pub cuit: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

impl NewSupplier {
    fn validate(&self) -> StoreResult<()> {
        validate_name(&self.name)?;
        if let Some(email) = &self.email {
            validate_email(email)?;
        }
        if let Some(phone) = &self.phone {
            validate_phone(phone)?;
        }
        Ok(())
    }
}

/// Cloneable handle to the locally persisted supplier catalog.
#[derive(Debug, Clone)]
pub struct SupplierStore {
    storage: Storage,
    inner: Arc<Mutex<Vec<Supplier>>>,
}

impl SupplierStore {
    /// Load the catalog from storage, seeding the demo set on first run.
    pub fn new(storage: Storage) -> StoreResult<Self> {
        let suppliers = match storage.load::<Vec<Supplier>>(SUPPLIER_DOC)? {
            Some(suppliers) => {
                debug!(count = suppliers.len(), "Supplier catalog loaded");
                suppliers
            }
            None => {
                let seeded = demo_suppliers();
                storage.save(SUPPLIER_DOC, &seeded)?;
                info!(count = seeded.len(), "Supplier catalog seeded");
                seeded
            }
        };
        Ok(SupplierStore {
            storage,
            inner: Arc::new(Mutex::new(suppliers)),
        })
    }

    /// All suppliers, including deactivated ones.
    pub fn all(&self) -> Vec<Supplier> {
        self.lock().clone()
    }

    /// Active suppliers only, what the purchase screen offers.
    pub fn active(&self) -> Vec<Supplier> {
        self.lock().iter().filter(|s| s.is_active).cloned().collect()
    }

    /// Look up a supplier by id.
    pub fn get_by_id(&self, id: &str) -> Option<Supplier> {
        self.lock().iter().find(|s| s.id == id).cloned()
    }

    /// Case-insensitive substring search over names and CUITs. An empty
    /// term returns the active suppliers.
    pub fn search(&self, term: &str) -> Vec<Supplier> {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return self.active();
        }
        self.lock()
            .iter()
            .filter(|s| {
                s.name.to_lowercase().contains(&term)
                    || s.cuit.as_deref().is_some_and(|c| c.contains(&term))
            })
            .cloned()
            .collect()
    }

    /// Create a supplier and persist the catalog.
    pub fn create(&self, input: NewSupplier) -> StoreResult<Supplier> {
        input.validate()?;

        let supplier = Supplier {
            id: Uuid::new_v4().to_string(),
            name: input.name.trim().to_string(),
            cuit: input.cuit,
            phone: input.phone,
            email: input.email,
            address: input.address,
            is_active: true,
            created_at: Utc::now(),
        };

        let mut suppliers = self.lock();
        suppliers.push(supplier.clone());
        self.persist(&suppliers)?;

        info!(id = %supplier.id, name = %supplier.name, "Supplier created");
        Ok(supplier)
    }

    /// Update a supplier in place and persist the catalog.
    pub fn update(&self, id: &str, input: NewSupplier) -> StoreResult<Supplier> {
        input.validate()?;

        let mut suppliers = self.lock();
        let slot = suppliers
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| StoreError::Storage(format!("unknown supplier: {id}")))?;

        slot.name = input.name.trim().to_string();
        slot.cuit = input.cuit;
        slot.phone = input.phone;
        slot.email = input.email;
        slot.address = input.address;
        let updated = slot.clone();

        self.persist(&suppliers)?;
        Ok(updated)
    }

    /// Soft-delete a supplier and persist the catalog. Unknown ids are a
    /// no-op.
    pub fn deactivate(&self, id: &str) -> StoreResult<()> {
        let mut suppliers = self.lock();
        if let Some(slot) = suppliers.iter_mut().find(|s| s.id == id) {
            slot.is_active = false;
            self.persist(&suppliers)?;
            info!(id = %id, "Supplier deactivated");
        }
        Ok(())
    }

    fn persist(&self, suppliers: &[Supplier]) -> StoreResult<()> {
        self.storage.save(SUPPLIER_DOC, &suppliers)
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Supplier>> {
        self.inner.lock().expect("Supplier catalog mutex poisoned")
    }
}

/// The demo catalog written on first run.
fn demo_suppliers() -> Vec<Supplier> {
    let demo = |name: &str, cuit: &str| Supplier {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        cuit: Some(cuit.to_string()),
        phone: None,
        email: None,
        address: None,
        is_active: true,
        created_at: Utc::now(),
    };

    vec![
        demo("Distribuidora La Serenisima", "30-50000001-2"),
        demo("Molinos Rio de la Plata", "30-50000002-4"),
        demo("Arcor SAIC", "30-50000003-6"),
        demo("Quilmes Distribucion", "30-50000004-8"),
    ]
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn test_store() -> (tempfile::TempDir, SupplierStore) {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::open(dir.path()).unwrap();
        let store = SupplierStore::new(storage).unwrap();
        (dir, store)
    }

    #[test]
    fn test_first_run_seeds_demo_catalog() {
        let (_dir, store) = test_store();
        assert!(!store.all().is_empty());
        assert!(store.all().iter().all(|s| s.is_active));
    }

    #[test]
    fn test_catalog_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::open(dir.path()).unwrap();

        let store = SupplierStore::new(storage.clone()).unwrap();
        let created = store
            .create(NewSupplier {
                name: "Nueva Distribuidora".to_string(),
                ..NewSupplier::default()
            })
            .unwrap();

        // Reopening reads the persisted catalog, not a fresh seed.
        let reopened = SupplierStore::new(storage).unwrap();
        assert!(reopened.get_by_id(&created.id).is_some());
        assert_eq!(reopened.all().len(), store.all().len());
    }

    #[test]
    fn test_create_validates_input() {
        let (_dir, store) = test_store();
        let result = store.create(NewSupplier {
            name: " ".to_string(),
            ..NewSupplier::default()
        });
        assert!(matches!(result, Err(StoreError::Validation(_))));

        let result = store.create(NewSupplier {
            name: "Proveedor".to_string(),
            email: Some("sin-arroba".to_string()),
            ..NewSupplier::default()
        });
        assert!(matches!(result, Err(StoreError::Validation(_))));
    }

    #[test]
    fn test_search_by_name_and_cuit() {
        let (_dir, store) = test_store();
        assert_eq!(store.search("serenisima").len(), 1);
        assert_eq!(store.search("30-50000003").len(), 1);
        assert!(store.search("inexistente").is_empty());
    }

    #[test]
    fn test_deactivated_supplier_leaves_active_lists() {
        let (_dir, store) = test_store();
        let id = store.all()[0].id.clone();

        store.deactivate(&id).unwrap();
        assert!(store.active().iter().all(|s| s.id != id));
        assert!(store.get_by_id(&id).is_some());

        // Unknown ids are a quiet no-op.
        store.deactivate("no-such-id").unwrap();
    }

    #[test]
    fn test_update_rewrites_fields() {
        let (_dir, store) = test_store();
        let id = store.all()[0].id.clone();

        let updated = store
            .update(
                &id,
                NewSupplier {
                    name: "Renombrada SA".to_string(),
                    phone: Some("1133334444".to_string()),
                    ..NewSupplier::default()
                },
            )
            .unwrap();
        assert_eq!(updated.name, "Renombrada SA");
        assert_eq!(store.get_by_id(&id).unwrap().name, "Renombrada SA");
    }
}
