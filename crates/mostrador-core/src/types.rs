//! # Domain Types
//!
//! Read-only entity snapshots used throughout Mostrador.
//!
//! The backend owns these records; the client fetches them, caches them in
//! resource stores and copies the relevant fields into draft lines at
//! add-time. Nothing here mutates an entity in place: create/update/delete
//! go through the gateway and come back as fresh snapshots.
//!
//! ## Identity
//! Every entity carries the backend's string `id`. Draft lines and caches
//! key on those ids (plus the price level, for draft lines).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::quantity::{Quantity, UnitType};
use crate::WALK_IN_DOCUMENT;

// =============================================================================
// Price Level
// =============================================================================

/// One of up to three tiered unit prices per product.
///
/// Level 1 is the base retail price; levels 2 and 3 are optional discounted
/// tiers (wholesale, preferred customers). Stored as a plain number on the
/// wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PriceLevel(u8);

impl PriceLevel {
    /// The base retail price level.
    pub const BASE: PriceLevel = PriceLevel(1);

    /// Creates a price level, rejecting anything outside 1-3.
    pub fn try_new(level: u8) -> Result<Self, ValidationError> {
        if (1..=3).contains(&level) {
            Ok(PriceLevel(level))
        } else {
            Err(ValidationError::OutOfRange {
                field: "price_level".to_string(),
                min: 1,
                max: 3,
            })
        }
    }

    /// Returns the level as a plain number (1-3).
    #[inline]
    pub const fn get(&self) -> u8 {
        self.0
    }
}

impl Default for PriceLevel {
    fn default() -> Self {
        PriceLevel::BASE
    }
}

impl std::fmt::Display for PriceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Price Set
// =============================================================================

/// The up-to-three tier prices of a product.
///
/// Draft lines capture a whole `PriceSet` at add-time so that switching the
/// line's price level later reprices from the frozen snapshot, not from
/// whatever the catalog says by then.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PriceSet {
    /// Base price (level 1).
    pub base: Money,
    /// Optional tier 2 price.
    pub level_2: Option<Money>,
    /// Optional tier 3 price.
    pub level_3: Option<Money>,
}

impl PriceSet {
    /// Resolves the unit price for a level, falling back to the base price
    /// when the requested tier is not set on this product.
    pub fn price_for(&self, level: PriceLevel) -> Money {
        match level.get() {
            2 => self.level_2.unwrap_or(self.base),
            3 => self.level_3.unwrap_or(self.base),
            _ => self.base,
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A catalog product.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Backend identifier.
    pub id: String,

    /// Display name shown in the catalog and on tickets.
    pub name: String,

    /// Barcode (EAN-13, UPC-A, etc.).
    pub barcode: Option<String>,

    /// Optional long description.
    pub description: Option<String>,

    /// Whether the product is sold by weight or by count.
    pub unit_type: UnitType,

    /// Base price (level 1).
    pub price: Money,

    /// Optional tier 2 price.
    pub price_level_2: Option<Money>,

    /// Optional tier 3 price.
    pub price_level_3: Option<Money>,

    /// Purchase cost (for margin display; not used in draft math).
    pub cost: Option<Money>,

    /// Current stock level.
    pub stock: Quantity,

    /// Low-stock threshold.
    pub min_stock: Quantity,

    /// Category reference.
    pub category_id: Option<String>,

    /// Catalog image for the product grid.
    pub image_url: Option<String>,

    /// Whether the product is active (soft delete).
    pub is_active: bool,

    /// When the product was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the three tier prices as a snapshot-friendly value.
    #[inline]
    pub fn prices(&self) -> PriceSet {
        PriceSet {
            base: self.price,
            level_2: self.price_level_2,
            level_3: self.price_level_3,
        }
    }

    /// Resolves the unit price for a level (base price when the tier is unset).
    #[inline]
    pub fn price_for(&self, level: PriceLevel) -> Money {
        self.prices().price_for(level)
    }

    /// Checks if stock has fallen to or below the low-stock threshold.
    pub fn is_low_stock(&self) -> bool {
        self.stock <= self.min_stock
    }

    /// Formats the stock level with the product's unit ("1.50 kg", "12 un.").
    pub fn format_stock(&self) -> String {
        self.unit_type.format_quantity(self.stock)
    }
}

// =============================================================================
// Customer
// =============================================================================

/// A customer with an optional running account (cuenta corriente).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Customer {
    /// Backend identifier.
    pub id: String,

    /// Full name or business name.
    pub name: String,

    /// National document or tax id. `"00000000"` marks the walk-in sentinel.
    pub document_number: String,

    pub email: Option<String>,

    pub phone: Option<String>,

    pub address: Option<String>,

    /// Current running-account balance (what the customer owes).
    pub current_balance: Money,

    /// Maximum balance the account may reach.
    pub credit_limit: Money,

    /// Whether the customer is active (soft delete).
    pub is_active: bool,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    /// Checks if this is the sentinel walk-in customer ("Consumidor Final").
    ///
    /// The sentinel is excluded from edit and delete affordances and from
    /// cuenta corriente payments; anonymous sales post against it.
    #[inline]
    pub fn is_walk_in(&self) -> bool {
        self.document_number == WALK_IN_DOCUMENT
    }

    /// Checks if the customer may pay on their running account at all.
    pub fn can_use_account(&self) -> bool {
        self.is_active && !self.is_walk_in()
    }

    /// The balance this customer would carry after a charge.
    #[inline]
    pub fn projected_balance(&self, charge: Money) -> Money {
        self.current_balance + charge
    }

    /// Checks whether a charge would push the balance past the credit limit.
    ///
    /// This is an advisory client-side check; the backend enforces the limit
    /// authoritatively when the transaction posts.
    pub fn exceeds_credit_limit(&self, charge: Money) -> bool {
        self.projected_balance(charge) > self.credit_limit
    }
}

// =============================================================================
// Supplier
// =============================================================================

/// A purchase counterparty. Suppliers live only in local storage in this
/// client; there is no backend resource for them.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Supplier {
    pub id: String,

    pub name: String,

    /// Tax identification (CUIT).
    pub cuit: Option<String>,

    pub phone: Option<String>,

    pub email: Option<String>,

    pub address: Option<String>,

    pub is_active: bool,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Driver
// =============================================================================

/// A delivery driver (the secondary party on delivery orders).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Driver {
    pub id: String,

    pub name: String,

    pub phone: Option<String>,

    /// Vehicle description or plate.
    pub vehicle: Option<String>,

    pub is_active: bool,
}

// =============================================================================
// Category
// =============================================================================

/// A product category. Categories are hard-deleted on the backend.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Category {
    pub id: String,

    pub name: String,

    pub description: Option<String>,

    /// Display color for the catalog grid (hex, e.g. "#ff8800").
    pub color: Option<String>,
}

// =============================================================================
// Payment Method
// =============================================================================

/// How an order is paid. Wire names are the backend's Spanish identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, Default)]
#[ts(export)]
pub enum PaymentMethod {
    /// Cash at the counter.
    #[default]
    #[serde(rename = "efectivo")]
    Cash,

    /// Card on an external terminal.
    #[serde(rename = "tarjeta")]
    Card,

    /// Bank transfer.
    #[serde(rename = "transferencia")]
    Transfer,

    /// Charged to the customer's running account (cuenta corriente).
    #[serde(rename = "cuenta_corriente")]
    CurrentAccount,
}

impl PaymentMethod {
    /// Whether this method posts to a customer's running account, which
    /// requires an account-eligible customer within their credit limit.
    #[inline]
    pub const fn requires_customer_account(&self) -> bool {
        matches!(self, PaymentMethod::CurrentAccount)
    }

    /// The backend's wire identifier.
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "efectivo",
            PaymentMethod::Card => "tarjeta",
            PaymentMethod::Transfer => "transferencia",
            PaymentMethod::CurrentAccount => "cuenta_corriente",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Transaction Type
// =============================================================================

/// Kind of running-account movement posted to `/customers/transactions`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum TransactionType {
    /// Adds to the balance (a sale or delivery on account).
    #[serde(rename = "cargo")]
    Charge,

    /// Reduces the balance (the customer pays down their account).
    #[serde(rename = "pago")]
    Payment,

    /// Manual correction by staff.
    #[serde(rename = "ajuste")]
    Adjustment,
}

impl TransactionType {
    /// The backend's wire identifier.
    pub const fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Charge => "cargo",
            TransactionType::Payment => "pago",
            TransactionType::Adjustment => "ajuste",
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WALK_IN_NAME;

    fn test_customer(balance: i64, limit: i64) -> Customer {
        Customer {
            id: "c1".to_string(),
            name: "Maria Lopez".to_string(),
            document_number: "30123456".to_string(),
            email: None,
            phone: None,
            address: None,
            current_balance: Money::from_pesos(balance),
            credit_limit: Money::from_pesos(limit),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_price_level_bounds() {
        assert!(PriceLevel::try_new(1).is_ok());
        assert!(PriceLevel::try_new(3).is_ok());
        assert!(PriceLevel::try_new(0).is_err());
        assert!(PriceLevel::try_new(4).is_err());
        assert_eq!(PriceLevel::default().get(), 1);
    }

    #[test]
    fn test_price_set_falls_back_to_base() {
        let prices = PriceSet {
            base: Money::from_pesos(100),
            level_2: Some(Money::from_pesos(90)),
            level_3: None,
        };

        assert_eq!(prices.price_for(PriceLevel::BASE), Money::from_pesos(100));
        assert_eq!(prices.price_for(PriceLevel::try_new(2).unwrap()), Money::from_pesos(90));
        // Level 3 is unset, so the base price applies
        assert_eq!(prices.price_for(PriceLevel::try_new(3).unwrap()), Money::from_pesos(100));
    }

    #[test]
    fn test_walk_in_detection() {
        let mut customer = test_customer(0, 0);
        assert!(!customer.is_walk_in());
        assert!(customer.can_use_account());

        customer.document_number = WALK_IN_DOCUMENT.to_string();
        customer.name = WALK_IN_NAME.to_string();
        assert!(customer.is_walk_in());
        assert!(!customer.can_use_account());
    }

    #[test]
    fn test_credit_limit_check() {
        // balance 4000, limit 5000: a 1200 charge would land at 5200
        let customer = test_customer(4000, 5000);
        assert!(customer.exceeds_credit_limit(Money::from_pesos(1200)));

        // exactly reaching the limit is allowed
        assert!(!customer.exceeds_credit_limit(Money::from_pesos(1000)));
        assert_eq!(
            customer.projected_balance(Money::from_pesos(1200)),
            Money::from_pesos(5200)
        );
    }

    #[test]
    fn test_payment_method_wire_names() {
        assert_eq!(serde_json::to_string(&PaymentMethod::Cash).unwrap(), "\"efectivo\"");
        assert_eq!(
            serde_json::to_string(&PaymentMethod::CurrentAccount).unwrap(),
            "\"cuenta_corriente\""
        );
        assert!(PaymentMethod::CurrentAccount.requires_customer_account());
        assert!(!PaymentMethod::Cash.requires_customer_account());
    }

    #[test]
    fn test_transaction_type_wire_names() {
        assert_eq!(serde_json::to_string(&TransactionType::Charge).unwrap(), "\"cargo\"");
        assert_eq!(serde_json::to_string(&TransactionType::Payment).unwrap(), "\"pago\"");
        assert_eq!(TransactionType::Adjustment.as_str(), "ajuste");
    }

    #[test]
    fn test_product_deserializes_backend_shape() {
        let json = r#"{
            "id": "p1",
            "name": "Queso Cremoso",
            "barcode": "7790001234567",
            "description": null,
            "unit_type": "kg",
            "price": 1200.5,
            "price_level_2": 1100.0,
            "price_level_3": null,
            "cost": 800.0,
            "stock": 12.5,
            "min_stock": 2,
            "category_id": "cat1",
            "image_url": null,
            "is_active": true,
            "created_at": "2024-03-01T12:00:00Z",
            "updated_at": "2024-03-02T09:30:00Z"
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.price.cents(), 120_050);
        assert_eq!(product.price_level_2, Some(Money::from_pesos(1100)));
        assert_eq!(product.stock.hundredths(), 1250);
        assert_eq!(product.unit_type, UnitType::Kg);
        assert_eq!(product.format_stock(), "12.50 kg");
        assert!(!product.is_low_stock());
    }
}
