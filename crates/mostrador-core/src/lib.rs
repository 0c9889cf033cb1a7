//! # mostrador-core: Pure Business Logic for Mostrador
//!
//! This crate is the heart of the Mostrador client engine. It contains all
//! business logic as pure functions with zero I/O dependencies.
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Customer, Supplier, Category, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`quantity`] - Quantity type and unit-type granularity rules
//! - [`draft`] - The checkout draft (cart) and its line items
//! - [`wizard`] - Multi-section form state machine
//! - [`forms`] - Concrete wizard forms (product, customer, category, transaction)
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic, same input = same output
//! 2. **No I/O**: Network and file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use mostrador_core::money::Money;
//! use mostrador_core::quantity::Quantity;
//!
//! // A product sold by weight at $1200.00 per kg
//! let unit_price = Money::from_cents(120_000);
//!
//! // The customer asks for $300 worth
//! let quantity = Quantity::from_amount(Money::from_cents(30_000), unit_price);
//! assert_eq!(quantity.hundredths(), 25); // 0.25 kg
//!
//! // The line total recomputed from the derived quantity matches the entry
//! assert_eq!(quantity.amount_at(unit_price).cents(), 30_000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod draft;
pub mod error;
pub mod forms;
pub mod money;
pub mod quantity;
pub mod types;
pub mod validation;
pub mod wizard;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use mostrador_core::Money` instead of
// `use mostrador_core::money::Money`

pub use draft::{Draft, DraftLine};
pub use error::{DraftError, ValidationError, WizardError};
pub use forms::{NewCategory, NewCustomer, NewProduct, NewTransaction};
pub use money::Money;
pub use quantity::{Quantity, UnitType};
pub use types::*;
pub use wizard::{Wizard, WizardMode};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum line items allowed in a single draft.
///
/// Prevents runaway carts and keeps order payloads a sane size.
pub const MAX_DRAFT_LINES: usize = 100;

/// Maximum quantity of a single line item (9999 units or kg).
///
/// Catches typo-sized entries (e.g. 10000 instead of 100) before they reach
/// the stock ceiling check.
pub const MAX_LINE_QUANTITY: Quantity = Quantity::from_units(9999);

/// Document number of the sentinel walk-in customer.
///
/// The backend seeds exactly one customer with this document. It represents
/// anonymous counter sales, cannot be edited or deleted from the client, and
/// is never eligible for cuenta corriente payments.
pub const WALK_IN_DOCUMENT: &str = "00000000";

/// Display name of the sentinel walk-in customer.
pub const WALK_IN_NAME: &str = "Consumidor Final";
