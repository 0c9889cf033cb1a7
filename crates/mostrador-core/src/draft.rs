//! # Checkout Draft
//!
//! The in-progress, not-yet-submitted order: line items with quantities and
//! derived totals. One draft instance backs each checkout flow (sales,
//! deliveries, purchases); the flow-specific state (counterparty, payment
//! method) lives in the store layer, the line math lives here.
//!
//! ## Line identity
//! Lines are keyed by `(product_id, price_level)`. The same product can
//! appear on two lines at different tiers (half at retail, half at the
//! wholesale tier), but never twice at the same tier.
//!
//! ## Snapshot rule
//! A line copies the product fields it needs (name, tier prices, unit type,
//! stock ceiling) when it is created. Catalog changes after that moment do
//! not reach into an open draft.
//!
//! ## Invariants
//! - `total` always equals the sum of the line totals
//! - every line's quantity is positive, within its unit-type granularity,
//!   and at most the captured stock ceiling
//! - a rejected mutation leaves the draft untouched

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::DraftError;
use crate::money::Money;
use crate::quantity::{Quantity, UnitType};
use crate::types::{PriceLevel, PriceSet, Product};
use crate::validation::validate_line_quantity;
use crate::MAX_DRAFT_LINES;

// =============================================================================
// Draft Line
// =============================================================================

/// One product entry within a draft.
///
/// ## Design Notes
/// - `prices` and `stock` are frozen copies taken at add-time
/// - `unit_price` is always `prices.price_for(price_level)`
/// - `total` is always recomputed from quantity and unit price, never set
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DraftLine {
    /// Product this line refers to.
    pub product_id: String,

    /// Product name at add-time (frozen).
    pub name: String,

    /// Unit type at add-time (frozen).
    pub unit_type: UnitType,

    /// Tier prices at add-time (frozen).
    pub prices: PriceSet,

    /// Stock ceiling at add-time (frozen).
    pub stock: Quantity,

    /// Selected price tier.
    pub price_level: PriceLevel,

    /// Quantity on the line.
    pub quantity: Quantity,

    /// Unit price resolved from `prices` at `price_level`.
    pub unit_price: Money,

    /// Line total (quantity at unit price).
    pub total: Money,

    /// When this line was created.
    #[ts(as = "String")]
    pub added_at: DateTime<Utc>,
}

impl DraftLine {
    /// Creates a line from a product snapshot.
    fn from_product(product: &Product, quantity: Quantity, level: PriceLevel) -> Self {
        let prices = product.prices();
        let unit_price = prices.price_for(level);
        DraftLine {
            product_id: product.id.clone(),
            name: product.name.clone(),
            unit_type: product.unit_type,
            prices,
            stock: product.stock,
            price_level: level,
            quantity,
            unit_price,
            total: quantity.amount_at(unit_price),
            added_at: Utc::now(),
        }
    }

    /// Replaces the quantity and recomputes the total.
    fn set_quantity(&mut self, quantity: Quantity) {
        self.quantity = quantity;
        self.total = quantity.amount_at(self.unit_price);
    }

    /// Switches the price tier, repricing from the frozen snapshot.
    fn set_price_level(&mut self, level: PriceLevel) {
        self.price_level = level;
        self.unit_price = self.prices.price_for(level);
        self.total = self.quantity.amount_at(self.unit_price);
    }

    /// Checks whether this line is keyed by the given product and level.
    #[inline]
    pub fn matches(&self, product_id: &str, level: PriceLevel) -> bool {
        self.product_id == product_id && self.price_level == level
    }
}

// =============================================================================
// Draft
// =============================================================================

/// The draft aggregate: lines plus a cached total.
///
/// Fields are private so the total can never drift from the lines; every
/// mutation goes through an operation that recomputes it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Draft {
    lines: Vec<DraftLine>,
    total: Money,
}

impl Draft {
    /// Creates an empty draft.
    pub fn new() -> Self {
        Draft {
            lines: Vec::new(),
            total: Money::zero(),
        }
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Inserts a line, or replaces the existing `(product, level)` line.
    ///
    /// ## Behavior
    /// This is the quantity-modal path: the modal shows the current line and
    /// the user confirms a new quantity, so the last write wins. The whole
    /// snapshot is refreshed from the product passed in.
    ///
    /// ## Returns
    /// - `Ok(())` on success
    /// - `Err(DraftError)` when the quantity fails validation or the draft
    ///   is full; the draft is left unchanged
    pub fn set_line(
        &mut self,
        product: &Product,
        quantity: Quantity,
        level: PriceLevel,
    ) -> Result<(), DraftError> {
        check_quantity(product, quantity)?;

        match self.find_index(&product.id, level) {
            Some(i) => {
                self.lines[i] = DraftLine::from_product(product, quantity, level);
            }
            None => {
                self.check_capacity()?;
                self.lines.push(DraftLine::from_product(product, quantity, level));
            }
        }

        self.recompute_total();
        Ok(())
    }

    /// Inserts a line, or accumulates quantity onto the existing
    /// `(product, level)` line.
    ///
    /// ## Behavior
    /// This is the catalog "add" path: tapping a product repeatedly piles
    /// quantity onto the same line. The combined quantity is validated
    /// against the product's current stock, and the line's stock ceiling is
    /// refreshed to match.
    pub fn add_line(
        &mut self,
        product: &Product,
        quantity: Quantity,
        level: PriceLevel,
    ) -> Result<(), DraftError> {
        match self.find_index(&product.id, level) {
            Some(i) => {
                let combined = self.lines[i].quantity + quantity;
                check_quantity(product, combined)?;
                self.lines[i].stock = product.stock;
                self.lines[i].set_quantity(combined);
            }
            None => {
                check_quantity(product, quantity)?;
                self.check_capacity()?;
                self.lines.push(DraftLine::from_product(product, quantity, level));
            }
        }

        self.recompute_total();
        Ok(())
    }

    /// Updates the quantity of an existing line.
    ///
    /// ## Behavior
    /// - Zero or negative quantity removes the line
    /// - Otherwise re-validates granularity and the captured stock ceiling;
    ///   on failure the line keeps its previous quantity
    pub fn update_quantity(
        &mut self,
        product_id: &str,
        level: PriceLevel,
        quantity: Quantity,
    ) -> Result<(), DraftError> {
        if !quantity.is_positive() {
            self.remove_line(product_id, level);
            return Ok(());
        }

        let i = self
            .find_index(product_id, level)
            .ok_or_else(|| DraftError::UnknownLine {
                product_id: product_id.to_string(),
                level: level.get(),
            })?;

        let line = &self.lines[i];
        if let Err(e) = validate_line_quantity(line.unit_type, quantity) {
            return Err(DraftError::InvalidQuantity {
                name: line.name.clone(),
                reason: e.to_string(),
            });
        }
        if quantity > line.stock {
            return Err(DraftError::ExceedsStock {
                name: line.name.clone(),
                available: line.stock,
                requested: quantity,
            });
        }

        self.lines[i].set_quantity(quantity);
        self.recompute_total();
        Ok(())
    }

    /// Moves a line to a different price tier, keeping its quantity.
    ///
    /// The line total is recomputed with the newly selected tier's price
    /// from the frozen snapshot. Rejected when a line already occupies the
    /// target `(product, level)` key.
    pub fn change_price_level(
        &mut self,
        product_id: &str,
        from: PriceLevel,
        to: PriceLevel,
    ) -> Result<(), DraftError> {
        if from == to {
            return Ok(());
        }

        let i = self
            .find_index(product_id, from)
            .ok_or_else(|| DraftError::UnknownLine {
                product_id: product_id.to_string(),
                level: from.get(),
            })?;

        if self.find_index(product_id, to).is_some() {
            return Err(DraftError::DuplicateLine {
                name: self.lines[i].name.clone(),
                level: to.get(),
            });
        }

        self.lines[i].set_price_level(to);
        self.recompute_total();
        Ok(())
    }

    /// Removes a line. Removing a line that is not present is a no-op.
    pub fn remove_line(&mut self, product_id: &str, level: PriceLevel) {
        let before = self.lines.len();
        self.lines.retain(|l| !l.matches(product_id, level));
        if self.lines.len() != before {
            self.recompute_total();
        }
    }

    /// Empties the draft.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.total = Money::zero();
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The current lines, in insertion order.
    pub fn lines(&self) -> &[DraftLine] {
        &self.lines
    }

    /// The cached aggregate total.
    pub fn total(&self) -> Money {
        self.total
    }

    /// Looks up a single line.
    pub fn line(&self, product_id: &str, level: PriceLevel) -> Option<&DraftLine> {
        self.lines.iter().find(|l| l.matches(product_id, level))
    }

    /// Number of lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Checks if the draft has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total quantity of one product across all its price levels.
    pub fn total_quantity_of(&self, product_id: &str) -> Quantity {
        self.lines
            .iter()
            .filter(|l| l.product_id == product_id)
            .fold(Quantity::zero(), |acc, l| acc + l.quantity)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn find_index(&self, product_id: &str, level: PriceLevel) -> Option<usize> {
        self.lines.iter().position(|l| l.matches(product_id, level))
    }

    fn check_capacity(&self) -> Result<(), DraftError> {
        if self.lines.len() >= MAX_DRAFT_LINES {
            return Err(DraftError::DraftFull {
                max: MAX_DRAFT_LINES,
            });
        }
        Ok(())
    }

    fn recompute_total(&mut self) {
        self.total = self.lines.iter().map(|l| l.total).sum();
    }
}

/// Validates a prospective quantity against a product's rules and stock.
fn check_quantity(product: &Product, quantity: Quantity) -> Result<(), DraftError> {
    if let Err(e) = validate_line_quantity(product.unit_type, quantity) {
        return Err(DraftError::InvalidQuantity {
            name: product.name.clone(),
            reason: e.to_string(),
        });
    }
    if quantity > product.stock {
        return Err(DraftError::ExceedsStock {
            name: product.name.clone(),
            available: product.stock,
            requested: quantity,
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_product(id: &str, price_pesos: i64, stock_units: i64) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {}", id),
            barcode: None,
            description: None,
            unit_type: UnitType::Unidades,
            price: Money::from_pesos(price_pesos),
            price_level_2: None,
            price_level_3: None,
            cost: None,
            stock: Quantity::from_units(stock_units),
            min_stock: Quantity::zero(),
            category_id: None,
            image_url: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn kg_product(id: &str, price_pesos: i64, stock_hundredths: i64) -> Product {
        let mut product = unit_product(id, price_pesos, 0);
        product.unit_type = UnitType::Kg;
        product.stock = Quantity::from_hundredths(stock_hundredths);
        product
    }

    fn level(n: u8) -> PriceLevel {
        PriceLevel::try_new(n).unwrap()
    }

    #[test]
    fn test_set_line_computes_total() {
        let mut draft = Draft::new();
        let product = unit_product("p1", 100, 5);

        draft
            .set_line(&product, Quantity::from_units(3), PriceLevel::BASE)
            .unwrap();

        assert_eq!(draft.line_count(), 1);
        assert_eq!(draft.total(), Money::from_pesos(300));
    }

    #[test]
    fn test_add_line_accumulates_and_respects_stock() {
        // price 100, stock 5: add 3, then 2 more, then 1 too many
        let mut draft = Draft::new();
        let product = unit_product("p1", 100, 5);

        draft
            .add_line(&product, Quantity::from_units(3), PriceLevel::BASE)
            .unwrap();
        assert_eq!(draft.total(), Money::from_pesos(300));

        draft
            .add_line(&product, Quantity::from_units(2), PriceLevel::BASE)
            .unwrap();
        assert_eq!(draft.line_count(), 1);
        assert_eq!(draft.total(), Money::from_pesos(500));

        let err = draft
            .add_line(&product, Quantity::from_units(1), PriceLevel::BASE)
            .unwrap_err();
        assert!(matches!(err, DraftError::ExceedsStock { .. }));

        // rejected mutation left the draft as it was
        let line = draft.line("p1", PriceLevel::BASE).unwrap();
        assert_eq!(line.quantity, Quantity::from_units(5));
        assert_eq!(draft.total(), Money::from_pesos(500));
    }

    #[test]
    fn test_set_line_replaces_instead_of_accumulating() {
        let mut draft = Draft::new();
        let product = unit_product("p1", 100, 10);

        draft
            .set_line(&product, Quantity::from_units(3), PriceLevel::BASE)
            .unwrap();
        draft
            .set_line(&product, Quantity::from_units(7), PriceLevel::BASE)
            .unwrap();

        assert_eq!(draft.line_count(), 1);
        assert_eq!(draft.total(), Money::from_pesos(700));
    }

    #[test]
    fn test_unidades_rejects_fractional_quantity() {
        let mut draft = Draft::new();
        let product = unit_product("p1", 100, 5);

        let err = draft
            .set_line(&product, Quantity::from_hundredths(150), PriceLevel::BASE)
            .unwrap_err();

        assert!(matches!(err, DraftError::InvalidQuantity { .. }));
        assert!(draft.is_empty());
    }

    #[test]
    fn test_amount_entry_rejected_edit_reverts() {
        // kg product at $1000/kg with 2 kg on hand. Enter by amount: $1500
        // derives 1.50 kg. A later edit to 2.5 kg exceeds stock and must
        // leave the 1.50 kg line untouched.
        let mut draft = Draft::new();
        let product = kg_product("p1", 1000, 200);

        let qty = Quantity::from_amount(Money::from_pesos(1500), product.price);
        assert_eq!(qty, Quantity::from_hundredths(150));
        draft.set_line(&product, qty, PriceLevel::BASE).unwrap();
        assert_eq!(draft.total(), Money::from_pesos(1500));

        let err = draft
            .update_quantity("p1", PriceLevel::BASE, Quantity::from_hundredths(250))
            .unwrap_err();
        assert!(matches!(err, DraftError::ExceedsStock { .. }));

        let line = draft.line("p1", PriceLevel::BASE).unwrap();
        assert_eq!(line.quantity, Quantity::from_hundredths(150));
        assert_eq!(draft.total(), Money::from_pesos(1500));
    }

    #[test]
    fn test_update_quantity_to_zero_removes_line() {
        let mut draft = Draft::new();
        let product = unit_product("p1", 100, 5);

        draft
            .set_line(&product, Quantity::from_units(2), PriceLevel::BASE)
            .unwrap();
        draft
            .update_quantity("p1", PriceLevel::BASE, Quantity::zero())
            .unwrap();

        assert!(draft.is_empty());
        assert_eq!(draft.total(), Money::zero());
    }

    #[test]
    fn test_update_quantity_on_unknown_line() {
        let mut draft = Draft::new();
        let err = draft
            .update_quantity("ghost", PriceLevel::BASE, Quantity::from_units(1))
            .unwrap_err();
        assert!(matches!(err, DraftError::UnknownLine { .. }));
    }

    #[test]
    fn test_remove_absent_line_is_noop() {
        let mut draft = Draft::new();
        let product = unit_product("p1", 100, 5);
        draft
            .set_line(&product, Quantity::from_units(2), PriceLevel::BASE)
            .unwrap();

        draft.remove_line("ghost", PriceLevel::BASE);

        assert_eq!(draft.line_count(), 1);
        assert_eq!(draft.total(), Money::from_pesos(200));
    }

    #[test]
    fn test_change_price_level_reprices_keeping_quantity() {
        let mut draft = Draft::new();
        let mut product = unit_product("p1", 100, 10);
        product.price_level_2 = Some(Money::from_pesos(90));

        draft
            .set_line(&product, Quantity::from_units(3), PriceLevel::BASE)
            .unwrap();
        assert_eq!(draft.total(), Money::from_pesos(300));

        draft
            .change_price_level("p1", PriceLevel::BASE, level(2))
            .unwrap();

        let line = draft.line("p1", level(2)).unwrap();
        assert_eq!(line.quantity, Quantity::from_units(3));
        assert_eq!(line.unit_price, Money::from_pesos(90));
        assert_eq!(draft.total(), Money::from_pesos(270));
    }

    #[test]
    fn test_change_price_level_falls_back_to_base_price() {
        let mut draft = Draft::new();
        let product = unit_product("p1", 100, 10); // no tier prices set

        draft
            .set_line(&product, Quantity::from_units(2), PriceLevel::BASE)
            .unwrap();
        draft
            .change_price_level("p1", PriceLevel::BASE, level(3))
            .unwrap();

        // Tier 3 is unset on the product, so the base price still applies
        assert_eq!(draft.total(), Money::from_pesos(200));
    }

    #[test]
    fn test_change_price_level_rejects_occupied_target() {
        let mut draft = Draft::new();
        let mut product = unit_product("p1", 100, 10);
        product.price_level_2 = Some(Money::from_pesos(90));

        draft
            .set_line(&product, Quantity::from_units(2), PriceLevel::BASE)
            .unwrap();
        draft
            .set_line(&product, Quantity::from_units(3), level(2))
            .unwrap();

        let err = draft
            .change_price_level("p1", PriceLevel::BASE, level(2))
            .unwrap_err();
        assert!(matches!(err, DraftError::DuplicateLine { .. }));

        // both lines still present with their own tiers
        assert_eq!(draft.line_count(), 2);
        assert_eq!(draft.total(), Money::from_pesos(470));
    }

    #[test]
    fn test_same_product_on_two_levels_counts_together() {
        let mut draft = Draft::new();
        let mut product = kg_product("p1", 1000, 500);
        product.price_level_2 = Some(Money::from_pesos(900));

        draft
            .set_line(&product, Quantity::from_hundredths(150), PriceLevel::BASE)
            .unwrap();
        draft
            .set_line(&product, Quantity::from_hundredths(100), level(2))
            .unwrap();

        assert_eq!(draft.total_quantity_of("p1"), Quantity::from_hundredths(250));
        // 1.5 kg at 1000 + 1.0 kg at 900
        assert_eq!(draft.total(), Money::from_pesos(2400));
    }

    #[test]
    fn test_clear_empties_everything() {
        let mut draft = Draft::new();
        draft
            .set_line(&unit_product("p1", 500, 5), Quantity::from_units(1), PriceLevel::BASE)
            .unwrap();
        draft
            .set_line(&unit_product("p2", 200, 5), Quantity::from_units(1), PriceLevel::BASE)
            .unwrap();
        assert_eq!(draft.total(), Money::from_pesos(700));

        draft.clear();

        assert!(draft.is_empty());
        assert_eq!(draft.total(), Money::zero());
    }

    #[test]
    fn test_total_tracks_sum_across_mixed_operations() {
        let mut draft = Draft::new();
        let a = unit_product("a", 250, 50);
        let b = kg_product("b", 1000, 1000);

        draft.add_line(&a, Quantity::from_units(2), PriceLevel::BASE).unwrap();
        draft.set_line(&b, Quantity::from_hundredths(75), PriceLevel::BASE).unwrap();
        draft.add_line(&a, Quantity::from_units(1), PriceLevel::BASE).unwrap();
        draft
            .update_quantity("b", PriceLevel::BASE, Quantity::from_hundredths(125))
            .unwrap();
        draft.remove_line("a", PriceLevel::BASE);

        let expected: Money = draft.lines().iter().map(|l| l.total).sum();
        assert_eq!(draft.total(), expected);
        assert_eq!(draft.total(), Money::from_pesos(1250));
    }

    #[test]
    fn test_draft_capacity() {
        let mut draft = Draft::new();
        for i in 0..MAX_DRAFT_LINES {
            let product = unit_product(&format!("p{}", i), 10, 5);
            draft
                .set_line(&product, Quantity::from_units(1), PriceLevel::BASE)
                .unwrap();
        }

        let overflow = unit_product("overflow", 10, 5);
        let err = draft
            .set_line(&overflow, Quantity::from_units(1), PriceLevel::BASE)
            .unwrap_err();
        assert!(matches!(err, DraftError::DraftFull { .. }));
        assert_eq!(draft.line_count(), MAX_DRAFT_LINES);
    }
}
