// =============================================================================
// Order Draft Stores
// =============================================================================
//
// One store per checkout flow. Each wraps a core `Draft` with the flow's
// counterparty and payment details, guards its submit preconditions, and
// posts the assembled order through the gateway.
//
//   sale.rs      - counter sales: customer + payment method, credit check
//                  for cuenta corriente
//   delivery.rs  - delivery orders: customer + assigned driver
//   purchase.rs  - purchase orders: supplier counterparty, lines priced
//                  at cost instead of retail
//
// The stores share a discipline rather than a base type: mutations are
// synchronous and delegate to the core draft, submit snapshots state under
// the lock, posts without holding it, and only clears on success.
//
// =============================================================================

pub mod delivery;
pub mod purchase;
pub mod sale;

pub use delivery::DeliveryDraftStore;
pub use purchase::PurchaseDraftStore;
pub use sale::SaleDraftStore;

use mostrador_core::DraftError;
use tracing::warn;

use crate::error::StoreError;

/// Log a rejected line mutation and convert it for the caller.
pub(crate) fn rejected(product: &str, err: DraftError) -> StoreError {
    warn!(product = %product, error = %err, "Draft mutation rejected");
    StoreError::from(err)
}
