// =============================================================================
// Store Events
// =============================================================================
//
// Broadcast notifications for state changes that other subsystems care
// about but do not own. The cash register wants to know about cash money
// movements, stock displays want to know when an order posted, and none
// of them should have to poll the stores to find out.
//
// Senders never block: if nobody is subscribed the event is dropped.
//
// =============================================================================

use mostrador_core::{Money, PaymentMethod, TransactionType};
use tokio::sync::broadcast;
use tracing::debug;

/// Buffered events per subscriber before the oldest is overwritten.
const EVENT_CAPACITY: usize = 32;

/// Something happened that other subsystems may want to react to.
#[derive(Debug, Clone)]
pub enum StoreEvent {
    /// An account transaction posted and the customer's balance moved.
    TransactionPosted {
        customer_id: String,
        kind: TransactionType,
        amount: Money,
        new_balance: Money,
        /// Whether the backend registered physical cash for it.
        affects_physical_cash: bool,
    },

    /// A sale posted successfully.
    SalePosted {
        sale_id: String,
        total: Money,
        payment_method: PaymentMethod,
    },

    /// A delivery order posted successfully.
    DeliveryPosted {
        delivery_id: String,
        total: Money,
    },

    /// A purchase order posted successfully.
    PurchasePosted {
        purchase_id: String,
        total: Money,
    },
}

/// Cloneable handle to the store event channel.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<StoreEvent>,
}

impl EventBus {
    /// Create a new event bus.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(EVENT_CAPACITY);
        EventBus { tx }
    }

    /// Subscribe to events emitted from this point on.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all current subscribers.
    pub(crate) fn emit(&self, event: StoreEvent) {
        debug!(?event, "Store event");
        // Send only fails when there are no subscribers, which is fine.
        let _ = self.tx.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        EventBus::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
