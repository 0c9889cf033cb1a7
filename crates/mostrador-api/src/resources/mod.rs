//! # Resource Clients
//!
//! One client per endpoint family, each a cheap clone over the shared
//! [`Gateway`](crate::client::Gateway). Request payload and response types
//! live next to the client that uses them; [`OrderItem`] is shared because
//! sales, deliveries and purchases all post the same line shape.

pub mod categories;
pub mod customers;
pub mod deliveries;
pub mod products;
pub mod purchases;
pub mod sales;

pub use categories::{CategoriesClient, CategoryPatch};
pub use customers::{
    BalanceInfo, CashRegistration, CustomerPatch, CustomerQuery, CustomersClient,
    TransactionReceipt,
};
pub use deliveries::{DeliveriesClient, Delivery, DeliveryQuery, DeliveryStatus, NewDelivery};
pub use products::{ProductPatch, ProductQuery, ProductsClient};
pub use purchases::{NewPurchase, Purchase, PurchasesClient};
pub use sales::{NewSale, Sale, SalesClient};

use serde::Serialize;

use mostrador_core::draft::DraftLine;
use mostrador_core::money::Money;
use mostrador_core::quantity::{Quantity, UnitType};
use mostrador_core::types::PriceLevel;

/// One order line as every order endpoint expects it.
#[derive(Debug, Clone, Serialize)]
pub struct OrderItem {
    pub product_id: String,
    pub quantity: Quantity,
    pub unit_price: Money,
    pub total_price: Money,
    pub unit_type: UnitType,
    pub price_level: PriceLevel,
}

impl From<&DraftLine> for OrderItem {
    fn from(line: &DraftLine) -> Self {
        OrderItem {
            product_id: line.product_id.clone(),
            quantity: line.quantity,
            unit_price: line.unit_price,
            total_price: line.total,
            unit_type: line.unit_type,
            price_level: line.price_level,
        }
    }
}

/// Maps a whole draft's lines into order items, in line order.
pub fn order_items(lines: &[DraftLine]) -> Vec<OrderItem> {
    lines.iter().map(OrderItem::from).collect()
}
