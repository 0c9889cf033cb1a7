//! # Customers Client
//!
//! Customer CRUD plus the two cuenta corriente endpoints: the balance
//! lookup the checkout uses for its advisory credit check, and the
//! transaction post that actually moves a balance.
//!
//! The backend enforces the credit limit authoritatively on
//! `post_transaction`; the client-side check in mostrador-core is advisory
//! and only gates the submit button.

use serde::{Deserialize, Serialize};
use tracing::debug;

use mostrador_core::forms::{NewCustomer, NewTransaction};
use mostrador_core::money::Money;
use mostrador_core::types::{Customer, TransactionType};

use crate::client::{Gateway, Paginated};
use crate::error::ApiResult;

/// Filters for `GET /customers`.
#[derive(Debug, Clone, Default)]
pub struct CustomerQuery {
    /// Substring search across name, document, email and phone.
    pub search: Option<String>,
    pub active_only: bool,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl CustomerQuery {
    /// Query parameters in wire form. Also the cache signature input.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        if self.active_only {
            pairs.push(("active", "true".to_string()));
        }
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        pairs
    }
}

/// Partial update for `PUT /customers/:id`. Omitted fields stay unchanged.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CustomerPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credit_limit: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Response of `GET /customers/:id/balance`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct BalanceInfo {
    pub current_balance: Money,
    pub credit_limit: Money,
}

impl BalanceInfo {
    /// Headroom left before the limit; negative when already past it.
    pub fn available_credit(&self) -> Money {
        self.credit_limit - self.current_balance
    }
}

/// How the backend registered the cash side of a payment.
///
/// Cash payments land in the physical drawer; transfers and card payments
/// are registered without touching it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CashRegistration {
    pub registered: bool,
    pub affects_physical_cash: bool,
}

/// Response of `POST /customers/transactions`.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionReceipt {
    pub id: String,
    pub customer_id: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub amount: Money,
    /// The balance after this transaction posted.
    pub new_balance: Money,
    /// Present on payments only.
    #[serde(default)]
    pub cash_registration: Option<CashRegistration>,
}

/// Client for the `/customers` endpoints.
#[derive(Debug, Clone)]
pub struct CustomersClient {
    gateway: Gateway,
}

impl CustomersClient {
    pub fn new(gateway: Gateway) -> Self {
        CustomersClient { gateway }
    }

    /// `GET /customers` with filters and pagination.
    pub async fn list(&self, query: &CustomerQuery) -> ApiResult<Paginated<Customer>> {
        self.gateway
            .get_paged("/customers", &query.to_pairs())
            .await
    }

    /// `GET /customers/:id`.
    pub async fn get(&self, id: &str) -> ApiResult<Customer> {
        self.gateway
            .get(&format!("/customers/{}", id))
            .await
            .map_err(|e| e.for_missing("Customer", id))
    }

    /// `POST /customers`.
    pub async fn create(&self, customer: &NewCustomer) -> ApiResult<Customer> {
        debug!(name = %customer.name, "Creating customer");
        self.gateway.post("/customers", customer).await
    }

    /// `PUT /customers/:id` with a partial body.
    pub async fn update(&self, id: &str, patch: &CustomerPatch) -> ApiResult<Customer> {
        debug!(id = %id, "Updating customer");
        self.gateway
            .put(&format!("/customers/{}", id), patch)
            .await
            .map_err(|e| e.for_missing("Customer", id))
    }

    /// `DELETE /customers/:id` (soft delete).
    pub async fn deactivate(&self, id: &str) -> ApiResult<()> {
        debug!(id = %id, "Deactivating customer");
        self.gateway
            .delete(&format!("/customers/{}", id))
            .await
            .map_err(|e| e.for_missing("Customer", id))
    }

    /// `GET /customers/:id/balance`, the fresh figures for the credit check.
    pub async fn balance(&self, id: &str) -> ApiResult<BalanceInfo> {
        self.gateway
            .get(&format!("/customers/{}/balance", id))
            .await
            .map_err(|e| e.for_missing("Customer", id))
    }

    /// `POST /customers/transactions`: posts a charge, payment or
    /// adjustment against a running account.
    pub async fn post_transaction(
        &self,
        transaction: &NewTransaction,
    ) -> ApiResult<TransactionReceipt> {
        debug!(
            customer_id = %transaction.customer_id,
            kind = %transaction.kind,
            "Posting account transaction"
        );
        self.gateway
            .post("/customers/transactions", transaction)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balance_decodes_decimal_wire() {
        let info: BalanceInfo =
            serde_json::from_str(r#"{"current_balance": 4000.0, "credit_limit": 5000.5}"#).unwrap();
        assert_eq!(info.current_balance, Money::from_pesos(4000));
        assert_eq!(info.credit_limit, Money::from_cents(500_050));
        assert_eq!(info.available_credit(), Money::from_cents(100_050));
    }

    #[test]
    fn test_receipt_without_cash_registration() {
        let json = r#"{
            "id": "t1",
            "customer_id": "c1",
            "type": "cargo",
            "amount": 1200.0,
            "new_balance": 5200.0
        }"#;
        let receipt: TransactionReceipt = serde_json::from_str(json).unwrap();
        assert_eq!(receipt.kind, TransactionType::Charge);
        assert_eq!(receipt.new_balance, Money::from_pesos(5200));
        assert!(receipt.cash_registration.is_none());
    }

    #[test]
    fn test_receipt_with_cash_registration() {
        let json = r#"{
            "id": "t2",
            "customer_id": "c1",
            "type": "pago",
            "amount": 800.0,
            "new_balance": 4400.0,
            "cash_registration": {"registered": true, "affects_physical_cash": true}
        }"#;
        let receipt: TransactionReceipt = serde_json::from_str(json).unwrap();
        let cash = receipt.cash_registration.unwrap();
        assert!(cash.registered);
        assert!(cash.affects_physical_cash);
    }

    #[test]
    fn test_customer_query_pairs() {
        let query = CustomerQuery {
            search: Some("maria".to_string()),
            active_only: true,
            ..CustomerQuery::default()
        };
        assert_eq!(
            query.to_pairs(),
            vec![
                ("search", "maria".to_string()),
                ("active", "true".to_string()),
            ]
        );
    }
}
