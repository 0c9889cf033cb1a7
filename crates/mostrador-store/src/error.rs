// =============================================================================
// Store Error Types
// =============================================================================
//
// Failures surfaced by the state layer. Draft mutation rejections stay in
// `DraftError` (mostrador-core) because they are recoverable outcomes, not
// failures; everything that aborts a store operation lands here.
//
// =============================================================================

use mostrador_core::{DraftError, Money, ValidationError};
use mostrador_api::ApiError;
use thiserror::Error;

/// Errors produced by store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Submit was called on a draft with no lines.
    #[error("The draft is empty")]
    EmptyDraft,

    /// Submit requires a customer and none was selected.
    #[error("No customer selected")]
    MissingCustomer,

    /// Delivery submit requires a driver and none was assigned.
    #[error("No driver assigned")]
    MissingDriver,

    /// Purchase submit requires a supplier and none was selected.
    #[error("No supplier selected")]
    MissingSupplier,

    /// The operation is not available for the walk-in customer.
    #[error("Not available for the walk-in customer")]
    WalkInNotAllowed,

    /// Charging the draft to the account would push the customer past
    /// their credit limit.
    #[error("Credit limit exceeded: balance {balance} plus {total} is over the {limit} limit")]
    CreditLimitExceeded {
        balance: Money,
        limit: Money,
        total: Money,
    },

    /// A draft line mutation was rejected.
    #[error(transparent)]
    Draft(#[from] DraftError),

    /// Input failed a field validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The gateway call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Reading or writing persisted local state failed.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl StoreError {
    /// Create a storage error from anything displayable.
    pub fn storage(err: impl std::fmt::Display) -> Self {
        StoreError::Storage(err.to_string())
    }
}

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credit_limit_message_names_all_three_amounts() {
        let err = StoreError::CreditLimitExceeded {
            balance: Money::from_cents(40_000_00),
            limit: Money::from_cents(50_000_00),
            total: Money::from_cents(15_000_00),
        };
        let text = err.to_string();
        assert!(text.contains("$40000.00"));
        assert!(text.contains("$15000.00"));
        assert!(text.contains("$50000.00"));
    }

    #[test]
    fn test_api_errors_convert_transparently() {
        let err: StoreError = ApiError::not_found("Product", "p-9").into();
        assert_eq!(err.to_string(), "Product not found: p-9");
    }
}
