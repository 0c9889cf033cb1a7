//! # Error Types
//!
//! Domain-specific error types for mostrador-core.
//!
//! ## Error Hierarchy
//! - `ValidationError` - input validation failures (field-level)
//! - `DraftError` - rejected draft (cart) mutations
//! - `WizardError` - rejected wizard navigation or submission
//!
//! Gateway errors (`ApiError`) and store errors (`StoreError`) live in their
//! own crates; both wrap these core errors on the way up to the view layer.
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product name, section id, etc.)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

use crate::quantity::Quantity;

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (wrong characters, too many decimals, etc.).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Draft Error
// =============================================================================

/// Rejected draft (cart) mutations.
///
/// Every draft operation returns `Result<(), DraftError>`; a rejected
/// mutation leaves the draft exactly as it was, so the caller can render
/// feedback and let the user correct the entry.
#[derive(Debug, Error)]
pub enum DraftError {
    /// Requested quantity exceeds the stock captured on the line.
    #[error("Insufficient stock for {name}: available {available}, requested {requested}")]
    ExceedsStock {
        name: String,
        available: Quantity,
        requested: Quantity,
    },

    /// Quantity fails the unit-type granularity or positivity rules.
    #[error("Invalid quantity for {name}: {reason}")]
    InvalidQuantity { name: String, reason: String },

    /// Draft has reached the maximum number of lines.
    #[error("Draft cannot have more than {max} lines")]
    DraftFull { max: usize },

    /// A line for this product at the target price level already exists.
    #[error("{name} already has a line at price level {level}")]
    DuplicateLine { name: String, level: u8 },

    /// No line exists for the given product and price level.
    #[error("No line for product {product_id} at price level {level}")]
    UnknownLine { product_id: String, level: u8 },
}

// =============================================================================
// Wizard Error
// =============================================================================

/// Rejected wizard navigation or submission.
#[derive(Debug, Error)]
pub enum WizardError {
    /// The named section does not exist on this form.
    #[error("Unknown section: {0}")]
    UnknownSection(String),

    /// Direct navigation to a section that is not reachable yet
    /// (not completed, not the immediate next step) or currently disabled.
    #[error("Section {0} is not reachable yet")]
    SectionLocked(String),

    /// A section failed validation (on advance or submit).
    #[error("{section}: {source}")]
    Invalid {
        section: String,
        #[source]
        source: ValidationError,
    },
}

// =============================================================================
// Unit Tests
// =============================================================================
