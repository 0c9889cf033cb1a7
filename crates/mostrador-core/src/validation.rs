//! # Validation Module
//!
//! Field-level validation rules shared by the wizard forms and the stores.
//!
//! Everything here is a free function returning `ValidationResult`; callers
//! compose them per form section or per operation. The backend re-validates
//! authoritatively, these checks exist so the user gets inline feedback
//! before any network traffic happens.
//!
//! ## Usage
//! ```rust
//! use mostrador_core::validation::{validate_name, validate_document_number};
//!
//! assert!(validate_name("Queso Cremoso").is_ok());
//! assert!(validate_document_number("30123456").is_ok());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::quantity::{Quantity, UnitType};
use crate::{MAX_LINE_QUANTITY, WALK_IN_DOCUMENT};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates an entity display name.
///
/// ## Rules
/// - Must not be empty after trimming
/// - Maximum 120 characters
pub fn validate_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 120 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 120,
        });
    }

    Ok(())
}

/// Validates a customer document number.
///
/// ## Rules
/// - Digits only, between 7 and 11 of them (DNI through CUIT lengths)
/// - `"00000000"` is reserved for the walk-in sentinel and rejected
pub fn validate_document_number(document: &str) -> ValidationResult<()> {
    let document = document.trim();

    if document.is_empty() {
        return Err(ValidationError::Required {
            field: "document_number".to_string(),
        });
    }

    if !document.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "document_number".to_string(),
            reason: "must contain only digits".to_string(),
        });
    }

    if !(7..=11).contains(&document.len()) {
        return Err(ValidationError::OutOfRange {
            field: "document_number".to_string(),
            min: 7,
            max: 11,
        });
    }

    if document == WALK_IN_DOCUMENT {
        return Err(ValidationError::InvalidFormat {
            field: "document_number".to_string(),
            reason: "reserved for the walk-in customer".to_string(),
        });
    }

    Ok(())
}

/// Validates a product barcode (EAN-8 through EAN/GTIN-14).
pub fn validate_barcode(barcode: &str) -> ValidationResult<()> {
    let barcode = barcode.trim();

    if barcode.is_empty() {
        return Err(ValidationError::Required {
            field: "barcode".to_string(),
        });
    }

    if !barcode.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "barcode".to_string(),
            reason: "must contain only digits".to_string(),
        });
    }

    if !(8..=14).contains(&barcode.len()) {
        return Err(ValidationError::OutOfRange {
            field: "barcode".to_string(),
            min: 8,
            max: 14,
        });
    }

    Ok(())
}

/// Validates an email address. Deliberately loose: one `@` with something
/// on both sides. The backend does the strict check.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();

    let valid = match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.'),
        None => false,
    };

    if !valid {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must look like name@domain".to_string(),
        });
    }

    Ok(())
}

/// Validates a phone number: 6 to 15 digits once separators are stripped.
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    let digits = phone.chars().filter(|c| c.is_ascii_digit()).count();

    if !(6..=15).contains(&digits) {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must contain 6 to 15 digits".to_string(),
        });
    }

    Ok(())
}

/// Validates a search term.
///
/// ## Rules
/// - Can be empty (returns all/default results)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed term.
pub fn validate_search_term(term: &str) -> ValidationResult<String> {
    let term = term.trim();

    if term.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "search".to_string(),
            max: 100,
        });
    }

    Ok(term.to_string())
}

/// Validates a hex display color ("#ff8800").
pub fn validate_color(color: &str) -> ValidationResult<()> {
    let color = color.trim();

    let valid = color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit());

    if !valid {
        return Err(ValidationError::InvalidFormat {
            field: "color".to_string(),
            reason: "must be a hex color like #ff8800".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Money Validators
// =============================================================================

/// Validates a product price. Zero is allowed (giveaway items).
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::MustBePositive {
            field: "price".to_string(),
        });
    }

    Ok(())
}

/// Validates a transaction amount. Must be strictly positive.
pub fn validate_amount(amount: Money) -> ValidationResult<()> {
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "amount".to_string(),
        });
    }

    Ok(())
}

/// Validates a customer credit limit. Zero means no credit.
pub fn validate_credit_limit(limit: Money) -> ValidationResult<()> {
    if limit.is_negative() {
        return Err(ValidationError::MustBePositive {
            field: "credit_limit".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Quantity Validators
// =============================================================================

/// Validates a draft line quantity.
///
/// ## Rules
/// - Positive, and whole units when the product is sold by `unidades`
/// - Capped at [`MAX_LINE_QUANTITY`](crate::MAX_LINE_QUANTITY)
///
/// The stock ceiling is a separate check owned by the draft, since it needs
/// the captured product snapshot.
pub fn validate_line_quantity(unit_type: UnitType, qty: Quantity) -> ValidationResult<()> {
    unit_type.validate_quantity(qty)?;

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY.units(),
        });
    }

    Ok(())
}

/// Validates a stock figure entered in the product form.
///
/// Unlike a draft quantity, stock may be zero; granularity rules still apply.
pub fn validate_stock(unit_type: UnitType, stock: Quantity) -> ValidationResult<()> {
    if stock.is_zero() {
        return Ok(());
    }
    unit_type.validate_quantity(stock)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Queso Cremoso").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name("   ").is_err());
        assert!(validate_name(&"A".repeat(200)).is_err());
    }

    #[test]
    fn test_validate_document_number() {
        assert!(validate_document_number("30123456").is_ok()); // DNI
        assert!(validate_document_number("20301234565").is_ok()); // CUIT

        assert!(validate_document_number("").is_err());
        assert!(validate_document_number("12345").is_err()); // too short
        assert!(validate_document_number("123456789012").is_err()); // too long
        assert!(validate_document_number("3012A456").is_err());
        assert!(validate_document_number("00000000").is_err()); // reserved
    }

    #[test]
    fn test_validate_barcode() {
        assert!(validate_barcode("7790001234567").is_ok()); // EAN-13
        assert!(validate_barcode("12345678").is_ok()); // EAN-8
        assert!(validate_barcode("1234567").is_err());
        assert!(validate_barcode("77900012345678AB").is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("maria@example.com").is_ok());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("maria@nodot").is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("11-4567-8901").is_ok());
        assert!(validate_phone("+54 9 11 4567 8901").is_ok());
        assert!(validate_phone("123").is_err());
    }

    #[test]
    fn test_validate_search_term_trims() {
        assert_eq!(validate_search_term("  queso  ").unwrap(), "queso");
        assert!(validate_search_term(&"q".repeat(150)).is_err());
    }

    #[test]
    fn test_validate_color() {
        assert!(validate_color("#ff8800").is_ok());
        assert!(validate_color("ff8800").is_err());
        assert!(validate_color("#ff88").is_err());
        assert!(validate_color("#zzzzzz").is_err());
    }

    #[test]
    fn test_money_validators() {
        assert!(validate_price(Money::zero()).is_ok());
        assert!(validate_price(Money::from_cents(-1)).is_err());

        assert!(validate_amount(Money::from_pesos(10)).is_ok());
        assert!(validate_amount(Money::zero()).is_err());

        assert!(validate_credit_limit(Money::zero()).is_ok());
        assert!(validate_credit_limit(Money::from_cents(-1)).is_err());
    }

    #[test]
    fn test_validate_line_quantity() {
        assert!(validate_line_quantity(UnitType::Unidades, Quantity::from_units(5)).is_ok());
        assert!(validate_line_quantity(UnitType::Unidades, Quantity::from_hundredths(150)).is_err());
        assert!(validate_line_quantity(UnitType::Kg, Quantity::from_hundredths(150)).is_ok());
        assert!(validate_line_quantity(UnitType::Kg, Quantity::zero()).is_err());
        assert!(validate_line_quantity(UnitType::Unidades, Quantity::from_units(100_000)).is_err());
    }

    #[test]
    fn test_validate_stock_allows_zero() {
        assert!(validate_stock(UnitType::Kg, Quantity::zero()).is_ok());
        assert!(validate_stock(UnitType::Unidades, Quantity::from_hundredths(150)).is_err());
        assert!(validate_stock(UnitType::Kg, Quantity::from_hundredths(1250)).is_ok());
    }
}
