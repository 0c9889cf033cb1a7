//! # Entity Forms
//!
//! Concrete [`WizardForm`](crate::wizard::WizardForm) implementations for the
//! create/edit dialogs, plus the payload types their `build()` methods
//! produce. Text inputs are kept as `String` so a dialog can bind them
//! directly; parsing to [`Money`]/[`Quantity`] happens on validation and on
//! build, never while the user is typing.

use serde::Serialize;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::quantity::{Quantity, UnitType};
use crate::types::{Category, Customer, PaymentMethod, Product, TransactionType};
use crate::validation::{
    validate_amount, validate_barcode, validate_color, validate_credit_limit,
    validate_document_number, validate_email, validate_name, validate_phone, validate_stock,
};
use crate::wizard::WizardForm;

// =============================================================================
// Create Payloads
// =============================================================================

/// Body for `POST /products`.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct NewProduct {
    pub name: String,
    pub barcode: Option<String>,
    pub description: Option<String>,
    pub unit_type: UnitType,
    pub price: Money,
    pub price_level_2: Option<Money>,
    pub price_level_3: Option<Money>,
    pub cost: Option<Money>,
    pub stock: Quantity,
    pub min_stock: Quantity,
    pub category_id: Option<String>,
    pub image_url: Option<String>,
    pub is_active: bool,
}

/// Body for `POST /customers`.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct NewCustomer {
    pub name: String,
    pub document_number: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub credit_limit: Money,
}

/// Body for `POST /categories`.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct NewCategory {
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
}

/// Body for `POST /customers/transactions`.
///
/// `payment_method` is only present for payments: it records how the
/// customer settled part of their balance, and drives whether the backend
/// registers physical cash.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct NewTransaction {
    pub customer_id: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub amount: Money,
    pub description: String,
    pub reference: Option<String>,
    pub payment_method: Option<PaymentMethod>,
}

// =============================================================================
// Product Form
// =============================================================================

/// Product create/edit form: basic, pricing, inventory, media.
#[derive(Debug, Clone)]
pub struct ProductForm {
    // basic
    pub name: String,
    pub barcode: String,
    pub description: String,
    // pricing
    pub unit_type: UnitType,
    pub price: String,
    pub price_level_2: String,
    pub price_level_3: String,
    pub cost: String,
    // inventory
    pub stock: String,
    pub min_stock: String,
    pub category_id: Option<String>,
    pub is_active: bool,
    // media
    pub image_url: String,
}

impl Default for ProductForm {
    fn default() -> Self {
        ProductForm {
            name: String::new(),
            barcode: String::new(),
            description: String::new(),
            unit_type: UnitType::default(),
            price: String::new(),
            price_level_2: String::new(),
            price_level_3: String::new(),
            cost: String::new(),
            stock: String::new(),
            min_stock: String::new(),
            category_id: None,
            is_active: true,
            image_url: String::new(),
        }
    }
}

impl ProductForm {
    const SECTIONS: &'static [&'static str] = &["basic", "pricing", "inventory", "media"];

    /// Prefills the form from an existing product, for edit mode.
    pub fn from_product(product: &Product) -> Self {
        ProductForm {
            name: product.name.clone(),
            barcode: product.barcode.clone().unwrap_or_default(),
            description: product.description.clone().unwrap_or_default(),
            unit_type: product.unit_type,
            price: money_text(product.price),
            price_level_2: product.price_level_2.map(money_text).unwrap_or_default(),
            price_level_3: product.price_level_3.map(money_text).unwrap_or_default(),
            cost: product.cost.map(money_text).unwrap_or_default(),
            stock: product.stock.to_string(),
            min_stock: product.min_stock.to_string(),
            category_id: product.category_id.clone(),
            is_active: product.is_active,
            image_url: product.image_url.clone().unwrap_or_default(),
        }
    }

    /// Parses and validates everything, producing the create payload.
    pub fn build(&self) -> Result<NewProduct, ValidationError> {
        validate_name(&self.name)?;
        self.check_barcode()?;
        Ok(NewProduct {
            name: self.name.trim().to_string(),
            barcode: none_if_empty(&self.barcode),
            description: none_if_empty(&self.description),
            unit_type: self.unit_type,
            price: self.parsed_price()?,
            price_level_2: self.parsed_tier("price_level_2", &self.price_level_2)?,
            price_level_3: self.parsed_tier("price_level_3", &self.price_level_3)?,
            cost: self.parsed_tier("cost", &self.cost)?,
            stock: self.parsed_stock("stock", &self.stock)?,
            min_stock: self.parsed_stock("min_stock", &self.min_stock)?,
            category_id: self.category_id.clone(),
            image_url: self.checked_image_url()?,
            is_active: self.is_active,
        })
    }

    fn check_barcode(&self) -> Result<(), ValidationError> {
        if self.barcode.trim().is_empty() {
            return Ok(());
        }
        validate_barcode(self.barcode.trim())
    }

    /// Base price: required and strictly positive.
    fn parsed_price(&self) -> Result<Money, ValidationError> {
        let price = parse_money("price", &self.price)?;
        if !price.is_positive() {
            return Err(ValidationError::MustBePositive {
                field: "price".to_string(),
            });
        }
        Ok(price)
    }

    /// Tier price or cost: optional, non-negative when present.
    fn parsed_tier(&self, field: &str, text: &str) -> Result<Option<Money>, ValidationError> {
        match parse_optional_money(field, text)? {
            Some(value) if value.is_negative() => Err(ValidationError::MustBePositive {
                field: field.to_string(),
            }),
            other => Ok(other),
        }
    }

    /// Stock figure: blank counts as zero, granularity follows the unit type.
    fn parsed_stock(&self, field: &str, text: &str) -> Result<Quantity, ValidationError> {
        let qty = if text.trim().is_empty() {
            Quantity::zero()
        } else {
            parse_quantity(field, text)?
        };
        validate_stock(self.unit_type, qty).map_err(|e| with_field(e, field))?;
        Ok(qty)
    }

    fn checked_image_url(&self) -> Result<Option<String>, ValidationError> {
        let url = self.image_url.trim();
        if url.is_empty() {
            return Ok(None);
        }
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ValidationError::InvalidFormat {
                field: "image_url".to_string(),
                reason: "must be an http(s) URL".to_string(),
            });
        }
        Ok(Some(url.to_string()))
    }
}

impl WizardForm for ProductForm {
    fn sections(&self) -> &'static [&'static str] {
        Self::SECTIONS
    }

    fn validate_section(&self, section: &str) -> Result<(), ValidationError> {
        match section {
            "basic" => {
                validate_name(&self.name)?;
                self.check_barcode()
            }
            "pricing" => {
                self.parsed_price()?;
                self.parsed_tier("price_level_2", &self.price_level_2)?;
                self.parsed_tier("price_level_3", &self.price_level_3)?;
                self.parsed_tier("cost", &self.cost)?;
                Ok(())
            }
            "inventory" => {
                self.parsed_stock("stock", &self.stock)?;
                self.parsed_stock("min_stock", &self.min_stock)?;
                Ok(())
            }
            "media" => self.checked_image_url().map(|_| ()),
            other => Err(unknown_section(other)),
        }
    }
}

// =============================================================================
// Customer Form
// =============================================================================

/// Customer create/edit form: basic, contact, credit.
#[derive(Debug, Clone, Default)]
pub struct CustomerForm {
    // basic
    pub name: String,
    pub document_number: String,
    // contact
    pub email: String,
    pub phone: String,
    pub address: String,
    // credit
    pub credit_limit: String,
}

impl CustomerForm {
    const SECTIONS: &'static [&'static str] = &["basic", "contact", "credit"];

    /// Prefills the form from an existing customer, for edit mode.
    ///
    /// The walk-in sentinel is not editable; callers are expected to gate on
    /// [`Customer::is_walk_in`] before opening the dialog.
    pub fn from_customer(customer: &Customer) -> Self {
        CustomerForm {
            name: customer.name.clone(),
            document_number: customer.document_number.clone(),
            email: customer.email.clone().unwrap_or_default(),
            phone: customer.phone.clone().unwrap_or_default(),
            address: customer.address.clone().unwrap_or_default(),
            credit_limit: money_text(customer.credit_limit),
        }
    }

    /// Parses and validates everything, producing the create payload.
    pub fn build(&self) -> Result<NewCustomer, ValidationError> {
        validate_name(&self.name)?;
        validate_document_number(self.document_number.trim())?;
        self.check_contact()?;
        Ok(NewCustomer {
            name: self.name.trim().to_string(),
            document_number: self.document_number.trim().to_string(),
            email: none_if_empty(&self.email),
            phone: none_if_empty(&self.phone),
            address: none_if_empty(&self.address),
            credit_limit: self.parsed_credit_limit()?,
        })
    }

    fn check_contact(&self) -> Result<(), ValidationError> {
        if !self.email.trim().is_empty() {
            validate_email(self.email.trim())?;
        }
        if !self.phone.trim().is_empty() {
            validate_phone(self.phone.trim())?;
        }
        Ok(())
    }

    /// Blank means no credit (zero limit).
    fn parsed_credit_limit(&self) -> Result<Money, ValidationError> {
        let limit = parse_optional_money("credit_limit", &self.credit_limit)?.unwrap_or_default();
        validate_credit_limit(limit)?;
        Ok(limit)
    }
}

impl WizardForm for CustomerForm {
    fn sections(&self) -> &'static [&'static str] {
        Self::SECTIONS
    }

    fn validate_section(&self, section: &str) -> Result<(), ValidationError> {
        match section {
            "basic" => {
                validate_name(&self.name)?;
                validate_document_number(self.document_number.trim())
            }
            "contact" => self.check_contact(),
            "credit" => self.parsed_credit_limit().map(|_| ()),
            other => Err(unknown_section(other)),
        }
    }
}

// =============================================================================
// Category Form
// =============================================================================

/// Category create/edit form: basic, appearance.
#[derive(Debug, Clone, Default)]
pub struct CategoryForm {
    // basic
    pub name: String,
    pub description: String,
    // appearance
    pub color: String,
}

impl CategoryForm {
    const SECTIONS: &'static [&'static str] = &["basic", "appearance"];

    /// Prefills the form from an existing category, for edit mode.
    pub fn from_category(category: &Category) -> Self {
        CategoryForm {
            name: category.name.clone(),
            description: category.description.clone().unwrap_or_default(),
            color: category.color.clone().unwrap_or_default(),
        }
    }

    /// Parses and validates everything, producing the create payload.
    pub fn build(&self) -> Result<NewCategory, ValidationError> {
        validate_name(&self.name)?;
        self.check_color()?;
        Ok(NewCategory {
            name: self.name.trim().to_string(),
            description: none_if_empty(&self.description),
            color: none_if_empty(&self.color),
        })
    }

    fn check_color(&self) -> Result<(), ValidationError> {
        if self.color.trim().is_empty() {
            return Ok(());
        }
        validate_color(self.color.trim())
    }
}

impl WizardForm for CategoryForm {
    fn sections(&self) -> &'static [&'static str] {
        Self::SECTIONS
    }

    fn validate_section(&self, section: &str) -> Result<(), ValidationError> {
        match section {
            "basic" => validate_name(&self.name),
            "appearance" => self.check_color(),
            other => Err(unknown_section(other)),
        }
    }
}

// =============================================================================
// Transaction Form
// =============================================================================

/// Running-account transaction form: type, details, payment method.
///
/// The payment-method section only exists for payments. A charge or an
/// adjustment moves the balance without money changing hands at the counter,
/// so there is nothing to ask; the wizard skips the section entirely.
#[derive(Debug, Clone)]
pub struct TransactionForm {
    customer_id: String,
    // type
    pub transaction_type: Option<TransactionType>,
    // details
    pub amount: String,
    pub description: String,
    pub reference: String,
    // payment_method
    pub payment_method: PaymentMethod,
}

impl TransactionForm {
    const SECTIONS: &'static [&'static str] = &["type", "details", "payment_method"];

    /// Starts a blank form for one customer's account.
    pub fn new(customer_id: impl Into<String>) -> Self {
        TransactionForm {
            customer_id: customer_id.into(),
            transaction_type: None,
            amount: String::new(),
            description: String::new(),
            reference: String::new(),
            payment_method: PaymentMethod::default(),
        }
    }

    /// The account this transaction will post against.
    pub fn customer_id(&self) -> &str {
        &self.customer_id
    }

    /// Parses and validates everything, producing the post payload.
    pub fn build(&self) -> Result<NewTransaction, ValidationError> {
        let kind = self.required_type()?;
        let amount = self.parsed_amount()?;
        let description = self.description.trim();
        if description.is_empty() {
            return Err(ValidationError::Required {
                field: "description".to_string(),
            });
        }
        if kind == TransactionType::Payment {
            self.check_payment_method()?;
        }
        Ok(NewTransaction {
            customer_id: self.customer_id.clone(),
            kind,
            amount,
            description: description.to_string(),
            reference: none_if_empty(&self.reference),
            payment_method: (kind == TransactionType::Payment).then_some(self.payment_method),
        })
    }

    fn required_type(&self) -> Result<TransactionType, ValidationError> {
        self.transaction_type.ok_or_else(|| ValidationError::Required {
            field: "type".to_string(),
        })
    }

    fn parsed_amount(&self) -> Result<Money, ValidationError> {
        let amount = parse_money("amount", &self.amount)?;
        validate_amount(amount)?;
        Ok(amount)
    }

    /// A payment settles the running account, so it cannot itself be paid
    /// with the running account.
    fn check_payment_method(&self) -> Result<(), ValidationError> {
        if self.payment_method.requires_customer_account() {
            return Err(ValidationError::InvalidFormat {
                field: "payment_method".to_string(),
                reason: "a payment cannot be charged back to the account".to_string(),
            });
        }
        Ok(())
    }
}

impl WizardForm for TransactionForm {
    fn sections(&self) -> &'static [&'static str] {
        Self::SECTIONS
    }

    fn is_section_enabled(&self, section: &str) -> bool {
        section != "payment_method" || self.transaction_type == Some(TransactionType::Payment)
    }

    fn validate_section(&self, section: &str) -> Result<(), ValidationError> {
        match section {
            "type" => self.required_type().map(|_| ()),
            "details" => {
                self.parsed_amount()?;
                if self.description.trim().is_empty() {
                    return Err(ValidationError::Required {
                        field: "description".to_string(),
                    });
                }
                Ok(())
            }
            "payment_method" => self.check_payment_method(),
            other => Err(unknown_section(other)),
        }
    }
}

// =============================================================================
// Parse Helpers
// =============================================================================

fn parse_money(field: &str, text: &str) -> Result<Money, ValidationError> {
    text.parse::<Money>().map_err(|e| with_field(e, field))
}

fn parse_optional_money(field: &str, text: &str) -> Result<Option<Money>, ValidationError> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    parse_money(field, text).map(Some)
}

fn parse_quantity(field: &str, text: &str) -> Result<Quantity, ValidationError> {
    text.parse::<Quantity>().map_err(|e| with_field(e, field))
}

/// Rewrites a validation error to name the form field it came from.
fn with_field(error: ValidationError, field: &str) -> ValidationError {
    let field = field.to_string();
    match error {
        ValidationError::Required { .. } => ValidationError::Required { field },
        ValidationError::TooShort { min, .. } => ValidationError::TooShort { field, min },
        ValidationError::TooLong { max, .. } => ValidationError::TooLong { field, max },
        ValidationError::OutOfRange { min, max, .. } => {
            ValidationError::OutOfRange { field, min, max }
        }
        ValidationError::MustBePositive { .. } => ValidationError::MustBePositive { field },
        ValidationError::InvalidFormat { reason, .. } => {
            ValidationError::InvalidFormat { field, reason }
        }
    }
}

fn none_if_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Formats money for a text field ("1200.50"), without the display symbol.
fn money_text(value: Money) -> String {
    format!("{:.2}", value.cents() as f64 / 100.0)
}

fn unknown_section(section: &str) -> ValidationError {
    ValidationError::InvalidFormat {
        field: section.to_string(),
        reason: "unknown section".to_string(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
