//! Field-set validation ahead of every write.
//!
//! # Responsibility
//! - Enforce record invariants before any field-set reaches storage.
//! - Normalize accepted values (name is stored trimmed).
//!
//! # Invariants
//! - A persisted name is never empty after trimming.
//! - Persisted price and quantity are never negative.
//! - Rejections carry a reason and happen before any store access.

use crate::model::product::ProductFields;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ValidationResult = Result<ProductFields, ValidationError>;

/// Which write the field-set is destined for.
///
/// Insert requires the mandatory columns; update only checks the fields
/// actually present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Insert,
    Update,
}

/// Reason a field-set was rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    MissingName,
    EmptyName,
    MissingPrice,
    NegativePrice(f64),
    NegativeQuantity(i64),
    /// Update carrying no fields at all; the engine short-circuits this to
    /// an affected count of zero instead of surfacing it.
    EmptyFieldSet,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingName => write!(f, "product requires a name"),
            Self::EmptyName => write!(f, "product name must not be empty"),
            Self::MissingPrice => write!(f, "product requires a price"),
            Self::NegativePrice(price) => write!(f, "product price must not be negative, got {price}"),
            Self::NegativeQuantity(quantity) => {
                write!(f, "product quantity must not be negative, got {quantity}")
            }
            Self::EmptyFieldSet => write!(f, "no fields to update"),
        }
    }
}

impl Error for ValidationError {}

/// Checks `fields` for `operation` and returns the normalized field-set.
///
/// # Errors
/// - Insert: missing/empty `name`, missing/negative `price`, negative
///   `quantity`.
/// - Update: the same rules for whichever of those fields is present, plus
///   [`ValidationError::EmptyFieldSet`] for an all-absent set.
///
/// `photo_uri`, `supplier_name` and `supplier_email` pass through
/// unchanged; their defaults are applied by the schema at insert time.
pub fn validate(fields: &ProductFields, operation: Operation) -> ValidationResult {
    if operation == Operation::Update && fields.is_empty() {
        return Err(ValidationError::EmptyFieldSet);
    }

    let mut normalized = fields.clone();

    match (&fields.name, operation) {
        (None, Operation::Insert) => return Err(ValidationError::MissingName),
        (None, Operation::Update) => {}
        (Some(name), _) => {
            let trimmed = name.trim();
            if trimmed.is_empty() {
                return Err(ValidationError::EmptyName);
            }
            normalized.name = Some(trimmed.to_string());
        }
    }

    match (fields.price, operation) {
        (None, Operation::Insert) => return Err(ValidationError::MissingPrice),
        (None, Operation::Update) => {}
        (Some(price), _) => {
            // NaN never compares less-than, so check it explicitly.
            if price < 0.0 || price.is_nan() {
                return Err(ValidationError::NegativePrice(price));
            }
        }
    }

    if let Some(quantity) = fields.quantity {
        if quantity < 0 {
            return Err(ValidationError::NegativeQuantity(quantity));
        }
    }

    Ok(normalized)
}
