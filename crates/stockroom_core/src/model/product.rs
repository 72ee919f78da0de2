//! Product domain model.
//!
//! # Responsibility
//! - Define the canonical catalog record read back from storage.
//! - Define the typed optional-field set used for insert/update payloads.
//!
//! # Invariants
//! - `key` is assigned by the store on insert and never reused.
//! - `photo_uri` is always populated; `NO_PHOTO_SENTINEL` marks the
//!   no-photo state, any other value is an opaque locator resolved by the
//!   embedding application.

use serde::{Deserialize, Serialize};

/// Stable store-assigned identity for one product row.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type ProductKey = i64;

/// Reserved `photo_uri` value marking "no photo selected".
pub const NO_PHOTO_SENTINEL: &str = "no image";

/// Canonical catalog record as read back from the store.
///
/// All columns are materialized; callers pick what they render. Optional
/// supplier columns stay `None` when the row never had them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Store-assigned row key, serialized as `id` to match column naming.
    #[serde(rename = "id")]
    pub key: ProductKey,
    /// Serialized as `product_name` to match external column naming.
    #[serde(rename = "product_name")]
    pub name: String,
    /// Units on hand. Never negative once persisted through this layer.
    pub quantity: i64,
    /// Unit price. Never negative once persisted through this layer.
    pub price: f64,
    /// Opaque photo locator, or [`NO_PHOTO_SENTINEL`].
    pub photo_uri: String,
    pub supplier_name: Option<String>,
    pub supplier_email: Option<String>,
}

impl Product {
    /// Returns whether a real photo locator is set.
    pub fn has_photo(&self) -> bool {
        self.photo_uri != NO_PHOTO_SENTINEL
    }

    /// Returns whether at least one unit is on hand.
    pub fn in_stock(&self) -> bool {
        self.quantity > 0
    }
}

/// Typed partial field-set for insert/update payloads.
///
/// One optional slot per data column replaces the dynamic string-keyed map
/// used by ad-hoc callers: a column that does not exist cannot be named, and
/// every value carries its column's type. Deserialization rejects unknown
/// keys outright rather than dropping them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProductFields {
    #[serde(rename = "product_name")]
    pub name: Option<String>,
    pub quantity: Option<i64>,
    pub price: Option<f64>,
    pub photo_uri: Option<String>,
    pub supplier_name: Option<String>,
    pub supplier_email: Option<String>,
}

impl ProductFields {
    /// Creates an empty field-set; chain `with_*` builders to fill it.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_quantity(mut self, quantity: i64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_photo_uri(mut self, photo_uri: impl Into<String>) -> Self {
        self.photo_uri = Some(photo_uri.into());
        self
    }

    pub fn with_supplier_name(mut self, supplier_name: impl Into<String>) -> Self {
        self.supplier_name = Some(supplier_name.into());
        self
    }

    pub fn with_supplier_email(mut self, supplier_email: impl Into<String>) -> Self {
        self.supplier_email = Some(supplier_email.into());
        self
    }

    /// Returns whether no field is present at all.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.quantity.is_none()
            && self.price.is_none()
            && self.photo_uri.is_none()
            && self.supplier_name.is_none()
            && self.supplier_email.is_none()
    }
}
