//! Catalog use-case service.
//!
//! # Responsibility
//! - Provide key-oriented entry points over the routed CRUD engine.
//! - Implement stock adjustment use-cases (sale, restock) on top of plain
//!   updates.
//!
//! # Invariants
//! - Service APIs never bypass engine routing/validation contracts.
//! - Selling more units than are on hand is rejected by the validator and
//!   leaves the stored quantity unchanged.

use crate::model::product::{Product, ProductFields, ProductKey, NO_PHOTO_SENTINEL};
use crate::repo::catalog_repo::{CatalogRepository, CatalogResult, ProductQuery};
use crate::route::{ResourceId, ResourceMatcher};
use log::info;

/// Use-case wrapper over a [`CatalogRepository`].
///
/// Holds the matcher so callers can address records by key without
/// assembling identifiers by hand.
pub struct CatalogService<R: CatalogRepository> {
    repo: R,
    matcher: ResourceMatcher,
}

impl<R: CatalogRepository> CatalogService<R> {
    /// Creates a service using the provided engine and route patterns.
    pub fn new(repo: R, matcher: ResourceMatcher) -> Self {
        Self { repo, matcher }
    }

    /// Inserts a new product at the collection identifier.
    ///
    /// Returns the item identifier carrying the store-assigned key.
    pub fn insert_product(&self, fields: &ProductFields) -> CatalogResult<ResourceId> {
        self.repo.insert(&self.matcher.collection_id(), fields)
    }

    /// Gets one product by key. A missing key is `Ok(None)`, not an error.
    pub fn product(&self, key: ProductKey) -> CatalogResult<Option<Product>> {
        let rows = self
            .repo
            .query(&self.matcher.item_id(key), &ProductQuery::default())?;
        Ok(rows.into_iter().next())
    }

    /// Lists collection rows using the typed selection options.
    pub fn list(&self, query: &ProductQuery) -> CatalogResult<Vec<Product>> {
        self.repo.query(&self.matcher.collection_id(), query)
    }

    /// Updates one product by key with the present fields only.
    pub fn update_product(&self, key: ProductKey, fields: &ProductFields) -> CatalogResult<usize> {
        self.repo.update(&self.matcher.item_id(key), fields)
    }

    /// Deletes one product by key. Deleting a missing key returns 0.
    pub fn delete_product(&self, key: ProductKey) -> CatalogResult<usize> {
        self.repo.delete(&self.matcher.item_id(key))
    }

    /// Deletes every product. Returns the removed row count.
    pub fn delete_all(&self) -> CatalogResult<usize> {
        self.repo.delete(&self.matcher.collection_id())
    }

    /// Records a sale of `units`, decrementing the stored quantity.
    ///
    /// # Contract
    /// - Selling from a missing key affects 0 rows.
    /// - Selling zero units affects 0 rows and publishes nothing.
    /// - Selling more than is on hand is a validation error; the stored
    ///   quantity stays unchanged.
    pub fn record_sale(&self, key: ProductKey, units: u32) -> CatalogResult<usize> {
        if units == 0 {
            return Ok(0);
        }
        let Some(product) = self.product(key)? else {
            return Ok(0);
        };

        let remaining = product.quantity - i64::from(units);
        let changed =
            self.update_product(key, &ProductFields::new().with_quantity(remaining))?;
        info!("event=product_sale module=service status=ok key={key} units={units} remaining={remaining}");
        Ok(changed)
    }

    /// Restocks `units`, incrementing the stored quantity.
    ///
    /// # Contract
    /// - Restocking a missing key affects 0 rows.
    /// - Restocking zero units affects 0 rows and publishes nothing.
    pub fn restock(&self, key: ProductKey, units: u32) -> CatalogResult<usize> {
        if units == 0 {
            return Ok(0);
        }
        let Some(product) = self.product(key)? else {
            return Ok(0);
        };

        let stocked = product.quantity.saturating_add(i64::from(units));
        let changed = self.update_product(key, &ProductFields::new().with_quantity(stocked))?;
        info!("event=product_restock module=service status=ok key={key} units={units} stocked={stocked}");
        Ok(changed)
    }

    /// Inserts one placeholder record for quick manual testing.
    pub fn seed_sample_product(&self) -> CatalogResult<ResourceId> {
        let fields = ProductFields::new()
            .with_name("Dummy Product")
            .with_quantity(10)
            .with_price(7.5)
            .with_photo_uri(NO_PHOTO_SENTINEL)
            .with_supplier_name("Dummy Supplier")
            .with_supplier_email("mail@dummysupplier.com");
        self.insert_product(&fields)
    }
}
