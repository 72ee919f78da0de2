//! Typed domain model for the product catalog.
//!
//! # Responsibility
//! - Define the canonical product record and the typed field-set used for
//!   writes.
//!
//! # Invariants
//! - Every persisted product is identified by a stable `ProductKey`.
//! - Field-sets carry one optional slot per data column, so unknown columns
//!   cannot be expressed at all.

pub mod product;
