//! Core data-access layer for the stockroom inventory catalog.
//! This crate is the single source of truth for catalog invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod notify;
pub mod repo;
pub mod route;
pub mod service;
pub mod validate;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::product::{Product, ProductFields, ProductKey, NO_PHOTO_SENTINEL};
pub use notify::{ChangeNotifier, SubscriptionId};
pub use repo::catalog_repo::{
    CatalogError, CatalogRepository, CatalogResult, ProductOrder, ProductQuery,
    SqliteCatalogEngine,
};
pub use route::{ResourceId, ResourceMatcher, RouteError, RouteResult, RouteTarget};
pub use service::catalog_service::CatalogService;
pub use validate::{validate, Operation, ValidationError};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
