//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `stockroom_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use std::sync::Arc;
use stockroom_core::db::open_db_in_memory;
use stockroom_core::{
    CatalogService, ChangeNotifier, ProductQuery, ResourceMatcher, SqliteCatalogEngine,
};

fn main() {
    println!("stockroom_core ping={}", stockroom_core::ping());
    println!("stockroom_core version={}", stockroom_core::core_version());

    // In-memory round-trip proving the whole stack wires up: schema,
    // routing, validation, engine, notification.
    let conn = match open_db_in_memory() {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("stockroom_core db_open failed: {err}");
            std::process::exit(1);
        }
    };

    let matcher = ResourceMatcher::new("stockroom.catalog", "products");
    let notifier = Arc::new(ChangeNotifier::new());
    let engine = SqliteCatalogEngine::new(conn, matcher.clone(), Arc::clone(&notifier));

    let subscription = notifier.subscribe(matcher.collection_id(), |changed| {
        println!("stockroom_core changed={changed}");
    });

    let service = CatalogService::new(engine, matcher);
    match service.seed_sample_product() {
        Ok(id) => println!("stockroom_core seeded={id}"),
        Err(err) => {
            eprintln!("stockroom_core seed failed: {err}");
            std::process::exit(1);
        }
    }

    match service.list(&ProductQuery::default()) {
        Ok(products) => println!("stockroom_core products={}", products.len()),
        Err(err) => {
            eprintln!("stockroom_core list failed: {err}");
            std::process::exit(1);
        }
    }

    notifier.unsubscribe(subscription);
}
