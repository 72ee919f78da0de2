use std::sync::Arc;
use stockroom_core::db::open_db_in_memory;
use stockroom_core::{
    CatalogRepository, ChangeNotifier, ProductFields, ProductOrder, ProductQuery,
    ResourceMatcher, SqliteCatalogEngine, NO_PHOTO_SENTINEL,
};

fn engine() -> (SqliteCatalogEngine, ResourceMatcher) {
    let conn = open_db_in_memory().unwrap();
    let matcher = ResourceMatcher::new("stockroom.catalog", "products");
    let notifier = Arc::new(ChangeNotifier::new());
    let engine = SqliteCatalogEngine::new(conn, matcher.clone(), notifier);
    (engine, matcher)
}

fn widget() -> ProductFields {
    ProductFields::new().with_name("Widget").with_price(9.99)
}

#[test]
fn insert_and_query_roundtrip_applies_defaults() {
    let (engine, matcher) = engine();

    let item_id = engine.insert(&matcher.collection_id(), &widget()).unwrap();
    let key = item_id.trailing_key().unwrap();
    assert_eq!(item_id, matcher.item_id(key));

    let rows = engine.query(&item_id, &ProductQuery::default()).unwrap();
    assert_eq!(rows.len(), 1);

    let product = &rows[0];
    assert_eq!(product.key, key);
    assert_eq!(product.name, "Widget");
    assert_eq!(product.quantity, 0);
    assert_eq!(product.price, 9.99);
    assert_eq!(product.photo_uri, NO_PHOTO_SENTINEL);
    assert_eq!(product.supplier_name, None);
    assert_eq!(product.supplier_email, None);
}

#[test]
fn inserted_key_is_unique_in_collection() {
    let (engine, matcher) = engine();

    let first = engine.insert(&matcher.collection_id(), &widget()).unwrap();
    engine
        .insert(
            &matcher.collection_id(),
            &ProductFields::new().with_name("Gadget").with_price(1.5),
        )
        .unwrap();

    let key = first.trailing_key().unwrap();
    let all = engine
        .query(&matcher.collection_id(), &ProductQuery::default())
        .unwrap();
    let matching = all.iter().filter(|product| product.key == key).count();
    assert_eq!(matching, 1);
}

#[test]
fn partial_update_merges_onto_stored_values() {
    let (engine, matcher) = engine();

    let item_id = engine
        .insert(
            &matcher.collection_id(),
            &widget().with_supplier_name("Acme"),
        )
        .unwrap();

    let changed = engine
        .update(&item_id, &ProductFields::new().with_quantity(5))
        .unwrap();
    assert_eq!(changed, 1);

    let product = engine
        .query(&item_id, &ProductQuery::default())
        .unwrap()
        .remove(0);
    assert_eq!(product.quantity, 5);
    assert_eq!(product.name, "Widget");
    assert_eq!(product.price, 9.99);
    assert_eq!(product.supplier_name.as_deref(), Some("Acme"));
}

#[test]
fn collection_update_touches_all_rows() {
    let (engine, matcher) = engine();

    engine.insert(&matcher.collection_id(), &widget()).unwrap();
    engine
        .insert(
            &matcher.collection_id(),
            &ProductFields::new().with_name("Gadget").with_price(1.5),
        )
        .unwrap();

    let changed = engine
        .update(
            &matcher.collection_id(),
            &ProductFields::new().with_quantity(3),
        )
        .unwrap();
    assert_eq!(changed, 2);

    let all = engine
        .query(&matcher.collection_id(), &ProductQuery::default())
        .unwrap();
    assert!(all.iter().all(|product| product.quantity == 3));
}

#[test]
fn update_of_missing_key_returns_zero() {
    let (engine, matcher) = engine();

    let changed = engine
        .update(&matcher.item_id(404), &ProductFields::new().with_quantity(1))
        .unwrap();
    assert_eq!(changed, 0);
}

#[test]
fn empty_update_set_short_circuits_to_zero() {
    let (engine, matcher) = engine();
    let item_id = engine.insert(&matcher.collection_id(), &widget()).unwrap();

    let changed = engine.update(&item_id, &ProductFields::new()).unwrap();
    assert_eq!(changed, 0);

    let product = engine
        .query(&item_id, &ProductQuery::default())
        .unwrap()
        .remove(0);
    assert_eq!(product.name, "Widget");
}

#[test]
fn delete_is_idempotent_on_missing_rows() {
    let (engine, matcher) = engine();

    let item_id = engine.insert(&matcher.collection_id(), &widget()).unwrap();
    assert_eq!(engine.delete(&item_id).unwrap(), 1);
    assert_eq!(engine.delete(&item_id).unwrap(), 0);
}

#[test]
fn item_query_ignores_caller_predicates() {
    let (engine, matcher) = engine();

    let item_id = engine.insert(&matcher.collection_id(), &widget()).unwrap();

    // The name filter does not match, but item addressing overrides it.
    let query = ProductQuery {
        name_contains: Some("no such name".to_string()),
        in_stock_only: false,
        order: ProductOrder::default(),
    };
    let rows = engine.query(&item_id, &query).unwrap();
    assert_eq!(rows.len(), 1);
}

#[test]
fn collection_query_filters_and_orders() {
    let (engine, matcher) = engine();

    engine
        .insert(
            &matcher.collection_id(),
            &ProductFields::new()
                .with_name("zinc plate")
                .with_price(3.0)
                .with_quantity(4),
        )
        .unwrap();
    engine
        .insert(
            &matcher.collection_id(),
            &ProductFields::new()
                .with_name("Anvil")
                .with_price(120.0)
                .with_quantity(0),
        )
        .unwrap();
    engine
        .insert(
            &matcher.collection_id(),
            &ProductFields::new()
                .with_name("anchor bolt")
                .with_price(0.4)
                .with_quantity(250),
        )
        .unwrap();

    let by_name = engine
        .query(
            &matcher.collection_id(),
            &ProductQuery {
                order: ProductOrder::NameAscending,
                ..ProductQuery::default()
            },
        )
        .unwrap();
    let names: Vec<&str> = by_name.iter().map(|product| product.name.as_str()).collect();
    assert_eq!(names, ["anchor bolt", "Anvil", "zinc plate"]);

    let in_stock = engine
        .query(
            &matcher.collection_id(),
            &ProductQuery {
                in_stock_only: true,
                ..ProductQuery::default()
            },
        )
        .unwrap();
    assert_eq!(in_stock.len(), 2);

    let an_products = engine
        .query(
            &matcher.collection_id(),
            &ProductQuery {
                name_contains: Some("an".to_string()),
                ..ProductQuery::default()
            },
        )
        .unwrap();
    assert_eq!(an_products.len(), 2);
}

#[test]
fn widget_lifecycle_scenario() {
    let (engine, matcher) = engine();

    let item_id = engine.insert(&matcher.collection_id(), &widget()).unwrap();
    assert_eq!(item_id.trailing_key(), Some(1));

    let inserted = engine
        .query(&item_id, &ProductQuery::default())
        .unwrap()
        .remove(0);
    assert_eq!(inserted.quantity, 0);
    assert_eq!(inserted.photo_uri, NO_PHOTO_SENTINEL);

    let changed = engine
        .update(&item_id, &ProductFields::new().with_quantity(5))
        .unwrap();
    assert_eq!(changed, 1);

    let updated = engine
        .query(&item_id, &ProductQuery::default())
        .unwrap()
        .remove(0);
    assert_eq!(updated.quantity, 5);
    assert_eq!(updated.price, 9.99);
    assert_eq!(updated.name, "Widget");

    assert_eq!(engine.delete(&item_id).unwrap(), 1);
    assert!(engine.query(&item_id, &ProductQuery::default()).unwrap().is_empty());
    assert_eq!(engine.delete(&item_id).unwrap(), 0);
}

#[test]
fn close_releases_the_store() {
    let (engine, matcher) = engine();
    engine.insert(&matcher.collection_id(), &widget()).unwrap();
    engine.close().unwrap();
}
