use std::sync::Arc;
use stockroom_core::db::open_db_in_memory;
use stockroom_core::{
    CatalogError, CatalogRepository, ChangeNotifier, ProductFields, ProductQuery,
    ResourceMatcher, SqliteCatalogEngine, ValidationError,
};

fn engine() -> (SqliteCatalogEngine, ResourceMatcher) {
    let conn = open_db_in_memory().unwrap();
    let matcher = ResourceMatcher::new("stockroom.catalog", "products");
    let notifier = Arc::new(ChangeNotifier::new());
    let engine = SqliteCatalogEngine::new(conn, matcher.clone(), notifier);
    (engine, matcher)
}

#[test]
fn negative_price_insert_is_rejected_and_zero_price_is_accepted() {
    let (engine, matcher) = engine();

    let negative = ProductFields::new().with_name("Widget").with_price(-0.01);
    let err = engine.insert(&matcher.collection_id(), &negative).unwrap_err();
    assert!(matches!(
        err,
        CatalogError::Validation(ValidationError::NegativePrice(_))
    ));

    let free = ProductFields::new().with_name("Freebie").with_price(0.0);
    engine.insert(&matcher.collection_id(), &free).unwrap();

    let rows = engine
        .query(&matcher.collection_id(), &ProductQuery::default())
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "Freebie");
}

#[test]
fn empty_or_whitespace_name_insert_is_rejected() {
    let (engine, matcher) = engine();

    for bad_name in ["", "   ", "\t\n"] {
        let fields = ProductFields::new().with_name(bad_name).with_price(1.0);
        let err = engine.insert(&matcher.collection_id(), &fields).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::Validation(ValidationError::EmptyName)
        ));
    }

    let missing = ProductFields::new().with_price(1.0);
    let err = engine.insert(&matcher.collection_id(), &missing).unwrap_err();
    assert!(matches!(
        err,
        CatalogError::Validation(ValidationError::MissingName)
    ));
}

#[test]
fn missing_price_insert_is_rejected() {
    let (engine, matcher) = engine();

    let fields = ProductFields::new().with_name("Widget");
    let err = engine.insert(&matcher.collection_id(), &fields).unwrap_err();
    assert!(matches!(
        err,
        CatalogError::Validation(ValidationError::MissingPrice)
    ));
}

#[test]
fn accepted_names_are_stored_trimmed() {
    let (engine, matcher) = engine();

    let fields = ProductFields::new().with_name("  Widget  ").with_price(2.0);
    let item_id = engine.insert(&matcher.collection_id(), &fields).unwrap();

    let product = engine
        .query(&item_id, &ProductQuery::default())
        .unwrap()
        .remove(0);
    assert_eq!(product.name, "Widget");
}

#[test]
fn negative_quantity_update_is_rejected_and_leaves_stored_value() {
    let (engine, matcher) = engine();

    let item_id = engine
        .insert(
            &matcher.collection_id(),
            &ProductFields::new()
                .with_name("Widget")
                .with_price(9.99)
                .with_quantity(7),
        )
        .unwrap();

    let err = engine
        .update(&item_id, &ProductFields::new().with_quantity(-1))
        .unwrap_err();
    assert!(matches!(
        err,
        CatalogError::Validation(ValidationError::NegativeQuantity(-1))
    ));

    let product = engine
        .query(&item_id, &ProductQuery::default())
        .unwrap()
        .remove(0);
    assert_eq!(product.quantity, 7);
}

#[test]
fn update_validates_only_present_fields() {
    let (engine, matcher) = engine();

    let item_id = engine
        .insert(
            &matcher.collection_id(),
            &ProductFields::new().with_name("Widget").with_price(9.99),
        )
        .unwrap();

    // No name, no price in the set; quantity alone passes.
    let changed = engine
        .update(&item_id, &ProductFields::new().with_quantity(4))
        .unwrap();
    assert_eq!(changed, 1);

    // A present-but-blank name still fails, even on update.
    let err = engine
        .update(&item_id, &ProductFields::new().with_name("  "))
        .unwrap_err();
    assert!(matches!(
        err,
        CatalogError::Validation(ValidationError::EmptyName)
    ));
}
