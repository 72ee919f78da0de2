//! Routed CRUD contract and SQLite engine.
//!
//! # Responsibility
//! - Provide query/insert/update/delete over canonical `products` storage,
//!   addressed by routed resource identifiers.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - `Unroutable` identifiers fail every operation before the store is
//!   touched; there is no silent fallback.
//! - Item-addressed operations are always scoped to exactly one row,
//!   overriding any caller-supplied predicate.
//! - The connection lock serializes writers. `rusqlite::Connection` is not
//!   `Sync`, so reads take the same lock; a read never overlaps a write.
//! - Change publishes happen after the lock is released and before the
//!   mutating call returns.

use crate::db::{DbError, DbResult};
use crate::model::product::{Product, ProductFields};
use crate::notify::ChangeNotifier;
use crate::route::{ResourceId, ResourceMatcher, RouteError, RouteTarget};
use crate::validate::{validate, Operation, ValidationError};
use log::{debug, info};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Arc, Mutex, MutexGuard};

const PRODUCT_SELECT_SQL: &str = "SELECT
    id,
    product_name,
    quantity,
    price,
    photo_uri,
    supplier_name,
    supplier_email
FROM products";

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Engine error distinguishing "your identifier was wrong", "your input was
/// wrong" and "the store is broken".
///
/// A matching row count of zero is not represented here: queries return an
/// empty result set and mutations return a zero count instead.
#[derive(Debug)]
pub enum CatalogError {
    Routing(RouteError),
    Validation(ValidationError),
    Store(DbError),
}

impl Display for CatalogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Routing(err) => write!(f, "{err}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CatalogError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Routing(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<RouteError> for CatalogError {
    fn from(value: RouteError) -> Self {
        Self::Routing(value)
    }
}

impl From<ValidationError> for CatalogError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for CatalogError {
    fn from(value: DbError) -> Self {
        Self::Store(value)
    }
}

impl From<rusqlite::Error> for CatalogError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Store(DbError::Sqlite(value))
    }
}

/// Result ordering for collection queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProductOrder {
    /// Insertion order; keys are monotonically increasing.
    #[default]
    KeyAscending,
    /// Case-insensitive name order, key-tiebroken for stability.
    NameAscending,
    /// Lowest stock first, key-tiebroken for stability.
    QuantityAscending,
}

/// Typed selection options for [`CatalogRepository::query`].
///
/// Predicates apply to collection-addressed queries only; an item-addressed
/// query is always `id = key` regardless of what the caller sets here.
#[derive(Debug, Clone, Default)]
pub struct ProductQuery {
    /// Substring match against `product_name`.
    pub name_contains: Option<String>,
    /// Restrict to rows with at least one unit on hand.
    pub in_stock_only: bool,
    pub order: ProductOrder,
}

/// Routed CRUD contract over product storage.
pub trait CatalogRepository {
    /// Returns the rows addressed by `id`, zero-or-one of them for an item
    /// identifier.
    fn query(&self, id: &ResourceId, query: &ProductQuery) -> CatalogResult<Vec<Product>>;

    /// Inserts one record at the collection identifier and returns the item
    /// identifier of the new row.
    fn insert(&self, id: &ResourceId, fields: &ProductFields) -> CatalogResult<ResourceId>;

    /// Updates the addressed rows with the present fields only, merging onto
    /// stored values. Returns the affected row count.
    fn update(&self, id: &ResourceId, fields: &ProductFields) -> CatalogResult<usize>;

    /// Deletes the addressed rows. Returns the removed row count.
    fn delete(&self, id: &ResourceId) -> CatalogResult<usize>;
}

/// SQLite-backed catalog engine.
///
/// Owns the process-wide store handle; lifecycle (open/close) belongs to
/// the embedding application via [`SqliteCatalogEngine::new`] and
/// [`SqliteCatalogEngine::close`].
pub struct SqliteCatalogEngine {
    conn: Mutex<Connection>,
    matcher: ResourceMatcher,
    notifier: Arc<ChangeNotifier>,
}

impl SqliteCatalogEngine {
    /// Wraps a bootstrapped connection (see [`crate::db::open_db`]) with
    /// the registered route patterns and the change notifier to publish to.
    pub fn new(conn: Connection, matcher: ResourceMatcher, notifier: Arc<ChangeNotifier>) -> Self {
        Self {
            conn: Mutex::new(conn),
            matcher,
            notifier,
        }
    }

    pub fn matcher(&self) -> &ResourceMatcher {
        &self.matcher
    }

    pub fn notifier(&self) -> &Arc<ChangeNotifier> {
        &self.notifier
    }

    /// Closes the underlying connection, consuming the engine.
    pub fn close(self) -> DbResult<()> {
        let conn = self.conn.into_inner().expect("catalog store lock poisoned");
        conn.close().map_err(|(_conn, err)| DbError::Sqlite(err))
    }

    fn lock_conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().expect("catalog store lock poisoned")
    }
}

impl CatalogRepository for SqliteCatalogEngine {
    fn query(&self, id: &ResourceId, query: &ProductQuery) -> CatalogResult<Vec<Product>> {
        let target = self.matcher.classify(id)?;

        let mut sql = format!("{PRODUCT_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        match target {
            RouteTarget::Item(key) => {
                sql.push_str(" AND id = ?");
                bind_values.push(Value::Integer(key));
            }
            RouteTarget::Collection => {
                if let Some(fragment) = &query.name_contains {
                    sql.push_str(" AND product_name LIKE '%' || ? || '%'");
                    bind_values.push(Value::Text(fragment.clone()));
                }
                if query.in_stock_only {
                    sql.push_str(" AND quantity > 0");
                }
            }
        }

        sql.push_str(order_clause(query.order));

        let conn = self.lock_conn();
        let mut stmt = conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut products = Vec::new();

        while let Some(row) = rows.next()? {
            products.push(parse_product_row(row)?);
        }

        debug!(
            "event=catalog_query module=repo status=ok id={id} rows={}",
            products.len()
        );
        Ok(products)
    }

    fn insert(&self, id: &ResourceId, fields: &ProductFields) -> CatalogResult<ResourceId> {
        match self.matcher.classify(id)? {
            RouteTarget::Collection => {}
            RouteTarget::Item(_) => {
                return Err(RouteError::UnsupportedOperation {
                    operation: "insert",
                    id: id.to_string(),
                }
                .into());
            }
        }

        let accepted = validate(fields, Operation::Insert)?;

        let (columns, bind_values) = present_columns(&accepted);
        let placeholders = vec!["?"; columns.len()].join(", ");
        let sql = format!(
            "INSERT INTO products ({}) VALUES ({});",
            columns.join(", "),
            placeholders
        );

        let key = {
            let conn = self.lock_conn();
            conn.execute(&sql, params_from_iter(bind_values))?;
            conn.last_insert_rowid()
        };

        // The new item identifier is the collection identifier plus the
        // store-assigned key.
        let item_id = id.with_key(key);
        info!("event=catalog_insert module=repo status=ok id={item_id}");
        self.notifier.publish(&item_id);
        Ok(item_id)
    }

    fn update(&self, id: &ResourceId, fields: &ProductFields) -> CatalogResult<usize> {
        let target = self.matcher.classify(id)?;

        let accepted = match validate(fields, Operation::Update) {
            Ok(accepted) => accepted,
            Err(ValidationError::EmptyFieldSet) => {
                // Nothing to change: stop before the store, zero rows.
                debug!("event=catalog_update module=repo status=noop id={id}");
                return Ok(0);
            }
            Err(err) => return Err(err.into()),
        };

        let (columns, mut bind_values) = present_columns(&accepted);
        let assignments = columns
            .iter()
            .map(|column| format!("{column} = ?"))
            .collect::<Vec<_>>()
            .join(", ");

        let mut sql = format!("UPDATE products SET {assignments}");
        if let RouteTarget::Item(key) = target {
            sql.push_str(" WHERE id = ?");
            bind_values.push(Value::Integer(key));
        }

        let changed = {
            let conn = self.lock_conn();
            conn.execute(&sql, params_from_iter(bind_values))?
        };

        info!("event=catalog_update module=repo status=ok id={id} rows={changed}");
        if changed > 0 {
            self.notifier.publish(id);
        }
        Ok(changed)
    }

    fn delete(&self, id: &ResourceId) -> CatalogResult<usize> {
        let target = self.matcher.classify(id)?;

        let mut sql = String::from("DELETE FROM products");
        let mut bind_values: Vec<Value> = Vec::new();
        if let RouteTarget::Item(key) = target {
            sql.push_str(" WHERE id = ?");
            bind_values.push(Value::Integer(key));
        }

        let removed = {
            let conn = self.lock_conn();
            conn.execute(&sql, params_from_iter(bind_values))?
        };

        info!("event=catalog_delete module=repo status=ok id={id} rows={removed}");
        if removed > 0 {
            self.notifier.publish(id);
        }
        Ok(removed)
    }
}

fn order_clause(order: ProductOrder) -> &'static str {
    match order {
        ProductOrder::KeyAscending => " ORDER BY id ASC",
        ProductOrder::NameAscending => " ORDER BY product_name COLLATE NOCASE ASC, id ASC",
        ProductOrder::QuantityAscending => " ORDER BY quantity ASC, id ASC",
    }
}

/// Collects the present field slots as (column, bind value) pairs, in
/// stable column order. Absent slots are left to their schema defaults on
/// insert and left untouched on update.
fn present_columns(fields: &ProductFields) -> (Vec<&'static str>, Vec<Value>) {
    let mut columns: Vec<&'static str> = Vec::new();
    let mut bind_values: Vec<Value> = Vec::new();

    if let Some(name) = &fields.name {
        columns.push("product_name");
        bind_values.push(Value::Text(name.clone()));
    }
    if let Some(quantity) = fields.quantity {
        columns.push("quantity");
        bind_values.push(Value::Integer(quantity));
    }
    if let Some(price) = fields.price {
        columns.push("price");
        bind_values.push(Value::Real(price));
    }
    if let Some(photo_uri) = &fields.photo_uri {
        columns.push("photo_uri");
        bind_values.push(Value::Text(photo_uri.clone()));
    }
    if let Some(supplier_name) = &fields.supplier_name {
        columns.push("supplier_name");
        bind_values.push(Value::Text(supplier_name.clone()));
    }
    if let Some(supplier_email) = &fields.supplier_email {
        columns.push("supplier_email");
        bind_values.push(Value::Text(supplier_email.clone()));
    }

    (columns, bind_values)
}

fn parse_product_row(row: &Row<'_>) -> CatalogResult<Product> {
    Ok(Product {
        key: row.get("id")?,
        name: row.get("product_name")?,
        quantity: row.get("quantity")?,
        price: row.get("price")?,
        photo_uri: row.get("photo_uri")?,
        supplier_name: row.get("supplier_name")?,
        supplier_email: row.get("supplier_email")?,
    })
}
