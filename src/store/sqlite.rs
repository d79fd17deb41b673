//! SQLite product store
//!
//! Products live in the `items` table. Every statement runs on the blocking
//! thread pool so a slow disk never stalls the async workers.

use super::{Predicate, ProductStore, Result, StoreError};
use crate::search::Product;
use async_trait::async_trait;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

const SELECT_PRODUCTS: &str = "SELECT id, item_name, lat, lng, image_url, url FROM items";

/// Product store backed by a single SQLite connection
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open (or create) a database file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening SQLite database at {}", path.display());
        Ok(Self::from_connection(Connection::open(path)?))
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        info!("Opening in-memory SQLite database");
        Ok(Self::from_connection(Connection::open_in_memory()?))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Create the `items` table if it does not exist
    pub fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS items (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                item_name TEXT NOT NULL DEFAULT '',
                lat REAL NOT NULL,
                lng REAL NOT NULL,
                image_url TEXT NOT NULL DEFAULT '',
                url TEXT NOT NULL DEFAULT ''
            );",
        )?;
        info!("Migrated items table");
        Ok(())
    }

    /// Run `f` against the connection on the blocking pool
    async fn with_conn<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn.lock().map_err(|_| StoreError::Poisoned)?;
            f(&guard)
        })
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
    }
}

/// Build the filtered select for a predicate list
fn build_search(predicates: &[Predicate]) -> (String, Vec<Value>) {
    let mut conditions = Vec::with_capacity(predicates.len());
    let mut values = Vec::new();

    for predicate in predicates {
        let (condition, bound) = predicate.sql_condition();
        conditions.push(condition);
        values.extend(bound);
    }

    let mut sql = SELECT_PRODUCTS.to_string();
    if !conditions.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&conditions.join(" AND "));
    }
    sql.push_str(" ORDER BY id");

    (sql, values)
}

fn row_to_product(row: &Row<'_>) -> rusqlite::Result<Product> {
    let id: i64 = row.get(0)?;
    Ok(Product {
        id: id as u64,
        item_name: row.get(1)?,
        lat: row.get(2)?,
        lng: row.get(3)?,
        image_url: row.get(4)?,
        product_url: row.get(5)?,
    })
}

/// Ids beyond `i64::MAX` cannot exist in SQLite
fn to_row_id(id: u64) -> Result<i64> {
    i64::try_from(id).map_err(|_| StoreError::NotFound)
}

#[async_trait]
impl ProductStore for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn search(&self, predicates: &[Predicate]) -> Result<Vec<Product>> {
        let (sql, values) = build_search(predicates);
        debug!("SQLite search: {}", sql);

        self.with_conn(move |conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params_from_iter(values.iter()), row_to_product)?;
            Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
        })
        .await
    }

    async fn create(&self, mut product: Product) -> Result<Product> {
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO items (item_name, lat, lng, image_url, url) VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    product.item_name,
                    product.lat,
                    product.lng,
                    product.image_url,
                    product.product_url
                ],
            )?;
            product.id = conn.last_insert_rowid() as u64;
            Ok(product)
        })
        .await
    }

    async fn get(&self, id: u64) -> Result<Product> {
        let row_id = to_row_id(id)?;
        self.with_conn(move |conn| {
            conn.query_row(
                &format!("{} WHERE id = ?1", SELECT_PRODUCTS),
                params![row_id],
                row_to_product,
            )
            .optional()?
            .ok_or(StoreError::NotFound)
        })
        .await
    }

    async fn update(&self, product: Product) -> Result<Product> {
        let row_id = to_row_id(product.id)?;
        self.with_conn(move |conn| {
            let changed = conn.execute(
                "UPDATE items SET item_name = ?1, lat = ?2, lng = ?3, image_url = ?4, url = ?5 WHERE id = ?6",
                params![
                    product.item_name,
                    product.lat,
                    product.lng,
                    product.image_url,
                    product.product_url,
                    row_id
                ],
            )?;
            if changed == 0 {
                return Err(StoreError::NotFound);
            }
            Ok(product)
        })
        .await
    }

    async fn delete(&self, id: u64) -> Result<()> {
        let row_id = to_row_id(id)?;
        self.with_conn(move |conn| {
            match conn.execute("DELETE FROM items WHERE id = ?1", params![row_id])? {
                0 => Err(StoreError::NotFound),
                _ => Ok(()),
            }
        })
        .await
    }
}
