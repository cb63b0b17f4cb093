//! Persistence collaborators, keyed by barcode.

use std::path::Path;

use duckdb::{params, Connection};
use tracing::debug;

use crate::error::Result;
use crate::models::Product;

/// Bulk upsert sink for normalized products.
///
/// Upsert by barcode must be idempotent under re-delivery: storing a
/// barcode that already exists overwrites the row rather than duplicating
/// it or failing on a key conflict. The ingestion loop is the sole writer
/// during a run.
pub trait ProductStore {
    /// Insert-or-overwrite every product, in order. Returns the number of
    /// rows written.
    fn upsert_all(&mut self, products: &[Product]) -> Result<usize>;
}

/// DuckDB-backed product store.
///
/// The `products` table carries `barcode` as its primary key; upserts go
/// through `ON CONFLICT DO UPDATE` so re-ingestion overwrites in place.
pub struct DuckDbStore {
    conn: Connection,
}

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS products (
    barcode BIGINT PRIMARY KEY,
    name TEXT NOT NULL,
    kcal_per_100g INTEGER NOT NULL,
    origin_country TEXT NOT NULL,
    ingredients TEXT NOT NULL
)";

impl DuckDbStore {
    /// Open an in-memory store. Contents are lost on drop.
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    /// Open (creating if needed) a store at the given database path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::init(Connection::open(path)?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(CREATE_TABLE)?;
        Ok(Self { conn })
    }

    /// Number of stored products.
    pub fn count(&self) -> Result<i64> {
        let mut stmt = self.conn.prepare("SELECT COUNT(*) FROM products")?;
        let n = stmt.query_row([], |row| row.get(0))?;
        Ok(n)
    }

    /// Look up one product by barcode.
    pub fn get(&self, barcode: i64) -> Result<Option<Product>> {
        let mut stmt = self.conn.prepare(
            "SELECT barcode, name, kcal_per_100g, origin_country, ingredients \
             FROM products WHERE barcode = ?",
        )?;
        let mut rows = stmt.query(params![barcode])?;
        match rows.next()? {
            Some(row) => Ok(Some(Product {
                barcode: row.get(0)?,
                name: row.get(1)?,
                kcal_per_100g: row.get(2)?,
                origin_country: row.get(3)?,
                ingredients: row.get(4)?,
            })),
            None => Ok(None),
        }
    }

    /// Access the underlying DuckDB connection for advanced usage.
    pub fn raw(&self) -> &Connection {
        &self.conn
    }
}

impl ProductStore for DuckDbStore {
    /// Row-at-a-time upsert inside one transaction, so duplicate barcodes
    /// within a single batch resolve last-write-wins.
    fn upsert_all(&mut self, products: &[Product]) -> Result<usize> {
        if products.is_empty() {
            return Ok(0);
        }

        self.conn.execute_batch("BEGIN TRANSACTION")?;
        let result = (|| -> Result<usize> {
            let mut stmt = self.conn.prepare(
                "INSERT INTO products (barcode, name, kcal_per_100g, origin_country, ingredients) \
                 VALUES (?, ?, ?, ?, ?) \
                 ON CONFLICT (barcode) DO UPDATE SET \
                     name = excluded.name, \
                     kcal_per_100g = excluded.kcal_per_100g, \
                     origin_country = excluded.origin_country, \
                     ingredients = excluded.ingredients",
            )?;
            for product in products {
                stmt.execute(params![
                    product.barcode,
                    product.name,
                    product.kcal_per_100g,
                    product.origin_country,
                    product.ingredients,
                ])?;
            }
            Ok(products.len())
        })();

        match result {
            Ok(n) => {
                self.conn.execute_batch("COMMIT")?;
                debug!(rows = n, "batch committed");
                Ok(n)
            }
            Err(e) => {
                // Roll back so a failed batch leaves no partial rows behind
                let _ = self.conn.execute_batch("ROLLBACK");
                Err(e)
            }
        }
    }
}
