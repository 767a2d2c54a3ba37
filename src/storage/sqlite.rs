//! SQLite storage implementation

use std::path::Path;
use std::time::Duration;
use rusqlite::{Connection, OptionalExtension, Transaction, TransactionBehavior, params};
use crate::{Error, Result};
use crate::product::{Product, ProductRow, Shop};
use super::schema;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite-backed storage for shops and products
pub struct ProductStore {
    conn: Connection,
}

/// Identifiers produced by a single `add_product` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddedProduct {
    pub product_id: i64,
    pub shop_id: i64,
    pub shop_created: bool,
}

impl ProductStore {
    /// Open a database file (creates if doesn't exist) and initialize the schema
    pub fn open(path: &Path) -> Result<Self> {
        let unavailable = |source| Error::StorageUnavailable {
            path: path.to_path_buf(),
            source,
        };

        let conn = Connection::open(path).map_err(unavailable)?;
        conn.busy_timeout(BUSY_TIMEOUT).map_err(unavailable)?;
        let store = Self { conn };
        store.initialize_schema().map_err(|err| match err {
            Error::Storage(source) => unavailable(source),
            other => other,
        })?;
        tracing::debug!("Opened product store at {}", path.display());
        Ok(store)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Ensure the shops and prods tables exist. Safe to call any number of times.
    pub fn initialize_schema(&self) -> Result<()> {
        self.conn.execute_batch(schema::CONNECTION_PRAGMAS)?;
        for stmt in schema::all_schema_statements() {
            self.conn.execute(stmt, [])?;
        }
        tracing::debug!("Schema initialized");
        Ok(())
    }

    // ========== Shop Operations ==========

    /// Return the id of the shop titled `title`, creating the shop on first use
    pub fn resolve_shop(&mut self, title: &str) -> Result<i64> {
        let tx = self.conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let (shop_id, _) = resolve_shop_tx(&tx, title)?;
        tx.commit()?;
        Ok(shop_id)
    }

    /// Find a shop by exact title
    pub fn find_shop(&self, title: &str) -> Result<Option<Shop>> {
        self.conn
            .query_row(
                "SELECT shop_id, shop_title FROM shops WHERE shop_title = ?1 ORDER BY shop_id LIMIT 1",
                [title],
                |row| {
                    Ok(Shop {
                        id: row.get(0)?,
                        title: row.get(1)?,
                    })
                },
            )
            .optional()
            .map_err(Into::into)
    }

    /// Count all shops
    pub fn count_shops(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM shops", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    // ========== Product Operations ==========

    /// Resolve the shop and append a product referencing it, committed as one unit.
    ///
    /// The write lock is taken before the shop lookup, so concurrent invocations
    /// adding under the same new title cannot both create a shop row.
    pub fn add_product(&mut self, name: &str, shop: &str, cost: f64) -> Result<AddedProduct> {
        let tx = self.conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let (shop_id, shop_created) = resolve_shop_tx(&tx, shop)?;
        let product_id = insert_product_tx(&tx, name, shop_id, cost)?;
        tx.commit()?;

        tracing::info!("Added product '{}' ({}) to shop '{}'", name, cost, shop);
        Ok(AddedProduct {
            product_id,
            shop_id,
            shop_created,
        })
    }

    /// Insert a product row for an already-known shop id
    pub fn insert_product(&self, name: &str, shop_id: i64, cost: f64) -> Result<i64> {
        let tx = self.conn.unchecked_transaction()?;
        let product_id = insert_product_tx(&tx, name, shop_id, cost)?;
        tx.commit()?;
        Ok(product_id)
    }

    /// Get a stored product by id
    pub fn get_product(&self, id: i64) -> Result<Option<Product>> {
        self.conn
            .query_row(
                "SELECT prod_id, prod_name, shop_id, prod_cost FROM prods WHERE prod_id = ?1",
                [id],
                |row| {
                    Ok(Product {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        shop_id: row.get(2)?,
                        cost: row.get(3)?,
                    })
                },
            )
            .optional()
            .map_err(Into::into)
    }

    /// Count all products
    pub fn count_products(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM prods", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    // ========== Listing ==========

    /// All products joined with their shop titles, in storage order
    pub fn list_all(&self) -> Result<Vec<ProductRow>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT prods.prod_name, shops.shop_title, prods.prod_cost
            FROM prods
            INNER JOIN shops ON shops.shop_id = prods.shop_id
            "#,
        )?;

        let rows = stmt
            .query_map([], row_to_product_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// Products whose shop title equals `title` exactly (case-sensitive)
    pub fn list_by_shop(&self, title: &str) -> Result<Vec<ProductRow>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT prods.prod_name, shops.shop_title, prods.prod_cost
            FROM prods
            INNER JOIN shops ON shops.shop_id = prods.shop_id
            WHERE shops.shop_title = ?1
            "#,
        )?;

        let rows = stmt
            .query_map([title], row_to_product_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        tracing::debug!("Selected {} products for shop '{}'", rows.len(), title);
        Ok(rows)
    }
}

fn resolve_shop_tx(tx: &Transaction<'_>, title: &str) -> rusqlite::Result<(i64, bool)> {
    let existing: Option<i64> = tx
        .query_row(
            "SELECT shop_id FROM shops WHERE shop_title = ?1 ORDER BY shop_id LIMIT 1",
            [title],
            |row| row.get(0),
        )
        .optional()?;

    if let Some(shop_id) = existing {
        tracing::debug!("Reusing shop '{}' (id {})", title, shop_id);
        return Ok((shop_id, false));
    }

    tx.execute("INSERT INTO shops (shop_title) VALUES (?1)", [title])?;
    let shop_id = tx.last_insert_rowid();
    tracing::debug!("Created shop '{}' (id {})", title, shop_id);
    Ok((shop_id, true))
}

fn insert_product_tx(tx: &Transaction<'_>, name: &str, shop_id: i64, cost: f64) -> rusqlite::Result<i64> {
    tx.execute(
        "INSERT INTO prods (prod_name, shop_id, prod_cost) VALUES (?1, ?2, ?3)",
        params![name, shop_id, cost],
    )?;
    Ok(tx.last_insert_rowid())
}

fn row_to_product_row(row: &rusqlite::Row) -> rusqlite::Result<ProductRow> {
    Ok(ProductRow {
        name: row.get(0)?,
        shop: row.get(1)?,
        cost: row.get(2)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn populated_store() -> ProductStore {
        let mut store = ProductStore::open_in_memory().unwrap();
        store.add_product("хлеб", "магнит", 30.0).unwrap();
        store.add_product("ноутбук", "ситилинк", 50000.0).unwrap();
        store.add_product("макароны", "магнит", 44.4).unwrap();
        store
    }

    fn table_count(store: &ProductStore) -> i64 {
        store
            .conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('shops', 'prods')",
                [],
                |row| row.get(0),
            )
            .unwrap()
    }

    #[test]
    fn test_open_creates_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test.db");
        assert!(!path.exists());

        let store = ProductStore::open(&path).unwrap();
        assert!(path.is_file());
        assert_eq!(table_count(&store), 2);
    }

    #[test]
    fn test_schema_init_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test.db");

        let mut store = ProductStore::open(&path).unwrap();
        store.add_product("молоко", "пятерочка", 55.9).unwrap();
        store.initialize_schema().unwrap();
        store.initialize_schema().unwrap();
        drop(store);

        let store = ProductStore::open(&path).unwrap();
        assert_eq!(table_count(&store), 2);
        assert_eq!(store.count_products().unwrap(), 1);
    }

    #[test]
    fn test_open_missing_directory_is_unavailable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("test.db");

        let err = ProductStore::open(&path).err().unwrap();
        match err {
            Error::StorageUnavailable { path: p, .. } => assert_eq!(p, path),
            other => panic!("expected StorageUnavailable, got {other:?}"),
        }
    }

    #[test]
    fn test_add_product_round_trip() {
        let mut store = ProductStore::open_in_memory().unwrap();
        store.add_product("молоко", "пятерочка", 55.9).unwrap();

        let row: (i64, String, i64, f64) = store
            .conn
            .query_row("SELECT * FROM prods", [], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
            })
            .unwrap();
        assert_eq!(row, (1, "молоко".to_string(), 1, 55.9));

        let shop: String = store
            .conn
            .query_row("SELECT shop_title FROM shops WHERE shop_id = ?1", [row.2], |r| r.get(0))
            .unwrap();
        assert_eq!(shop, "пятерочка");
    }

    #[test]
    fn test_shop_deduplication() {
        let mut store = ProductStore::open_in_memory().unwrap();
        let first = store.add_product("хлеб", "магнит", 30.0).unwrap();
        let second = store.add_product("макароны", "магнит", 44.4).unwrap();

        assert!(first.shop_created);
        assert!(!second.shop_created);
        assert_eq!(first.shop_id, second.shop_id);
        assert_ne!(first.product_id, second.product_id);
        assert_eq!(store.count_shops().unwrap(), 1);
        assert_eq!(store.count_products().unwrap(), 2);

        let p1 = store.get_product(first.product_id).unwrap().unwrap();
        let p2 = store.get_product(second.product_id).unwrap().unwrap();
        assert_eq!(p1.shop_id, p2.shop_id);
    }

    #[test]
    fn test_duplicate_products_accumulate() {
        let mut store = ProductStore::open_in_memory().unwrap();
        store.add_product("хлеб", "магнит", 30.0).unwrap();
        store.add_product("хлеб", "магнит", 30.0).unwrap();

        assert_eq!(store.count_products().unwrap(), 2);
        assert_eq!(store.list_all().unwrap().len(), 2);
    }

    #[test]
    fn test_resolve_shop_get_or_create() {
        let mut store = ProductStore::open_in_memory().unwrap();
        let id = store.resolve_shop("магнит").unwrap();
        assert_eq!(store.resolve_shop("магнит").unwrap(), id);
        assert_ne!(store.resolve_shop("ситилинк").unwrap(), id);

        let shop = store.find_shop("магнит").unwrap().unwrap();
        assert_eq!(shop, Shop { id, title: "магнит".to_string() });
        assert!(store.find_shop("пятерочка").unwrap().is_none());
    }

    #[test]
    fn test_empty_shop_title_is_accepted() {
        let mut store = ProductStore::open_in_memory().unwrap();
        store.add_product("вода", "", 12.5).unwrap();

        let rows = store.list_by_shop("").unwrap();
        assert_eq!(rows, vec![ProductRow::new("вода", "", 12.5)]);
    }

    #[test]
    fn test_list_all_keeps_insertion_order() {
        let store = populated_store();
        let rows = store.list_all().unwrap();
        assert_eq!(
            rows,
            vec![
                ProductRow::new("хлеб", "магнит", 30.0),
                ProductRow::new("ноутбук", "ситилинк", 50000.0),
                ProductRow::new("макароны", "магнит", 44.4),
            ]
        );
    }

    #[test]
    fn test_list_by_shop_filters() {
        let store = populated_store();
        let rows = store.list_by_shop("магнит").unwrap();
        assert_eq!(
            rows,
            vec![
                ProductRow::new("хлеб", "магнит", 30.0),
                ProductRow::new("макароны", "магнит", 44.4),
            ]
        );
        assert!(rows.iter().all(|r| r.name != "ноутбук"));
    }

    #[test]
    fn test_list_by_shop_is_exact_match() {
        let store = populated_store();
        assert!(store.list_by_shop("Магнит").unwrap().is_empty());
        assert!(store.list_by_shop("маг").unwrap().is_empty());
    }

    #[test]
    fn test_list_by_unknown_shop_is_empty() {
        let store = populated_store();
        assert!(store.list_by_shop("несуществующий").unwrap().is_empty());
    }

    #[test]
    fn test_list_empty_store() {
        let store = ProductStore::open_in_memory().unwrap();
        assert!(store.list_all().unwrap().is_empty());
    }

    #[test]
    fn test_dangling_shop_reference_is_rejected() {
        let store = ProductStore::open_in_memory().unwrap();
        let err = store.insert_product("призрак", 42, 1.0).unwrap_err();
        assert!(err.is_constraint_violation(), "unexpected error: {err:?}");
        assert_eq!(store.count_products().unwrap(), 0);
    }

    #[test]
    fn test_insert_product_for_known_shop() {
        let mut store = ProductStore::open_in_memory().unwrap();
        let shop_id = store.resolve_shop("магнит").unwrap();
        let id = store.insert_product("сыр", shop_id, 250.0).unwrap();

        let product = store.get_product(id).unwrap().unwrap();
        assert_eq!(product.name, "сыр");
        assert_eq!(product.shop_id, shop_id);
        assert!((product.cost - 250.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_writes_are_durable_across_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test.db");

        {
            let mut store = ProductStore::open(&path).unwrap();
            store.add_product("хлеб", "магнит", 30.0).unwrap();
        }
        {
            let mut store = ProductStore::open(&path).unwrap();
            let added = store.add_product("макароны", "магнит", 44.4).unwrap();
            assert!(!added.shop_created);
        }

        let store = ProductStore::open(&path).unwrap();
        assert_eq!(store.count_shops().unwrap(), 1);
        assert_eq!(store.list_by_shop("магнит").unwrap().len(), 2);
    }

    #[test]
    fn test_concurrent_adds_share_new_shop() {
        const WRITERS: usize = 8;
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test.db");
        ProductStore::open(&path).unwrap();

        let handles: Vec<_> = (0..WRITERS)
            .map(|i| {
                let path = path.clone();
                std::thread::spawn(move || {
                    let mut store = ProductStore::open(&path).unwrap();
                    store.add_product(&format!("товар {i}"), "новый", 1.0).unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let store = ProductStore::open(&path).unwrap();
        assert_eq!(store.count_shops().unwrap(), 1);
        assert_eq!(store.count_products().unwrap(), WRITERS);
        assert_eq!(store.list_by_shop("новый").unwrap().len(), WRITERS);
    }
}
