//! Database schema definitions

/// SQL to create the shops table
pub const CREATE_SHOPS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS shops (
    shop_id INTEGER PRIMARY KEY AUTOINCREMENT,
    shop_title TEXT NOT NULL
)
"#;

/// SQL to create the products table
pub const CREATE_PRODS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS prods (
    prod_id INTEGER PRIMARY KEY AUTOINCREMENT,
    prod_name TEXT NOT NULL,
    shop_id INTEGER NOT NULL,
    prod_cost REAL NOT NULL,
    FOREIGN KEY(shop_id) REFERENCES shops(shop_id)
)
"#;

/// SQL to create indexes
pub const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_shops_title ON shops(shop_title)",
    "CREATE INDEX IF NOT EXISTS idx_prods_shop ON prods(shop_id)",
];

/// Connection-level settings applied before anything else
pub const CONNECTION_PRAGMAS: &str = "PRAGMA foreign_keys = ON;";

/// All schema creation statements
pub fn all_schema_statements() -> Vec<&'static str> {
    let mut stmts = vec![CREATE_SHOPS_TABLE, CREATE_PRODS_TABLE];
    stmts.extend(CREATE_INDEXES.iter().copied());
    stmts
}
