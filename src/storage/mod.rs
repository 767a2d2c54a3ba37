//! Storage Layer - SQLite-backed persistence
//!
//! System of record is SQLite with tables:
//! - shops(shop_id, shop_title)
//! - prods(prod_id, prod_name, shop_id -> shops, prod_cost)

pub mod schema;
pub mod sqlite;

pub use sqlite::{AddedProduct, ProductStore};
