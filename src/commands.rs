use crate::{OutputMode, emit_success};
use anyhow::Context;
use products::config::{resolve_database_path, ProductsConfig};
use products::ui::{self, Icons};
use products::storage::AddedProduct;
use products::{ProductRow, ProductStore};
use std::path::PathBuf;

/// Resolve the database path and open the store; the schema is created on open.
pub fn open_store(db: Option<PathBuf>, config: Option<&ProductsConfig>) -> anyhow::Result<ProductStore> {
    let path = resolve_database_path(db, config)?;
    tracing::debug!("Using database {}", path.display());
    ProductStore::open(&path).with_context(|| format!("failed to open database {}", path.display()))
}

pub fn run_add(
    store: &mut ProductStore,
    name: &str,
    shop: &str,
    cost: f64,
    output_mode: OutputMode,
) -> anyhow::Result<()> {
    if shop.is_empty() && output_mode.is_human() {
        ui::warn("Shop title is empty");
    }
    let added = store.add_product(name, shop, cost)?;

    if output_mode.is_human() {
        if added.shop_created {
            ui::info(Icons::SHOP, "New shop", shop);
        }
        ui::success(&format!("Added '{}' from '{}' for {}", name, shop, products::product::format_cost(cost)));
    } else {
        emit_success(output_mode, "add", add_payload(&added))?;
    }
    Ok(())
}

pub fn run_list(store: &ProductStore, output_mode: OutputMode) -> anyhow::Result<()> {
    let rows = store.list_all()?;
    present(&rows, "list", output_mode)
}

pub fn run_select(store: &ProductStore, shop: &str, output_mode: OutputMode) -> anyhow::Result<()> {
    let rows = store.list_by_shop(shop)?;
    present(&rows, "select", output_mode)
}

/// JSON data reported for a newly added product
pub fn add_payload(added: &AddedProduct) -> serde_json::Value {
    serde_json::json!({
        "product_id": added.product_id,
        "shop_id": added.shop_id,
        "shop_created": added.shop_created,
    })
}

fn present(rows: &[ProductRow], command: &str, output_mode: OutputMode) -> anyhow::Result<()> {
    if output_mode.is_human() {
        ui::print_products(rows);
    } else {
        emit_success(output_mode, command, serde_json::to_value(rows)?)?;
    }
    Ok(())
}
