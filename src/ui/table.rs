use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Segment},
};

use crate::product::{ProductRow, format_cost};

/// Column widths for product, shop and cost
pub const COLUMN_WIDTHS: [usize; 3] = [25, 15, 14];

/// Printed instead of a table when there is nothing to show
pub const EMPTY_PLACEHOLDER: &str = "Список продуктов пуст.";

#[derive(Tabled)]
pub struct ProductTableRow {
    #[tabled(rename = "Товар")]
    pub name: String,
    #[tabled(rename = "Магазин")]
    pub shop: String,
    #[tabled(rename = "Стоимость")]
    pub cost: String,
}

impl From<&ProductRow> for ProductTableRow {
    fn from(row: &ProductRow) -> Self {
        let [name_w, shop_w, cost_w] = COLUMN_WIDTHS;
        Self {
            name: format!("{:^name_w$}", row.name),
            shop: format!("{:^shop_w$}", row.shop),
            cost: format!("{:^cost_w$}", format_cost(row.cost)),
        }
    }
}

/// Render products as a bordered table: a border line above and below the
/// header and after every row, each cell centered in its column.
pub fn products_table(rows: &[ProductRow]) -> String {
    if rows.is_empty() {
        return EMPTY_PLACEHOLDER.to_string();
    }

    Table::new(rows.iter().map(ProductTableRow::from))
        .with(Style::ascii())
        .with(Modify::new(Segment::all()).with(Alignment::center()))
        .to_string()
}

pub fn print_products(rows: &[ProductRow]) {
    println!("{}", products_table(rows));
}
