pub mod icons;
pub mod output;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{error, info, success, warn};
pub use table::{print_products, products_table, ProductTableRow};
pub use theme::{theme, Theme};
