//! SQL text construction for the session facade.
//!
//! Identifiers (table names, column names, order-by columns) are interpolated
//! as trusted strings, backtick-quoted to dodge reserved-word collisions;
//! values are always bound through `?` placeholders.

mod dml;
mod select;

pub use dml::{build_drop_table, build_insert, build_update};
pub use select::{SelectOptions, build_select_where, build_show_columns};

pub(crate) fn quote_ident(name: &str) -> String {
    format!("`{name}`")
}
