pub mod catches;
pub mod config;
pub mod log;
pub mod photo;
pub mod reference;
pub mod species;
pub mod status;

use anyhow::{bail, Result};
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use fishdex_core::views::{self, TableRow};

/// Re-sort rows by a named column, the way a clicked table header would.
pub(crate) fn sort_by_name<R: TableRow>(rows: Vec<R>, column: Option<&str>, desc: bool) -> Result<Vec<R>> {
    let Some(name) = column else {
        return Ok(rows);
    };
    match views::column_index::<R>(name) {
        Some(idx) => Ok(views::sort_rows(rows, idx, desc)),
        None => bail!(
            "unknown column {name:?}, expected one of: {}",
            R::COLUMNS.join(", ")
        ),
    }
}

pub(crate) fn new_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(headers.iter().map(|h| Cell::new(h)).collect::<Vec<_>>());
    table
}
