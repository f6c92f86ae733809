use anyhow::Result;
use comfy_table::Cell;
use fishdex_core::domain::SpeciesRow;
use fishdex_core::views::TableRow;
use fishdex_core::FishDex;

use super::{new_table, sort_by_name};

pub fn run(dex: &FishDex, filter: Option<&str>, sort: Option<&str>, desc: bool) -> Result<()> {
    let rows = dex.list_species(filter)?;
    let rows = sort_by_name(rows, sort, desc)?;

    if rows.is_empty() {
        println!("No species found.");
        return Ok(());
    }

    let mut table = new_table(SpeciesRow::COLUMNS);
    for row in &rows {
        table.add_row(row.cells().into_iter().map(Cell::new).collect::<Vec<_>>());
    }

    let total: i64 = rows.iter().map(|r| r.quantity_caught).sum();
    println!("{table}");
    println!("  {} species, {} fish", rows.len(), total);
    Ok(())
}
