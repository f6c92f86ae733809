use anyhow::Result;
use comfy_table::Cell;
use fishdex_core::domain::CatchRow;
use fishdex_core::error::ErrorKind;
use fishdex_core::views::TableRow;
use fishdex_core::FishDex;

use super::{new_table, sort_by_name};

pub fn run(dex: &FishDex, filter: Option<&str>, sort: Option<&str>, desc: bool, photos: bool) -> Result<()> {
    let rows = dex.list_catches(filter)?;
    let rows = sort_by_name(rows, sort, desc)?;

    if rows.is_empty() {
        println!("No catches found. Record one with `fishdex log`.");
        return Ok(());
    }

    let mut headers: Vec<&str> = CatchRow::COLUMNS.to_vec();
    headers.insert(1, "Photo");
    let mut table = new_table(&headers);

    for row in &rows {
        let mut cells: Vec<Cell> = row.cells().into_iter().map(Cell::new).collect();
        cells.insert(1, Cell::new(photo_cell(dex, row, photos)?));
        table.add_row(cells);
    }

    println!("{table}");
    println!("  {} catches", rows.len());
    Ok(())
}

/// A corrupted photo only marks its own row.
fn photo_cell(dex: &FishDex, row: &CatchRow, decode: bool) -> Result<String> {
    if !row.has_photo {
        return Ok("-".to_string());
    }
    if !decode {
        return Ok("[Photo]".to_string());
    }
    match dex.photo_info(row.catch_id) {
        Ok(Some(info)) => Ok(info.to_string()),
        Ok(None) => Ok("-".to_string()),
        Err(e) if e.kind() == ErrorKind::Decode => Ok("[unreadable]".to_string()),
        Err(e) => Err(e.into()),
    }
}
