use std::cmp::Ordering;

use chrono::NaiveDateTime;

use crate::domain::{format_datetime, CatchRow, SpeciesRow, UNKNOWN};

/// A flat row the front end renders as a table line.
pub trait TableRow {
    /// Column headers, in display order.
    const COLUMNS: &'static [&'static str];

    /// Text of every displayed field, aligned with `COLUMNS`.
    fn cells(&self) -> Vec<String>;
}

impl TableRow for CatchRow {
    const COLUMNS: &'static [&'static str] = &[
        "Catch ID",
        "Common Name",
        "Scientific Name",
        "Datetime Caught",
        "Location",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.catch_id.to_string(),
            self.common_name.clone(),
            self.scientific_name.clone(),
            datetime_cell(self.caught_at.as_ref()),
            self.location_name.clone(),
        ]
    }
}

impl TableRow for SpeciesRow {
    const COLUMNS: &'static [&'static str] = &[
        "Species ID",
        "Common Name",
        "Scientific Name",
        "Quantity Caught",
        "Order Discovered",
        "First Caught Date",
        "First Location Discovered",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.species_id.to_string(),
            self.common_name.clone(),
            self.scientific_name.clone(),
            self.quantity_caught.to_string(),
            self.order_discovered.to_string(),
            datetime_cell(self.first_caught.as_ref()),
            self.first_location.clone(),
        ]
    }
}

fn datetime_cell(dt: Option<&NaiveDateTime>) -> String {
    dt.map(format_datetime).unwrap_or_else(|| UNKNOWN.to_string())
}

/// Keep rows where any cell contains `filter`, ignoring case.
/// A blank filter keeps every row in its original order.
pub fn filter_rows<R: TableRow>(rows: Vec<R>, filter: &str) -> Vec<R> {
    if filter.trim().is_empty() {
        return rows;
    }
    let needle = filter.to_lowercase();
    rows.into_iter()
        .filter(|row| row.cells().iter().any(|cell| cell.to_lowercase().contains(&needle)))
        .collect()
}

/// Look up a column index by header name, ignoring case and surrounding space.
pub fn column_index<R: TableRow>(name: &str) -> Option<usize> {
    let name = name.trim();
    R::COLUMNS.iter().position(|c| c.eq_ignore_ascii_case(name))
}

/// Stable sort by one column. Numeric if every value in the column parses
/// as a number, case-insensitive text otherwise.
pub fn sort_rows<R: TableRow>(rows: Vec<R>, column: usize, descending: bool) -> Vec<R> {
    if column >= R::COLUMNS.len() {
        return rows;
    }

    let keys: Vec<String> = rows.iter().map(|row| row.cells().swap_remove(column)).collect();
    let numbers: Option<Vec<f64>> = keys.iter().map(|k| k.trim().parse::<f64>().ok()).collect();
    let keys: Vec<SortKey> = match numbers {
        Some(numbers) => numbers.into_iter().map(SortKey::Number).collect(),
        None => keys.into_iter().map(|k| SortKey::Text(k.to_lowercase())).collect(),
    };

    let mut keyed: Vec<(SortKey, R)> = keys.into_iter().zip(rows).collect();
    keyed.sort_by(|(a, _), (b, _)| {
        let ord = a.compare(b);
        if descending {
            ord.reverse()
        } else {
            ord
        }
    });
    keyed.into_iter().map(|(_, row)| row).collect()
}

enum SortKey {
    Number(f64),
    Text(String),
}

impl SortKey {
    fn compare(&self, other: &SortKey) -> Ordering {
        match (self, other) {
            (SortKey::Number(a), SortKey::Number(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
            // A column is keyed one way or the other, never mixed.
            _ => Ordering::Equal,
        }
    }
}
