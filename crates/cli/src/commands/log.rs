use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use fishdex_core::domain::{CatchRequest, DATETIME_FORMAT};
use fishdex_core::error::ErrorKind;
use fishdex_core::FishDex;

pub fn run(
    dex: &mut FishDex,
    species: String,
    location: String,
    at: Option<String>,
    photo: Option<PathBuf>,
) -> Result<()> {
    let photo = match photo {
        Some(path) => Some(
            std::fs::read(&path).with_context(|| format!("cannot read photo {}", path.display()))?,
        ),
        None => None,
    };
    let caught_at = at.unwrap_or_else(|| chrono::Local::now().format(DATETIME_FORMAT).to_string());

    let request = CatchRequest {
        species_id: species,
        location_name: location,
        caught_at,
        photo,
    };

    let record = match dex.record_catch(&request) {
        Ok(record) => record,
        Err(e) => match e.kind() {
            ErrorKind::Validation => bail!("Invalid entry: {e}"),
            ErrorKind::Persistence | ErrorKind::Decode | ErrorKind::NotFound => {
                bail!("Failed to add entry: {e}")
            }
        },
    };

    let name = dex
        .reference(record.species_id)?
        .and_then(|r| r.common_name.or(Some(r.scientific_name)))
        .unwrap_or_else(|| record.species_id.to_string());
    println!("Logged catch #{}: {}", record.id, name);

    if let Some(agg) = dex.species_aggregate(record.species_id)? {
        if agg.quantity_caught == 1 {
            println!("New species! Discovery #{}", agg.order_discovered);
        } else {
            println!("{} caught so far", agg.quantity_caught);
        }
    }
    Ok(())
}
