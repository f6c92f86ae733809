use std::path::PathBuf;

use anyhow::Result;
use comfy_table::Cell;
use fishdex_core::domain::{ReferenceField, ReferenceSpecies};
use fishdex_core::{FishDex, ImportProgress};
use indicatif::{ProgressBar, ProgressStyle};

use super::new_table;

pub fn import(dex: &mut FishDex, path: PathBuf) -> Result<()> {
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("=>-"),
    );

    let report = dex.import_reference(
        &path,
        Some(&mut |progress| match progress {
            ImportProgress::Start { total } => {
                pb.set_length(total as u64);
                pb.set_position(0);
                pb.set_message("Importing reference species...");
            }
            ImportProgress::Inserted { .. } => pb.inc(1),
            ImportProgress::Skipped { id } => {
                pb.inc(1);
                pb.set_message(format!("skipped duplicate ID {id}"));
            }
            ImportProgress::Complete { inserted, skipped } => {
                pb.finish_with_message(format!("{inserted} imported, {skipped} skipped"));
            }
        }),
    )?;

    for id in &report.skipped_ids {
        println!("Skipping duplicate ID: {id}");
    }
    println!(
        "Imported {} species from {}.",
        report.inserted,
        path.display()
    );
    Ok(())
}

pub fn search(dex: &FishDex, text: &str, scientific: bool) -> Result<()> {
    let field = if scientific {
        ReferenceField::ScientificName
    } else {
        ReferenceField::CommonName
    };
    let hits = dex.search_reference(field, text)?;

    if hits.is_empty() {
        println!("No reference species match {text:?}.");
        return Ok(());
    }

    let mut table = new_table(&["ID", "Common Name", "Scientific Name"]);
    for species in &hits {
        table.add_row(vec![
            Cell::new(species.id),
            Cell::new(species.common_name.as_deref().unwrap_or("-")),
            Cell::new(&species.scientific_name),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn show(dex: &FishDex, id: i64) -> Result<()> {
    match dex.reference(id)? {
        Some(species) => print_species(&species),
        None => println!("No reference species with ID {id}."),
    }
    Ok(())
}

fn print_species(species: &ReferenceSpecies) {
    let or_dash = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());
    println!("Species #{}", species.id);
    println!("{}", "-".repeat(40));
    println!("  Common name:     {}", or_dash(&species.common_name));
    println!("  Scientific name: {}", species.scientific_name);
    println!("  Image:           {}", or_dash(&species.image_link));
    println!("  Info:            {}", or_dash(&species.fish_link));
}
