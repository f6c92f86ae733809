use std::path::Path;

use anyhow::Result;
use fishdex_core::FishDex;

pub fn run(dex: &FishDex, catalog_path: &Path) -> Result<()> {
    let stats = dex.status()?;

    println!();
    println!("  Catalog    {}", catalog_path.display());
    println!("  -------");
    println!("  Reference species  {:>6}", stats.reference_species);
    println!("  Species caught     {:>6}", stats.species_discovered);
    println!("  Catches            {:>6}", stats.total_catches);
    println!("  Locations          {:>6}", stats.total_locations);
    println!();

    if stats.reference_species == 0 {
        println!("  Reference table is empty. Load one with `fishdex reference import <file>`.");
        println!();
    }
    Ok(())
}
