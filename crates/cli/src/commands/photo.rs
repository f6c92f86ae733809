use std::path::PathBuf;

use anyhow::Result;
use fishdex_core::FishDex;

pub fn run(dex: &FishDex, id: i64, out: Option<PathBuf>) -> Result<()> {
    let Some(bytes) = dex.catch_photo(id)? else {
        println!("Catch #{id} has no photo.");
        return Ok(());
    };

    match out {
        Some(path) => {
            std::fs::write(&path, &bytes)?;
            println!("Wrote {} ({:.1} KB)", path.display(), bytes.len() as f64 / 1024.0);
        }
        None => {
            let info = dex.photo_info(id)?;
            if let Some(info) = info {
                println!(
                    "Catch #{id}: {} JPEG, {:.1} KB",
                    info,
                    info.bytes as f64 / 1024.0
                );
            }
        }
    }
    Ok(())
}
