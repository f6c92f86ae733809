use anyhow::Result;
use fishdex_core::FishDex;

pub fn show(dex: &FishDex) -> Result<()> {
    println!("Photo size: {} px (longest side)", dex.photo_max_dimension()?);
    Ok(())
}

pub fn photo_size(dex: &FishDex, pixels: u32) -> Result<()> {
    dex.set_photo_max_dimension(pixels)?;
    println!("New photos will be scaled to at most {pixels} px.");
    Ok(())
}
