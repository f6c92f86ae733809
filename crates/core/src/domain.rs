use std::fmt;

use chrono::NaiveDateTime;
use serde::Deserialize;

/// Format used for catch timestamps, both on entry and in storage.
/// Text in this format sorts chronologically.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Placeholder rendered for missing location or reference data.
pub const UNKNOWN: &str = "Unknown";

pub fn format_datetime(dt: &NaiveDateTime) -> String {
    dt.format(DATETIME_FORMAT).to_string()
}

/// Static species metadata, keyed by the external species id.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReferenceSpecies {
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "scientificName")]
    pub scientific_name: String,
    #[serde(rename = "commonName", default)]
    pub common_name: Option<String>,
    #[serde(rename = "imageLink", default)]
    pub image_link: Option<String>,
    #[serde(rename = "fishLink", default)]
    pub fish_link: Option<String>,
}

/// Column a reference search matches against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceField {
    CommonName,
    ScientificName,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub id: i64,
    pub name: String,
}

/// Per-species running summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeciesAggregate {
    pub species_id: i64,
    pub quantity_caught: i64,
    pub order_discovered: i64,
}

/// A stored catch event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatchRecord {
    pub id: i64,
    pub species_id: i64,
    pub caught_at: NaiveDateTime,
    pub location_id: i64,
    pub photo: Option<Vec<u8>>,
}

/// Raw catch entry as collected from a form. Validated by `ingest::validate`.
#[derive(Debug, Clone, Default)]
pub struct CatchRequest {
    pub species_id: String,
    pub location_name: String,
    pub caught_at: String,
    pub photo: Option<Vec<u8>>,
}

/// A catch entry that passed validation. The photo is already normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidCatch {
    pub species_id: i64,
    pub location_name: String,
    pub caught_at: NaiveDateTime,
    pub photo: Option<Vec<u8>>,
}

/// One row of the catch log view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatchRow {
    pub catch_id: i64,
    pub common_name: String,
    pub scientific_name: String,
    /// `None` when the stored timestamp could not be read back.
    pub caught_at: Option<NaiveDateTime>,
    pub location_name: String,
    pub has_photo: bool,
}

/// One row of the species view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeciesRow {
    pub species_id: i64,
    pub common_name: String,
    pub scientific_name: String,
    pub quantity_caught: i64,
    pub order_discovered: i64,
    pub first_caught: Option<NaiveDateTime>,
    pub first_location: String,
}

/// Dimensions of a decoded catch photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhotoInfo {
    pub width: u32,
    pub height: u32,
    pub bytes: usize,
}

impl fmt::Display for PhotoInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Outcome of a reference import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub inserted: usize,
    /// IDs that were already present (or repeated in the file).
    pub skipped_ids: Vec<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogStats {
    pub reference_species: usize,
    pub species_discovered: usize,
    pub total_catches: usize,
    pub total_locations: usize,
}
