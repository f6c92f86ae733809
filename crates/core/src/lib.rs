pub mod catalog;
pub mod domain;
pub mod error;
pub mod ingest;
pub mod photo;
pub mod reference;
pub mod views;

use std::path::Path;

use chrono::{Local, NaiveDateTime};
use tracing::warn;

use catalog::Catalog;
use domain::*;
use error::{Error, Result, ValidationError};

pub use reference::ImportProgress;

const PHOTO_MAX_DIMENSION_KEY: &str = "photo_max_dimension";

/// The main entry point for the FishDex library. Owns the catalog
/// connection; front ends hold one of these and call through it.
pub struct FishDex {
    catalog: Catalog,
}

impl FishDex {
    /// Open or create a catalog at the given path.
    pub fn open(catalog_path: &Path) -> Result<Self> {
        let catalog = Catalog::open(catalog_path)?;
        Ok(Self { catalog })
    }

    /// Open a throwaway in-memory catalog.
    pub fn open_in_memory() -> Result<Self> {
        let catalog = Catalog::open_in_memory()?;
        Ok(Self { catalog })
    }

    // ── Catches ──────────────────────────────────────────────────────

    /// Validate and store one catch, checked against the local clock.
    pub fn record_catch(&mut self, request: &CatchRequest) -> Result<CatchRecord> {
        self.record_catch_at(request, Local::now().naive_local())
    }

    /// Validate and store one catch, treating `now` as the moment of entry.
    pub fn record_catch_at(&mut self, request: &CatchRequest, now: NaiveDateTime) -> Result<CatchRecord> {
        let max_dim = self.photo_max_dimension()?;
        let entry = ingest::validate(request, now, max_dim)?;
        self.catalog.record_catch(&entry)
    }

    /// Catch log, newest first, optionally narrowed by a substring filter.
    pub fn list_catches(&self, filter: Option<&str>) -> Result<Vec<CatchRow>> {
        let rows = self.catalog.list_catches()?;
        Ok(views::filter_rows(rows, filter.unwrap_or("")))
    }

    /// Species list, latest discovery first, optionally narrowed by a substring filter.
    pub fn list_species(&self, filter: Option<&str>) -> Result<Vec<SpeciesRow>> {
        let rows = self.catalog.list_species()?;
        Ok(views::filter_rows(rows, filter.unwrap_or("")))
    }

    pub fn species_aggregate(&self, species_id: i64) -> Result<Option<SpeciesAggregate>> {
        self.catalog.get_species_aggregate(species_id)
    }

    // ── Photos ───────────────────────────────────────────────────────

    /// Stored (normalized) photo bytes for a catch.
    pub fn catch_photo(&self, catch_id: i64) -> Result<Option<Vec<u8>>> {
        self.catalog.get_catch_photo(catch_id)
    }

    /// Decode a catch's photo. A corrupted payload fails for this catch only.
    pub fn photo_info(&self, catch_id: i64) -> Result<Option<PhotoInfo>> {
        let Some(bytes) = self.catalog.get_catch_photo(catch_id)? else {
            return Ok(None);
        };
        match photo::info(&bytes) {
            Ok(info) => Ok(Some(info)),
            Err(source) => {
                warn!(catch_id, error = %source, "stored photo does not decode");
                Err(Error::PhotoDecode { catch_id, source })
            }
        }
    }

    // ── Reference catalog ────────────────────────────────────────────

    /// Load a reference JSON file. IDs already present are skipped and reported.
    pub fn import_reference(
        &mut self,
        path: &Path,
        progress_cb: Option<&mut dyn FnMut(ImportProgress)>,
    ) -> Result<ImportReport> {
        let records = reference::load_reference_file(path)?;
        self.catalog.import_reference_batch(&records, progress_cb)
    }

    pub fn reference(&self, id: i64) -> Result<Option<ReferenceSpecies>> {
        self.catalog.get_reference(id)
    }

    pub fn search_reference(&self, field: ReferenceField, text: &str) -> Result<Vec<ReferenceSpecies>> {
        self.catalog.search_reference(field, text)
    }

    // ── Status & settings ────────────────────────────────────────────

    pub fn status(&self) -> Result<CatalogStats> {
        self.catalog.stats_summary()
    }

    /// Longest side, in pixels, that stored photos are bounded to.
    pub fn photo_max_dimension(&self) -> Result<u32> {
        let stored = self.catalog.get_config(PHOTO_MAX_DIMENSION_KEY)?;
        Ok(stored
            .and_then(|v| v.parse().ok())
            .unwrap_or(photo::DEFAULT_MAX_DIMENSION))
    }

    pub fn set_photo_max_dimension(&self, pixels: u32) -> Result<()> {
        if !(photo::MIN_DIMENSION..=photo::MAX_DIMENSION).contains(&pixels) {
            return Err(ValidationError::PhotoDimensionOutOfRange {
                value: pixels,
                min: photo::MIN_DIMENSION,
                max: photo::MAX_DIMENSION,
            }
            .into());
        }
        self.catalog
            .set_config(PHOTO_MAX_DIMENSION_KEY, &pixels.to_string())
    }
}
