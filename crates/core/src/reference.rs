use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::domain::ReferenceSpecies;
use crate::error::{Error, Result};

/// Progress events for a reference import.
pub enum ImportProgress {
    /// File parsed; `total` records will be offered to the catalog.
    Start { total: usize },
    /// A record was added.
    Inserted { id: i64 },
    /// A record was skipped because its ID is already present.
    Skipped { id: i64 },
    /// Import committed.
    Complete { inserted: usize, skipped: usize },
}

/// Parse a reference file: a JSON array of
/// `{ID, scientificName, commonName, imageLink, fishLink}` objects.
pub fn load_reference_file(path: &Path) -> Result<Vec<ReferenceSpecies>> {
    let file = File::open(path)?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| Error::ReferenceJson {
        path: path.to_path_buf(),
        source,
    })
}
