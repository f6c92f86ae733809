pub mod schema;

use std::collections::HashMap;
use std::path::Path;

use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::{debug, info, warn};

use crate::domain::*;
use crate::error::{Error, Result, ValidationError};
use crate::reference::ImportProgress;

/// Rows returned by a reference search.
pub const REFERENCE_SEARCH_LIMIT: usize = 10;

/// Layouts accepted when reading back `datetimeCaught`. Older catalogs may
/// carry seconds; chrono also accepts unpadded fields such as `2024-5-1 8:00`.
const STORED_DATETIME_FORMATS: &[&str] = &[DATETIME_FORMAT, "%Y-%m-%d %H:%M:%S"];

/// SQLite-backed store for locations, species aggregates, catches and the
/// reference species table.
pub struct Catalog {
    conn: Connection,
}

impl Catalog {
    /// Open or create a catalog at the given path with WAL mode.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        schema::initialize(&conn)?;
        schema::migrate(&conn)?;
        debug!(path = %path.display(), "opened catalog");
        Ok(Self { conn })
    }

    /// Open an in-memory catalog (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        schema::initialize(&conn)?;
        schema::migrate(&conn)?;
        Ok(Self { conn })
    }

    // ── Reference species ────────────────────────────────────────────

    /// Insert reference records whose ID is not yet present, in one transaction.
    /// Existing IDs (and IDs repeated within `records`) are skipped and reported.
    pub fn import_reference_batch(
        &mut self,
        records: &[ReferenceSpecies],
        mut progress_cb: Option<&mut dyn FnMut(ImportProgress)>,
    ) -> Result<ImportReport> {
        let tx = self.conn.transaction()?;
        let mut report = ImportReport::default();

        if let Some(ref mut cb) = progress_cb {
            cb(ImportProgress::Start {
                total: records.len(),
            });
        }

        {
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO ReferenceSpecies (ID, scientificName, commonName, imageLink, fishLink)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for record in records {
                let changed = stmt.execute(params![
                    record.id,
                    record.scientific_name,
                    record.common_name,
                    record.image_link,
                    record.fish_link,
                ])?;
                if changed == 0 {
                    debug!(id = record.id, "skipping duplicate reference id");
                    report.skipped_ids.push(record.id);
                    if let Some(ref mut cb) = progress_cb {
                        cb(ImportProgress::Skipped { id: record.id });
                    }
                } else {
                    report.inserted += 1;
                    if let Some(ref mut cb) = progress_cb {
                        cb(ImportProgress::Inserted { id: record.id });
                    }
                }
            }
        }

        tx.commit()?;
        info!(
            inserted = report.inserted,
            skipped = report.skipped_ids.len(),
            "imported reference species"
        );

        if let Some(ref mut cb) = progress_cb {
            cb(ImportProgress::Complete {
                inserted: report.inserted,
                skipped: report.skipped_ids.len(),
            });
        }
        Ok(report)
    }

    pub fn get_reference(&self, id: i64) -> Result<Option<ReferenceSpecies>> {
        let species = self
            .conn
            .query_row(
                "SELECT ID, scientificName, commonName, imageLink, fishLink
                 FROM ReferenceSpecies WHERE ID = ?1",
                params![id],
                reference_from_row,
            )
            .optional()?;
        Ok(species)
    }

    /// Substring search over one reference column. Each field maps to a fixed
    /// statement; the search text is only ever bound as a parameter.
    pub fn search_reference(&self, field: ReferenceField, text: &str) -> Result<Vec<ReferenceSpecies>> {
        let sql = match field {
            ReferenceField::CommonName => {
                "SELECT ID, scientificName, commonName, imageLink, fishLink
                 FROM ReferenceSpecies WHERE commonName LIKE ?1 ORDER BY commonName, ID LIMIT ?2"
            }
            ReferenceField::ScientificName => {
                "SELECT ID, scientificName, commonName, imageLink, fishLink
                 FROM ReferenceSpecies WHERE scientificName LIKE ?1 ORDER BY scientificName, ID LIMIT ?2"
            }
        };
        let pattern = format!("%{}%", text.trim());
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt
            .query_map(
                params![pattern, REFERENCE_SEARCH_LIMIT as i64],
                reference_from_row,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    // ── Catch ingestion ──────────────────────────────────────────────

    /// Store a validated catch: resolve its location, bump or create the
    /// species aggregate, and append the catch row. All or nothing.
    pub fn record_catch(&mut self, entry: &ValidCatch) -> Result<CatchRecord> {
        let tx = self.conn.transaction()?;

        let known: bool = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM ReferenceSpecies WHERE ID = ?1)",
            params![entry.species_id],
            |row| row.get(0),
        )?;
        if !known {
            return Err(ValidationError::UnknownSpecies(entry.species_id).into());
        }

        let location_id = resolve_location(&tx, &entry.location_name)?;
        let aggregate = bump_species(&tx, entry.species_id)?;

        tx.execute(
            "INSERT INTO CatchLog (speciesID, datetimeCaught, locationID, photo)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                entry.species_id,
                format_datetime(&entry.caught_at),
                location_id,
                entry.photo,
            ],
        )?;
        let catch_id = tx.last_insert_rowid();

        tx.commit()?;
        info!(
            catch_id,
            species_id = entry.species_id,
            location_id,
            quantity = aggregate.quantity_caught,
            order = aggregate.order_discovered,
            "recorded catch"
        );

        Ok(CatchRecord {
            id: catch_id,
            species_id: entry.species_id,
            caught_at: entry.caught_at,
            location_id,
            photo: entry.photo.clone(),
        })
    }

    pub fn get_location_by_name(&self, name: &str) -> Result<Option<Location>> {
        let location = self
            .conn
            .query_row(
                "SELECT locationID, locationName FROM Locations WHERE locationName = ?1",
                params![name],
                |row| {
                    Ok(Location {
                        id: row.get(0)?,
                        name: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(location)
    }

    pub fn get_species_aggregate(&self, species_id: i64) -> Result<Option<SpeciesAggregate>> {
        let aggregate = self
            .conn
            .query_row(
                "SELECT speciesID, quantityCaught, orderDiscovered FROM Species WHERE speciesID = ?1",
                params![species_id],
                aggregate_from_row,
            )
            .optional()?;
        Ok(aggregate)
    }

    /// All aggregates in discovery order.
    pub fn list_species_aggregates(&self) -> Result<Vec<SpeciesAggregate>> {
        let mut stmt = self.conn.prepare(
            "SELECT speciesID, quantityCaught, orderDiscovered FROM Species ORDER BY orderDiscovered",
        )?;
        let rows = stmt
            .query_map([], aggregate_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Stored photo for a catch. `Ok(None)` if the catch exists without one.
    pub fn get_catch_photo(&self, catch_id: i64) -> Result<Option<Vec<u8>>> {
        let photo: Option<Option<Vec<u8>>> = self
            .conn
            .query_row(
                "SELECT photo FROM CatchLog WHERE catchID = ?1",
                params![catch_id],
                |row| row.get(0),
            )
            .optional()?;
        photo.ok_or(Error::CatchNotFound(catch_id))
    }

    // ── Views ────────────────────────────────────────────────────────

    /// Catch log, newest first. Missing joins render as `Unknown`, and a
    /// stored timestamp that no longer parses is reported as `None` on its
    /// own row.
    pub fn list_catches(&self) -> Result<Vec<CatchRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT c.catchID,
                    COALESCE(rs.commonName, ?1),
                    COALESCE(rs.scientificName, ?1),
                    c.datetimeCaught,
                    COALESCE(l.locationName, ?1),
                    c.photo IS NOT NULL
             FROM CatchLog c
             LEFT JOIN Locations l ON c.locationID = l.locationID
             LEFT JOIN ReferenceSpecies rs ON c.speciesID = rs.ID
             ORDER BY c.catchID DESC",
        )?;
        let rows = stmt
            .query_map(params![UNKNOWN], |row| {
                let catch_id: i64 = row.get(0)?;
                Ok(CatchRow {
                    catch_id,
                    common_name: row.get(1)?,
                    scientific_name: row.get(2)?,
                    caught_at: stored_datetime(catch_id, row.get(3)?),
                    location_name: row.get(4)?,
                    has_photo: row.get(5)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        debug!(rows = rows.len(), "listed catches");
        Ok(rows)
    }

    /// One row per discovered species, most recently discovered first.
    /// The first catch is the earliest by parsed timestamp; equal timestamps
    /// resolve to the lowest catch id. Catches whose timestamp does not parse
    /// only count when a species has no readable one.
    pub fn list_species(&self) -> Result<Vec<SpeciesRow>> {
        let firsts = self.first_catches()?;

        let mut stmt = self.conn.prepare(
            "SELECT s.speciesID,
                    COALESCE(rs.commonName, ?1),
                    COALESCE(rs.scientificName, ?1),
                    s.quantityCaught,
                    s.orderDiscovered
             FROM Species s
             LEFT JOIN ReferenceSpecies rs ON s.speciesID = rs.ID
             ORDER BY s.orderDiscovered DESC",
        )?;
        let rows = stmt
            .query_map(params![UNKNOWN], |row| {
                let species_id: i64 = row.get(0)?;
                let (first_caught, first_location) = match firsts.get(&species_id) {
                    Some(first) => (first.caught_at, first.location_name.clone()),
                    None => (None, UNKNOWN.to_string()),
                };
                Ok(SpeciesRow {
                    species_id,
                    common_name: row.get(1)?,
                    scientific_name: row.get(2)?,
                    quantity_caught: row.get(3)?,
                    order_discovered: row.get(4)?,
                    first_caught,
                    first_location,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        debug!(rows = rows.len(), "listed species");
        Ok(rows)
    }

    /// Earliest catch per species, compared on parsed timestamps rather than
    /// stored text so unpadded legacy values order correctly.
    fn first_catches(&self) -> Result<HashMap<i64, FirstCatch>> {
        let mut stmt = self.conn.prepare(
            "SELECT c.speciesID, c.catchID, c.datetimeCaught, COALESCE(l.locationName, ?1)
             FROM CatchLog c
             LEFT JOIN Locations l ON c.locationID = l.locationID
             ORDER BY c.catchID ASC",
        )?;
        let mut rows = stmt.query(params![UNKNOWN])?;

        let mut firsts: HashMap<i64, FirstCatch> = HashMap::new();
        while let Some(row) = rows.next()? {
            let species_id: i64 = row.get(0)?;
            let catch_id: i64 = row.get(1)?;
            let candidate = FirstCatch {
                catch_id,
                caught_at: stored_datetime(catch_id, row.get(2)?),
                location_name: row.get(3)?,
            };
            match firsts.get(&species_id) {
                Some(current) if current.sort_key() <= candidate.sort_key() => {}
                _ => {
                    firsts.insert(species_id, candidate);
                }
            }
        }
        Ok(firsts)
    }

    /// Get all catalog counts in a single query for the status summary.
    pub fn stats_summary(&self) -> Result<CatalogStats> {
        let stats = self.conn.query_row(
            "SELECT
                (SELECT COUNT(*) FROM ReferenceSpecies),
                (SELECT COUNT(*) FROM Species),
                (SELECT COUNT(*) FROM CatchLog),
                (SELECT COUNT(*) FROM Locations)",
            [],
            |row| {
                Ok(CatalogStats {
                    reference_species: row.get::<_, i64>(0)? as usize,
                    species_discovered: row.get::<_, i64>(1)? as usize,
                    total_catches: row.get::<_, i64>(2)? as usize,
                    total_locations: row.get::<_, i64>(3)? as usize,
                })
            },
        )?;
        Ok(stats)
    }

    // ── Config ───────────────────────────────────────────────────────

    pub fn set_config(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO config (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn get_config(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM config WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }
}

/// Find a location by name, creating it on first use.
fn resolve_location(conn: &Connection, name: &str) -> Result<i64> {
    let inserted = conn.execute(
        "INSERT OR IGNORE INTO Locations (locationName) VALUES (?1)",
        params![name],
    )?;
    if inserted > 0 {
        debug!(location = name, "created location");
    }
    let id = conn.query_row(
        "SELECT locationID FROM Locations WHERE locationName = ?1",
        params![name],
        |row| row.get(0),
    )?;
    Ok(id)
}

/// Increment the species aggregate, or create it with the next discovery order.
fn bump_species(conn: &Connection, species_id: i64) -> Result<SpeciesAggregate> {
    let updated = conn.execute(
        "UPDATE Species SET quantityCaught = quantityCaught + 1 WHERE speciesID = ?1",
        params![species_id],
    )?;

    if updated == 0 {
        let next_order: i64 = conn.query_row(
            "SELECT COALESCE(MAX(orderDiscovered), 0) + 1 FROM Species",
            [],
            |row| row.get(0),
        )?;
        conn.execute(
            "INSERT INTO Species (speciesID, quantityCaught, orderDiscovered) VALUES (?1, 1, ?2)",
            params![species_id, next_order],
        )?;
        info!(species_id, order = next_order, "discovered new species");
    }

    let aggregate = conn.query_row(
        "SELECT speciesID, quantityCaught, orderDiscovered FROM Species WHERE speciesID = ?1",
        params![species_id],
        aggregate_from_row,
    )?;
    Ok(aggregate)
}

fn reference_from_row(row: &Row<'_>) -> rusqlite::Result<ReferenceSpecies> {
    Ok(ReferenceSpecies {
        id: row.get(0)?,
        scientific_name: row.get(1)?,
        common_name: row.get(2)?,
        image_link: row.get(3)?,
        fish_link: row.get(4)?,
    })
}

fn aggregate_from_row(row: &Row<'_>) -> rusqlite::Result<SpeciesAggregate> {
    Ok(SpeciesAggregate {
        species_id: row.get(0)?,
        quantity_caught: row.get(1)?,
        order_discovered: row.get(2)?,
    })
}

/// Earliest-catch candidate for one species.
struct FirstCatch {
    catch_id: i64,
    caught_at: Option<NaiveDateTime>,
    location_name: String,
}

impl FirstCatch {
    /// Readable timestamps first, then by time, then by catch id.
    fn sort_key(&self) -> (bool, Option<NaiveDateTime>, i64) {
        (self.caught_at.is_none(), self.caught_at, self.catch_id)
    }
}

/// Parse a stored catch timestamp. Unreadable values are logged and come
/// back as `None` so one bad row never fails a whole view.
fn stored_datetime(catch_id: i64, text: Option<String>) -> Option<NaiveDateTime> {
    let text = text?;
    let parsed = STORED_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text.trim(), fmt).ok());
    if parsed.is_none() {
        warn!(catch_id, stored = %text, "unreadable catch timestamp");
    }
    parsed
}
