use rusqlite::{params, Connection, OptionalExtension};
use tracing::info;

use crate::error::{Error, Result};

/// Schema version this build reads and writes.
pub const SCHEMA_VERSION: u32 = 1;

pub fn initialize(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS ReferenceSpecies (
            ID              INTEGER PRIMARY KEY,
            scientificName  TEXT NOT NULL,
            commonName      TEXT,
            imageLink       TEXT,
            fishLink        TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_reference_common ON ReferenceSpecies(commonName);
        CREATE INDEX IF NOT EXISTS idx_reference_scientific ON ReferenceSpecies(scientificName);

        CREATE TABLE IF NOT EXISTS Locations (
            locationID      INTEGER PRIMARY KEY AUTOINCREMENT,
            locationName    TEXT UNIQUE NOT NULL
        );

        CREATE TABLE IF NOT EXISTS Species (
            speciesID       INTEGER PRIMARY KEY REFERENCES ReferenceSpecies(ID),
            quantityCaught  INTEGER NOT NULL DEFAULT 0,
            orderDiscovered INTEGER UNIQUE NOT NULL
        );

        CREATE TABLE IF NOT EXISTS CatchLog (
            catchID         INTEGER PRIMARY KEY AUTOINCREMENT,
            speciesID       INTEGER NOT NULL REFERENCES ReferenceSpecies(ID),
            datetimeCaught  TEXT NOT NULL,
            locationID      INTEGER NOT NULL REFERENCES Locations(locationID),
            photo           BLOB
        );

        CREATE INDEX IF NOT EXISTS idx_catchlog_species ON CatchLog(speciesID, datetimeCaught);

        CREATE TABLE IF NOT EXISTS config (
            key   TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );
        ",
    )?;
    Ok(())
}

/// Stamp a fresh catalog with the current version, or refuse one written by a newer build.
pub fn migrate(conn: &Connection) -> Result<()> {
    let stored: Option<String> = conn
        .query_row(
            "SELECT value FROM config WHERE key = 'schema_version'",
            [],
            |row| row.get(0),
        )
        .optional()?;

    let stored = match stored {
        Some(text) => Some(
            text.trim()
                .parse::<u32>()
                .map_err(|_| Error::InvalidSchemaVersion(text))?,
        ),
        None => None,
    };

    match stored {
        Some(db) if db > SCHEMA_VERSION => Err(Error::SchemaTooNew {
            db,
            code: SCHEMA_VERSION,
        }),
        Some(_) => Ok(()),
        None => {
            conn.execute(
                "INSERT INTO config (key, value) VALUES ('schema_version', ?1)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![SCHEMA_VERSION.to_string()],
            )?;
            info!(version = SCHEMA_VERSION, "stamped catalog schema version");
            Ok(())
        }
    }
}
