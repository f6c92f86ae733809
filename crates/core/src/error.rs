use std::path::PathBuf;

/// Rejected catch entry. Nothing is written when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("species id must be a number, got {0:?}")]
    InvalidSpeciesId(String),

    #[error("invalid datetime {0:?}, expected YYYY-MM-DD HH:MM")]
    InvalidDatetime(String),

    #[error("datetime {0} is in the future")]
    FutureDatetime(String),

    #[error("species {0} is not in the reference catalog")]
    UnknownSpecies(i64),

    #[error("photo could not be read: {0}")]
    UnreadablePhoto(String),

    #[error("photo size must be between {min} and {max} pixels, got {value}")]
    PhotoDimensionOutOfRange { value: u32, min: u32, max: u32 },
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("reference file {} is not valid JSON: {source}", .path.display())]
    ReferenceJson {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("photo for catch {catch_id} is corrupted: {source}")]
    PhotoDecode {
        catch_id: i64,
        source: image::ImageError,
    },

    #[error("catch not found: {0}")]
    CatchNotFound(i64),

    #[error("catalog schema version {db} is newer than supported version {code}")]
    SchemaTooNew { db: u32, code: u32 },

    #[error("catalog schema version {0:?} is not a number")]
    InvalidSchemaVersion(String),
}

/// Coarse classification used by front ends to pick a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad user input. Correct it and resubmit.
    Validation,
    /// Storage failure. Surfaced as-is, never retried.
    Persistence,
    /// A stored photo payload could not be decoded.
    Decode,
    /// The requested record does not exist.
    NotFound,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation(_) => ErrorKind::Validation,
            Error::PhotoDecode { .. } => ErrorKind::Decode,
            Error::CatchNotFound(_) => ErrorKind::NotFound,
            Error::Database(_)
            | Error::Io(_)
            | Error::ReferenceJson { .. }
            | Error::SchemaTooNew { .. }
            | Error::InvalidSchemaVersion(_) => ErrorKind::Persistence,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_classified() {
        let err: Error = ValidationError::MissingField("location").into();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.to_string(), "location is required");
    }

    #[test]
    fn test_database_errors_are_persistence() {
        let err: Error = rusqlite::Error::InvalidQuery.into();
        assert_eq!(err.kind(), ErrorKind::Persistence);
    }

    #[test]
    fn test_missing_catch_is_not_a_validation_error() {
        let err = Error::CatchNotFound(42);
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), "catch not found: 42");
    }
}
