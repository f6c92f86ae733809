use chrono::NaiveDateTime;

use crate::domain::{CatchRequest, ValidCatch, DATETIME_FORMAT};
use crate::error::{Result, ValidationError};
use crate::photo;

/// Parse a form timestamp in `YYYY-MM-DD HH:MM` format.
pub fn parse_datetime(value: &str) -> std::result::Result<NaiveDateTime, ValidationError> {
    NaiveDateTime::parse_from_str(value.trim(), DATETIME_FORMAT)
        .map_err(|_| ValidationError::InvalidDatetime(value.to_string()))
}

/// Check a raw catch entry against `now` and normalize its photo.
///
/// Rejects blank required fields, non-numeric species ids, unparsable or
/// future timestamps, and photos that do not decode. Reference-catalog
/// membership is checked later, inside the write transaction.
pub fn validate(request: &CatchRequest, now: NaiveDateTime, max_photo_dim: u32) -> Result<ValidCatch> {
    let species = required(&request.species_id, "species id")?;
    let location = required(&request.location_name, "location")?;
    let datetime = required(&request.caught_at, "datetime")?;

    let species_id: i64 = species
        .parse()
        .map_err(|_| ValidationError::InvalidSpeciesId(species.to_string()))?;

    let caught_at = parse_datetime(datetime)?;
    if caught_at > now {
        return Err(ValidationError::FutureDatetime(datetime.to_string()).into());
    }

    let photo = match &request.photo {
        Some(bytes) => Some(
            photo::normalize(bytes, max_photo_dim)
                .map_err(|e| ValidationError::UnreadablePhoto(e.to_string()))?,
        ),
        None => None,
    };

    Ok(ValidCatch {
        species_id,
        location_name: location.to_string(),
        caught_at,
        photo,
    })
}

fn required<'a>(value: &'a str, field: &'static str) -> std::result::Result<&'a str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn now() -> NaiveDateTime {
        parse_datetime("2024-06-01 12:00").unwrap()
    }

    fn request(species: &str, location: &str, at: &str) -> CatchRequest {
        CatchRequest {
            species_id: species.to_string(),
            location_name: location.to_string(),
            caught_at: at.to_string(),
            photo: None,
        }
    }

    fn validation(err: Error) -> ValidationError {
        match err {
            Error::Validation(v) => v,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_request() {
        let valid = validate(&request("7", " North Pond ", "2024-05-01 08:00"), now(), 1024).unwrap();
        assert_eq!(valid.species_id, 7);
        assert_eq!(valid.location_name, "North Pond");
        assert_eq!(valid.caught_at, parse_datetime("2024-05-01 08:00").unwrap());
        assert!(valid.photo.is_none());
    }

    #[test]
    fn test_blank_fields_rejected() {
        let err = validate(&request("", "Lake", "2024-05-01 08:00"), now(), 1024).unwrap_err();
        assert_eq!(validation(err), ValidationError::MissingField("species id"));

        let err = validate(&request("7", "   ", "2024-05-01 08:00"), now(), 1024).unwrap_err();
        assert_eq!(validation(err), ValidationError::MissingField("location"));

        let err = validate(&request("7", "Lake", ""), now(), 1024).unwrap_err();
        assert_eq!(validation(err), ValidationError::MissingField("datetime"));
    }

    #[test]
    fn test_non_numeric_species_rejected() {
        let err = validate(&request("bass", "Lake", "2024-05-01 08:00"), now(), 1024).unwrap_err();
        assert!(matches!(validation(err), ValidationError::InvalidSpeciesId(_)));
    }

    #[test]
    fn test_bad_datetime_format_rejected() {
        for bad in ["2024/05/01 08:00", "2024-05-01", "yesterday", "2024-13-01 08:00"] {
            let err = validate(&request("7", "Lake", bad), now(), 1024).unwrap_err();
            assert!(matches!(validation(err), ValidationError::InvalidDatetime(_)), "{bad}");
        }
    }

    #[test]
    fn test_future_datetime_rejected() {
        let err = validate(&request("7", "Lake", "2024-06-01 12:01"), now(), 1024).unwrap_err();
        assert!(matches!(validation(err), ValidationError::FutureDatetime(_)));
    }

    #[test]
    fn test_datetime_equal_to_now_accepted() {
        assert!(validate(&request("7", "Lake", "2024-06-01 12:00"), now(), 1024).is_ok());
    }

    #[test]
    fn test_garbage_photo_rejected() {
        let mut req = request("7", "Lake", "2024-05-01 08:00");
        req.photo = Some(b"not an image".to_vec());
        let err = validate(&req, now(), 1024).unwrap_err();
        assert!(matches!(validation(err), ValidationError::UnreadablePhoto(_)));
    }
}
