//! Birth date parsing.
//!
//! Clients send either a full RFC 3339 timestamp or a bare calendar date;
//! a bare date means midnight UTC of that day.

use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::error::DomainError;

/// Parse a non-empty birth value.
pub fn parse_birth(raw: &str) -> Result<DateTime<Utc>, DomainError> {
    let value = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| DomainError::invalid_birth(raw))
}

/// Absent, null and empty values carry no date; anything else must parse.
pub fn parse_optional_birth(raw: Option<&str>) -> Result<Option<DateTime<Utc>>, DomainError> {
    match raw {
        Some(value) if !value.is_empty() => parse_birth(value).map(Some),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn bare_date_is_midnight_utc() {
        let parsed = parse_birth("2000-01-01").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn rfc3339_offsets_are_normalized_to_utc() {
        let parsed = parse_birth("1999-12-31T22:30:00-02:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2000, 1, 1, 0, 30, 0).unwrap());
    }

    #[test]
    fn garbage_is_rejected() {
        for raw in ["yesterday", "2000-13-01", "01/02/2000", "2000-02-30"] {
            match parse_birth(raw) {
                Err(DomainError::InvalidBirth { value }) => assert_eq!(value, raw),
                other => panic!("expected InvalidBirth for {raw}, got {other:?}"),
            }
        }
    }

    #[test]
    fn empty_and_missing_values_carry_no_date() {
        assert_eq!(parse_optional_birth(None).unwrap(), None);
        assert_eq!(parse_optional_birth(Some("")).unwrap(), None);
        assert!(parse_optional_birth(Some("2001-05-06")).unwrap().is_some());
        assert!(parse_optional_birth(Some("nope")).is_err());
    }
}
