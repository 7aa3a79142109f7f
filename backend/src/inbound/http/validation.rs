//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every failure here is a `400` whose message names the offending field.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::domain::{Email, Error, IdParseError, RecordId};

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub(crate) const fn as_str(self) -> &'static str {
        self.0
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    Error::invalid_request(format!("missing required field: {}", field.as_str()))
}

pub(crate) fn invalid_field_error(field: FieldName, reason: impl std::fmt::Display) -> Error {
    Error::invalid_request(format!("invalid {}: {reason}", field.as_str()))
}

/// Unwrap a required field, rejecting absent or blank strings.
pub(crate) fn require_text(value: Option<String>, field: FieldName) -> Result<String, Error> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(missing_field_error(field)),
    }
}

/// Reject a supplied but blank string; absent stays absent.
pub(crate) fn non_blank(value: Option<String>, field: FieldName) -> Result<Option<String>, Error> {
    match value {
        Some(text) if text.trim().is_empty() => Err(invalid_field_error(field, "must not be blank")),
        other => Ok(other),
    }
}

/// Parse an identifier taken from the path or a body field.
pub(crate) fn parse_id<I>(raw: &str, field: FieldName) -> Result<I, Error>
where
    I: RecordId + std::str::FromStr<Err = IdParseError>,
{
    raw.parse::<I>()
        .map_err(|_| invalid_field_error(field, format!("'{}' is not a valid UUID", raw.trim())))
}

pub(crate) fn parse_optional_id<I>(raw: Option<String>, field: FieldName) -> Result<Option<I>, Error>
where
    I: RecordId + std::str::FromStr<Err = IdParseError>,
{
    raw.map(|value| parse_id(&value, field)).transpose()
}

/// Parse a value whose `FromStr` error describes the accepted set.
pub(crate) fn parse_enum<T>(raw: &str, field: FieldName) -> Result<T, Error>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse::<T>().map_err(|err| invalid_field_error(field, err))
}

pub(crate) fn parse_optional_enum<T>(raw: Option<String>, field: FieldName) -> Result<Option<T>, Error>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.map(|value| parse_enum(&value, field)).transpose()
}

pub(crate) fn parse_email(raw: &str, field: FieldName) -> Result<Email, Error> {
    Email::parse(raw).map_err(|err| invalid_field_error(field, err))
}

/// Parse an RFC 3339 timestamp or a bare `YYYY-MM-DD` date (midnight UTC).
pub(crate) fn parse_timestamp(raw: &str, field: FieldName) -> Result<DateTime<Utc>, Error> {
    let trimmed = raw.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(timestamp.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
        .map_err(|_| {
            invalid_field_error(field, "expected an RFC 3339 timestamp or a YYYY-MM-DD date")
        })
}

pub(crate) fn parse_optional_timestamp(
    raw: Option<String>,
    field: FieldName,
) -> Result<Option<DateTime<Utc>>, Error> {
    raw.map(|value| parse_timestamp(&value, field)).transpose()
}

pub(crate) fn parse_date(raw: &str, field: FieldName) -> Result<NaiveDate, Error> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| invalid_field_error(field, "expected a YYYY-MM-DD date"))
}

pub(crate) fn parse_optional_date(
    raw: Option<String>,
    field: FieldName,
) -> Result<Option<NaiveDate>, Error> {
    raw.map(|value| parse_date(&value, field)).transpose()
}
