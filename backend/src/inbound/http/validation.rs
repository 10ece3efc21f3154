//! Shared validation helpers for inbound HTTP adapters.
//!
//! Request DTOs carry `Option` fields so that a missing value surfaces as a
//! structured `invalid_request` with `details.field` and `details.code`
//! instead of a bare deserialisation failure.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::json;
use uuid::Uuid;

use crate::domain::Error;

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
    InvalidTimestamp,
    InvalidValue,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidTimestamp => "invalid_timestamp",
            ErrorCode::InvalidValue => "invalid_value",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: String,
    message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }

    fn with_index(self, code: ErrorCode, index: usize, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "index": index,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("missing required field: {field}"))
        .with_code(ErrorCode::MissingField)
}

/// Unwrap a required field, rejecting `None` and blank strings alike.
pub(crate) fn required_text(value: Option<String>, field: FieldName) -> Result<String, Error> {
    value
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| missing_field_error(field))
}

/// Unwrap a required non-text field.
pub(crate) fn required<T>(value: Option<T>, field: FieldName) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

pub(crate) fn invalid_value_error(
    field: FieldName,
    value: impl Into<String>,
    message: impl Into<String>,
) -> Error {
    ValidationError::new(field.as_str(), message).with_value(ErrorCode::InvalidValue, value)
}

pub(crate) fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field} must be a valid UUID"))
        .with_value(ErrorCode::InvalidUuid, value)
}

pub(crate) fn invalid_uuid_index_error(field: FieldName, index: usize, value: &str) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field} must contain valid UUIDs")).with_index(
        ErrorCode::InvalidUuid,
        index,
        value,
    )
}

pub(crate) fn parse_uuid(value: String, field: FieldName) -> Result<Uuid, Error> {
    Uuid::parse_str(&value).map_err(|_| invalid_uuid_error(field, &value))
}

pub(crate) fn parse_uuid_list(values: Vec<String>, field: FieldName) -> Result<Vec<Uuid>, Error> {
    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            Uuid::parse_str(&value).map_err(|_| invalid_uuid_index_error(field, index, &value))
        })
        .collect()
}

pub(crate) fn invalid_timestamp_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    ValidationError::new(
        field,
        format!("{field} must be an RFC 3339 timestamp or a YYYY-MM-DD date"),
    )
    .with_value(ErrorCode::InvalidTimestamp, value)
}

/// Parse an RFC 3339 timestamp, or a bare date taken as midnight UTC.
pub(crate) fn parse_timestamp_or_date(
    value: String,
    field: FieldName,
) -> Result<DateTime<Utc>, Error> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(&value) {
        return Ok(timestamp.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(&value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
        .ok_or_else(|| invalid_timestamp_error(field, &value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    const FECHA: FieldName = FieldName::new("fecha");

    fn detail<'a>(error: &'a Error, key: &str) -> Option<&'a str> {
        error.details().and_then(|d| d.get(key)).and_then(|v| v.as_str())
    }

    #[rstest]
    #[case(None)]
    #[case(Some(String::new()))]
    #[case(Some("   ".to_owned()))]
    fn blank_text_is_missing(#[case] value: Option<String>) {
        let err = required_text(value, FieldName::new("detalles")).expect_err("missing");
        assert_eq!(detail(&err, "field"), Some("detalles"));
        assert_eq!(detail(&err, "code"), Some("missing_field"));
    }

    #[rstest]
    #[case("2024-01-01", Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())]
    #[case("2024-01-01T10:30:00Z", Utc.with_ymd_and_hms(2024, 1, 1, 10, 30, 0).unwrap())]
    #[case("2024-01-01T12:30:00+02:00", Utc.with_ymd_and_hms(2024, 1, 1, 10, 30, 0).unwrap())]
    fn dates_and_timestamps_parse(#[case] raw: &str, #[case] expected: DateTime<Utc>) {
        assert_eq!(parse_timestamp_or_date(raw.to_owned(), FECHA), Ok(expected));
    }

    #[test]
    fn garbage_dates_are_rejected() {
        let err = parse_timestamp_or_date("mañana".to_owned(), FECHA).expect_err("invalid");
        assert_eq!(detail(&err, "code"), Some("invalid_timestamp"));
        assert_eq!(detail(&err, "value"), Some("mañana"));
    }

    #[test]
    fn uuid_lists_report_the_bad_index() {
        let ok = Uuid::new_v4().to_string();
        let err = parse_uuid_list(vec![ok, "p1".to_owned()], FieldName::new("patient_ids"))
            .expect_err("invalid");
        let details = err.details().expect("details");
        assert_eq!(details["index"], 1);
        assert_eq!(details["code"], "invalid_uuid");
    }
}
