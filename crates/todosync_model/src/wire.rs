//! Serde helpers for the JSON wire format.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Date format used on the wire.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a wire date value.
///
/// Servers are inconsistent about this field: some return a plain date,
/// others a full datetime. Datetimes are truncated to their date part.
pub(crate) fn parse_wire_date(raw: &str) -> Result<NaiveDate, String> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        return Ok(date);
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(raw) {
        return Ok(datetime.date_naive());
    }
    if let Ok(datetime) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(datetime.date());
    }
    Err(format!("invalid date value: {raw}"))
}

/// `#[serde(with = ...)]` module for optional wire dates.
pub(crate) mod opt_date {
    use super::{parse_wire_date, DATE_FORMAT};
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub(crate) fn serialize<S>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(date) => serializer.serialize_str(&date.format(DATE_FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw {
            None => Ok(None),
            Some(value) => parse_wire_date(&value)
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}
