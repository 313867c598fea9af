//! Lenient serde helpers for backend dates and timestamps.
//!
//! The catalog backend is not consistent about its date formats: listing dates
//! arrive either as `YYYY-MM-DD` or as a full ISO-8601 timestamp, and order
//! timestamps may or may not carry an offset.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serializer};

const DATE_FORMAT: &str = "%Y-%m-%d";
const NAIVE_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Parse a listing date from either a date or a timestamp string.
#[must_use]
pub fn parse_listing_date(raw: &str) -> Option<NaiveDate> {
    let prefix = raw.trim().get(..10)?;
    NaiveDate::parse_from_str(prefix, DATE_FORMAT).ok()
}

/// Parse an order timestamp, with or without a UTC offset.
///
/// Offset timestamps are normalized to UTC.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
        return Some(with_offset.naive_utc());
    }
    NaiveDateTime::parse_from_str(raw, NAIVE_TIMESTAMP_FORMAT).ok()
}

/// Serde adapter for `Option<NaiveDate>` listing dates.
///
/// Unparseable or unexpected values deserialize to `None`; the date is
/// display-only and must never fail a whole listing.
pub mod listing_date {
    use super::{Deserialize, Deserializer, NaiveDate, Serializer, DATE_FORMAT};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawListingDate {
        Text(String),
        EpochMillis(i64),
        Other(serde::de::IgnoredAny),
    }

    /// Serialize as `YYYY-MM-DD` or `null`.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(
        date: &Option<NaiveDate>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match date {
            Some(date) => serializer.serialize_str(&date.format(DATE_FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    /// Deserialize from a date string, a timestamp string, epoch
    /// milliseconds, or `null`. Anything else reads as `None`.
    ///
    /// # Errors
    ///
    /// Returns an error only if the input itself is malformed.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error> {
        let date = match Option::<RawListingDate>::deserialize(deserializer)? {
            Some(RawListingDate::Text(text)) => super::parse_listing_date(&text),
            Some(RawListingDate::EpochMillis(millis)) => {
                chrono::DateTime::from_timestamp_millis(millis).map(|dt| dt.date_naive())
            }
            Some(RawListingDate::Other(_)) | None => None,
        };
        Ok(date)
    }
}

/// Serde adapter for order placement timestamps.
pub mod placed_at {
    use super::{Deserialize, Deserializer, NaiveDateTime, Serializer, NAIVE_TIMESTAMP_FORMAT};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawTimestamp {
        Text(String),
        EpochMillis(i64),
    }

    /// Serialize as a naive ISO-8601 timestamp.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S: Serializer>(
        timestamp: &NaiveDateTime,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&timestamp.format(NAIVE_TIMESTAMP_FORMAT).to_string())
    }

    /// Deserialize from an ISO-8601 string (with or without offset) or epoch
    /// milliseconds.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be interpreted as a timestamp.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<NaiveDateTime, D::Error> {
        match RawTimestamp::deserialize(deserializer)? {
            RawTimestamp::Text(text) => super::parse_timestamp(&text).ok_or_else(|| {
                serde::de::Error::custom(format!("invalid timestamp: {text}"))
            }),
            RawTimestamp::EpochMillis(millis) => chrono::DateTime::from_timestamp_millis(millis)
                .map(|dt| dt.naive_utc())
                .ok_or_else(|| serde::de::Error::custom(format!("invalid epoch millis: {millis}"))),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_date_accepts_plain_date() {
        assert_eq!(
            parse_listing_date("2024-03-15"),
            NaiveDate::from_ymd_opt(2024, 3, 15)
        );
    }

    #[test]
    fn test_listing_date_accepts_timestamp() {
        assert_eq!(
            parse_listing_date("2024-03-15T00:00:00.000+00:00"),
            NaiveDate::from_ymd_opt(2024, 3, 15)
        );
    }

    #[test]
    fn test_listing_date_rejects_garbage() {
        assert_eq!(parse_listing_date("soon"), None);
        assert_eq!(parse_listing_date(""), None);
    }

    #[derive(Deserialize)]
    struct Listing {
        #[serde(default, with = "listing_date")]
        released: Option<NaiveDate>,
    }

    fn released(json: &str) -> Option<NaiveDate> {
        serde_json::from_str::<Listing>(json).unwrap().released
    }

    #[test]
    fn test_listing_date_field_accepts_epoch_millis() {
        // 2024-03-15T12:00:00Z
        assert_eq!(
            released(r#"{"released": 1710504000000}"#),
            NaiveDate::from_ymd_opt(2024, 3, 15)
        );
    }

    #[test]
    fn test_listing_date_field_tolerates_unexpected_shapes() {
        assert_eq!(released(r#"{"released": null}"#), None);
        assert_eq!(released(r#"{"released": "soon"}"#), None);
        assert_eq!(released(r#"{"released": true}"#), None);
        assert_eq!(released(r#"{"released": 17.5}"#), None);
        assert_eq!(released(r#"{"released": [2024, 3, 15]}"#), None);
        assert_eq!(released(r#"{"released": {"year": 2024}}"#), None);
        assert_eq!(released("{}"), None);
    }

    #[test]
    fn test_timestamp_with_offset_normalizes_to_utc() {
        let ts = parse_timestamp("2024-05-01T12:30:00+02:00").unwrap();
        assert_eq!(ts.format("%H:%M").to_string(), "10:30");
    }

    #[test]
    fn test_timestamp_without_offset() {
        let ts = parse_timestamp("2024-05-01T12:30:15.250").unwrap();
        assert_eq!(ts.format("%Y-%m-%d %H:%M:%S").to_string(), "2024-05-01 12:30:15");
    }
}
