//! Timestamp utilities

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serializer;

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Milliseconds since the Unix epoch for a timestamp
pub fn unix_millis(ts: DateTime<Utc>) -> i64 {
    ts.timestamp_millis()
}

/// Render a timestamp the way `createdAt` is stored (RFC 3339, millisecond precision)
pub fn to_iso(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Serde `serialize_with` for optional timestamps, in the [`to_iso`] form
pub fn serialize_iso_opt<S>(ts: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match ts {
        Some(ts) => serializer.serialize_str(&to_iso(*ts)),
        None => serializer.serialize_none(),
    }
}

/// Parse an RFC 3339 timestamp, returning `None` for anything unparsable
pub fn parse_iso(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
