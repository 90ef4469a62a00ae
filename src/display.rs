//! Timestamp handling for the transaction table.
use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};

/// Shown in place of timestamps that cannot be parsed.
pub const INVALID_DATE: &str = "Invalid Date";

/// Parse a backend timestamp. RFC 3339 values keep their offset; naive
/// ISO-8601 values are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

pub fn display_offset(offset_minutes: i32) -> Option<FixedOffset> {
    FixedOffset::east_opt(offset_minutes * 60)
}

/// `01-Jan-2024, 5:30 am` style rendering at the given offset.
pub fn format_timestamp(raw: &str, offset: FixedOffset) -> String {
    match parse_timestamp(raw) {
        Some(utc) => utc
            .with_timezone(&offset)
            .format("%d-%b-%Y, %-I:%M %P")
            .to_string(),
        None => INVALID_DATE.to_string(),
    }
}
