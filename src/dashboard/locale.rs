//! Timestamp parsing and Indonesian (`id-ID`) display formatting.

use chrono::{DateTime, NaiveDateTime, TimeZone};
use chrono_tz::Tz;

/// Naive layouts accepted after RFC 3339; interpreted in the display timezone.
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse a reading timestamp into the display timezone.
///
/// Offset-qualified timestamps keep their instant; naive ones are taken as
/// local time in `tz`. Returns `None` for anything unparseable.
#[must_use]
pub fn parse_timestamp(raw: &str, tz: Tz) -> Option<DateTime<Tz>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&tz));
    }
    NAIVE_FORMATS.iter().find_map(|fmt| {
        NaiveDateTime::parse_from_str(raw, fmt)
            .ok()
            .and_then(|naive| tz.from_local_datetime(&naive).earliest())
    })
}

/// `d/m/yyyy HH.MM.SS`, as `toLocaleDateString` + `toLocaleTimeString` render in `id-ID`.
#[must_use]
pub fn format_date_time(dt: &DateTime<Tz>) -> String {
    dt.format("%-d/%-m/%Y %H.%M.%S").to_string()
}

#[must_use]
pub fn format_time(dt: &DateTime<Tz>) -> String {
    dt.format("%H.%M.%S").to_string()
}

/// Date and time for table cells and CSV; falls back to the raw text.
#[must_use]
pub fn display_date_time(raw: &str, tz: Tz) -> String {
    parse_timestamp(raw, tz).map_or_else(|| raw.to_string(), |dt| format_date_time(&dt))
}

/// Time-of-day for chart labels; falls back to the raw text.
#[must_use]
pub fn display_time(raw: &str, tz: Tz) -> String {
    parse_timestamp(raw, tz).map_or_else(|| raw.to_string(), |dt| format_time(&dt))
}
