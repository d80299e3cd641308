//! Time utilities: calendar dates and timezone-aware "today".

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

/// Wire/CLI date format.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a date like "2026-02-20".
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|e| anyhow::anyhow!("invalid date '{raw}' (expected YYYY-MM-DD): {e}"))
}

/// Parse an IANA timezone like "America/Chicago".
pub fn parse_tz(tz: &str) -> Result<Tz> {
    tz.parse().map_err(|_| anyhow::anyhow!("invalid timezone: {tz}"))
}

/// Calendar date of `now` as seen in `tz`.
pub fn today_in(tz: Tz, now: DateTime<Utc>) -> NaiveDate {
    now.with_timezone(&tz).date_naive()
}
