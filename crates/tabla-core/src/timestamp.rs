//! Sveriges Radio date tokens.
//!
//! The API encodes instants as `/Date(1697463600000+0200)/`: milliseconds
//! since the Unix epoch, optionally followed by a display offset that does not
//! change the instant.  Anything else is tried as an ordinary timestamp.

use std::sync::OnceLock;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use regex::Regex;

fn date_token_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"/Date\((\d+)").ok()).as_ref()
}

/// Parse an SR date token.  Returns `None` (missing time) for absent,
/// empty or unrecognised input; never panics.
pub fn parse_sr_date(token: Option<&str>) -> Option<DateTime<Utc>> {
    let s = token.unwrap_or("");

    if let Some(caps) = date_token_re().and_then(|re| re.captures(s)) {
        let millis: i64 = caps[1].parse().ok()?;
        return DateTime::from_timestamp_millis(millis);
    }

    parse_generic(s.trim())
}

fn parse_generic(s: &str) -> Option<DateTime<Utc>> {
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }
    // Date-time without offset: local wall-clock time.
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Local
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc));
        }
    }
    // Bare date: midnight UTC.
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// 24-hour local `HH:MM`.
pub fn format_hhmm(instant: DateTime<Utc>) -> String {
    instant.with_timezone(&Local).format("%H:%M").to_string()
}

/// Local calendar date the instant falls on; the schedule source is keyed by it.
pub fn today_ymd(now: DateTime<Utc>) -> NaiveDate {
    now.with_timezone(&Local).date_naive()
}
