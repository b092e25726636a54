//! Schedule builder: raw programme entries → "up next and later today".

use chrono::{DateTime, NaiveDate, Utc};

use crate::model::{ChannelRef, RawScheduleEntry, ScheduleEntry, ScheduleView};
use crate::timestamp::parse_sr_date;

/// Preferred field unless it is absent or empty.
fn pick<'a>(preferred: &'a Option<String>, plain: &'a Option<String>) -> Option<&'a str> {
    preferred
        .as_deref()
        .filter(|s| !s.is_empty())
        .or(plain.as_deref())
}

fn non_empty(s: &Option<String>) -> Option<String> {
    s.as_ref().filter(|s| !s.is_empty()).cloned()
}

/// Resolve both timestamps.  `None` when either one does not parse.
pub fn normalize_entry(raw: &RawScheduleEntry) -> Option<ScheduleEntry> {
    let start = parse_sr_date(pick(&raw.starttimeutc, &raw.starttime))?;
    let end = parse_sr_date(pick(&raw.endtimeutc, &raw.endtime))?;
    Some(ScheduleEntry {
        title: raw.title.clone().unwrap_or_default(),
        subtitle: non_empty(&raw.subtitle),
        description: non_empty(&raw.description),
        start,
        end,
    })
}

/// Entries still running or upcoming at `now`, stable-sorted by start.
pub fn build_schedule(raw: &[RawScheduleEntry], now: DateTime<Utc>) -> Vec<ScheduleEntry> {
    let mut entries: Vec<ScheduleEntry> = raw
        .iter()
        .filter_map(normalize_entry)
        .filter(|e| e.end > now)
        .collect();
    entries.sort_by_key(|e| e.start);
    entries
}

impl ScheduleView {
    pub fn build(
        channel: &ChannelRef,
        date: NaiveDate,
        raw: &[RawScheduleEntry],
        now: DateTime<Utc>,
    ) -> Self {
        let entries = build_schedule(raw, now);
        tracing::debug!(
            "[schedule] {} {}: {} raw → {} upcoming",
            channel.name,
            date,
            raw.len(),
            entries.len()
        );
        Self {
            channel_id: channel.id,
            channel_name: channel.name.clone(),
            date,
            built_at: now,
            entries,
        }
    }
}
