//! Plain-text rendering for the non-interactive subcommands.

use tabla_core::live::LiveAudio;
use tabla_core::model::{ChannelRef, ScheduleEntry, ScheduleView, EMPTY_SCHEDULE_TEXT};
use tabla_core::timestamp::format_hhmm;

/// One line per channel: `id  name  — tooltip` (the tooltip part only when
/// there is one).
pub fn channel_lines(channels: &[ChannelRef]) -> Vec<String> {
    let id_width = channels
        .iter()
        .map(|c| c.id.to_string().len())
        .max()
        .unwrap_or(0);
    channels
        .iter()
        .map(|c| {
            let tooltip = c.tooltip();
            if tooltip.is_empty() {
                format!("{:>w$}  {}", c.id, c.name, w = id_width)
            } else {
                format!("{:>w$}  {}  — {}", c.id, c.name, tooltip, w = id_width)
            }
        })
        .collect()
}

fn entry_lines(entry: &ScheduleEntry, out: &mut Vec<String>) {
    out.push(format!(
        "{}–{}  {}",
        format_hhmm(entry.start),
        format_hhmm(entry.end),
        entry.title
    ));
    for extra in [&entry.subtitle, &entry.description].into_iter().flatten() {
        out.push(format!("             {}", extra));
    }
}

/// Heading, remaining programmes (or the empty-day notice), then the live
/// stream line.
pub fn schedule_block(view: &ScheduleView, live: &LiveAudio) -> String {
    let mut out = vec![view.heading(), String::new()];
    if view.is_empty() {
        out.push(EMPTY_SCHEDULE_TEXT.to_string());
    } else {
        for entry in &view.entries {
            entry_lines(entry, &mut out);
        }
    }
    out.push(String::new());
    match live {
        LiveAudio::Playable { url } => out.push(format!("Live: {}", url)),
        other => out.push(other.fallback_text().unwrap_or_default()),
    }
    out.join("\n")
}
