use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub type ChannelId = u32;

/// A channel as listed by the channel directory.
///
/// Serializes with its own field names; API JSON is read through
/// [`ChannelRef::from_wire`].
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ChannelRef {
    pub id: ChannelId,
    pub name: String,
    /// Short blurb shown as hover/status text.
    pub tagline: Option<String>,
    /// e.g. "Rikskanal", "Lokal kanal"
    pub channel_type: Option<String>,
    pub site_url: Option<String>,
    pub live_audio_url: Option<String>,
}

impl ChannelRef {
    /// Tagline, type and site joined with " • ", skipping empty parts.
    pub fn tooltip(&self) -> String {
        let channel_type = self
            .channel_type
            .as_deref()
            .filter(|t| !t.is_empty())
            .map(|t| format!("Type: {}", t));
        [self.tagline.clone(), channel_type, self.site_url.clone()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" • ")
    }

    /// Decode one entry of the API's `channels` array.
    pub fn from_wire(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value::<WireChannel>(value).map(Self::from)
    }
}

// ── Wire format ───────────────────────────────────────────────────────────────

/// Channel as it appears in the API response.  Kept separate from
/// `ChannelRef` so the wire names (`channeltype`, `liveaudio.url`) never leak
/// into the rest of the crate.
#[derive(Debug, Deserialize)]
struct WireChannel {
    id: ChannelId,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    tagline: Option<String>,
    #[serde(default)]
    channeltype: Option<String>,
    #[serde(default)]
    siteurl: Option<String>,
    #[serde(default)]
    liveaudio: Option<WireLiveAudio>,
}

#[derive(Debug, Deserialize)]
struct WireLiveAudio {
    #[serde(default)]
    url: Option<String>,
}

impl From<WireChannel> for ChannelRef {
    fn from(w: WireChannel) -> Self {
        Self {
            id: w.id,
            name: w.name.unwrap_or_default(),
            tagline: w.tagline,
            channel_type: w.channeltype,
            site_url: w.siteurl,
            live_audio_url: w.liveaudio.and_then(|l| l.url),
        }
    }
}

/// One programme entry exactly as the schedule source returns it.
///
/// The API has shipped two shapes: `starttimeutc`/`endtimeutc` and the older
/// `starttime`/`endtime`.  Both are kept; the schedule builder prefers the
/// UTC field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawScheduleEntry {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub starttimeutc: Option<String>,
    #[serde(default)]
    pub starttime: Option<String>,
    #[serde(default)]
    pub endtimeutc: Option<String>,
    #[serde(default)]
    pub endtime: Option<String>,
}

/// A programme entry with both timestamps resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub title: String,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Render-ready schedule for one channel and one calendar day: entries that
/// have not ended yet at `built_at`, ordered by start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleView {
    pub channel_id: ChannelId,
    pub channel_name: String,
    pub date: NaiveDate,
    pub built_at: DateTime<Utc>,
    pub entries: Vec<ScheduleEntry>,
}

/// Shown in place of entries when nothing is left on today's schedule.
pub const EMPTY_SCHEDULE_TEXT: &str = "No more programs today.";

impl ScheduleView {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// "P1 - 2023-10-16"
    pub fn heading(&self) -> String {
        format!("{} - {}", self.channel_name, self.date.format("%Y-%m-%d"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_from_wire_json() {
        let json = r#"{
            "image": "https://static-cdn.sr.se/images/132/p1.jpg",
            "tagline": "Nyheter, samhälle och kultur",
            "siteurl": "https://sverigesradio.se/p1",
            "liveaudio": { "id": 132, "url": "https://sverigesradio.se/topsy/direkt/132-hi-aac.m3u8", "statkey": "/app/direkt/p1" },
            "channeltype": "Rikskanal",
            "id": 132,
            "name": "P1"
        }"#;
        let ch = ChannelRef::from_wire(serde_json::from_str(json).unwrap()).unwrap();
        assert_eq!(ch.id, 132);
        assert_eq!(ch.name, "P1");
        assert_eq!(ch.channel_type.as_deref(), Some("Rikskanal"));
        assert_eq!(
            ch.live_audio_url.as_deref(),
            Some("https://sverigesradio.se/topsy/direkt/132-hi-aac.m3u8")
        );
    }

    #[test]
    fn test_channel_missing_optionals() {
        let ch =
            ChannelRef::from_wire(serde_json::json!({"id": 7, "liveaudio": null})).unwrap();
        assert_eq!(ch.name, "");
        assert!(ch.tagline.is_none());
        assert!(ch.live_audio_url.is_none());
        assert_eq!(ch.tooltip(), "");
    }

    #[test]
    fn test_channel_serializes_with_own_names() {
        let ch = ChannelRef {
            id: 164,
            name: "P3".into(),
            channel_type: Some("Rikskanal".into()),
            live_audio_url: Some("https://x/p3.m3u8".into()),
            ..Default::default()
        };
        let json = serde_json::to_value(&ch).unwrap();
        assert_eq!(json["channel_type"], "Rikskanal");
        assert_eq!(json["live_audio_url"], "https://x/p3.m3u8");
        assert!(json.get("liveaudio").is_none());
    }

    #[test]
    fn test_channel_without_id_is_rejected() {
        assert!(ChannelRef::from_wire(serde_json::json!({"name": "no id"})).is_err());
        assert!(ChannelRef::from_wire(serde_json::json!({"id": "abc"})).is_err());
    }

    #[test]
    fn test_tooltip_skips_empty_parts() {
        let ch = ChannelRef {
            id: 1,
            name: "P2".into(),
            tagline: Some("Klassiskt".into()),
            channel_type: Some(String::new()),
            site_url: Some("https://sverigesradio.se/p2".into()),
            live_audio_url: None,
        };
        assert_eq!(ch.tooltip(), "Klassiskt • https://sverigesradio.se/p2");

        let ch = ChannelRef {
            channel_type: Some("Rikskanal".into()),
            tagline: None,
            ..ch
        };
        assert_eq!(ch.tooltip(), "Type: Rikskanal • https://sverigesradio.se/p2");
    }

    #[test]
    fn test_raw_entry_tolerates_nulls() {
        let json = r#"{"title": "Ekot", "subtitle": null, "starttimeutc": "/Date(1697463600000)/"}"#;
        let e: RawScheduleEntry = serde_json::from_str(json).unwrap();
        assert_eq!(e.title.as_deref(), Some("Ekot"));
        assert!(e.subtitle.is_none());
        assert!(e.endtimeutc.is_none());
    }
}
