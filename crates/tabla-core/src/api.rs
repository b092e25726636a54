//! Sveriges Radio open API client: channel directory and schedule source.

use std::future::Future;
use std::time::Duration;

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ApiConfig;
use crate::model::{ChannelId, ChannelRef, RawScheduleEntry};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("transport: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{url} returned status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("decode {what}: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Ordered list of all channels.
pub trait ChannelDirectory {
    fn list_channels(&self) -> impl Future<Output = Result<Vec<ChannelRef>, ApiError>> + Send;
}

/// Programme entries for one channel on one local calendar date, in source order.
pub trait ScheduleSource {
    fn list_schedule(
        &self,
        channel_id: ChannelId,
        date: NaiveDate,
    ) -> impl Future<Output = Result<Vec<RawScheduleEntry>, ApiError>> + Send;
}

// ── Response bodies ───────────────────────────────────────────────────────────

// Entries are kept as raw values so one bad entry does not sink the batch.

#[derive(Debug, Default, Deserialize)]
struct ChannelsResponse {
    #[serde(default)]
    channels: Option<Vec<Value>>,
}

/// Newer responses carry `schedule`, older ones `scheduledepisodes`.
#[derive(Debug, Default, Deserialize)]
struct ScheduleResponse {
    #[serde(default)]
    schedule: Option<Vec<Value>>,
    #[serde(default)]
    scheduledepisodes: Option<Vec<Value>>,
}

/// Decode each entry, dropping (and logging) the ones that do not fit.
fn decode_each<T>(
    what: &str,
    values: Vec<Value>,
    decode: impl Fn(Value) -> Result<T, serde_json::Error>,
) -> Vec<T> {
    let total = values.len();
    let decoded: Vec<T> = values
        .into_iter()
        .enumerate()
        .filter_map(|(i, value)| match decode(value) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!("[api] skipping {} entry {}: {}", what, i, e);
                None
            }
        })
        .collect();
    if decoded.len() < total {
        debug!("[api] kept {}/{} {} entries", decoded.len(), total, what);
    }
    decoded
}

pub fn decode_channels(body: &str) -> Result<Vec<ChannelRef>, ApiError> {
    let resp: ChannelsResponse = serde_json::from_str(body).map_err(|source| ApiError::Decode {
        what: "channels",
        source,
    })?;
    Ok(decode_each(
        "channel",
        resp.channels.unwrap_or_default(),
        ChannelRef::from_wire,
    ))
}

pub fn decode_schedule(body: &str) -> Result<Vec<RawScheduleEntry>, ApiError> {
    let resp: ScheduleResponse = serde_json::from_str(body).map_err(|source| ApiError::Decode {
        what: "schedule",
        source,
    })?;
    let values = resp
        .schedule
        .or(resp.scheduledepisodes)
        .unwrap_or_default();
    Ok(decode_each(
        "schedule",
        values,
        serde_json::from_value::<RawScheduleEntry>,
    ))
}

// ── Client ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct SrClient {
    client: reqwest::Client,
    base_url: String,
    page_size: u32,
}

impl SrClient {
    pub fn new(cfg: &ApiConfig) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder().user_agent(cfg.user_agent.clone());
        if let Some(secs) = cfg.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(Self {
            client: builder.build()?,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            page_size: cfg.page_size,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_text(&self, path: &str, query: &[(&str, String)]) -> Result<String, ApiError> {
        let url = format!("{}/{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status { url, status });
        }
        Ok(response.text().await?)
    }
}

impl ChannelDirectory for SrClient {
    async fn list_channels(&self) -> Result<Vec<ChannelRef>, ApiError> {
        let body = self
            .get_text(
                "channels",
                &[
                    ("format", "json".to_string()),
                    ("size", self.page_size.to_string()),
                ],
            )
            .await?;
        let channels = decode_channels(&body)?;
        debug!("[api] {} channels", channels.len());
        Ok(channels)
    }
}

impl ScheduleSource for SrClient {
    async fn list_schedule(
        &self,
        channel_id: ChannelId,
        date: NaiveDate,
    ) -> Result<Vec<RawScheduleEntry>, ApiError> {
        let body = self
            .get_text(
                "scheduledepisodes",
                &[
                    ("channelid", channel_id.to_string()),
                    ("date", date.format("%Y-%m-%d").to_string()),
                    ("format", "json".to_string()),
                    ("size", self.page_size.to_string()),
                ],
            )
            .await?;
        let entries = decode_schedule(&body)?;
        debug!("[api] channel {} {}: {} entries", channel_id, date, entries.len());
        Ok(entries)
    }
}

// ── Fetch boundary ────────────────────────────────────────────────────────────

/// Any failure degrades to an empty list plus a logged diagnostic.
pub async fn fetch_channels_or_empty<D: ChannelDirectory>(directory: &D) -> Vec<ChannelRef> {
    match directory.list_channels().await {
        Ok(channels) => channels,
        Err(e) => {
            warn!("[api] channel list unavailable: {}", e);
            Vec::new()
        }
    }
}

pub async fn fetch_schedule_or_empty<S: ScheduleSource>(
    source: &S,
    channel_id: ChannelId,
    date: NaiveDate,
) -> Vec<RawScheduleEntry> {
    match source.list_schedule(channel_id, date).await {
        Ok(entries) => entries,
        Err(e) => {
            warn!("[api] schedule for {} on {} unavailable: {}", channel_id, date, e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_channels() {
        let body = r#"{
            "copyright": "Copyright Sveriges Radio 2023. All rights reserved.",
            "channels": [
                {"id": 132, "name": "P1", "liveaudio": {"url": "https://example.test/132.m3u8"}},
                {"id": 163, "name": "P2"}
            ],
            "pagination": {"page": 1, "size": 500, "totalhits": 2}
        }"#;
        let channels = decode_channels(body).unwrap();
        assert_eq!(channels.len(), 2);
        assert_eq!(channels[0].name, "P1");
        assert_eq!(channels[1].id, 163);
        assert!(channels[1].live_audio_url.is_none());
    }

    #[test]
    fn test_decode_channels_absent_is_empty() {
        assert!(decode_channels("{}").unwrap().is_empty());
        assert!(decode_channels(r#"{"channels": null}"#).unwrap().is_empty());
    }

    #[test]
    fn test_decode_malformed_is_error() {
        assert!(matches!(
            decode_channels("<html>"),
            Err(ApiError::Decode { what: "channels", .. })
        ));
        assert!(matches!(
            decode_schedule("[1, 2"),
            Err(ApiError::Decode { what: "schedule", .. })
        ));
    }

    #[test]
    fn test_decode_skips_bad_channel_entries() {
        let body = r#"{"channels": [{"id": 132}, {"name": "no id"}, {"id": "P2"}, {"id": 164}]}"#;
        let ids: Vec<ChannelId> = decode_channels(body).unwrap().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![132, 164]);
    }

    #[test]
    fn test_decode_skips_bad_schedule_entries() {
        let body = r#"{"schedule": [{"title": "Ekot"}, {"title": 42}, "junk", {"title": "Musik"}]}"#;
        let titles: Vec<String> = decode_schedule(body)
            .unwrap()
            .into_iter()
            .filter_map(|e| e.title)
            .collect();
        assert_eq!(titles, vec!["Ekot", "Musik"]);
    }

    #[test]
    fn test_decode_schedule_prefers_schedule_key() {
        let body = r#"{
            "schedule": [{"title": "Ekot"}],
            "scheduledepisodes": [{"title": "old"}, {"title": "older"}]
        }"#;
        let entries = decode_schedule(body).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title.as_deref(), Some("Ekot"));
    }

    #[test]
    fn test_decode_schedule_falls_back_to_scheduledepisodes() {
        let body = r#"{"scheduledepisodes": [{"title": "P3 Din Gata"}]}"#;
        let entries = decode_schedule(body).unwrap();
        assert_eq!(entries[0].title.as_deref(), Some("P3 Din Gata"));

        assert!(decode_schedule("{}").unwrap().is_empty());
    }

    #[test]
    fn test_client_trims_base_url() {
        let cfg = ApiConfig {
            base_url: "http://127.0.0.1:1/api/v2/".into(),
            ..Default::default()
        };
        let client = SrClient::new(&cfg).unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:1/api/v2");
    }
}
