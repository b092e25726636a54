//! Live-audio resolution for a channel.

use serde::Serialize;

use crate::model::ChannelRef;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LiveAudio {
    Playable { url: String },
    NoStream { channel_name: String },
}

impl LiveAudio {
    /// Text shown instead of a player when there is nothing to play.
    pub fn fallback_text(&self) -> Option<String> {
        match self {
            LiveAudio::Playable { .. } => None,
            LiveAudio::NoStream { channel_name } => {
                Some(format!("No live stream found for {}.", channel_name))
            }
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            LiveAudio::Playable { url } => Some(url),
            LiveAudio::NoStream { .. } => None,
        }
    }
}

/// An empty URL counts as no stream.  An unknown channel resolves to
/// `NoStream` with an empty name.
pub fn resolve_live_audio(channel: Option<&ChannelRef>) -> LiveAudio {
    match channel.and_then(|c| c.live_audio_url.as_deref()) {
        Some(url) if !url.trim().is_empty() => LiveAudio::Playable {
            url: url.to_string(),
        },
        _ => LiveAudio::NoStream {
            channel_name: channel.map(|c| c.name.clone()).unwrap_or_default(),
        },
    }
}
