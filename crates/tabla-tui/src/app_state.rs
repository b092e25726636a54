//! AppState: shared read-only data passed to all components during render/event.
//!
//! The App event-loop is the only thing that writes to AppState.

use chrono::{DateTime, Utc};
use tabla_core::model::{ChannelId, ChannelRef};
use tabla_core::state::{Model, PlayerState};

use crate::widgets::status_bar::InputMode;

pub struct AppState {
    pub model: Model,
    pub input_mode: InputMode,
    /// Refreshed every tick; drives the "on air" marker.
    pub now: DateTime<Utc>,
    /// Last mpv spawn failure, cleared on the next successful start.
    pub player_error: Option<String>,
}

impl AppState {
    pub fn new(model: Model) -> Self {
        Self {
            model,
            input_mode: InputMode::Normal,
            now: Utc::now(),
            player_error: None,
        }
    }

    pub fn channel(&self, id: ChannelId) -> Option<&ChannelRef> {
        self.model.lookup(id)
    }

    pub fn playing_channel(&self) -> Option<ChannelId> {
        match self.model.player {
            PlayerState::Playing { channel_id, .. } => Some(channel_id),
            _ => None,
        }
    }

    pub fn channel_name(&self, id: ChannelId) -> String {
        self.channel(id)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| format!("#{}", id))
    }
}
