use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::limit::{effective_count, limit_channels};
use crate::live::{resolve_live_audio, LiveAudio};
use crate::model::{ChannelId, ChannelRef, RawScheduleEntry, ScheduleView};
use crate::protocol::{Command, Effect, Message};
use crate::timestamp::today_ymd;

pub const STARTUP_ERROR_TEXT: &str = "Could not fetch data. Try again later.";

/// Sequence numbers for one kind of outstanding request.  Only the most
/// recently issued number is current; anything older is stale.
#[derive(Debug, Clone, Default)]
pub struct RequestSlot {
    latest: u64,
    pending: bool,
}

impl RequestSlot {
    pub fn issue(&mut self) -> u64 {
        self.latest += 1;
        self.pending = true;
        self.latest
    }

    pub fn is_current(&self, seq: u64) -> bool {
        self.pending && seq == self.latest
    }

    /// Accept a response.  False for stale or already-settled sequence numbers.
    pub fn settle(&mut self, seq: u64) -> bool {
        if !self.is_current(seq) {
            return false;
        }
        self.pending = false;
        true
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(tag = "state", content = "view", rename_all = "snake_case")]
pub enum SchedulePane {
    #[default]
    Empty,
    Loading {
        channel_id: ChannelId,
        date: NaiveDate,
    },
    Ready(ScheduleView),
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PlayerState {
    #[default]
    Stopped,
    Playing {
        channel_id: ChannelId,
        url: String,
    },
    NoStream {
        channel_id: ChannelId,
        message: String,
    },
}

impl PlayerState {
    pub fn is_playing(&self) -> bool {
        matches!(self, PlayerState::Playing { .. })
    }
}

/// All mutable application state.  Changed only through [`Model::update`].
#[derive(Debug, Clone, Serialize)]
pub struct Model {
    /// Bumped on every change.
    pub rev: u64,
    pub channels: Vec<ChannelRef>,
    pub channels_loading: bool,
    pub requested_limit: Option<f64>,
    /// Channel whose schedule is shown or being fetched.
    pub selected: Option<ChannelId>,
    pub schedule: SchedulePane,
    pub player: PlayerState,
    /// Channel the player is pointed at; follows non-empty schedule views.
    pub player_selection: Option<ChannelId>,
    pub startup_error: Option<String>,
    #[serde(skip)]
    autoplay_armed: bool,
    #[serde(skip)]
    channel_requests: RequestSlot,
    #[serde(skip)]
    schedule_requests: RequestSlot,
}

impl Model {
    pub fn new(autoplay: bool, requested_limit: Option<f64>) -> Self {
        Self {
            rev: 1,
            channels: Vec::new(),
            channels_loading: false,
            requested_limit,
            selected: None,
            schedule: SchedulePane::Empty,
            player: PlayerState::Stopped,
            player_selection: None,
            startup_error: None,
            autoplay_armed: autoplay,
            channel_requests: RequestSlot::default(),
            schedule_requests: RequestSlot::default(),
        }
    }

    /// Fresh model plus the channel directory fetch that starts everything.
    pub fn init(autoplay: bool, requested_limit: Option<f64>) -> (Self, Vec<Effect>) {
        let mut model = Self::new(autoplay, requested_limit);
        let effects = model.reload_channels();
        (model, effects)
    }

    pub fn lookup(&self, id: ChannelId) -> Option<&ChannelRef> {
        self.channels.iter().find(|c| c.id == id)
    }

    pub fn effective_limit(&self) -> usize {
        effective_count(self.requested_limit)
    }

    pub fn visible_channels(&self) -> &[ChannelRef] {
        limit_channels(&self.channels, self.requested_limit)
    }

    /// Channel `step` places from `from` in the full directory, wrapping at
    /// both ends.  Starts from the first channel when `from` is unknown.
    pub fn neighbour_channel(&self, from: Option<ChannelId>, step: isize) -> Option<ChannelId> {
        let len = self.channels.len() as isize;
        if len == 0 {
            return None;
        }
        let idx = match from.and_then(|id| self.channels.iter().position(|c| c.id == id)) {
            Some(pos) => (pos as isize + step).rem_euclid(len),
            None => 0,
        };
        Some(self.channels[idx as usize].id)
    }

    /// Channel the player currently refers to, playing or not.
    pub fn player_channel(&self) -> Option<ChannelId> {
        match &self.player {
            PlayerState::Playing { channel_id, .. } | PlayerState::NoStream { channel_id, .. } => {
                Some(*channel_id)
            }
            PlayerState::Stopped => self.player_selection,
        }
    }

    pub fn schedule_view(&self) -> Option<&ScheduleView> {
        match &self.schedule {
            SchedulePane::Ready(view) => Some(view),
            _ => None,
        }
    }

    pub fn update(&mut self, msg: Message, now: DateTime<Utc>) -> Vec<Effect> {
        match msg {
            Message::Command(cmd) => self.handle_command(cmd, now),
            Message::ChannelsLoaded { seq, channels } => self.channels_loaded(seq, channels, now),
            Message::ScheduleLoaded {
                seq,
                channel_id,
                date,
                entries,
            } => self.schedule_loaded(seq, channel_id, date, entries, now),
            Message::StartupFailed(detail) => {
                warn!("[state] startup failed: {}", detail);
                self.channels_loading = false;
                self.startup_error = Some(STARTUP_ERROR_TEXT.to_string());
                self.touch();
                Vec::new()
            }
        }
    }

    fn handle_command(&mut self, cmd: Command, now: DateTime<Utc>) -> Vec<Effect> {
        match cmd {
            Command::SelectChannel { id } => self.select_channel(id, now),
            Command::ChangeLimit { count } => {
                self.requested_limit = count;
                self.touch();
                debug!("[state] channel count now {}", self.effective_limit());
                Vec::new()
            }
            Command::Play { id } => {
                self.autoplay_armed = false;
                self.play(id)
            }
            Command::Stop => self.stop(),
            Command::ReloadChannels => self.reload_channels(),
        }
    }

    fn reload_channels(&mut self) -> Vec<Effect> {
        let seq = self.channel_requests.issue();
        self.channels_loading = true;
        self.touch();
        vec![Effect::FetchChannels { seq }]
    }

    fn channels_loaded(
        &mut self,
        seq: u64,
        channels: Vec<ChannelRef>,
        now: DateTime<Utc>,
    ) -> Vec<Effect> {
        if !self.channel_requests.settle(seq) {
            debug!("[state] discarding stale channel list (seq {})", seq);
            return Vec::new();
        }
        info!("[state] {} channels loaded", channels.len());
        self.channels = channels;
        self.channels_loading = false;
        if !self.channels.is_empty() {
            self.startup_error = None;
        }
        self.touch();

        let still_known = self.selected.is_some_and(|id| self.lookup(id).is_some());
        if still_known {
            return Vec::new();
        }
        match self.visible_channels().first().map(|c| c.id) {
            Some(first) => self.select_channel(first, now),
            None => Vec::new(),
        }
    }

    fn select_channel(&mut self, id: ChannelId, now: DateTime<Utc>) -> Vec<Effect> {
        if self.lookup(id).is_none() {
            debug!("[state] ignoring select of unknown channel {}", id);
            return Vec::new();
        }
        let date = today_ymd(now);
        let seq = self.schedule_requests.issue();
        self.selected = Some(id);
        self.schedule = SchedulePane::Loading {
            channel_id: id,
            date,
        };
        self.touch();
        vec![Effect::FetchSchedule {
            seq,
            channel_id: id,
            date,
        }]
    }

    fn schedule_loaded(
        &mut self,
        seq: u64,
        channel_id: ChannelId,
        date: NaiveDate,
        entries: Vec<RawScheduleEntry>,
        now: DateTime<Utc>,
    ) -> Vec<Effect> {
        if !self.schedule_requests.settle(seq) {
            debug!(
                "[state] discarding stale schedule for {} (seq {})",
                channel_id, seq
            );
            return Vec::new();
        }

        let channel = self.lookup(channel_id).cloned().unwrap_or(ChannelRef {
            id: channel_id,
            ..Default::default()
        });
        let view = ScheduleView::build(&channel, date, &entries, now);
        let has_entries = !view.is_empty();
        self.schedule = SchedulePane::Ready(view);
        self.touch();

        // An empty view leaves the player alone.
        if !has_entries {
            return Vec::new();
        }
        self.player_selection = Some(channel_id);
        if self.autoplay_armed && !self.player.is_playing() {
            return self.play(channel_id);
        }
        Vec::new()
    }

    fn play(&mut self, id: ChannelId) -> Vec<Effect> {
        let Some(channel) = self.lookup(id) else {
            debug!("[state] ignoring play of unknown channel {}", id);
            return Vec::new();
        };
        let live = resolve_live_audio(Some(channel));
        self.player_selection = Some(id);

        let effects = match live {
            LiveAudio::Playable { url } => {
                // Autoplay keeps trying until a stream actually starts.
                self.autoplay_armed = false;
                if self.player
                    == (PlayerState::Playing {
                        channel_id: id,
                        url: url.clone(),
                    })
                {
                    return Vec::new();
                }
                self.player = PlayerState::Playing {
                    channel_id: id,
                    url: url.clone(),
                };
                vec![Effect::StartPlayback {
                    channel_id: id,
                    url,
                }]
            }
            no_stream @ LiveAudio::NoStream { .. } => {
                let was_playing = self.player.is_playing();
                self.player = PlayerState::NoStream {
                    channel_id: id,
                    message: no_stream.fallback_text().unwrap_or_default(),
                };
                if was_playing {
                    vec![Effect::StopPlayback]
                } else {
                    Vec::new()
                }
            }
        };
        self.touch();
        effects
    }

    fn stop(&mut self) -> Vec<Effect> {
        self.autoplay_armed = false;
        let effects = match self.player {
            PlayerState::Playing { .. } => vec![Effect::StopPlayback],
            PlayerState::NoStream { .. } => Vec::new(),
            PlayerState::Stopped => return Vec::new(),
        };
        self.player = PlayerState::Stopped;
        self.touch();
        effects
    }

    fn touch(&mut self) {
        self.rev += 1;
    }
}

/// Latest published [`Model`] snapshot, shared with the HTTP API.
pub struct StateManager {
    state: Arc<RwLock<Model>>,
}

impl StateManager {
    pub fn new(model: Model) -> Self {
        Self {
            state: Arc::new(RwLock::new(model)),
        }
    }

    pub fn arc(&self) -> Arc<RwLock<Model>> {
        Arc::clone(&self.state)
    }

    pub async fn get_state(&self) -> Model {
        self.state.read().await.clone()
    }

    /// Replace the snapshot only with a newer revision; publishes may land
    /// out of order.
    pub async fn publish(&self, model: &Model) {
        let mut state = self.state.write().await;
        if model.rev > state.rev {
            *state = model.clone();
        }
    }
}
