use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::{ChannelId, ChannelRef, RawScheduleEntry};

/// User intents, from the keyboard or the HTTP API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd")]
pub enum Command {
    /// Show today's remaining schedule for a channel.
    SelectChannel { id: ChannelId },
    /// `None` means "use the default".
    ChangeLimit { count: Option<f64> },
    Play { id: ChannelId },
    Stop,
    ReloadChannels,
}

/// Everything `Model::update` reacts to.  Fetch results carry the sequence
/// number they were issued with.
#[derive(Debug, Clone)]
pub enum Message {
    Command(Command),
    ChannelsLoaded {
        seq: u64,
        channels: Vec<ChannelRef>,
    },
    ScheduleLoaded {
        seq: u64,
        channel_id: ChannelId,
        date: NaiveDate,
        entries: Vec<RawScheduleEntry>,
    },
    StartupFailed(String),
}

impl From<Command> for Message {
    fn from(cmd: Command) -> Self {
        Message::Command(cmd)
    }
}

/// Side effects requested by `Model::update`, run by the app loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchChannels {
        seq: u64,
    },
    FetchSchedule {
        seq: u64,
        channel_id: ChannelId,
        date: NaiveDate,
    },
    StartPlayback {
        channel_id: ChannelId,
        url: String,
    },
    StopPlayback,
}
