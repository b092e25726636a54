//! Command-line surface: the interactive TUI by default, plus plain-text
//! subcommands for scripting.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};

use tabla_core::api::{fetch_schedule_or_empty, ChannelDirectory, ScheduleSource, SrClient};
use tabla_core::config::Config;
use tabla_core::limit::{limit_channels, parse_requested_count};
use tabla_core::live::resolve_live_audio;
use tabla_core::model::{ChannelId, ScheduleView};
use tabla_core::state::STARTUP_ERROR_TEXT;
use tabla_core::timestamp::today_ymd;

use crate::render::{channel_lines, schedule_block};

#[derive(Parser)]
#[command(name = "tabla")]
#[command(version)]
#[command(about = "Sveriges Radio channels, today's schedule and live audio", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Start the HTTP control API regardless of config.
    #[arg(long, global = true)]
    pub http: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the channel list
    Channels {
        /// How many channels to show (default 10)
        #[arg(long)]
        limit: Option<String>,
    },
    /// Print what is left on today's schedule for a channel
    Schedule {
        /// Channel id, e.g. 132 for P1
        id: ChannelId,
    },
}

pub async fn print_channels(config: &Config, limit: Option<&str>) -> Result<()> {
    let client = SrClient::new(&config.api)?;
    let channels = client
        .list_channels()
        .await
        .context(STARTUP_ERROR_TEXT)?;

    let requested = match limit {
        Some(raw) => parse_requested_count(Some(raw)),
        None => config.channels.limit,
    };
    for line in channel_lines(limit_channels(&channels, requested)) {
        println!("{}", line);
    }
    Ok(())
}

pub async fn print_schedule(config: &Config, id: ChannelId) -> Result<()> {
    let client = SrClient::new(&config.api)?;
    println!("{}", schedule_text(&client, id, Utc::now()).await?);
    Ok(())
}

/// Only the directory fetch can fail here; a schedule that cannot be fetched
/// reads as an empty day.
async fn schedule_text<C>(client: &C, id: ChannelId, now: DateTime<Utc>) -> Result<String>
where
    C: ChannelDirectory + ScheduleSource,
{
    let channels = client
        .list_channels()
        .await
        .context(STARTUP_ERROR_TEXT)?;
    let channel = channels
        .iter()
        .find(|c| c.id == id)
        .with_context(|| format!("unknown channel id {}", id))?;

    let date = today_ymd(now);
    let raw = fetch_schedule_or_empty(client, id, date).await;
    let view = ScheduleView::build(channel, date, &raw, now);
    Ok(schedule_block(&view, &resolve_live_audio(Some(channel))))
}
