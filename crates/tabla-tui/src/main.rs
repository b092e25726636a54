mod action;
mod app;
mod app_state;
mod cli;
mod component;
mod components;
mod focus;
mod http;
mod player;
mod render;
mod theme;
mod widgets;

use std::sync::Arc;

use clap::Parser;
use tokio::sync::mpsc;

use tabla_core::api::SrClient;
use tabla_core::config::Config;
use tabla_core::platform;
use tabla_core::protocol::Command;
use tabla_core::state::{Model, StateManager};

use crate::app::AppMessage;
use crate::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let data_dir = platform::data_dir();
    std::fs::create_dir_all(&data_dir)?;
    let log_path = platform::log_file();

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    // Allow RUST_LOG override; default to debug for app code but suppress noisy
    // connection-level DEBUG from HTTP client internals (hyper_util, reqwest).
    let log_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "debug,hyper_util=warn,reqwest=warn,hyper=warn".to_string());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    // ── Load config ──────────────────────────────────────────────────────────
    let mut config = Config::load().unwrap_or_default();
    if cli.http {
        config.http.enabled = true;
    }

    match cli.command {
        Some(Commands::Channels { limit }) => {
            return cli::print_channels(&config, limit.as_deref()).await;
        }
        Some(Commands::Schedule { id }) => return cli::print_schedule(&config, id).await,
        None => {}
    }

    // Print log path to stderr so the operator can tail it immediately.
    eprintln!("tabla log: {}", log_path.display());
    tracing::info!("tabla starting…");

    let (model, startup) = Model::init(config.player.autoplay, config.channels.limit);
    let state_manager = Arc::new(StateManager::new(model.clone()));

    let client = match SrClient::new(&config.api) {
        Ok(c) => Some(c),
        Err(e) => {
            tracing::error!("could not build HTTP client: {}", e);
            None
        }
    };

    let (tx, rx) = mpsc::channel::<AppMessage>(1024);

    // ── HTTP server ──────────────────────────────────────────────────────────
    if config.http.enabled {
        let (cmd_tx, mut cmd_rx) = mpsc::channel::<Command>(64);
        http::start_server(
            config.http.bind_address.clone(),
            config.http.port,
            state_manager.clone(),
            cmd_tx,
        );
        let remote_tx = tx.clone();
        tokio::spawn(async move {
            while let Some(cmd) = cmd_rx.recv().await {
                if remote_tx.send(AppMessage::Remote(cmd)).await.is_err() {
                    break;
                }
            }
        });
    }

    // ── Run TUI ──────────────────────────────────────────────────────────────
    let player = player::Player::new(&config.player);
    let app = app::App::new(model, client, player, state_manager, tx);
    app.run(startup, rx).await?;

    Ok(())
}
