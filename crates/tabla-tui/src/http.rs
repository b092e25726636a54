use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use tabla_core::limit::parse_requested_count;
use tabla_core::model::ChannelId;
use tabla_core::protocol::Command;
use tabla_core::state::{PlayerState, SchedulePane, StateManager};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::{error, info};

#[derive(Clone)]
struct HttpState {
    state_manager: Arc<StateManager>,
    command_tx: mpsc::Sender<Command>,
}

#[derive(Serialize)]
struct ApiState {
    channels: Vec<ChannelInfo>,
    total_channels: usize,
    limit: usize,
    selected: Option<ChannelId>,
    schedule: SchedulePane,
    player: PlayerState,
    startup_error: Option<String>,
}

#[derive(Serialize)]
struct ChannelInfo {
    id: ChannelId,
    name: String,
    tooltip: String,
    live_audio_url: Option<String>,
}

fn router(state: HttpState) -> Router {
    Router::new()
        .route("/api/state", get(get_state))
        .route("/api/select/:id", get(select_channel).post(select_channel))
        .route("/api/limit/:count", get(change_limit).post(change_limit))
        .route("/api/limit", get(reset_limit).post(reset_limit))
        .route("/api/play/:id", get(play).post(play))
        .route("/api/stop", get(stop).post(stop))
        .route("/api/reload", get(reload).post(reload))
        .with_state(state)
}

pub fn start_server(
    bind_address: String,
    port: u16,
    state_manager: Arc<StateManager>,
    command_tx: mpsc::Sender<Command>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let app = router(HttpState {
            state_manager,
            command_tx,
        });

        let addr = format!("{}:{}", bind_address, port);
        let listener = match TcpListener::bind(&addr).await {
            Ok(l) => l,
            Err(e) => {
                error!("Failed to bind HTTP server to {}: {}", addr, e);
                return;
            }
        };

        info!("HTTP API server listening on http://{}", addr);

        if let Err(e) = axum::serve(listener, app).await {
            error!("HTTP server error: {}", e);
        }
    })
}

async fn get_state(State(state): State<HttpState>) -> Json<ApiState> {
    let model = state.state_manager.get_state().await;

    let channels = model
        .visible_channels()
        .iter()
        .map(|c| ChannelInfo {
            id: c.id,
            name: c.name.clone(),
            tooltip: c.tooltip(),
            live_audio_url: c.live_audio_url.clone(),
        })
        .collect();

    Json(ApiState {
        channels,
        total_channels: model.channels.len(),
        limit: model.effective_limit(),
        selected: model.selected,
        schedule: model.schedule,
        player: model.player,
        startup_error: model.startup_error,
    })
}

async fn send(state: &HttpState, cmd: Command) -> StatusCode {
    info!("HTTP API: {:?}", cmd);
    if state.command_tx.send(cmd).await.is_err() {
        error!("Failed to forward HTTP command");
        return StatusCode::INTERNAL_SERVER_ERROR;
    }
    StatusCode::OK
}

async fn select_channel(State(state): State<HttpState>, Path(id): Path<ChannelId>) -> StatusCode {
    send(&state, Command::SelectChannel { id }).await
}

async fn change_limit(State(state): State<HttpState>, Path(count): Path<String>) -> StatusCode {
    let count = parse_requested_count(Some(&count));
    send(&state, Command::ChangeLimit { count }).await
}

async fn reset_limit(State(state): State<HttpState>) -> StatusCode {
    send(&state, Command::ChangeLimit { count: None }).await
}

async fn play(State(state): State<HttpState>, Path(id): Path<ChannelId>) -> StatusCode {
    send(&state, Command::Play { id }).await
}

async fn stop(State(state): State<HttpState>) -> StatusCode {
    send(&state, Command::Stop).await
}

async fn reload(State(state): State<HttpState>) -> StatusCode {
    send(&state, Command::ReloadChannels).await
}
