#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;

use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tabla_core::config::ApiConfig;
use tabla_core::api::SrClient;

/// Milliseconds used as "now" by tests that build schedules from fixtures.
pub const NOW_MS: i64 = 1_697_450_000_000;

fn date_token(ms: i64) -> String {
    format!("/Date({}+0200)/", ms)
}

fn has_list_params(q: &HashMap<String, String>) -> bool {
    q.get("format").map(String::as_str) == Some("json")
        && q.get("size").map(String::as_str) == Some("500")
}

pub fn channels_body() -> Value {
    json!({
        "copyright": "Copyright Sveriges Radio",
        "channels": [
            {
                "id": 132,
                "name": "P1",
                "tagline": "Nyheter och samhälle",
                "channeltype": "Rikskanal",
                "siteurl": "https://sverigesradio.se/p1",
                "liveaudio": { "id": 132, "url": "https://live.example.test/132.m3u8" }
            },
            { "id": 163, "name": "P2", "liveaudio": { "id": 163, "url": "https://live.example.test/163.m3u8" } },
            { "id": 164, "name": "P3" }
        ]
    })
}

/// P1 uses the current `schedule` shape; P2 the older `scheduledepisodes`
/// shape with plain `starttime`/`endtime`.  P3 has nothing left today.
pub fn schedule_body(channel_id: &str) -> Value {
    match channel_id {
        "132" => json!({
            "schedule": [
                {
                    "title": "Ekot",
                    "starttimeutc": date_token(NOW_MS + 3_600_000),
                    "endtimeutc": date_token(NOW_MS + 4_500_000)
                },
                {
                    "title": "Morgonpasset",
                    "subtitle": "med gäster",
                    "starttimeutc": date_token(NOW_MS - 600_000),
                    "endtimeutc": date_token(NOW_MS + 1_800_000)
                },
                {
                    "title": "Nattsudd",
                    "starttimeutc": date_token(NOW_MS - 7_200_000),
                    "endtimeutc": date_token(NOW_MS - 3_600_000)
                }
            ]
        }),
        "163" => json!({
            "scheduledepisodes": [
                {
                    "title": "Klassisk förmiddag",
                    "starttime": date_token(NOW_MS),
                    "endtime": date_token(NOW_MS + 3_600_000)
                }
            ]
        }),
        _ => json!({ "schedule": [] }),
    }
}

async fn channels(Query(q): Query<HashMap<String, String>>) -> impl IntoResponse {
    if !has_list_params(&q) {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": "bad query" })));
    }
    (StatusCode::OK, Json(channels_body()))
}

async fn scheduledepisodes(Query(q): Query<HashMap<String, String>>) -> impl IntoResponse {
    let (Some(channel_id), Some(_date)) = (q.get("channelid"), q.get("date")) else {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": "bad query" })));
    };
    if !has_list_params(&q) {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": "bad query" })));
    }
    (StatusCode::OK, Json(schedule_body(channel_id)))
}

async fn unavailable() -> impl IntoResponse {
    (StatusCode::SERVICE_UNAVAILABLE, "maintenance")
}

async fn not_json() -> impl IntoResponse {
    (StatusCode::OK, "<html>not json</html>")
}

/// Serves `/ok/...` with fixtures, `/down/...` with 503 and `/garbled/...`
/// with an HTML body.
pub async fn spawn() -> SocketAddr {
    let app = Router::new()
        .route("/ok/channels", get(channels))
        .route("/ok/scheduledepisodes", get(scheduledepisodes))
        .route("/down/channels", get(unavailable))
        .route("/down/scheduledepisodes", get(unavailable))
        .route("/garbled/channels", get(not_json))
        .route("/garbled/scheduledepisodes", get(not_json));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fixture server");
    let addr = listener.local_addr().expect("fixture server address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("fixture server");
    });
    addr
}

pub fn client(addr: SocketAddr, prefix: &str) -> SrClient {
    let cfg = ApiConfig {
        base_url: format!("http://{}/{}", addr, prefix),
        request_timeout_secs: Some(5),
        ..Default::default()
    };
    SrClient::new(&cfg).expect("client should build")
}
