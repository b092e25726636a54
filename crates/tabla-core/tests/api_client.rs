mod common;

use chrono::NaiveDate;
use tabla_core::api::{
    fetch_channels_or_empty, fetch_schedule_or_empty, ApiError, ChannelDirectory, ScheduleSource,
};

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 10, 16).unwrap()
}

#[tokio::test]
async fn lists_channels_in_source_order() {
    let addr = common::fixture_server::spawn().await;
    let client = common::fixture_server::client(addr, "ok");

    let channels = client.list_channels().await.unwrap();
    let ids: Vec<u32> = channels.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![132, 163, 164]);
    assert_eq!(
        channels[0].live_audio_url.as_deref(),
        Some("https://live.example.test/132.m3u8")
    );
    assert_eq!(
        channels[0].tooltip(),
        "Nyheter och samhälle • Type: Rikskanal • https://sverigesradio.se/p1"
    );
    assert!(channels[2].live_audio_url.is_none());
}

#[tokio::test]
async fn reads_both_schedule_shapes() {
    let addr = common::fixture_server::spawn().await;
    let client = common::fixture_server::client(addr, "ok");

    let current = client.list_schedule(132, date()).await.unwrap();
    assert_eq!(current.len(), 3);
    assert!(current[0].starttimeutc.is_some());

    let older = client.list_schedule(163, date()).await.unwrap();
    assert_eq!(older.len(), 1);
    assert!(older[0].starttimeutc.is_none());
    assert!(older[0].starttime.is_some());

    assert!(client.list_schedule(164, date()).await.unwrap().is_empty());
}

#[tokio::test]
async fn non_success_status_is_typed_error() {
    let addr = common::fixture_server::spawn().await;
    let client = common::fixture_server::client(addr, "down");

    match client.list_channels().await {
        Err(ApiError::Status { status, url }) => {
            assert_eq!(status.as_u16(), 503);
            assert!(url.ends_with("/down/channels"));
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn malformed_body_is_decode_error() {
    let addr = common::fixture_server::spawn().await;
    let client = common::fixture_server::client(addr, "garbled");

    assert!(matches!(
        client.list_schedule(132, date()).await,
        Err(ApiError::Decode { .. })
    ));
}

#[tokio::test]
async fn boundary_helpers_degrade_to_empty() {
    let addr = common::fixture_server::spawn().await;

    for prefix in ["down", "garbled"] {
        let client = common::fixture_server::client(addr, prefix);
        assert!(fetch_channels_or_empty(&client).await.is_empty());
        assert!(fetch_schedule_or_empty(&client, 132, date()).await.is_empty());
    }

    let client = common::fixture_server::client(addr, "ok");
    assert_eq!(fetch_channels_or_empty(&client).await.len(), 3);
}

#[tokio::test]
async fn unreachable_host_is_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = common::fixture_server::client(addr, "ok");
    assert!(matches!(
        client.list_channels().await,
        Err(ApiError::Transport(_))
    ));
    assert!(fetch_channels_or_empty(&client).await.is_empty());
}
