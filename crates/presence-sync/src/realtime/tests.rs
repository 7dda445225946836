use std::time::Duration;

use futures_util::StreamExt;
use serde_json::json;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_tungstenite::tungstenite::Message as WsMessage;

use super::*;
use crate::error::SyncError;
use crate::snapshot::Status;
use crate::test_support::{accept, bind, next_json, send_hello, send_json, ServerWs};

fn config(url: &str) -> StreamConfig {
    StreamConfig {
        url: url.to_string(),
        reconnect_delay: Duration::from_millis(50),
        connect_timeout: Duration::from_secs(2),
    }
}

/// Wait for the first event matching `pred`, failing after two seconds.
async fn wait_for(
    rx: &mut mpsc::Receiver<StreamEvent>,
    pred: impl Fn(&StreamEvent) -> bool,
) -> StreamEvent {
    let deadline = Instant::now() + Duration::from_secs(2);
    loop {
        let event = tokio::time::timeout_at(deadline, rx.recv())
            .await
            .expect("timed out waiting for event")
            .expect("event channel closed");
        if pred(&event) {
            return event;
        }
    }
}

/// Count heartbeat frames the server receives within `window`.
async fn count_heartbeats(ws: &mut ServerWs, window: Duration) -> usize {
    let deadline = Instant::now() + window;
    let mut beats = 0;
    while let Ok(Some(Ok(msg))) = tokio::time::timeout_at(deadline, ws.next()).await {
        if let WsMessage::Text(text) = msg {
            let value: serde_json::Value = serde_json::from_str(text.as_str()).unwrap();
            if value == json!({"op": 3}) {
                beats += 1;
            }
        }
    }
    beats
}

#[tokio::test]
async fn subscribes_on_open() {
    let (listener, url) = bind().await;
    let (client, mut rx) = StreamClient::connect(config(&url), "123");

    let mut ws = accept(&listener).await;
    assert_eq!(
        next_json(&mut ws).await,
        json!({"op": 2, "d": {"subscribe_to_ids": ["123"]}})
    );
    wait_for(&mut rx, |e| matches!(e, StreamEvent::Link(LinkState::Connected))).await;

    client.shutdown().await;
}

#[tokio::test]
async fn init_and_update_for_subject_are_emitted() {
    let (listener, url) = bind().await;
    let (client, mut rx) = StreamClient::connect(config(&url), "123");

    let mut ws = accept(&listener).await;
    next_json(&mut ws).await;

    send_json(
        &mut ws,
        json!({"op": 0, "t": "INIT_STATE", "d": {"123": {"discord_status": "idle"}}}),
    )
    .await;
    send_json(
        &mut ws,
        json!({"op": 0, "t": "PRESENCE_UPDATE", "d": {"user_id": "999", "discord_status": "dnd"}}),
    )
    .await;
    send_json(
        &mut ws,
        json!({"op": 0, "t": "PRESENCE_UPDATE", "d": {"user_id": "123", "discord_status": "online"}}),
    )
    .await;

    match wait_for(&mut rx, |e| matches!(e, StreamEvent::Init(_))).await {
        StreamEvent::Init(snap) => assert_eq!(snap.status, Status::Idle),
        other => panic!("unexpected event: {other:?}"),
    }
    match wait_for(&mut rx, |e| matches!(e, StreamEvent::Update(_))).await {
        StreamEvent::Update(snap) => {
            assert_eq!(snap.user_id, "123");
            assert_eq!(snap.status, Status::Online);
        }
        other => panic!("unexpected event: {other:?}"),
    }

    client.shutdown().await;
}

#[tokio::test]
async fn heartbeats_follow_hello_interval() {
    let (listener, url) = bind().await;
    let (client, _rx) = StreamClient::connect(config(&url), "123");

    let mut ws = accept(&listener).await;
    next_json(&mut ws).await;
    send_hello(&mut ws, 100).await;

    let beats = count_heartbeats(&mut ws, Duration::from_millis(550)).await;
    assert!((3..=6).contains(&beats), "got {beats} heartbeats");

    client.shutdown().await;
}

#[tokio::test]
async fn second_hello_replaces_heartbeat_timer() {
    let (listener, url) = bind().await;
    let (client, _rx) = StreamClient::connect(config(&url), "123");

    let mut ws = accept(&listener).await;
    next_json(&mut ws).await;
    send_hello(&mut ws, 100).await;
    send_hello(&mut ws, 60_000).await;

    assert_eq!(count_heartbeats(&mut ws, Duration::from_millis(400)).await, 0);

    client.shutdown().await;
}

#[tokio::test]
async fn unclean_drop_reconnects_and_resubscribes() {
    let (listener, url) = bind().await;
    let (client, mut rx) = StreamClient::connect(config(&url), "123");

    let mut ws = accept(&listener).await;
    next_json(&mut ws).await;
    drop(ws);

    match wait_for(&mut rx, |e| matches!(e, StreamEvent::Error(_))).await {
        StreamEvent::Error(err) => assert!(matches!(
            err,
            SyncError::Stream(_) | SyncError::UnexpectedClose(_)
        )),
        other => panic!("unexpected event: {other:?}"),
    }
    wait_for(&mut rx, |e| {
        matches!(e, StreamEvent::Link(LinkState::ReconnectScheduled))
    })
    .await;

    let mut ws = accept(&listener).await;
    assert_eq!(
        next_json(&mut ws).await,
        json!({"op": 2, "d": {"subscribe_to_ids": ["123"]}})
    );

    client.shutdown().await;
}

#[tokio::test]
async fn connect_failure_schedules_reconnect() {
    let (listener, url) = bind().await;
    drop(listener);
    let (client, mut rx) = StreamClient::connect(config(&url), "123");

    match wait_for(&mut rx, |e| matches!(e, StreamEvent::Error(_))).await {
        StreamEvent::Error(err) => assert!(matches!(err, SyncError::Stream(_))),
        other => panic!("unexpected event: {other:?}"),
    }
    wait_for(&mut rx, |e| {
        matches!(e, StreamEvent::Link(LinkState::ReconnectScheduled))
    })
    .await;

    client.shutdown().await;
}

#[tokio::test]
async fn clean_close_does_not_reconnect() {
    let (listener, url) = bind().await;
    let (client, mut rx) = StreamClient::connect(config(&url), "123");

    let mut ws = accept(&listener).await;
    next_json(&mut ws).await;
    ws.close(None).await.unwrap();

    wait_for(&mut rx, |e| matches!(e, StreamEvent::Link(LinkState::Disconnected))).await;

    // Channel closes once the connection task exits.
    let rest = tokio::time::timeout(Duration::from_secs(2), async {
        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }
        events
    })
    .await
    .expect("connection task did not exit");
    assert!(rest.is_empty(), "unexpected events after close: {rest:?}");

    assert!(
        tokio::time::timeout(Duration::from_millis(300), listener.accept())
            .await
            .is_err(),
        "client reconnected after a clean close"
    );
    assert!(client.is_finished());
}

#[tokio::test]
async fn shutdown_sends_close_and_stops_heartbeats() {
    let (listener, url) = bind().await;
    let (client, mut rx) = StreamClient::connect(config(&url), "123");

    let mut ws = accept(&listener).await;
    next_json(&mut ws).await;
    send_hello(&mut ws, 50).await;
    tokio::time::sleep(Duration::from_millis(120)).await;

    client.shutdown().await;

    let saw_close = tokio::time::timeout(Duration::from_secs(2), async {
        while let Some(Ok(msg)) = ws.next().await {
            if msg.is_close() {
                return true;
            }
        }
        false
    })
    .await
    .unwrap_or(false);
    assert!(saw_close, "server never saw a close frame");

    assert_eq!(count_heartbeats(&mut ws, Duration::from_millis(200)).await, 0);
    assert!(
        tokio::time::timeout(Duration::from_millis(200), listener.accept())
            .await
            .is_err(),
        "client reconnected after shutdown"
    );

    wait_for(&mut rx, |e| matches!(e, StreamEvent::Link(LinkState::Disconnected))).await;
}
