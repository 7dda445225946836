//! Shared fixtures: a local WebSocket server and a scripted snapshot source.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::WebSocketStream;

use crate::error::FetchError;
use crate::fetch::SnapshotSource;
use crate::snapshot::{PresenceSnapshot, Status};

pub(crate) type ServerWs = WebSocketStream<TcpStream>;

// ---------------------------------------------------------------------------
// WebSocket server
// ---------------------------------------------------------------------------

/// Bind a listener on an ephemeral port. Returns it with its `ws://` URL.
pub(crate) async fn bind() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    (listener, format!("ws://{addr}"))
}

/// Accept one WebSocket connection, failing the test after two seconds.
pub(crate) async fn accept(listener: &TcpListener) -> ServerWs {
    let (stream, _) = tokio::time::timeout(Duration::from_secs(2), listener.accept())
        .await
        .expect("no client connected")
        .unwrap();
    tokio_tungstenite::accept_async(stream).await.unwrap()
}

/// Next text frame from the client, parsed as JSON.
pub(crate) async fn next_json(ws: &mut ServerWs) -> Value {
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(2), ws.next())
            .await
            .expect("timed out waiting for a client frame")
            .expect("client stream ended")
            .unwrap();
        if let WsMessage::Text(text) = msg {
            return serde_json::from_str(text.as_str()).unwrap();
        }
    }
}

/// Server that accepts every connection and holds it open without speaking.
pub(crate) async fn spawn_idle_server() -> (String, JoinHandle<()>) {
    let (listener, url) = bind().await;
    let task = tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            tokio::spawn(async move {
                if let Ok(mut ws) = tokio_tungstenite::accept_async(stream).await {
                    while let Some(Ok(_)) = ws.next().await {}
                }
            });
        }
    });
    (url, task)
}

pub(crate) async fn send_json(ws: &mut ServerWs, value: Value) {
    ws.send(WsMessage::Text(value.to_string().into())).await.unwrap();
}

pub(crate) async fn send_hello(ws: &mut ServerWs, interval_ms: u64) {
    send_json(
        ws,
        serde_json::json!({"op": 1, "d": {"heartbeat_interval": interval_ms}}),
    )
    .await;
}

// ---------------------------------------------------------------------------
// HTTP server
// ---------------------------------------------------------------------------

/// Answer one HTTP request with `status` and a JSON `body`.
///
/// Returns the `http://` base URL and a handle resolving to the request
/// line the client sent.
pub(crate) async fn serve_http_once(status: u16, body: Value) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let task = tokio::spawn(async move {
        let (mut stream, _) = tokio::time::timeout(Duration::from_secs(2), listener.accept())
            .await
            .expect("no client connected")
            .unwrap();

        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = stream.read(&mut buf).await.unwrap();
            assert!(n > 0, "client closed before sending headers");
            request.extend_from_slice(&buf[..n]);
        }

        let body = body.to_string();
        let response = format!(
            "HTTP/1.1 {status} Test\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).await.unwrap();
        let _ = stream.shutdown().await;

        let request = String::from_utf8_lossy(&request).into_owned();
        request.lines().next().unwrap_or_default().to_string()
    });
    (format!("http://{addr}"), task)
}

// ---------------------------------------------------------------------------
// Scripted source
// ---------------------------------------------------------------------------

/// Snapshot source that answers every fetch with the same scripted result.
pub(crate) struct ScriptedSource {
    result: Result<PresenceSnapshot, FetchError>,
    delay: Duration,
    calls: Arc<AtomicUsize>,
}

impl ScriptedSource {
    pub(crate) fn ok(snapshot: PresenceSnapshot) -> Self {
        Self {
            result: Ok(snapshot),
            delay: Duration::ZERO,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub(crate) fn failing(error: FetchError) -> Self {
        Self {
            result: Err(error),
            delay: Duration::ZERO,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Shared call counter, readable after the source has been moved.
    pub(crate) fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl SnapshotSource for ScriptedSource {
    async fn fetch(&self, _subject_id: &str) -> Result<PresenceSnapshot, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.result.clone()
    }
}

/// Snapshot for `user_id` with the given status and nothing else.
pub(crate) fn snapshot_with_status(user_id: &str, status: Status) -> PresenceSnapshot {
    PresenceSnapshot {
        status,
        ..PresenceSnapshot::offline(user_id)
    }
}
