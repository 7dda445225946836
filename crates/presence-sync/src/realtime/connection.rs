//! Background WebSocket connection loop with fixed-delay reconnect.

use std::sync::Arc;

use futures_util::{Sink, SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, Mutex};
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::SyncError;
use crate::protocol::{Envelope, InboundFrame};

use super::handler::{handle_frame, FrameAction};
use super::heartbeat::HeartbeatTimer;
use super::types::{LinkState, StreamConfig, StreamEvent};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// How a single connection ended.
#[derive(Debug)]
enum SessionEnd {
    /// The owner cancelled; never reconnect.
    Deactivated,
    /// The closing handshake completed; no reconnect.
    Clean { code: u16, reason: String },
    /// Transport dropped or failed; reconnect after the delay.
    Dropped(SyncError),
}

// ---------------------------------------------------------------------------
// Frame I/O
// ---------------------------------------------------------------------------

/// Serialize and send one frame through a shared sink.
pub(crate) async fn send_frame<S>(sink: &Mutex<S>, frame: &Envelope) -> Result<(), SyncError>
where
    S: Sink<WsMessage> + Unpin,
    S::Error: std::fmt::Display,
{
    let json = serde_json::to_string(frame)
        .map_err(|e| SyncError::Stream(format!("failed to encode frame: {e}")))?;
    let mut writer = sink.lock().await;
    writer
        .send(WsMessage::Text(json.into()))
        .await
        .map_err(|e| SyncError::Stream(e.to_string()))
}

// ---------------------------------------------------------------------------
// Connection Loop
// ---------------------------------------------------------------------------

/// Background task managing the stream connection for one subject.
///
/// Runs until cancelled or until the server closes the connection cleanly.
/// The reconnect delay is the only way out of `ReconnectScheduled`.
pub(crate) async fn connection_loop(
    config: StreamConfig,
    subject_id: String,
    event_tx: mpsc::Sender<StreamEvent>,
    cancel: CancellationToken,
) {
    loop {
        let _ = event_tx.send(StreamEvent::Link(LinkState::Connecting)).await;
        info!(subject = %subject_id, url = %config.url, "Connecting to presence stream");

        let end = tokio::select! {
            _ = cancel.cancelled() => SessionEnd::Deactivated,
            result = tokio::time::timeout(
                config.connect_timeout,
                tokio_tungstenite::connect_async(config.url.as_str()),
            ) => match result {
                Ok(Ok((ws, _))) => run_session(ws, &subject_id, &event_tx, &cancel).await,
                Ok(Err(e)) => SessionEnd::Dropped(SyncError::Stream(format!("connection failed: {e}"))),
                Err(_elapsed) => SessionEnd::Dropped(SyncError::Stream(format!(
                    "connection timed out after {}s",
                    config.connect_timeout.as_secs()
                ))),
            },
        };

        match end {
            SessionEnd::Deactivated => {
                info!(subject = %subject_id, "Presence stream deactivated");
                let _ = event_tx.send(StreamEvent::Link(LinkState::Disconnected)).await;
                return;
            }
            SessionEnd::Clean { code, reason } => {
                info!(subject = %subject_id, code, reason = %reason, "Presence stream closed cleanly");
                let _ = event_tx.send(StreamEvent::Link(LinkState::Disconnected)).await;
                return;
            }
            SessionEnd::Dropped(err) => {
                warn!(subject = %subject_id, error = %err, "Presence stream lost");
                let _ = event_tx.send(StreamEvent::Error(err)).await;
                let _ = event_tx
                    .send(StreamEvent::Link(LinkState::ReconnectScheduled))
                    .await;
            }
        }

        info!(
            delay_ms = config.reconnect_delay.as_millis() as u64,
            "Reconnecting to presence stream"
        );
        tokio::select! {
            _ = cancel.cancelled() => {
                info!(subject = %subject_id, "Reconnect cancelled");
                let _ = event_tx.send(StreamEvent::Link(LinkState::Disconnected)).await;
                return;
            }
            _ = tokio::time::sleep(config.reconnect_delay) => {}
        }
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Drive one open connection: subscribe, then process frames until it ends.
async fn run_session(
    ws: WsStream,
    subject_id: &str,
    event_tx: &mpsc::Sender<StreamEvent>,
    cancel: &CancellationToken,
) -> SessionEnd {
    let (ws_write, mut ws_read) = ws.split();
    let ws_write = Arc::new(Mutex::new(ws_write));

    let _ = event_tx.send(StreamEvent::Link(LinkState::Connected)).await;

    if let Err(e) = send_frame(&ws_write, &Envelope::subscribe(subject_id)).await {
        return SessionEnd::Dropped(e);
    }
    info!(subject = %subject_id, "Subscribed to presence stream");

    // Stopped when this function returns, whichever way it returns.
    let mut heartbeat = HeartbeatTimer::default();

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                heartbeat.stop();
                let mut writer = ws_write.lock().await;
                let _ = writer.send(WsMessage::Close(None)).await;
                return SessionEnd::Deactivated;
            }
            msg = ws_read.next() => match msg {
                Some(Ok(WsMessage::Text(text))) => match InboundFrame::decode(&text) {
                    Ok(frame) => match handle_frame(frame, subject_id) {
                        FrameAction::StartHeartbeat(period) => {
                            heartbeat.restart(Arc::clone(&ws_write), period);
                        }
                        FrameAction::Emit(event) => {
                            let _ = event_tx.send(event).await;
                        }
                        FrameAction::Ignore => {}
                    },
                    Err(e) => {
                        debug!(error = %e, text = %text.as_str(), "Unrecognized message from presence stream");
                    }
                },
                Some(Ok(WsMessage::Close(frame))) => {
                    heartbeat.stop();
                    let (code, reason) = frame
                        .map(|f| (u16::from(f.code), f.reason.as_str().to_owned()))
                        .unwrap_or((1005, String::new()));
                    // Flush the close reply so the handshake completes.
                    let _ = ws_write.lock().await.close().await;
                    return SessionEnd::Clean { code, reason };
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return SessionEnd::Dropped(SyncError::Stream(e.to_string())),
                None => {
                    return SessionEnd::Dropped(SyncError::UnexpectedClose(
                        "connection dropped without a close frame".into(),
                    ));
                }
            }
        }
    }
}
