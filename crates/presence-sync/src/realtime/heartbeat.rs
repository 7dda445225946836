//! Heartbeat timer owned by a single connection.

use std::sync::Arc;
use std::time::Duration;

use futures_util::Sink;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tracing::debug;

use crate::protocol::Envelope;

use super::connection::send_frame;

/// Owned heartbeat timer. Restarting replaces the running timer; dropping
/// the handle stops it.
#[derive(Default)]
pub(crate) struct HeartbeatTimer {
    task: Option<JoinHandle<()>>,
}

impl HeartbeatTimer {
    /// Start heartbeating at `period`, cancelling any previous timer.
    pub(crate) fn restart<S>(&mut self, sink: Arc<Mutex<S>>, period: Duration)
    where
        S: Sink<WsMessage> + Unpin + Send + 'static,
        S::Error: std::fmt::Display,
    {
        self.stop();
        self.task = Some(tokio::spawn(heartbeat_task(sink, period)));
    }

    pub(crate) fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    #[cfg(test)]
    pub(crate) fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Drop for HeartbeatTimer {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn heartbeat_task<S>(sink: Arc<Mutex<S>>, period: Duration)
where
    S: Sink<WsMessage> + Unpin,
    S::Error: std::fmt::Display,
{
    // The first beat is due one full period after the hello.
    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;
        if let Err(e) = send_frame(&sink, &Envelope::heartbeat()).await {
            debug!(error = %e, "Heartbeat send failed, stopping timer");
            break;
        }
        debug!("Heartbeat sent");
    }
}

#[cfg(test)]
mod tests {
    use std::pin::Pin;
    use std::task::{Context, Poll};

    use super::*;

    /// Sink that records every message and never fails.
    #[derive(Default)]
    struct RecordingSink {
        sent: Vec<WsMessage>,
    }

    impl Sink<WsMessage> for RecordingSink {
        type Error = std::convert::Infallible;

        fn poll_ready(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
        ) -> Poll<Result<(), Self::Error>> {
            Poll::Ready(Ok(()))
        }

        fn start_send(mut self: Pin<&mut Self>, item: WsMessage) -> Result<(), Self::Error> {
            self.sent.push(item);
            Ok(())
        }

        fn poll_flush(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
        ) -> Poll<Result<(), Self::Error>> {
            Poll::Ready(Ok(()))
        }

        fn poll_close(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
        ) -> Poll<Result<(), Self::Error>> {
            Poll::Ready(Ok(()))
        }
    }

    async fn sent_count(sink: &Arc<Mutex<RecordingSink>>) -> usize {
        sink.lock().await.sent.len()
    }

    #[tokio::test(start_paused = true)]
    async fn beats_once_per_period() {
        let sink = Arc::new(Mutex::new(RecordingSink::default()));
        let mut timer = HeartbeatTimer::default();
        timer.restart(Arc::clone(&sink), Duration::from_millis(100));

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(sent_count(&sink).await, 0);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(sent_count(&sink).await, 1);

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(sent_count(&sink).await, 4);

        let guard = sink.lock().await;
        assert_eq!(guard.sent[0].to_text().unwrap(), r#"{"op":3}"#);
    }

    #[tokio::test(start_paused = true)]
    async fn restart_replaces_previous_timer() {
        let sink = Arc::new(Mutex::new(RecordingSink::default()));
        let mut timer = HeartbeatTimer::default();
        timer.restart(Arc::clone(&sink), Duration::from_millis(100));
        timer.restart(Arc::clone(&sink), Duration::from_millis(1000));

        tokio::time::sleep(Duration::from_millis(950)).await;
        assert_eq!(sent_count(&sink).await, 0);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(sent_count(&sink).await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn drop_stops_beating() {
        let sink = Arc::new(Mutex::new(RecordingSink::default()));
        let mut timer = HeartbeatTimer::default();
        timer.restart(Arc::clone(&sink), Duration::from_millis(100));

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(sent_count(&sink).await, 1);
        assert!(timer.is_running());

        drop(timer);
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(sent_count(&sink).await, 1);
    }
}
