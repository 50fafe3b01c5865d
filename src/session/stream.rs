//! SSE body stream for one session
//!
//! `EventStream` is the response body of a streaming endpoint: it yields
//! frames delivered through the registry, interleaved with heartbeat
//! comment frames at a fixed cadence so intermediaries do not reap the
//! idle connection.
//!
//! The stream owns the session's [`SubscriptionGuard`]; dropping the
//! stream (client disconnect, server shutdown) releases the subscription.

use std::convert::Infallible;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use bytes::Bytes;
use futures::Stream;
use tokio::sync::mpsc;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};

use crate::event::SseFrame;
use crate::session::guard::SubscriptionGuard;
use crate::session::state::SessionState;

/// Stream of SSE wire frames for one open session
pub struct EventStream {
    rx: mpsc::Receiver<SseFrame>,
    heartbeat: Interval,
    state: SessionState,
    // Held for its Drop: releases the subscription when the stream ends
    _guard: SubscriptionGuard,
}

impl EventStream {
    /// Build the stream for a registered session
    ///
    /// The first heartbeat fires one full interval after connect; the
    /// initial connect frame is already primed in the channel and is
    /// yielded before anything else.
    pub fn new(
        rx: mpsc::Receiver<SseFrame>,
        guard: SubscriptionGuard,
        heartbeat_interval: Duration,
    ) -> Self {
        let mut heartbeat =
            time::interval_at(Instant::now() + heartbeat_interval, heartbeat_interval);
        heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let state = SessionState::new(guard.subscription_id(), guard.channel());

        Self {
            rx,
            heartbeat,
            state,
            _guard: guard,
        }
    }

    /// Session bookkeeping, for logging and tests
    pub fn state(&self) -> &SessionState {
        &self.state
    }
}

impl Stream for EventStream {
    type Item = Result<Bytes, Infallible>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        if !this.state.is_open() {
            return Poll::Ready(None);
        }

        // Delivered events take priority over heartbeats
        match this.rx.poll_recv(cx) {
            Poll::Ready(Some(frame)) => {
                this.state.record_frame();
                return Poll::Ready(Some(Ok(frame.into_bytes())));
            }
            Poll::Ready(None) => {
                // Every sender is gone: the registry pruned this session
                // or the server is shutting down.
                this.state.begin_close();
                this.state.finish_close();
                tracing::debug!(
                    channel = %this.state.channel,
                    subscription_id = this.state.subscription_id,
                    frames_sent = this.state.frames_sent,
                    duration_ms = this.state.duration().as_millis() as u64,
                    "Stream session closed"
                );
                return Poll::Ready(None);
            }
            Poll::Pending => {}
        }

        if this.heartbeat.poll_tick(cx).is_ready() {
            this.state.record_frame();
            return Poll::Ready(Some(Ok(SseFrame::keep_alive().into_bytes())));
        }

        Poll::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::StatsEvent;
    use crate::registry::{ChannelKey, ChannelRegistry, Subscriber};
    use std::sync::Arc;
    use tokio_test::{assert_pending, task};

    const HEARTBEAT: Duration = Duration::from_secs(25);

    /// Open a session the way the gateway does: prime the connect frame,
    /// register, wrap in a guard. Returns a sender clone so tests control
    /// when the channel closes.
    async fn open_session(
        registry: &Arc<ChannelRegistry>,
        key: ChannelKey,
    ) -> (EventStream, Subscriber) {
        let (tx, rx) = mpsc::channel(8);
        tx.try_send(SseFrame::event(&StatsEvent::Refresh).unwrap())
            .unwrap();
        let id = registry.register(key, tx.clone()).await.unwrap();
        let guard = SubscriptionGuard::new(Arc::clone(registry), key, id);

        (EventStream::new(rx, guard, HEARTBEAT), tx)
    }

    fn unwrap_frame(poll: Poll<Option<Result<Bytes, Infallible>>>) -> Bytes {
        match poll {
            Poll::Ready(Some(Ok(bytes))) => bytes,
            other => panic!("expected a frame, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_initial_frame_then_heartbeats() {
        let registry = Arc::new(ChannelRegistry::new());
        let (stream, _tx) = open_session(&registry, ChannelKey::stats(42)).await;
        let mut session = task::spawn(stream);

        // Connect frame comes first, exactly once
        let first = unwrap_frame(session.poll_next());
        assert_eq!(first.as_ref(), b"data: {\"type\":\"refresh\"}\n\n");
        assert_pending!(session.poll_next());

        // Two full intervals -> two heartbeats, no duplicate connect frame
        let mut heartbeats = 0;
        for _ in 0..2 {
            time::advance(HEARTBEAT).await;
            let frame = unwrap_frame(session.poll_next());
            assert_eq!(frame.as_ref(), b": keep-alive\n\n");
            heartbeats += 1;
            assert_pending!(session.poll_next());
        }
        assert_eq!(heartbeats, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_published_event_precedes_heartbeat() {
        let registry = Arc::new(ChannelRegistry::new());
        let key = ChannelKey::stats(42);
        let (stream, _tx) = open_session(&registry, key).await;
        let mut session = task::spawn(stream);

        // Drain the connect frame
        unwrap_frame(session.poll_next());

        let delivered = registry
            .publish(key, SseFrame::event(&StatsEvent::quiz_completed(87)).unwrap())
            .await;
        assert_eq!(delivered, 1);

        let frame = unwrap_frame(session.poll_next());
        assert_eq!(
            frame.as_ref(),
            b"data: {\"type\":\"quiz_completed\",\"value\":87}\n\n"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_channel_close_ends_stream() {
        let registry = Arc::new(ChannelRegistry::new());
        let key = ChannelKey::stats(9);
        let (stream, tx) = open_session(&registry, key).await;
        let mut session = task::spawn(stream);

        unwrap_frame(session.poll_next());

        // Drop every sender, as the registry does when it prunes
        let id = session.state().subscription_id;
        registry.unregister(key, id).await;
        drop(tx);

        assert!(matches!(session.poll_next(), Poll::Ready(None)));
        assert_eq!(session.state().phase, crate::session::SessionPhase::Closed);

        // Terminal: stays ended
        assert!(matches!(session.poll_next(), Poll::Ready(None)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_unregisters_session() {
        let registry = Arc::new(ChannelRegistry::new());
        let (stream, _tx) = open_session(&registry, ChannelKey::stats(5)).await;
        assert_eq!(registry.subscriber_count().await, 1);

        drop(stream);
        tokio::task::yield_now().await;

        assert_eq!(registry.subscriber_count().await, 0);
    }
}
