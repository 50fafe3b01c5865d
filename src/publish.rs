//! Publish API exposed to domain code
//!
//! Mutation handlers (quiz scoring, achievement evaluation, follow/like
//! operations) call these methods fire-and-forget. Publishing never
//! reports whether anyone was listening and never fails the caller: the
//! stream is a liveness hint, not a system of record, and stale client
//! views self-correct on their next explicit fetch.

use std::sync::Arc;

use crate::event::{NotificationEvent, SseFrame, StatsEvent};
use crate::registry::{ChannelKey, ChannelRegistry, UserId};

/// Cheaply cloneable handle for publishing events to a user's streams
#[derive(Clone)]
pub struct EventPublisher {
    registry: Arc<ChannelRegistry>,
}

impl EventPublisher {
    /// Create a publisher over a registry
    pub fn new(registry: Arc<ChannelRegistry>) -> Self {
        Self { registry }
    }

    /// Publish a stats event to every open stats stream of a user
    ///
    /// If the user has no open stats stream, the event is dropped.
    pub async fn publish_stats(&self, user_id: UserId, event: StatsEvent) {
        self.publish(ChannelKey::stats(user_id), &event).await;
    }

    /// Publish a notification to every open notification stream of a user
    ///
    /// If the user has no open notification stream, the event is dropped.
    pub async fn publish_notification(&self, user_id: UserId, event: NotificationEvent) {
        self.publish(ChannelKey::notifications(user_id), &event).await;
    }

    async fn publish<T: serde::Serialize>(&self, key: ChannelKey, event: &T) {
        let frame = match SseFrame::event(event) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::error!(channel = %key, error = %e, "Failed to serialize event");
                return;
            }
        };

        let delivered = self.registry.publish(key, frame).await;
        tracing::trace!(channel = %key, delivered = delivered, "Event published");
    }
}
