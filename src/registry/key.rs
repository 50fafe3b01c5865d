//! Channel key types
//!
//! A channel is identified by the owning user plus the event class. Keys
//! are lookup-only and never persisted.

use crate::event::EventClass;

/// Identifier of an authenticated user
pub type UserId = i64;

/// Routing key for one per-user, per-event-class channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelKey {
    /// Owning user
    pub user_id: UserId,
    /// Event class served by this channel
    pub class: EventClass,
}

impl ChannelKey {
    /// Create a channel key
    pub fn new(user_id: UserId, class: EventClass) -> Self {
        Self { user_id, class }
    }

    /// Key for a user's stats channel
    pub fn stats(user_id: UserId) -> Self {
        Self::new(user_id, EventClass::Stats)
    }

    /// Key for a user's notifications channel
    pub fn notifications(user_id: UserId) -> Self {
        Self::new(user_id, EventClass::Notifications)
    }
}

impl std::fmt::Display for ChannelKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.user_id, self.class)
    }
}
