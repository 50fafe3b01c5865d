//! Event payload types and SSE wire framing
//!
//! Two independent event families exist, one per streaming endpoint:
//! stats events (typed, optional numeric value) and notification events
//! (string discriminator plus arbitrary JSON data, since notification
//! shapes are owned by the producing domain code).
//!
//! Payloads are serialized once into an [`SseFrame`] at publish time and
//! shared across all subscribers via `Bytes` reference counting.

pub mod frame;
pub mod notification;
pub mod stats;

pub use frame::SseFrame;
pub use notification::NotificationEvent;
pub use stats::StatsEvent;

/// Event class, one per streaming endpoint.
///
/// Each class has its own channel space: a user's stats subscribers never
/// see notification events and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventClass {
    /// Quiz/achievement/streak/elo state changes
    Stats,
    /// Social and system notifications
    Notifications,
}

impl EventClass {
    /// Short name used in channel keys and log output
    pub fn as_str(&self) -> &'static str {
        match self {
            EventClass::Stats => "stats",
            EventClass::Notifications => "notifications",
        }
    }
}

impl std::fmt::Display for EventClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
