//! Stream session state machine
//!
//! Tracks one open client connection from registration to teardown.

use std::time::Instant;

use crate::registry::ChannelKey;

/// Session lifecycle phase
///
/// `Closed` is terminal; no transition leaves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Registered in the registry, delivering frames and heartbeats
    Open,
    /// Disconnect detected, unregistration in progress
    Closing,
    /// Resources released
    Closed,
}

/// Per-session bookkeeping
#[derive(Debug)]
pub struct SessionState {
    /// Subscription id issued by the registry
    pub subscription_id: u64,

    /// Channel this session is subscribed to
    pub channel: ChannelKey,

    /// Current phase
    pub phase: SessionPhase,

    /// When the session was opened
    pub connected_at: Instant,

    /// When the last frame (event or heartbeat) was written
    pub last_activity: Instant,

    /// Frames written so far, heartbeats included
    pub frames_sent: u64,
}

impl SessionState {
    /// Create state for a newly opened session
    pub fn new(subscription_id: u64, channel: ChannelKey) -> Self {
        let now = Instant::now();
        Self {
            subscription_id,
            channel,
            phase: SessionPhase::Open,
            connected_at: now,
            last_activity: now,
            frames_sent: 0,
        }
    }

    /// Record one written frame
    pub fn record_frame(&mut self) {
        self.frames_sent += 1;
        self.last_activity = Instant::now();
    }

    /// Begin teardown
    pub fn begin_close(&mut self) {
        if self.phase == SessionPhase::Open {
            self.phase = SessionPhase::Closing;
        }
    }

    /// Finish teardown
    pub fn finish_close(&mut self) {
        if self.phase == SessionPhase::Closing {
            self.phase = SessionPhase::Closed;
        }
    }

    /// Whether the session is still delivering
    pub fn is_open(&self) -> bool {
        self.phase == SessionPhase::Open
    }

    /// How long the session has been open
    pub fn duration(&self) -> std::time::Duration {
        self.connected_at.elapsed()
    }
}
