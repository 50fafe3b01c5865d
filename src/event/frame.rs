//! SSE wire framing
//!
//! A frame is the exact byte sequence written to the transport. Event
//! frames are `data: <JSON>\n\n`; heartbeats use the SSE comment form
//! `: keep-alive\n\n` which carries no payload and is a no-op for
//! conforming clients.
//!
//! Frames are serialized once and cloned per subscriber. `Bytes` uses
//! reference counting, so all subscribers share the same allocation.

use bytes::Bytes;
use serde::Serialize;

/// Heartbeat frame body, sent periodically while a session is open
const KEEP_ALIVE: &[u8] = b": keep-alive\n\n";

/// A single pre-serialized SSE frame
///
/// Cheap to clone due to `Bytes` reference counting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseFrame {
    bytes: Bytes,
}

impl SseFrame {
    /// Serialize an event payload into a `data:` frame
    pub fn event<T: Serialize>(payload: &T) -> Result<Self, serde_json::Error> {
        let json = serde_json::to_vec(payload)?;

        let mut buf = Vec::with_capacity(json.len() + 8);
        buf.extend_from_slice(b"data: ");
        buf.extend_from_slice(&json);
        buf.extend_from_slice(b"\n\n");

        Ok(Self {
            bytes: Bytes::from(buf),
        })
    }

    /// The heartbeat comment frame
    pub fn keep_alive() -> Self {
        Self {
            bytes: Bytes::from_static(KEEP_ALIVE),
        }
    }

    /// Whether this is a heartbeat (comment-only) frame
    pub fn is_keep_alive(&self) -> bool {
        self.bytes.as_ref() == KEEP_ALIVE
    }

    /// Borrow the wire bytes
    pub fn as_bytes(&self) -> &Bytes {
        &self.bytes
    }

    /// Consume into the wire bytes
    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }
}
