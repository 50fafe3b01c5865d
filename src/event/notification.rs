//! Notification event payloads
//!
//! Notifications are untyped beyond a string discriminator. The shape of
//! `data` is owned by the producing domain code (new follower, quiz
//! invite, like received); the delivery core routes it opaquely.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A notification event delivered to a user's notification stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationEvent {
    /// Discriminator the client dispatches on (e.g. "new_follower")
    #[serde(rename = "type")]
    pub kind: String,

    /// Producer-defined payload, omitted from JSON when empty
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub data: Map<String, Value>,
}

impl NotificationEvent {
    /// Create a notification with no payload
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            data: Map::new(),
        }
    }

    /// Create a notification with a payload
    pub fn with_data(kind: impl Into<String>, data: Map<String, Value>) -> Self {
        Self {
            kind: kind.into(),
            data,
        }
    }

    /// Synthetic connect event sent as the first frame on a notification
    /// stream, so the client can distinguish "connected with no activity
    /// yet" from "never connected".
    pub fn ready() -> Self {
        Self::new("ready")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ready_json() {
        let json = serde_json::to_string(&NotificationEvent::ready()).unwrap();

        assert_eq!(json, r#"{"type":"ready"}"#);
    }

    #[test]
    fn test_with_data_json() {
        let mut data = Map::new();
        data.insert("follower_id".to_string(), json!(7));

        let event = NotificationEvent::with_data("new_follower", data);
        let json = serde_json::to_string(&event).unwrap();

        assert_eq!(json, r#"{"type":"new_follower","data":{"follower_id":7}}"#);
    }

    #[test]
    fn test_deserialize_missing_data() {
        let event: NotificationEvent = serde_json::from_str(r#"{"type":"ready"}"#).unwrap();

        assert_eq!(event.kind, "ready");
        assert!(event.data.is_empty());
    }
}
