//! Channel registry for pub/sub event routing
//!
//! The registry maps channel keys (user + event class) to live
//! subscribers and fans published events out to them. It is pure
//! in-memory state with no I/O; publisher and subscriber lifetimes are
//! fully decoupled.
//!
//! # Architecture
//!
//! ```text
//!                        Arc<ChannelRegistry>
//!                   ┌───────────────────────────┐
//!                   │ channels: HashMap<Key,    │
//!                   │   HashMap<SubId,          │
//!                   │     mpsc::Sender<Frame>>> │
//!                   └────────────┬──────────────┘
//!                                │
//!        ┌───────────────────────┼───────────────────────┐
//!        │                       │                       │
//!   [Publisher]            [Subscriber]            [Subscriber]
//!   publish_stats()        rx.recv()               rx.recv()
//!        │                       │                       │
//!        └──► registry.publish()─┴──► EventStream ──► SSE transport
//! ```
//!
//! # Zero-Copy Design
//!
//! Events are serialized once into an [`SseFrame`](crate::event::SseFrame)
//! backed by `bytes::Bytes`. Fan-out clones the frame per subscriber, but
//! the wire bytes are only reference-counted, not copied.

pub mod config;
pub mod error;
pub mod key;
pub mod store;

pub use config::RegistryConfig;
pub use error::RegistryError;
pub use key::{ChannelKey, UserId};
pub use store::{ChannelRegistry, RegistryStats, Subscriber};
