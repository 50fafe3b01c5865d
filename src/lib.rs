//! Real-time per-user event delivery over Server-Sent Events.
//!
//! `quizpulse` is the live-update backbone of a quiz/learning backend: a
//! process-wide publish/subscribe broadcaster that routes transient
//! state-change events (quiz completions, achievement unlocks,
//! streak/elo changes, social notifications) from mutation handlers to
//! long-lived client connections, multiplexed per user and per event
//! class.
//!
//! Delivery is best-effort by design. Events published while a user has
//! no open stream are dropped; clients self-correct on their next
//! explicit fetch. There is no queuing, no persistence, and no coupling
//! between publisher and subscriber lifetimes.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use quizpulse::{EventServer, ServerConfig, StatsEvent, TokenAuthenticator};
//!
//! #[tokio::main]
//! async fn main() -> quizpulse::Result<()> {
//!     let auth = TokenAuthenticator::new().with_token("secret-42", 42);
//!     let server = EventServer::new(ServerConfig::default(), auth);
//!
//!     // Domain code publishes through a cloneable handle
//!     let publisher = server.publisher();
//!     tokio::spawn(async move {
//!         publisher.publish_stats(42, StatsEvent::quiz_completed(87)).await;
//!     });
//!
//!     server.run().await
//! }
//! ```
//!
//! # Scope
//!
//! Single-process only. Scaling past one server process means replacing
//! [`ChannelRegistry`] with an external pub/sub backbone; the session and
//! gateway contracts are designed to survive that swap unchanged.

pub mod error;
pub mod event;
pub mod publish;
pub mod registry;
pub mod server;
pub mod session;

pub use error::{Error, Result};
pub use event::{EventClass, NotificationEvent, SseFrame, StatsEvent};
pub use publish::EventPublisher;
pub use registry::{
    ChannelKey, ChannelRegistry, RegistryConfig, RegistryError, RegistryStats, UserId,
};
pub use server::{Authenticator, EventServer, ServerConfig, TokenAuthenticator};
pub use session::{EventStream, SessionPhase, SessionState, SubscriptionGuard};
