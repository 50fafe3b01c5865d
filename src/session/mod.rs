//! Stream session lifecycle
//!
//! A session is the server-side handle for one open client connection:
//! its delivery channel, heartbeat timer, and the guard that owns
//! unregistration. Sessions move `Open -> Closing -> Closed`; `Closed`
//! is terminal.

pub mod guard;
pub mod state;
pub mod stream;

pub use guard::SubscriptionGuard;
pub use state::{SessionPhase, SessionState};
pub use stream::EventStream;
