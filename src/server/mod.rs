//! HTTP gateway for the streaming endpoints
//!
//! The gateway accepts inbound streaming requests, authenticates them,
//! registers a stream session under the caller's channel key, and keeps
//! the transport open until disconnect. Authentication itself is an
//! external concern, reached through the [`Authenticator`] trait.

pub mod auth;
pub mod config;
pub mod listener;
pub mod routes;

pub use auth::{Authenticator, TokenAuthenticator};
pub use config::ServerConfig;
pub use listener::EventServer;
pub use routes::{router, GatewayState};
