//! Event gateway server
//!
//! Owns the registry, the authenticator, and the HTTP listener. Created
//! at application start and torn down at stop; independent instances
//! (one per test, for example) never share state.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;

use crate::error::Result;
use crate::publish::EventPublisher;
use crate::registry::{ChannelRegistry, RegistryConfig};
use crate::server::auth::Authenticator;
use crate::server::config::ServerConfig;
use crate::server::routes::{router, GatewayState};

/// SSE event gateway
pub struct EventServer<A: Authenticator> {
    config: ServerConfig,
    authenticator: Arc<A>,
    registry: Arc<ChannelRegistry>,
}

impl<A: Authenticator> EventServer<A> {
    /// Create a new server with the given configuration and authenticator
    pub fn new(config: ServerConfig, authenticator: A) -> Self {
        Self::with_registry_config(config, authenticator, RegistryConfig::default())
    }

    /// Create a new server with custom registry configuration
    pub fn with_registry_config(
        config: ServerConfig,
        authenticator: A,
        registry_config: RegistryConfig,
    ) -> Self {
        Self {
            config,
            authenticator: Arc::new(authenticator),
            registry: Arc::new(ChannelRegistry::with_config(registry_config)),
        }
    }

    /// Get a reference to the channel registry
    pub fn registry(&self) -> &Arc<ChannelRegistry> {
        &self.registry
    }

    /// Publisher handle for domain code to emit events through
    pub fn publisher(&self) -> EventPublisher {
        EventPublisher::new(Arc::clone(&self.registry))
    }

    /// Get the bind address
    pub fn bind_addr(&self) -> SocketAddr {
        self.config.bind_addr
    }

    /// Build the gateway router
    ///
    /// Exposed so the endpoints can be mounted into a larger application
    /// router or driven directly in tests.
    pub fn router(&self) -> Router {
        router(GatewayState {
            registry: Arc::clone(&self.registry),
            authenticator: Arc::clone(&self.authenticator),
            config: self.config.clone(),
        })
    }

    /// Run the server
    ///
    /// This method blocks until the server is shut down.
    pub async fn run(&self) -> Result<()> {
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        tracing::info!(addr = %self.config.bind_addr, "Event gateway listening");

        axum::serve(listener, self.router()).await?;
        Ok(())
    }

    /// Run the server with graceful shutdown
    ///
    /// Open sessions are dropped when the future resolves, which
    /// releases their subscriptions.
    pub async fn run_until<F>(&self, shutdown: F) -> Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        tracing::info!(addr = %self.config.bind_addr, "Event gateway listening");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("Event gateway stopped");
        Ok(())
    }
}
