//! Streaming endpoints
//!
//! One endpoint per event class. Both authenticate first, register a
//! session, write the synthetic connect frame, and stream until the
//! client disconnects or the server shuts down.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use tokio::sync::mpsc;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::event::{EventClass, NotificationEvent, SseFrame, StatsEvent};
use crate::registry::{ChannelKey, ChannelRegistry};
use crate::server::auth::Authenticator;
use crate::server::config::ServerConfig;
use crate::session::{EventStream, SubscriptionGuard};

/// Shared state behind the streaming endpoints
pub struct GatewayState<A> {
    /// Live subscription membership
    pub registry: Arc<ChannelRegistry>,
    /// Boundary to the application's session system
    pub authenticator: Arc<A>,
    /// Gateway options
    pub config: ServerConfig,
}

impl<A> Clone for GatewayState<A> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            authenticator: Arc::clone(&self.authenticator),
            config: self.config.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct StreamQuery {
    token: Option<String>,
}

/// Build the gateway router
pub fn router<A: Authenticator>(state: GatewayState<A>) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        .route("/events/stats", get(stats_stream::<A>))
        .route("/events/notifications", get(notification_stream::<A>))
        .layer(cors)
        .with_state(state)
}

/// CORS echo for recognized local development origins only
fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .dev_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
}

async fn stats_stream<A: Authenticator>(
    State(state): State<GatewayState<A>>,
    Query(query): Query<StreamQuery>,
    headers: HeaderMap,
) -> Response {
    open_stream(state, &headers, &query, EventClass::Stats).await
}

async fn notification_stream<A: Authenticator>(
    State(state): State<GatewayState<A>>,
    Query(query): Query<StreamQuery>,
    headers: HeaderMap,
) -> Response {
    open_stream(state, &headers, &query, EventClass::Notifications).await
}

/// Authenticate, register a session, and hand back the event stream
///
/// Fails fast: an unauthenticated or over-capacity request allocates
/// nothing and leaves no partial session registered.
async fn open_stream<A: Authenticator>(
    state: GatewayState<A>,
    headers: &HeaderMap,
    query: &StreamQuery,
    class: EventClass,
) -> Response {
    let Some(user_id) = state
        .authenticator
        .authenticate(headers, query.token.as_deref())
    else {
        return StatusCode::UNAUTHORIZED.into_response();
    };

    let key = ChannelKey::new(user_id, class);

    let connect_frame = match class {
        EventClass::Stats => SseFrame::event(&StatsEvent::Refresh),
        EventClass::Notifications => SseFrame::event(&NotificationEvent::ready()),
    };
    let connect_frame = match connect_frame {
        Ok(frame) => frame,
        Err(e) => {
            tracing::error!(channel = %key, error = %e, "Failed to build connect frame");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    // Floor of 1 guards against a zero buffer in a hand-built config;
    // a fresh channel with capacity >= 1 always fits the connect frame.
    let (tx, rx) = mpsc::channel(state.registry.config().delivery_buffer.max(1));
    let _ = tx.try_send(connect_frame);

    let id = match state.registry.register(key, tx).await {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!(channel = %key, error = %e, "Stream rejected");
            return StatusCode::SERVICE_UNAVAILABLE.into_response();
        }
    };
    let guard = SubscriptionGuard::new(Arc::clone(&state.registry), key, id);

    tracing::info!(channel = %key, subscription_id = id, "Stream session opened");

    let stream = EventStream::new(rx, guard, state.config.heartbeat_interval);

    match Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/event-stream")
        .header(header::CACHE_CONTROL, "no-cache")
        .header(header::CONNECTION, "keep-alive")
        .body(Body::from_stream(stream))
    {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(error = %e, "Failed to build stream response");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::RegistryConfig;
    use crate::server::auth::TokenAuthenticator;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn test_state(registry: Arc<ChannelRegistry>) -> GatewayState<TokenAuthenticator> {
        GatewayState {
            registry,
            authenticator: Arc::new(TokenAuthenticator::new().with_token("secret-42", 42)),
            config: ServerConfig::default(),
        }
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn authed_request(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header("authorization", "Bearer secret-42")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_unauthenticated_is_rejected_without_registration() {
        let registry = Arc::new(ChannelRegistry::new());
        let app = router(test_state(Arc::clone(&registry)));

        let response = app.oneshot(get_request("/events/stats")).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(registry.subscriber_count().await, 0);
    }

    #[tokio::test]
    async fn test_stats_stream_headers_and_connect_frame() {
        let registry = Arc::new(ChannelRegistry::new());
        let app = router(test_state(Arc::clone(&registry)));

        let response = app.oneshot(authed_request("/events/stats")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers[header::CONTENT_TYPE], "text/event-stream");
        assert_eq!(headers[header::CACHE_CONTROL], "no-cache");
        assert_eq!(headers[header::CONNECTION], "keep-alive");

        assert_eq!(registry.subscriber_count().await, 1);

        let frame = response
            .into_body()
            .frame()
            .await
            .unwrap()
            .unwrap()
            .into_data()
            .unwrap();
        assert_eq!(frame.as_ref(), b"data: {\"type\":\"refresh\"}\n\n");
    }

    #[tokio::test]
    async fn test_notification_stream_via_query_token() {
        let registry = Arc::new(ChannelRegistry::new());
        let app = router(test_state(Arc::clone(&registry)));

        let response = app
            .oneshot(get_request("/events/notifications?token=secret-42"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            registry
                .channel_subscribers(ChannelKey::notifications(42))
                .await,
            1
        );

        let frame = response
            .into_body()
            .frame()
            .await
            .unwrap()
            .unwrap()
            .into_data()
            .unwrap();
        assert_eq!(frame.as_ref(), b"data: {\"type\":\"ready\"}\n\n");
    }

    #[tokio::test]
    async fn test_dropping_response_unregisters_session() {
        let registry = Arc::new(ChannelRegistry::new());
        let app = router(test_state(Arc::clone(&registry)));

        let response = app.oneshot(authed_request("/events/stats")).await.unwrap();
        assert_eq!(registry.subscriber_count().await, 1);

        drop(response);
        tokio::task::yield_now().await;

        assert_eq!(registry.subscriber_count().await, 0);
    }

    #[tokio::test]
    async fn test_capacity_exceeded_returns_503() {
        let registry = Arc::new(ChannelRegistry::with_config(
            RegistryConfig::default().max_subscribers(0),
        ));
        let app = router(test_state(Arc::clone(&registry)));

        let response = app.oneshot(authed_request("/events/stats")).await.unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(registry.subscriber_count().await, 0);
    }

    #[tokio::test]
    async fn test_zero_delivery_buffer_config_still_connects() {
        // Struct-literal config skips the builder's floor; the gateway
        // must not panic building the delivery channel.
        let registry = Arc::new(ChannelRegistry::with_config(RegistryConfig {
            max_subscribers: 1000,
            delivery_buffer: 0,
        }));
        let app = router(test_state(Arc::clone(&registry)));

        let response = app.oneshot(authed_request("/events/stats")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(registry.subscriber_count().await, 1);

        let frame = response
            .into_body()
            .frame()
            .await
            .unwrap()
            .unwrap()
            .into_data()
            .unwrap();
        assert_eq!(frame.as_ref(), b"data: {\"type\":\"refresh\"}\n\n");
    }

    #[tokio::test]
    async fn test_cors_echo_for_recognized_dev_origin() {
        let registry = Arc::new(ChannelRegistry::new());
        let app = router(test_state(registry));

        let request = Request::builder()
            .uri("/events/stats")
            .header("authorization", "Bearer secret-42")
            .header("origin", "http://localhost:5173")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        let headers = response.headers();
        assert_eq!(
            headers["access-control-allow-origin"],
            "http://localhost:5173"
        );
        assert_eq!(headers["access-control-allow-credentials"], "true");
    }

    #[tokio::test]
    async fn test_no_cors_headers_for_unknown_origin() {
        let registry = Arc::new(ChannelRegistry::new());
        let app = router(test_state(registry));

        let request = Request::builder()
            .uri("/events/stats")
            .header("authorization", "Bearer secret-42")
            .header("origin", "http://evil.example")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert!(!response
            .headers()
            .contains_key("access-control-allow-origin"));
    }
}
