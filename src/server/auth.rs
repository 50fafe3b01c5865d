//! Authentication boundary
//!
//! Session issuance and validation belong to the embedding application;
//! the gateway only needs "who is this caller". Implement
//! [`Authenticator`] against the real session store and hand it to
//! [`EventServer`](crate::server::EventServer).

use std::collections::HashMap;

use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;

use crate::registry::UserId;

/// Resolves the identity behind an inbound streaming request
pub trait Authenticator: Send + Sync + 'static {
    /// Return the caller's user id, or `None` for unauthenticated
    ///
    /// `query_token` carries the `token` query parameter, since the
    /// browser `EventSource` API cannot set request headers.
    fn authenticate(&self, headers: &HeaderMap, query_token: Option<&str>) -> Option<UserId>;
}

/// Static token-to-user map
///
/// Boundary implementation for demos and tests. Production deployments
/// implement [`Authenticator`] against their session store instead.
#[derive(Debug, Clone, Default)]
pub struct TokenAuthenticator {
    tokens: HashMap<String, UserId>,
}

impl TokenAuthenticator {
    /// Create an empty authenticator (rejects everyone)
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a token for a user
    pub fn with_token(mut self, token: impl Into<String>, user_id: UserId) -> Self {
        self.tokens.insert(token.into(), user_id);
        self
    }
}

impl Authenticator for TokenAuthenticator {
    fn authenticate(&self, headers: &HeaderMap, query_token: Option<&str>) -> Option<UserId> {
        let bearer = headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "));

        bearer
            .or(query_token)
            .and_then(|token| self.tokens.get(token).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authenticator() -> TokenAuthenticator {
        TokenAuthenticator::new().with_token("secret-42", 42)
    }

    #[test]
    fn test_bearer_token() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, "Bearer secret-42".parse().unwrap());

        assert_eq!(authenticator().authenticate(&headers, None), Some(42));
    }

    #[test]
    fn test_query_token() {
        let headers = HeaderMap::new();

        assert_eq!(
            authenticator().authenticate(&headers, Some("secret-42")),
            Some(42)
        );
    }

    #[test]
    fn test_header_takes_precedence() {
        let auth = authenticator().with_token("other", 7);
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, "Bearer secret-42".parse().unwrap());

        assert_eq!(auth.authenticate(&headers, Some("other")), Some(42));
    }

    #[test]
    fn test_unknown_token_rejected() {
        let headers = HeaderMap::new();

        assert_eq!(authenticator().authenticate(&headers, Some("wrong")), None);
        assert_eq!(authenticator().authenticate(&headers, None), None);
    }
}
