use async_trait::async_trait;
use axum::body::Body;
use http::{Request, Response, Uri, Version};
use hyper::body::Incoming;
use std::time::Duration;
use tracing::debug;

use crate::{config::ForwardConfig, error::ForwardError};

mod client;
mod target;

pub use client::{build_client, UpstreamClient};
pub use target::resolve_target;

/// The network boundary: one request in, one response (or failure) out.
#[async_trait]
pub trait Forwarder: Send + Sync {
    /// Sends `request` to `target` exactly as received and relays what comes back.
    async fn forward(
        &self,
        target: Uri,
        request: Request<Body>,
    ) -> Result<Response<Body>, ForwardError>;
}

/// Forwards over a pooled hyper client.
pub struct HttpForwarder {
    client: UpstreamClient,
    timeout: Duration,
}

impl HttpForwarder {
    pub fn new(config: &ForwardConfig) -> Self {
        Self {
            client: build_client(config),
            timeout: config.timeout,
        }
    }
}

#[async_trait]
impl Forwarder for HttpForwarder {
    async fn forward(
        &self,
        target: Uri,
        request: Request<Body>,
    ) -> Result<Response<Body>, ForwardError> {
        let (mut parts, body) = request.into_parts();
        parts.uri = target;
        // The client picks HTTP/1.1 or h2 per connection; an inbound h2 request
        // would otherwise be refused on an HTTP/1.1 upstream.
        if parts.version == Version::HTTP_2 {
            parts.version = Version::HTTP_11;
        }

        // Only the wait for the response head is bounded; the body streams for
        // as long as the upstream keeps sending.
        let response = tokio::time::timeout(
            self.timeout,
            self.client.request(Request::from_parts(parts, body)),
        )
        .await
        .map_err(|elapsed| ForwardError::Timeout(Box::new(elapsed)))?
        .map_err(|e| ForwardError::Upstream(Box::new(e)))?;

        debug!(status = %response.status(), "Upstream responded");
        Ok(relay_response(response))
    }
}

/// Status, every header pair and the raw body bytes, untouched.
fn relay_response(response: Response<Incoming>) -> Response<Body> {
    response.map(Body::new)
}
