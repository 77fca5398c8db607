//! The observe-and-forward step applied to every request the tap receives.

use axum::{
    body::Body,
    http::{Request, Response, Uri},
};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::{
    config::AppConfig,
    error::AppError,
    proxy::{resolve_target, Forwarder, HttpForwarder},
    telemetry::{DiagnosticRecord, SinkRegistry},
};

/// Logs each request to the registered sinks, then hands it to the forwarder.
///
/// Holds no per-request state; one instance serves all concurrent requests.
pub struct Interceptor {
    sinks: SinkRegistry,
    forwarder: Arc<dyn Forwarder>,
    upstream: Option<Uri>,
}

impl Interceptor {
    pub fn new(sinks: SinkRegistry, forwarder: Arc<dyn Forwarder>, upstream: Option<Uri>) -> Self {
        Self {
            sinks,
            forwarder,
            upstream,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        let sinks = SinkRegistry::from_kinds(&config.sinks);
        if sinks.is_empty() {
            warn!("No diagnostic sinks configured; requests are forwarded unlogged");
        } else {
            debug!(sinks = ?sinks.names(), "Diagnostic sinks ready");
        }

        Self::new(
            sinks,
            Arc::new(HttpForwarder::new(&config.forward)),
            config.upstream.clone(),
        )
    }

    pub fn upstream(&self) -> Option<&Uri> {
        self.upstream.as_ref()
    }

    /// Emits the diagnostic record for `request` and forwards it unchanged.
    ///
    /// The record is emitted before the only await point. A forwarding failure
    /// comes back as `AppError::Forward` holding the network layer's error.
    pub async fn intercept(&self, request: Request<Body>) -> Result<Response<Body>, AppError> {
        let target = resolve_target(request.uri(), self.upstream.as_ref()).map_err(|e| {
            warn!(method = %request.method(), uri = %request.uri(), "Rejecting request: {}", e);
            e
        })?;

        let record = DiagnosticRecord::capture(request.method(), &target, request.headers());
        self.sinks.emit(&record);

        debug!(request_id = %record.request_id, url = %target, "Forwarding request");
        let response = self.forwarder.forward(target, request).await?;
        Ok(response)
    }
}
