pub mod plugins;
pub mod registry;

pub use self::{
    plugins::{ConsoleSink, DiagnosticSink, MemorySink, TracingSink},
    registry::SinkRegistry,
};

use axum::http::{HeaderMap, Method, Uri};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::env;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

/// One header pair as it was observed on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderLine {
    pub name: String,
    pub value: String,
}

/// Everything the tap reports about a single intercepted request.
///
/// Renders to exactly one request line followed by one line per header pair,
/// in the order the header map yields them.
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticRecord {
    pub request_id: Uuid,
    pub received_at: DateTime<Utc>,
    pub method: String,
    pub target: String,
    pub headers: Vec<HeaderLine>,
}

impl DiagnosticRecord {
    pub fn capture(method: &Method, target: &Uri, headers: &HeaderMap) -> Self {
        let headers = headers
            .iter()
            .map(|(name, value)| HeaderLine {
                name: name.as_str().to_string(),
                value: String::from_utf8_lossy(value.as_bytes()).into_owned(),
            })
            .collect();

        Self {
            request_id: Uuid::new_v4(),
            received_at: Utc::now(),
            method: method.as_str().to_string(),
            target: target.to_string(),
            headers,
        }
    }

    pub fn request_line(&self) -> String {
        format!(">>> Request: {} {}", self.method, self.target)
    }

    pub fn header_lines(&self) -> impl Iterator<Item = String> + '_ {
        self.headers
            .iter()
            .map(|h| format!("    {}: {}", h.name, h.value))
    }

    pub fn lines(&self) -> Vec<String> {
        std::iter::once(self.request_line())
            .chain(self.header_lines())
            .collect()
    }
}

/// Output format for the process-wide tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl LogFormat {
    pub fn from_env() -> Self {
        match env::var("LOG_FORMAT").ok().as_deref().map(str::trim) {
            Some(f) if f.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Compact,
        }
    }
}

/// Installs the global subscriber. `RUST_LOG` picks the filter, `info` otherwise.
pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::new(env::var("RUST_LOG").unwrap_or_else(|_| "info".into()));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Compact => registry
            .with(tracing_subscriber::fmt::layer().compact())
            .init(),
    }
}
