//! A transparent logging forward proxy.
//!
//! Every request that reaches the server is reported to the configured
//! diagnostic sinks (method and URL, then one line per header) and forwarded
//! to its target without modification. The upstream response, or the
//! failure to get one, is handed back to the caller as-is.

pub mod config;
pub mod error;
pub mod handlers;
pub mod interceptor;
pub mod proxy;
pub mod server;
pub mod telemetry;

pub use crate::{
    config::AppConfig,
    error::{AppError, ForwardError},
    interceptor::Interceptor,
    proxy::{Forwarder, HttpForwarder},
    telemetry::{DiagnosticRecord, DiagnosticSink, SinkRegistry},
};
