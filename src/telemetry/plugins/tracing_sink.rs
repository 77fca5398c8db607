use crate::telemetry::{plugins::DiagnosticSink, DiagnosticRecord};
use tracing::{info, info_span};

/// Routes records through the global `tracing` subscriber.
///
/// Each line is its own INFO event under a `request` span, so lines stay
/// attributable to their request even when the subscriber interleaves events.
pub struct TracingSink;

impl TracingSink {
    pub fn new() -> Self {
        TracingSink
    }
}

impl Default for TracingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticSink for TracingSink {
    fn emit(&self, record: &DiagnosticRecord) {
        let span = info_span!("request", id = %record.request_id);
        let _enter = span.enter();

        info!(
            target: "fetch_tap::diagnostic",
            method = %record.method,
            url = %record.target,
            "{}",
            record.request_line()
        );
        for line in record.header_lines() {
            info!(target: "fetch_tap::diagnostic", "{}", line);
        }
    }

    fn name(&self) -> &str {
        "tracing"
    }
}
