use crate::telemetry::{plugins::DiagnosticSink, DiagnosticRecord};
use colored::Colorize;
use std::io::{self, Write};

/// Prints each record to stdout, request line highlighted.
pub struct ConsoleSink;

impl ConsoleSink {
    pub fn new() -> Self {
        ConsoleSink
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticSink for ConsoleSink {
    fn emit(&self, record: &DiagnosticRecord) {
        // One lock for the whole record so concurrent requests never interleave.
        let stdout = io::stdout();
        let mut out = stdout.lock();
        let _ = writeln!(out, "{}", record.request_line().bold().cyan());
        for line in record.header_lines() {
            let _ = writeln!(out, "{}", line);
        }
        let _ = out.flush();
    }

    fn name(&self) -> &str {
        "console"
    }
}
