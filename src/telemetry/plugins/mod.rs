use super::DiagnosticRecord;

/// A line-oriented consumer of diagnostic records.
///
/// `emit` runs on the request path before the request is forwarded, so it must
/// not block on anything slower than a local write.
pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, record: &DiagnosticRecord);
    fn name(&self) -> &str;
}

pub mod console;
pub mod memory;
pub mod tracing_sink;

pub use console::ConsoleSink;
pub use memory::MemorySink;
pub use tracing_sink::TracingSink;
