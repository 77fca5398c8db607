use super::{
    plugins::{ConsoleSink, DiagnosticSink, TracingSink},
    DiagnosticRecord,
};
use crate::config::SinkKind;
use tracing::info;

/// Fans each record out to every registered sink, in registration order.
///
/// Built once during startup; read-only while serving.
#[derive(Default)]
pub struct SinkRegistry {
    sinks: Vec<Box<dyn DiagnosticSink>>,
}

impl SinkRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_kinds(kinds: &[SinkKind]) -> Self {
        let mut registry = Self::new();
        for kind in kinds {
            match kind {
                SinkKind::Console => registry.register(Box::new(ConsoleSink::new())),
                SinkKind::Tracing => registry.register(Box::new(TracingSink::new())),
            }
        }
        registry
    }

    pub fn register(&mut self, sink: Box<dyn DiagnosticSink>) {
        info!("Registering diagnostic sink: {}", sink.name());
        self.sinks.push(sink);
    }

    pub fn with_sink(mut self, sink: Box<dyn DiagnosticSink>) -> Self {
        self.register(sink);
        self
    }

    pub fn emit(&self, record: &DiagnosticRecord) {
        for sink in &self.sinks {
            sink.emit(record);
        }
    }

    pub fn names(&self) -> Vec<&str> {
        self.sinks.iter().map(|s| s.name()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}
