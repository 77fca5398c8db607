use crate::telemetry::{plugins::DiagnosticSink, DiagnosticRecord};
use parking_lot::Mutex;
use std::sync::Arc;

/// Keeps every record in memory. Clones share the same buffer.
#[derive(Clone, Default)]
pub struct MemorySink {
    records: Arc<Mutex<Vec<DiagnosticRecord>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<DiagnosticRecord> {
        self.records.lock().clone()
    }

    /// All rendered lines, record after record.
    pub fn lines(&self) -> Vec<String> {
        self.records
            .lock()
            .iter()
            .flat_map(DiagnosticRecord::lines)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

impl DiagnosticSink for MemorySink {
    fn emit(&self, record: &DiagnosticRecord) {
        self.records.lock().push(record.clone());
    }

    fn name(&self) -> &str {
        "memory"
    }
}
