//! Input source interfaces and built-in parsers.
//!
//! Ownership model:
//! - `RecordSource` is the reconciler-facing interface that loads one batch.
//! - Built-in implementations parse the two supported input shapes: plain
//!   text dumps with inline IDs, and CSV rows with a localized ID column.
//! - Parse findings (skipped rows, duplicate IDs) travel inside the batch so
//!   malformed input never aborts a run.

use crate::data::{SourceBatch, SourceRecord};
use crate::errors::ReconcileError;
use crate::types::SourceName;

/// Source implementation modules.
pub mod sources;

pub use sources::notion_csv::{NotionCsvConfig, NotionCsvSource};
pub use sources::text_dump::{TextDumpConfig, TextDumpSource, parse_blocks};

/// Reconciler-facing input source interface.
///
/// `load` parses the entire input fresh on every call; sources hold no
/// mutable state between runs, so for identical input bytes the output batch
/// is identical.
pub trait RecordSource {
    /// Stable source identifier used in records and findings.
    fn id(&self) -> &str;
    /// Parse the input into a batch. Absent optional inputs yield an empty
    /// batch, not an error.
    fn load(&self) -> Result<SourceBatch, ReconcileError>;
}

/// In-memory source for tests and small fixed datasets.
pub struct InMemorySource {
    id: SourceName,
    records: Vec<SourceRecord>,
}

impl InMemorySource {
    /// Create an in-memory source from prebuilt records.
    pub fn new(id: impl Into<SourceName>, records: Vec<SourceRecord>) -> Self {
        Self {
            id: id.into(),
            records,
        }
    }
}

impl RecordSource for InMemorySource {
    fn id(&self) -> &str {
        &self.id
    }

    fn load(&self) -> Result<SourceBatch, ReconcileError> {
        let mut batch = SourceBatch::default();
        for record in &self.records {
            batch.insert(record.clone());
        }
        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::QuestionId;

    #[test]
    fn in_memory_source_loads_and_dedupes() {
        let records = vec![
            SourceRecord::text(QuestionId::parse("115A1").unwrap(), "mem", "one"),
            SourceRecord::text(QuestionId::parse("115A2").unwrap(), "mem", "two"),
            SourceRecord::text(QuestionId::parse("115A1").unwrap(), "mem", "one again"),
        ];
        let source = InMemorySource::new("mem", records);
        let batch = source.load().unwrap();
        assert_eq!(source.id(), "mem");
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.duplicates.len(), 1);
    }
}
