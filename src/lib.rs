#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Run configuration (input locations, output directory, limits).
pub mod config;
/// Centralized constants: ID pattern, localized columns, export naming.
pub mod constants;
/// Record payloads and the merged view.
pub mod data;
/// Set differences and numbering-gap detection.
pub mod diff;
/// Artifact writers (CSV, JSON, reports).
pub mod export;
/// Question identifiers and the text extractor.
pub mod id;
/// Priority-ordered tier merging.
pub mod merge;
/// The reconciliation report and its renderers.
pub mod report;
/// End-to-end pipeline orchestration.
pub mod reconciler;
/// Input source traits and built-in parsers.
pub mod source;
/// Shared type aliases.
pub mod types;
/// Text cleanup helpers.
pub mod utils;

mod errors;

pub use config::ReconcilerConfig;
pub use data::{DataState, MergedRecord, SourceBatch, SourceRecord};
pub use diff::{DiffReport, SequenceGap, diff, sequence_gaps};
pub use errors::ReconcileError;
pub use export::{ExportPaths, write_artifacts};
pub use id::{QuestionId, extract_ids};
pub use merge::{SourceTier, merge};
pub use reconciler::{ReconcileOutcome, Reconciler};
pub use report::{DatasetStatistics, ReconciliationReport};
pub use source::{
    InMemorySource, NotionCsvConfig, NotionCsvSource, RecordSource, TextDumpConfig, TextDumpSource,
};
pub use types::{ColumnName, FieldValue, SectionCode, SourceName, YearCode};
