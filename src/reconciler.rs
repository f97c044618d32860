//! End-to-end reconciliation pipeline.
//!
//! Phases mirror the upstream workflow: build the integrated baseline from
//! the raw dumps plus the curated web-display generation (with provenance
//! tags), merge the detailed export tiers over it, diff the generations,
//! detect numbering gaps, and derive the report. Artifact writing is a
//! separate step so callers can consume the structured outcome directly.

use std::collections::BTreeMap;

use tracing::info;

use crate::config::ReconcilerConfig;
use crate::constants::tiers::{BASE_SOURCE, NOTION_SOURCE, RESTORE_SOURCE, WEB_SOURCE};
use crate::data::{DataState, SourceRecord};
use crate::diff::diff;
use crate::errors::ReconcileError;
use crate::export::{ExportPaths, write_artifacts};
use crate::id::QuestionId;
use crate::merge::{SourceTier, merge};
use crate::report::ReconciliationReport;
use crate::source::{NotionCsvConfig, NotionCsvSource, RecordSource, TextDumpConfig, TextDumpSource};

/// Result of one reconciliation run.
#[derive(Clone, Debug)]
pub struct ReconcileOutcome {
    /// The reconciled record set, keyed and ordered by ID.
    pub merged: BTreeMap<QuestionId, crate::data::MergedRecord>,
    /// Derived findings for the run.
    pub report: ReconciliationReport,
}

/// Drives a full reconciliation over the configured inputs.
pub struct Reconciler {
    config: ReconcilerConfig,
}

impl Reconciler {
    /// Create a reconciler for `config`.
    pub fn new(config: ReconcilerConfig) -> Self {
        Self { config }
    }

    /// Borrow the active configuration.
    pub fn config(&self) -> &ReconcilerConfig {
        &self.config
    }

    /// Run the pipeline and return the structured outcome.
    pub fn run(&self) -> Result<ReconcileOutcome, ReconcileError> {
        // Baseline generation: the raw dumps, excluding curated files.
        let base_batch = match &self.config.base_dump_root {
            Some(root) => TextDumpSource::new(
                TextDumpConfig::new(BASE_SOURCE, root)
                    .with_content_limit(self.config.content_limit)
                    .with_exclude_marker(self.config.exclude_marker.clone()),
            )
            .load()?,
            None => Default::default(),
        };

        // Current generation: the curated web-display file.
        let web_batch = match &self.config.web_display_file {
            Some(path) => TextDumpSource::new(
                TextDumpConfig::new(WEB_SOURCE, path)
                    .with_content_limit(self.config.content_limit),
            )
            .load()?,
            None => Default::default(),
        };

        let generation_diff = diff(&base_batch.ids(), &web_batch.ids());
        info!(
            base = base_batch.len(),
            web = web_batch.len(),
            added = generation_diff.added.len(),
            missing = generation_diff.missing.len(),
            "compared dataset generations"
        );

        // Integrated baseline: every base record, plus web-display records
        // for the IDs the base generation lacks, each keeping its tag.
        let mut baseline: BTreeMap<QuestionId, SourceRecord> = base_batch.records.clone();
        for (id, record) in &web_batch.records {
            if !baseline.contains_key(id) {
                baseline.insert(id.clone(), record.clone());
            }
        }

        let notion_batch = match &self.config.notion_csv {
            Some(path) => NotionCsvSource::new(
                NotionCsvConfig::new(NOTION_SOURCE, path)
                    .with_id_column_token(self.config.id_column_token.clone()),
            )
            .load()?,
            None => Default::default(),
        };
        let restore_batch = match &self.config.restore_csv {
            Some(path) => NotionCsvSource::new(
                NotionCsvConfig::new(RESTORE_SOURCE, path)
                    .with_id_column_token(self.config.id_column_token.clone()),
            )
            .load()?,
            None => Default::default(),
        };

        let notion_skipped = notion_batch.skipped_rows;
        let restore_skipped = restore_batch.skipped_rows;
        let base_duplicates = base_batch.duplicates.clone();
        let web_duplicates = web_batch.duplicates.clone();
        let notion_duplicates = notion_batch.duplicates.clone();
        let restore_duplicates = restore_batch.duplicates.clone();

        let tiers = vec![
            SourceTier::from_batch(NOTION_SOURCE, DataState::NotionExisting, notion_batch),
            SourceTier::from_batch(RESTORE_SOURCE, DataState::Restored, restore_batch),
        ];
        let merged = merge(&baseline, &tiers);
        info!(total = merged.len(), "merged record set built");

        let mut report = ReconciliationReport::build(
            &merged,
            tiers.first(),
            generation_diff,
            self.config.expected_per_year,
        );
        report.add_duplicates(BASE_SOURCE, &base_duplicates);
        report.add_duplicates(WEB_SOURCE, &web_duplicates);
        report.add_duplicates(NOTION_SOURCE, &notion_duplicates);
        report.add_duplicates(RESTORE_SOURCE, &restore_duplicates);
        report.add_skipped(NOTION_SOURCE, notion_skipped);
        report.add_skipped(RESTORE_SOURCE, restore_skipped);

        Ok(ReconcileOutcome { merged, report })
    }

    /// Run the pipeline and write every artifact to the output directory.
    pub fn run_and_export(&self) -> Result<(ReconcileOutcome, ExportPaths), ReconcileError> {
        let outcome = self.run()?;
        let paths = write_artifacts(&outcome.merged, &outcome.report, &self.config)?;
        Ok((outcome, paths))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_runs_to_an_empty_outcome() {
        let temp = tempfile::tempdir().unwrap();
        let reconciler = Reconciler::new(ReconcilerConfig::new(temp.path()));
        let outcome = reconciler.run().unwrap();
        assert!(outcome.merged.is_empty());
        assert_eq!(outcome.report.total, 0);
        assert!(outcome.report.count_mismatches.is_empty());
    }
}
