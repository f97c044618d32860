//! Artifact writers: merged CSV, structured JSON, restore CSV, and reports.
//!
//! Every writer iterates the merged `BTreeMap` directly, so artifact row
//! order is lexicographic by ID and identical inputs produce byte-identical
//! files (given a pinned creation timestamp).

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::config::ReconcilerConfig;
use crate::constants::columns::{MERGED_CSV_COLUMNS, RESTORE_CSV_COLUMNS};
use crate::constants::export::{
    DATABASE_DESCRIPTION, DATABASE_VERSION, MERGED_CSV_FILENAME, MERGED_JSON_FILENAME,
    RESTORE_CSV_FILENAME, STATISTICS_FILENAME, SUMMARY_FILENAME,
};
use crate::data::MergedRecord;
use crate::errors::ReconcileError;
use crate::id::QuestionId;
use crate::report::{DatasetStatistics, ReconciliationReport};

/// Paths of the artifacts one export pass produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportPaths {
    /// Merged CSV artifact.
    pub merged_csv: PathBuf,
    /// Merged JSON artifact.
    pub merged_json: PathBuf,
    /// Restore CSV (rows missing from the detailed export).
    pub restore_csv: PathBuf,
    /// Markdown statistics report.
    pub statistics: PathBuf,
    /// Plain-text restoration summary.
    pub summary: PathBuf,
}

/// Metadata block of the JSON artifact.
#[derive(Clone, Debug, Serialize)]
struct JsonMetadata {
    total_questions: usize,
    creation_date: DateTime<Utc>,
    version: &'static str,
    description: &'static str,
}

/// Top-level shape of the JSON artifact.
#[derive(Clone, Debug, Serialize)]
struct JsonDocument<'a> {
    metadata: JsonMetadata,
    statistics: &'a DatasetStatistics,
    questions: &'a BTreeMap<QuestionId, MergedRecord>,
}

/// Write every artifact for one reconciliation outcome into
/// `config.output_dir`, creating the directory when needed.
pub fn write_artifacts(
    merged: &BTreeMap<QuestionId, MergedRecord>,
    report: &ReconciliationReport,
    config: &ReconcilerConfig,
) -> Result<ExportPaths, ReconcileError> {
    fs::create_dir_all(&config.output_dir)?;
    let paths = ExportPaths {
        merged_csv: config.output_dir.join(MERGED_CSV_FILENAME),
        merged_json: config.output_dir.join(MERGED_JSON_FILENAME),
        restore_csv: config.output_dir.join(RESTORE_CSV_FILENAME),
        statistics: config.output_dir.join(STATISTICS_FILENAME),
        summary: config.output_dir.join(SUMMARY_FILENAME),
    };

    write_merged_csv(&paths.merged_csv, merged)?;
    let created_at = config.created_at.unwrap_or_else(Utc::now);
    write_merged_json(&paths.merged_json, merged, &report.statistics, created_at)?;
    write_restore_csv(&paths.restore_csv, merged, &report.missing_detailed)?;
    fs::write(&paths.statistics, report.render_markdown())?;
    fs::write(&paths.summary, report.render_summary())?;
    debug!(dir = %config.output_dir.display(), "wrote reconciliation artifacts");
    Ok(paths)
}

/// Write the full merged record set as the fixed-column CSV.
pub fn write_merged_csv(
    path: &Path,
    merged: &BTreeMap<QuestionId, MergedRecord>,
) -> Result<(), ReconcileError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(MERGED_CSV_COLUMNS)?;
    for record in merged.values() {
        writer.write_record([
            record.id.as_str(),
            record.year.as_str(),
            record.section.as_str(),
            record.number.as_str(),
            record.answer.as_str(),
            record.answer_rate.as_str(),
            record.english.as_str(),
            record.image.as_str(),
            record.linked.as_str(),
            record.calculation.as_str(),
            record.question_text.as_str(),
            record.case_text.as_str(),
            record.choices.as_str(),
            record.web_display.as_str(),
            record.tags.as_str(),
            record.last_updated.as_str(),
            record.source.as_str(),
            record.content.as_str(),
            record.data_state.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the structured JSON document (metadata + statistics + records).
pub fn write_merged_json(
    path: &Path,
    merged: &BTreeMap<QuestionId, MergedRecord>,
    statistics: &DatasetStatistics,
    created_at: DateTime<Utc>,
) -> Result<(), ReconcileError> {
    let document = JsonDocument {
        metadata: JsonMetadata {
            total_questions: merged.len(),
            creation_date: created_at,
            version: DATABASE_VERSION,
            description: DATABASE_DESCRIPTION,
        },
        statistics,
        questions: merged,
    };
    fs::write(path, serde_json::to_vec_pretty(&document)?)?;
    Ok(())
}

/// Write restore rows for IDs missing from the detailed export, shaped to
/// the export's own column layout so the file can be imported back.
pub fn write_restore_csv(
    path: &Path,
    merged: &BTreeMap<QuestionId, MergedRecord>,
    missing: &[QuestionId],
) -> Result<(), ReconcileError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(RESTORE_CSV_COLUMNS)?;
    for id in missing {
        let Some(record) = merged.get(id) else {
            continue;
        };
        writer.write_record([
            record.id.as_str(),
            record.year.as_str(),
            record.section.as_str(),
            record.number.as_str(),
            record.answer.as_str(),
            record.answer_rate.as_str(),
            record.english.as_str(),
            record.image.as_str(),
            record.linked.as_str(),
            record.calculation.as_str(),
            record.question_text.as_str(),
            record.case_text.as_str(),
            record.choices.as_str(),
            record.web_display.as_str(),
            record.tags.as_str(),
            record.last_updated.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
