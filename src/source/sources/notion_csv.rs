use std::path::PathBuf;

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::constants::columns::QUESTION_ID_TOKEN;
use crate::data::{SourceBatch, SourceRecord};
use crate::errors::ReconcileError;
use crate::id::QuestionId;
use crate::source::RecordSource;
use crate::types::SourceName;

/// Configuration for a CSV export source.
#[derive(Clone, Debug)]
pub struct NotionCsvConfig {
    /// Stable source identifier stamped onto parsed records.
    pub source_id: SourceName,
    /// Path to the CSV export.
    pub path: PathBuf,
    /// Localized token the ID column's header must contain.
    pub id_column_token: String,
}

impl NotionCsvConfig {
    /// Create a config for a CSV export with explicit id and path.
    pub fn new(source_id: impl Into<SourceName>, path: impl Into<PathBuf>) -> Self {
        Self {
            source_id: source_id.into(),
            path: path.into(),
            id_column_token: QUESTION_ID_TOKEN.to_string(),
        }
    }

    /// Override the ID-column header token.
    pub fn with_id_column_token(mut self, token: impl Into<String>) -> Self {
        self.id_column_token = token.into();
        self
    }
}

/// Parses a hosted-database CSV export into records keyed by question ID.
///
/// The ID column is located by header substring match (exports prepend a BOM
/// and sometimes decorate headers). Rows without a valid ID are skipped and
/// counted, never fatal; the whole row is indexed under the ID on success.
pub struct NotionCsvSource {
    config: NotionCsvConfig,
}

impl NotionCsvSource {
    /// Create a CSV source from configuration.
    pub fn new(config: NotionCsvConfig) -> Self {
        Self { config }
    }
}

impl RecordSource for NotionCsvSource {
    fn id(&self) -> &str {
        &self.config.source_id
    }

    fn load(&self) -> Result<SourceBatch, ReconcileError> {
        let mut batch = SourceBatch::default();
        if !self.config.path.exists() {
            warn!(
                source = %self.config.source_id,
                path = %self.config.path.display(),
                "csv export missing, loading as empty source"
            );
            return Ok(batch);
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&self.config.path)?;
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|header| header.to_string())
            .collect();
        let id_column = headers
            .iter()
            .position(|header| header.contains(&self.config.id_column_token));
        let Some(id_column) = id_column else {
            warn!(
                source = %self.config.source_id,
                token = %self.config.id_column_token,
                "no header contains the id token, skipping every row"
            );
            batch.skipped_rows = reader.records().filter_map(Result::ok).count();
            return Ok(batch);
        };

        for row in reader.records() {
            let row = match row {
                Ok(row) => row,
                Err(err) => {
                    warn!(source = %self.config.source_id, error = %err, "skipping unreadable csv row");
                    batch.skipped_rows += 1;
                    continue;
                }
            };
            let raw_id = row.get(id_column).unwrap_or_default().trim();
            // Re-exported files sometimes repeat the header as a data row.
            if raw_id.is_empty() || raw_id.contains(&self.config.id_column_token) {
                batch.skipped_rows += 1;
                continue;
            }
            let id = match QuestionId::parse(raw_id) {
                Ok(id) => id,
                Err(_) => {
                    warn!(source = %self.config.source_id, raw = raw_id, "skipping row with invalid question id");
                    batch.skipped_rows += 1;
                    continue;
                }
            };
            let mut fields = IndexMap::with_capacity(headers.len());
            for (column, value) in headers.iter().zip(row.iter()) {
                fields.insert(column.clone(), value.to_string());
            }
            batch.insert(SourceRecord::row(id, self.config.source_id.clone(), fields));
        }
        debug!(
            source = %self.config.source_id,
            records = batch.len(),
            skipped = batch.skipped_rows,
            "parsed csv export"
        );
        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_csv(contents: &str) -> (tempfile::TempDir, PathBuf) {
        let temp = tempdir().unwrap();
        let path = temp.path().join("export.csv");
        std::fs::write(&path, contents).unwrap();
        (temp, path)
    }

    #[test]
    fn loads_rows_keyed_by_id_with_full_row_indexed() {
        let (_temp, path) = write_csv(
            "\u{feff}問題ID,正答,正答率\n115A1,e,89.2%\n115A2,c,64.0%\n",
        );
        let source = NotionCsvSource::new(NotionCsvConfig::new("notion", &path));
        let batch = source.load().unwrap();
        assert_eq!(batch.len(), 2);
        let record = &batch.records[&QuestionId::parse("115A1").unwrap()];
        assert_eq!(record.field_containing("正答"), Some("e"));
        assert_eq!(record.field_containing("問題ID"), Some("115A1"));
    }

    #[test]
    fn skips_invalid_and_header_echo_rows() {
        let (_temp, path) = write_csv(
            "問題ID,正答\n115A1,e\nnot-an-id,x\n問題ID,正答\n,blank\n116B2,a\n",
        );
        let source = NotionCsvSource::new(NotionCsvConfig::new("notion", &path));
        let batch = source.load().unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.skipped_rows, 3);
    }

    #[test]
    fn counts_duplicate_ids_without_aborting() {
        let (_temp, path) = write_csv("問題ID,正答\n115A1,e\n115A1,c\n");
        let source = NotionCsvSource::new(NotionCsvConfig::new("notion", &path));
        let batch = source.load().unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.duplicates.len(), 1);
        let record = &batch.records[&QuestionId::parse("115A1").unwrap()];
        assert_eq!(record.field_containing("正答"), Some("c"));
    }

    #[test]
    fn missing_id_column_skips_every_row() {
        let (_temp, path) = write_csv("name,answer\nfoo,e\nbar,c\n");
        let source = NotionCsvSource::new(NotionCsvConfig::new("notion", &path));
        let batch = source.load().unwrap();
        assert!(batch.is_empty());
        assert_eq!(batch.skipped_rows, 2);
    }

    #[test]
    fn missing_file_is_an_empty_batch() {
        let temp = tempdir().unwrap();
        let source = NotionCsvSource::new(NotionCsvConfig::new(
            "notion",
            temp.path().join("absent.csv"),
        ));
        let batch = source.load().unwrap();
        assert!(batch.is_empty());
        assert_eq!(batch.skipped_rows, 0);
    }

    #[test]
    fn custom_id_token_matches_english_exports() {
        let (_temp, path) = write_csv("question_id,answer\n115A1,e\n");
        let source = NotionCsvSource::new(
            NotionCsvConfig::new("notion", &path).with_id_column_token("question_id"),
        );
        let batch = source.load().unwrap();
        assert_eq!(batch.len(), 1);
    }
}
