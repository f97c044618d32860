//! Record payloads produced by source parsers and the merged view.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::constants::columns;
use crate::id::QuestionId;
use crate::types::{ColumnName, FieldValue, SourceName};

/// Provenance tag recording which source tier satisfied a merged record.
///
/// Declared in priority order: a detailed hosted-database export beats
/// restored/backfilled data, which beats a baseline text-only record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataState {
    /// Full structured row from the hosted-database export.
    NotionExisting,
    /// Row restored from a backfill export.
    Restored,
    /// Baseline text content only; structured fields are defaults.
    BasicOnly,
}

impl DataState {
    /// Serialized tag value (matches the JSON/CSV artifacts).
    pub fn as_str(&self) -> &'static str {
        match self {
            DataState::NotionExisting => "notion_existing",
            DataState::Restored => "restored",
            DataState::BasicOnly => "basic_only",
        }
    }
}

impl fmt::Display for DataState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One parsed record from a single source.
///
/// Text sources populate `content`; spreadsheet sources index the whole row
/// in `fields` keyed by the export's own (localized) headers.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SourceRecord {
    /// Question ID this record belongs to.
    pub id: QuestionId,
    /// Source that produced the record.
    pub source: SourceName,
    /// Free-text payload for text-dump sources (cleaned, bounded).
    pub content: String,
    /// Structured row for spreadsheet sources, in header order.
    pub fields: IndexMap<ColumnName, FieldValue>,
}

impl SourceRecord {
    /// Build a text-only record.
    pub fn text(id: QuestionId, source: impl Into<SourceName>, content: impl Into<String>) -> Self {
        Self {
            id,
            source: source.into(),
            content: content.into(),
            fields: IndexMap::new(),
        }
    }

    /// Build a structured record from a spreadsheet row.
    pub fn row(
        id: QuestionId,
        source: impl Into<SourceName>,
        fields: IndexMap<ColumnName, FieldValue>,
    ) -> Self {
        Self {
            id,
            source: source.into(),
            content: String::new(),
            fields,
        }
    }

    /// Look up a structured field whose header contains `token`.
    ///
    /// Substring matching tolerates BOM-prefixed or decorated export headers.
    pub fn field_containing(&self, token: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name.contains(token))
            .map(|(_, value)| value.as_str())
    }
}

/// Records loaded from one source plus parse findings.
///
/// Duplicate IDs within a source are counted as warning-level findings;
/// the last occurrence wins, which matches the upstream export behavior.
#[derive(Clone, Debug, Default)]
pub struct SourceBatch {
    /// Parsed records keyed by ID (deterministic iteration order).
    pub records: BTreeMap<QuestionId, SourceRecord>,
    /// Rows skipped for missing/invalid IDs (spreadsheet sources).
    pub skipped_rows: usize,
    /// Extra occurrences per duplicated ID.
    pub duplicates: BTreeMap<QuestionId, usize>,
}

impl SourceBatch {
    /// Insert a record, recording a duplicate finding when the ID repeats.
    pub fn insert(&mut self, record: SourceRecord) {
        if self.records.contains_key(&record.id) {
            warn!(id = %record.id, source = %record.source, "duplicate question id in source");
            *self.duplicates.entry(record.id.clone()).or_insert(0) += 1;
        }
        self.records.insert(record.id.clone(), record);
    }

    /// Distinct IDs present in this batch.
    pub fn ids(&self) -> BTreeSet<QuestionId> {
        self.records.keys().cloned().collect()
    }

    /// Number of records in the batch.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the batch holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// The reconciled view of one question: the full field set of the single
/// highest-priority tier that knows the ID, never a blend across tiers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergedRecord {
    /// Question ID.
    pub id: QuestionId,
    /// Exam year code.
    pub year: String,
    /// Section letter.
    pub section: String,
    /// Question number suffix (kept as text to round-trip exports verbatim).
    pub number: String,
    /// Correct answer.
    pub answer: String,
    /// Historical answer rate.
    pub answer_rate: String,
    /// English-question flag.
    pub english: String,
    /// Image-question flag.
    pub image: String,
    /// Linked-question flag.
    pub linked: String,
    /// Calculation-question flag.
    pub calculation: String,
    /// Question statement text.
    pub question_text: String,
    /// Clinical case text.
    pub case_text: String,
    /// Answer choices.
    pub choices: String,
    /// Web display text.
    pub web_display: String,
    /// Free-form tags.
    pub tags: String,
    /// Last-updated timestamp from the hosted database.
    pub last_updated: String,
    /// Source tag from baseline integration.
    pub source: SourceName,
    /// Baseline free-text content.
    pub content: String,
    /// Tier that satisfied this record.
    pub data_state: DataState,
}

impl MergedRecord {
    /// Baseline fallback: empty structured fields, flags defaulted, web
    /// display text falls back to the baseline content.
    pub fn basic(baseline: &SourceRecord) -> Self {
        let id = baseline.id.clone();
        Self {
            year: id.year().to_string(),
            section: id.section().to_string(),
            number: id.number().to_string(),
            answer: String::new(),
            answer_rate: String::new(),
            english: columns::FLAG_DEFAULT.to_string(),
            image: columns::FLAG_DEFAULT.to_string(),
            linked: columns::FLAG_DEFAULT.to_string(),
            calculation: columns::FLAG_DEFAULT.to_string(),
            question_text: String::new(),
            case_text: String::new(),
            choices: String::new(),
            web_display: baseline.content.clone(),
            tags: String::new(),
            last_updated: String::new(),
            source: baseline.source.clone(),
            content: baseline.content.clone(),
            data_state: DataState::BasicOnly,
            id,
        }
    }

    /// Build from a detailed tier row; `baseline` (when present) supplies the
    /// source tag and free-text content.
    ///
    /// Structured fields come from the tier row alone. The one exception is
    /// the restored tier's empty web-display cell, which falls back to the
    /// baseline content the way the backfill export itself was produced; a
    /// `notion_existing` record keeps its cell verbatim, empty or not.
    pub fn from_tier(record: &SourceRecord, baseline: Option<&SourceRecord>, state: DataState) -> Self {
        let id = record.id.clone();
        let content = baseline.map(|b| b.content.clone()).unwrap_or_default();
        let field = |token: &str| record.field_containing(token).unwrap_or_default().to_string();
        let flag = |token: &str| {
            record
                .field_containing(token)
                .filter(|value| !value.is_empty())
                .unwrap_or(columns::FLAG_DEFAULT)
                .to_string()
        };
        let web_display = {
            let from_row = field(columns::COL_WEB_DISPLAY);
            if from_row.is_empty() && state != DataState::NotionExisting {
                content.clone()
            } else {
                from_row
            }
        };
        Self {
            year: id.year().to_string(),
            section: id.section().to_string(),
            number: id.number().to_string(),
            answer: field(columns::COL_ANSWER),
            answer_rate: field(columns::COL_ANSWER_RATE),
            english: flag(columns::COL_ENGLISH),
            image: flag(columns::COL_IMAGE),
            linked: flag(columns::COL_LINKED),
            calculation: flag(columns::COL_CALCULATION),
            question_text: field(columns::COL_QUESTION_TEXT),
            case_text: field(columns::COL_CASE_TEXT),
            choices: field(columns::COL_CHOICES),
            web_display,
            tags: field(columns::COL_TAGS),
            last_updated: field(columns::COL_LAST_UPDATED),
            source: baseline
                .map(|b| b.source.clone())
                .unwrap_or_else(|| record.source.clone()),
            content,
            data_state: state,
            id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn qid(raw: &str) -> QuestionId {
        QuestionId::parse(raw).unwrap()
    }

    #[test]
    fn batch_counts_duplicates_and_keeps_last_write() {
        let mut batch = SourceBatch::default();
        batch.insert(SourceRecord::text(qid("115A1"), "base_data", "first"));
        batch.insert(SourceRecord::text(qid("115A1"), "base_data", "second"));
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.duplicates.get(&qid("115A1")), Some(&1));
        assert_eq!(batch.records[&qid("115A1")].content, "second");
    }

    #[test]
    fn field_containing_tolerates_bom_headers() {
        let mut fields = IndexMap::new();
        fields.insert("\u{feff}問題ID".to_string(), "115A1".to_string());
        fields.insert("正答".to_string(), "e".to_string());
        let record = SourceRecord::row(qid("115A1"), "notion", fields);
        assert_eq!(record.field_containing("問題ID"), Some("115A1"));
        assert_eq!(record.field_containing("正答"), Some("e"));
        assert_eq!(record.field_containing("選択肢"), None);
    }

    #[test]
    fn basic_record_defaults_flags_and_reuses_content() {
        let baseline = SourceRecord::text(qid("116B7"), "base_data", "設問本文");
        let merged = MergedRecord::basic(&baseline);
        assert_eq!(merged.year, "116");
        assert_eq!(merged.section, "B");
        assert_eq!(merged.number, "7");
        assert_eq!(merged.english, "No");
        assert_eq!(merged.web_display, "設問本文");
        assert_eq!(merged.data_state, DataState::BasicOnly);
    }

    #[test]
    fn tier_record_takes_every_structured_field() {
        let mut fields = IndexMap::new();
        fields.insert("正答".to_string(), "c".to_string());
        fields.insert("正答率".to_string(), "74.1%".to_string());
        fields.insert("画像問題".to_string(), "Yes".to_string());
        let row = SourceRecord::row(qid("115A1"), "notion", fields);
        let baseline = SourceRecord::text(qid("115A1"), "base_data", "本文");
        let merged = MergedRecord::from_tier(&row, Some(&baseline), DataState::NotionExisting);
        assert_eq!(merged.answer, "c");
        assert_eq!(merged.answer_rate, "74.1%");
        assert_eq!(merged.image, "Yes");
        // Empty flag cells still default.
        assert_eq!(merged.english, "No");
        assert_eq!(merged.source, "base_data");
        assert_eq!(merged.data_state, DataState::NotionExisting);
    }

    #[test]
    fn notion_tier_keeps_an_empty_web_display_cell_verbatim() {
        let mut fields = IndexMap::new();
        fields.insert("正答".to_string(), "c".to_string());
        fields.insert("Web表示用".to_string(), String::new());
        let row = SourceRecord::row(qid("115A1"), "notion", fields);
        let baseline = SourceRecord::text(qid("115A1"), "base_data", "本文");
        let merged = MergedRecord::from_tier(&row, Some(&baseline), DataState::NotionExisting);
        // No cross-tier blending: the winning row's empty cell stands.
        assert_eq!(merged.web_display, "");
        assert_eq!(merged.content, "本文");
    }

    #[test]
    fn restored_tier_backfills_web_display_from_baseline_content() {
        let mut fields = IndexMap::new();
        fields.insert("正答".to_string(), "b".to_string());
        fields.insert("Web表示用".to_string(), String::new());
        let row = SourceRecord::row(qid("115A2"), "restore", fields);
        let baseline = SourceRecord::text(qid("115A2"), "base_data", "復元元の本文");
        let merged = MergedRecord::from_tier(&row, Some(&baseline), DataState::Restored);
        assert_eq!(merged.web_display, "復元元の本文");
    }
}
