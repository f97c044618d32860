//! Derived, read-only reconciliation report and its renderers.
//!
//! The report replaces iterated console prints with a structured value;
//! presentation (markdown, plain text, JSON) is a pure formatting step over
//! it and never recomputes anything.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::constants::validation::REPORT_MISSING_ID_LIMIT;
use crate::data::{DataState, MergedRecord};
use crate::diff::{DiffReport, SequenceGap, group_by_section, group_by_year, sequence_gaps};
use crate::id::QuestionId;
use crate::merge::SourceTier;
use crate::types::{SourceName, YearCode};

/// Aggregate counts over the merged record set.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetStatistics {
    /// Question counts per exam year.
    pub by_year: BTreeMap<String, usize>,
    /// Question counts per section letter.
    pub by_section: BTreeMap<String, usize>,
    /// Question counts per provenance tier, in priority order.
    pub by_data_state: IndexMap<String, usize>,
}

impl DatasetStatistics {
    /// Tally a merged record set.
    pub fn from_merged(merged: &BTreeMap<QuestionId, MergedRecord>) -> Self {
        let mut stats = Self::default();
        for state in [
            DataState::NotionExisting,
            DataState::Restored,
            DataState::BasicOnly,
        ] {
            stats.by_data_state.insert(state.as_str().to_string(), 0);
        }
        for record in merged.values() {
            *stats.by_year.entry(record.year.clone()).or_insert(0) += 1;
            *stats.by_section.entry(record.section.clone()).or_insert(0) += 1;
            *stats
                .by_data_state
                .entry(record.data_state.as_str().to_string())
                .or_insert(0) += 1;
        }
        stats
    }

    /// Records satisfied by a detailed tier (everything but `basic_only`).
    pub fn complete_count(&self) -> usize {
        self.by_data_state
            .iter()
            .filter(|(state, _)| state.as_str() != DataState::BasicOnly.as_str())
            .map(|(_, count)| count)
            .sum()
    }
}

/// Duplicate-ID warning from one source.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateFinding {
    /// Source the duplicate appeared in.
    pub source: SourceName,
    /// Duplicated ID.
    pub id: QuestionId,
    /// Number of extra occurrences beyond the first.
    pub occurrences: usize,
}

/// Skipped-row tally from one source.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedFinding {
    /// Source rows were skipped in.
    pub source: SourceName,
    /// Number of rows skipped.
    pub rows: usize,
}

/// Expected-versus-actual question count mismatch for one exam year.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountMismatch {
    /// Exam year code.
    pub year: YearCode,
    /// Configured expectation.
    pub expected: usize,
    /// Observed count.
    pub actual: usize,
}

/// Numbering gaps inside one (year, section) group.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GapFinding {
    /// Exam year code.
    pub year: YearCode,
    /// Section letter.
    pub section: String,
    /// Breaks between observed neighbors.
    pub gaps: Vec<SequenceGap>,
}

/// Read-only reconciliation findings derived from one run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationReport {
    /// Total merged question count.
    pub total: usize,
    /// Aggregate counts over the merged set.
    pub statistics: DatasetStatistics,
    /// Baseline-versus-current-generation set differences.
    pub generation_diff: DiffReport,
    /// Merged IDs absent from the highest-priority detailed tier, sorted.
    pub missing_detailed: Vec<QuestionId>,
    /// Missing IDs partitioned by year.
    pub missing_by_year: BTreeMap<YearCode, Vec<QuestionId>>,
    /// Missing IDs partitioned by section (string key for serialization).
    pub missing_by_section: BTreeMap<String, Vec<QuestionId>>,
    /// How many missing IDs a lower tier or the baseline can restore.
    pub restorable: usize,
    /// Numbering gaps per (year, section) group.
    pub gap_findings: Vec<GapFinding>,
    /// Duplicate-ID warnings across all sources.
    pub duplicates: Vec<DuplicateFinding>,
    /// Skipped-row tallies across all sources.
    pub skipped: Vec<SkippedFinding>,
    /// Per-year count expectations that did not hold.
    pub count_mismatches: Vec<CountMismatch>,
}

impl ReconciliationReport {
    /// Derive the full report from a merged set and its inputs.
    ///
    /// `detailed_tier` is the highest-priority tier; merged IDs it lacks are
    /// the restoration targets. `expected_per_year` drives the informational
    /// count-mismatch findings.
    pub fn build(
        merged: &BTreeMap<QuestionId, MergedRecord>,
        detailed_tier: Option<&SourceTier>,
        generation_diff: DiffReport,
        expected_per_year: Option<usize>,
    ) -> Self {
        let statistics = DatasetStatistics::from_merged(merged);

        let missing_detailed: Vec<QuestionId> = match detailed_tier {
            Some(tier) => merged
                .keys()
                .filter(|id| !tier.records.contains_key(id))
                .cloned()
                .collect(),
            None => merged.keys().cloned().collect(),
        };
        // Everything the merge satisfied from any tier or the baseline text
        // can be pushed back into the detailed export.
        let restorable = missing_detailed
            .iter()
            .filter(|id| {
                merged
                    .get(id)
                    .is_some_and(|record| !record.web_display.is_empty())
            })
            .count();
        let missing_by_year = group_by_year(&missing_detailed);
        let missing_by_section = group_by_section(&missing_detailed)
            .into_iter()
            .map(|(section, ids)| (section.to_string(), ids))
            .collect();

        let gap_findings = sequence_gaps(merged.keys())
            .into_iter()
            .map(|((year, section), gaps)| GapFinding {
                year,
                section: section.to_string(),
                gaps,
            })
            .collect();

        let count_mismatches = match expected_per_year {
            Some(expected) => statistics
                .by_year
                .iter()
                .filter(|(_, actual)| **actual != expected)
                .map(|(year, actual)| CountMismatch {
                    year: year.clone(),
                    expected,
                    actual: *actual,
                })
                .collect(),
            None => Vec::new(),
        };

        Self {
            total: merged.len(),
            statistics,
            generation_diff,
            missing_detailed,
            missing_by_year,
            missing_by_section,
            restorable,
            gap_findings,
            duplicates: Vec::new(),
            skipped: Vec::new(),
            count_mismatches,
        }
    }

    /// Record duplicate findings from a loaded source.
    pub fn add_duplicates(
        &mut self,
        source: impl Into<SourceName>,
        duplicates: &BTreeMap<QuestionId, usize>,
    ) {
        let source = source.into();
        for (id, occurrences) in duplicates {
            self.duplicates.push(DuplicateFinding {
                source: source.clone(),
                id: id.clone(),
                occurrences: *occurrences,
            });
        }
    }

    /// Record a skipped-row tally from a loaded source.
    pub fn add_skipped(&mut self, source: impl Into<SourceName>, rows: usize) {
        if rows > 0 {
            self.skipped.push(SkippedFinding {
                source: source.into(),
                rows,
            });
        }
    }

    /// Restoration success ratio over the missing-detailed set.
    pub fn restoration_rate(&self) -> f64 {
        if self.missing_detailed.is_empty() {
            return 1.0;
        }
        self.restorable as f64 / self.missing_detailed.len() as f64
    }

    /// Render the report as a markdown document.
    pub fn render_markdown(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "# Reconciliation report\n");
        let _ = writeln!(out, "## Overview");
        let _ = writeln!(out, "- Total questions: {}", self.total);
        let complete = self.statistics.complete_count();
        let _ = writeln!(
            out,
            "- Complete data: {}/{} ({:.1}%)",
            complete,
            self.total,
            percentage(complete, self.total)
        );
        let _ = writeln!(
            out,
            "- Missing from detailed export: {} ({} restorable)",
            self.missing_detailed.len(),
            self.restorable
        );

        let _ = writeln!(out, "\n## By year");
        for (year, count) in &self.statistics.by_year {
            let _ = writeln!(out, "- {year}: {count}");
        }
        let _ = writeln!(out, "\n## By section");
        for (section, count) in &self.statistics.by_section {
            let _ = writeln!(out, "- {section}: {count}");
        }
        let _ = writeln!(out, "\n## By data state");
        for (state, count) in &self.statistics.by_data_state {
            let _ = writeln!(out, "- {state}: {count}");
        }

        let _ = writeln!(out, "\n## Generation diff");
        let _ = writeln!(out, "- Added: {}", self.generation_diff.added.len());
        for (year, ids) in &self.generation_diff.added_by_year {
            let _ = writeln!(out, "  - {year}: {}", ids.len());
        }
        let _ = writeln!(out, "- Missing: {}", self.generation_diff.missing.len());
        for (year, ids) in &self.generation_diff.missing_by_year {
            let _ = writeln!(out, "  - {year}: {}", ids.len());
        }

        if !self.gap_findings.is_empty() {
            let _ = writeln!(out, "\n## Numbering gaps");
            for finding in &self.gap_findings {
                let spans: Vec<String> = finding
                    .gaps
                    .iter()
                    .map(|gap| format!("({}, {})", gap.low, gap.high))
                    .collect();
                let _ = writeln!(
                    out,
                    "- {}{}: {}",
                    finding.year,
                    finding.section,
                    spans.join(", ")
                );
            }
        }

        if !self.duplicates.is_empty() || !self.count_mismatches.is_empty() || !self.skipped.is_empty()
        {
            let _ = writeln!(out, "\n## Warnings");
            for finding in &self.duplicates {
                let _ = writeln!(
                    out,
                    "- duplicate id {} in '{}' ({} extra occurrence(s))",
                    finding.id, finding.source, finding.occurrences
                );
            }
            for finding in &self.skipped {
                let _ = writeln!(
                    out,
                    "- {} row(s) skipped in '{}'",
                    finding.rows, finding.source
                );
            }
            for mismatch in &self.count_mismatches {
                let _ = writeln!(
                    out,
                    "- year {} has {} questions, expected {}",
                    mismatch.year, mismatch.actual, mismatch.expected
                );
            }
        }
        out
    }

    /// Render the plain-text restoration summary.
    pub fn render_summary(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "# Restoration report\n");
        let _ = writeln!(out, "## Dataset status");
        let _ = writeln!(out, "Merged questions: {}", self.total);
        let existing = self.total - self.missing_detailed.len();
        let _ = writeln!(out, "Present in detailed export: {existing}");
        let _ = writeln!(
            out,
            "Missing from detailed export: {}",
            self.missing_detailed.len()
        );
        let _ = writeln!(out, "Restorable: {}", self.restorable);
        let _ = writeln!(
            out,
            "\n## Restoration success rate\n{:.1}%",
            self.restoration_rate() * 100.0
        );

        let _ = writeln!(out, "\n## Missing by year");
        for (year, ids) in &self.missing_by_year {
            let _ = writeln!(out, "{year}: {} missing", ids.len());
        }
        let _ = writeln!(out, "\n## Missing by section");
        for (section, ids) in &self.missing_by_section {
            let _ = writeln!(out, "{section}: {} missing", ids.len());
        }

        let _ = writeln!(out, "\n## Missing question ids");
        for id in self.missing_detailed.iter().take(REPORT_MISSING_ID_LIMIT) {
            let _ = writeln!(out, "{id}");
        }
        if self.missing_detailed.len() > REPORT_MISSING_ID_LIMIT {
            let _ = writeln!(
                out,
                "... and {} more",
                self.missing_detailed.len() - REPORT_MISSING_ID_LIMIT
            );
        }
        out
    }
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SourceRecord;
    use crate::diff::diff;
    use crate::merge::merge;
    use indexmap::IndexMap;
    use std::collections::BTreeSet;

    fn qid(raw: &str) -> QuestionId {
        QuestionId::parse(raw).unwrap()
    }

    fn fixture() -> (BTreeMap<QuestionId, MergedRecord>, SourceTier) {
        let baseline: BTreeMap<QuestionId, SourceRecord> = ["115A1", "115A2", "115A4"]
            .iter()
            .map(|raw| {
                let id = qid(raw);
                (
                    id.clone(),
                    SourceRecord::text(id, "base_data", format!("text for {raw}")),
                )
            })
            .collect();
        let mut fields = IndexMap::new();
        fields.insert("正答".to_string(), "e".to_string());
        let id = qid("115A1");
        let tier = SourceTier {
            name: "notion".to_string(),
            state: DataState::NotionExisting,
            records: [(id.clone(), SourceRecord::row(id, "notion", fields))]
                .into_iter()
                .collect(),
        };
        let merged = merge(&baseline, std::slice::from_ref(&tier));
        (merged, tier)
    }

    #[test]
    fn build_tallies_states_missing_and_gaps() {
        let (merged, tier) = fixture();
        let report = ReconciliationReport::build(
            &merged,
            Some(&tier),
            DiffReport::default(),
            Some(400),
        );
        assert_eq!(report.total, 3);
        assert_eq!(report.statistics.by_data_state["notion_existing"], 1);
        assert_eq!(report.statistics.by_data_state["basic_only"], 2);
        assert_eq!(
            report.missing_detailed,
            vec![qid("115A2"), qid("115A4")]
        );
        assert_eq!(report.restorable, 2);
        assert_eq!(report.gap_findings.len(), 1);
        assert_eq!(report.gap_findings[0].gaps[0].low, 2);
        assert_eq!(report.gap_findings[0].gaps[0].high, 4);
        // 3 != 400 for year 115.
        assert_eq!(report.count_mismatches.len(), 1);
    }

    #[test]
    fn expected_count_is_configuration_not_code() {
        let (merged, tier) = fixture();
        let report =
            ReconciliationReport::build(&merged, Some(&tier), DiffReport::default(), None);
        assert!(report.count_mismatches.is_empty());
        let report =
            ReconciliationReport::build(&merged, Some(&tier), DiffReport::default(), Some(3));
        assert!(report.count_mismatches.is_empty());
    }

    #[test]
    fn renderers_are_pure_formatting_over_the_report() {
        let (merged, tier) = fixture();
        let previous: BTreeSet<QuestionId> = [qid("115A1"), qid("115A9")].into_iter().collect();
        let current: BTreeSet<QuestionId> = merged.keys().cloned().collect();
        let mut report = ReconciliationReport::build(
            &merged,
            Some(&tier),
            diff(&previous, &current),
            Some(400),
        );
        report.add_skipped("notion", 2);
        let markdown = report.render_markdown();
        assert!(markdown.contains("## By data state"));
        assert!(markdown.contains("notion_existing: 1"));
        assert!(markdown.contains("115A: (2, 4)"));
        assert!(markdown.contains("2 row(s) skipped"));
        let summary = report.render_summary();
        assert!(summary.contains("Missing from detailed export: 2"));
        assert!(summary.contains("100.0%"));
        // Rendering twice yields identical text.
        assert_eq!(markdown, report.render_markdown());
    }

    #[test]
    fn restoration_rate_is_full_when_nothing_is_missing() {
        let (merged, _) = fixture();
        let full_tier = SourceTier {
            name: "notion".to_string(),
            state: DataState::NotionExisting,
            records: merged
                .keys()
                .map(|id| {
                    (
                        id.clone(),
                        SourceRecord::row(id.clone(), "notion", IndexMap::new()),
                    )
                })
                .collect(),
        };
        let report =
            ReconciliationReport::build(&merged, Some(&full_tier), DiffReport::default(), None);
        assert!(report.missing_detailed.is_empty());
        assert_eq!(report.restoration_rate(), 1.0);
    }

    #[test]
    fn duplicates_surface_as_warning_findings() {
        let (merged, tier) = fixture();
        let mut report =
            ReconciliationReport::build(&merged, Some(&tier), DiffReport::default(), None);
        let duplicates: BTreeMap<QuestionId, usize> = [(qid("115A1"), 2)].into_iter().collect();
        report.add_duplicates("base_data", &duplicates);
        assert_eq!(report.duplicates.len(), 1);
        assert!(report.render_markdown().contains("duplicate id 115A1"));
    }
}
