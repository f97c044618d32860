//! Set differences between ID collections and numbering-gap detection.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::id::QuestionId;
use crate::types::{SectionCode, YearCode};

/// Added/missing partitions between two dataset generations.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffReport {
    /// IDs in the current generation but not the previous one, sorted.
    pub added: Vec<QuestionId>,
    /// IDs in the previous generation but not the current one, sorted.
    pub missing: Vec<QuestionId>,
    /// Added IDs partitioned by year.
    pub added_by_year: BTreeMap<YearCode, Vec<QuestionId>>,
    /// Added IDs partitioned by section.
    pub added_by_section: BTreeMap<SectionCode, Vec<QuestionId>>,
    /// Missing IDs partitioned by year.
    pub missing_by_year: BTreeMap<YearCode, Vec<QuestionId>>,
    /// Missing IDs partitioned by section.
    pub missing_by_section: BTreeMap<SectionCode, Vec<QuestionId>>,
}

/// Compute `added = current − previous` and `missing = previous − current`,
/// partitioned by year and by section for reporting.
pub fn diff(previous: &BTreeSet<QuestionId>, current: &BTreeSet<QuestionId>) -> DiffReport {
    let added: Vec<QuestionId> = current.difference(previous).cloned().collect();
    let missing: Vec<QuestionId> = previous.difference(current).cloned().collect();
    DiffReport {
        added_by_year: group_by_year(&added),
        added_by_section: group_by_section(&added),
        missing_by_year: group_by_year(&missing),
        missing_by_section: group_by_section(&missing),
        added,
        missing,
    }
}

/// Partition sorted IDs by their year code, preserving order within groups.
pub fn group_by_year(ids: &[QuestionId]) -> BTreeMap<YearCode, Vec<QuestionId>> {
    let mut groups: BTreeMap<YearCode, Vec<QuestionId>> = BTreeMap::new();
    for id in ids {
        groups.entry(id.year_code()).or_default().push(id.clone());
    }
    groups
}

/// Partition sorted IDs by their section letter, preserving order within groups.
pub fn group_by_section(ids: &[QuestionId]) -> BTreeMap<SectionCode, Vec<QuestionId>> {
    let mut groups: BTreeMap<SectionCode, Vec<QuestionId>> = BTreeMap::new();
    for id in ids {
        groups.entry(id.section()).or_default().push(id.clone());
    }
    groups
}

/// A break in the question numbering of one (year, section) group: the
/// observed neighbors `low` and `high` with nothing between them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceGap {
    /// Last number present before the gap.
    pub low: u32,
    /// First number present after the gap.
    pub high: u32,
}

/// Detect numbering gaps per (year, section) group.
///
/// Question numbers inside a section are meant to be contiguous, which is a
/// structural property of the exam. Gaps are reported relative to the
/// observed min/max only, so sparse or non-1-based groups are accepted
/// without complaint about their endpoints. Findings are informational.
pub fn sequence_gaps<'a, I>(ids: I) -> BTreeMap<(YearCode, SectionCode), Vec<SequenceGap>>
where
    I: IntoIterator<Item = &'a QuestionId>,
{
    let mut numbers: BTreeMap<(YearCode, SectionCode), BTreeSet<u32>> = BTreeMap::new();
    for id in ids {
        numbers
            .entry((id.year_code(), id.section()))
            .or_default()
            .insert(id.number());
    }

    let mut gaps = BTreeMap::new();
    for (group, numbers) in numbers {
        let mut group_gaps = Vec::new();
        for (low, high) in numbers.iter().zip(numbers.iter().skip(1)) {
            if high - low > 1 {
                group_gaps.push(SequenceGap {
                    low: *low,
                    high: *high,
                });
            }
        }
        if !group_gaps.is_empty() {
            gaps.insert(group, group_gaps);
        }
    }
    gaps
}
