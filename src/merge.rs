//! Priority-ordered merge of source tiers into one reconciled record set.
//!
//! The policy is deliberately whole-record: for each ID the first tier in
//! priority order that knows it supplies every field plus the provenance
//! tag. There is no field-level blending across tiers, so a merged record
//! can never be an inconsistent composite of two exports. IDs no detailed
//! tier knows fall back to a baseline-derived record tagged `basic_only`.

use std::collections::{BTreeMap, BTreeSet};

use crate::data::{DataState, MergedRecord, SourceBatch, SourceRecord};
use crate::id::QuestionId;
use crate::types::SourceName;

/// One ranked input tier: a named record map with its provenance tag.
#[derive(Clone, Debug)]
pub struct SourceTier {
    /// Tier name used in findings.
    pub name: SourceName,
    /// Provenance tag stamped onto records this tier satisfies.
    pub state: DataState,
    /// Records keyed by ID.
    pub records: BTreeMap<QuestionId, SourceRecord>,
}

impl SourceTier {
    /// Build a tier from a loaded batch.
    pub fn from_batch(name: impl Into<SourceName>, state: DataState, batch: SourceBatch) -> Self {
        Self {
            name: name.into(),
            state,
            records: batch.records,
        }
    }
}

/// Merge `tiers` (highest priority first) over the `baseline` record map.
///
/// The result's key set is exactly the union of the baseline's keys and
/// every tier's keys: no ID is dropped, none invented. Output ordering is
/// lexicographic by ID via the `BTreeMap`, so identical inputs produce
/// byte-identical serialized artifacts.
pub fn merge(
    baseline: &BTreeMap<QuestionId, SourceRecord>,
    tiers: &[SourceTier],
) -> BTreeMap<QuestionId, MergedRecord> {
    let mut ids: BTreeSet<QuestionId> = baseline.keys().cloned().collect();
    for tier in tiers {
        ids.extend(tier.records.keys().cloned());
    }

    let mut merged = BTreeMap::new();
    for id in ids {
        let baseline_record = baseline.get(&id);
        let record = tiers
            .iter()
            .find_map(|tier| {
                tier.records
                    .get(&id)
                    .map(|record| MergedRecord::from_tier(record, baseline_record, tier.state))
            })
            .or_else(|| baseline_record.map(MergedRecord::basic));
        if let Some(record) = record {
            merged.insert(id, record);
        }
    }
    merged
}
