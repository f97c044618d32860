use std::collections::{BTreeMap, BTreeSet};

use indexmap::IndexMap;

use qbank::data::{DataState, SourceRecord};
use qbank::diff::diff;
use qbank::id::{QuestionId, extract_ids};
use qbank::merge::{SourceTier, merge};
use qbank::source::{InMemorySource, RecordSource};

fn qid(raw: &str) -> QuestionId {
    QuestionId::parse(raw).unwrap()
}

fn baseline_of(entries: &[&str]) -> BTreeMap<QuestionId, SourceRecord> {
    entries
        .iter()
        .map(|raw| {
            let id = qid(raw);
            (
                id.clone(),
                SourceRecord::text(id, "base_data", format!("content of {raw}")),
            )
        })
        .collect()
}

fn detailed_tier(name: &str, state: DataState, entries: &[(&str, &str)]) -> SourceTier {
    let source = InMemorySource::new(
        name,
        entries
            .iter()
            .map(|(raw, answer)| {
                let mut fields = IndexMap::new();
                fields.insert("問題ID".to_string(), raw.to_string());
                fields.insert("正答".to_string(), answer.to_string());
                fields.insert("問題文".to_string(), format!("{name} text for {raw}"));
                SourceRecord::row(qid(raw), name, fields)
            })
            .collect(),
    );
    SourceTier::from_batch(name, state, source.load().unwrap())
}

#[test]
fn merged_keys_equal_the_union_of_all_inputs() {
    let baseline = baseline_of(&["115A1", "115A2", "116C9"]);
    let tiers = vec![
        detailed_tier("notion", DataState::NotionExisting, &[("115A2", "a"), ("117D1", "b")]),
        detailed_tier("restore", DataState::Restored, &[("118E5", "c")]),
    ];
    let merged = merge(&baseline, &tiers);

    let mut expected: BTreeSet<QuestionId> = baseline.keys().cloned().collect();
    for tier in &tiers {
        expected.extend(tier.records.keys().cloned());
    }
    let actual: BTreeSet<QuestionId> = merged.keys().cloned().collect();
    assert_eq!(actual, expected);
}

#[test]
fn priority_ordering_never_blends_fields() {
    let baseline = baseline_of(&["115A1"]);
    let tiers = vec![
        detailed_tier("notion", DataState::NotionExisting, &[("115A1", "e")]),
        detailed_tier("restore", DataState::Restored, &[("115A1", "c")]),
    ];
    let merged = merge(&baseline, &tiers);
    let record = &merged[&qid("115A1")];

    assert_eq!(record.data_state, DataState::NotionExisting);
    assert_eq!(record.answer, "e");
    // Every structured field comes from the winning tier; a cell the tier
    // left empty stays empty rather than picking up baseline text.
    assert_eq!(record.question_text, "notion text for 115A1");
    assert_eq!(record.web_display, "");
    assert_eq!(record.content, "content of 115A1");
}

#[test]
fn fallback_tags_baseline_only_ids_basic_only() {
    let baseline = baseline_of(&["115A1", "115A2"]);
    let tiers = vec![detailed_tier(
        "notion",
        DataState::NotionExisting,
        &[("115A1", "e")],
    )];
    let merged = merge(&baseline, &tiers);
    assert_eq!(merged[&qid("115A2")].data_state, DataState::BasicOnly);
    assert_eq!(merged[&qid("115A2")].content, "content of 115A2");
}

#[test]
fn differ_matches_the_documented_example() {
    let previous: BTreeSet<QuestionId> = [qid("115A1"), qid("115A2")].into_iter().collect();
    let current: BTreeSet<QuestionId> = [qid("115A2"), qid("115A3")].into_iter().collect();
    let report = diff(&previous, &current);
    assert_eq!(report.added, vec![qid("115A3")]);
    assert_eq!(report.missing, vec![qid("115A1")]);
}

#[test]
fn extractor_is_idempotent_over_its_own_output() {
    let noisy = "前段 115A1 さらに 999Z999 も 115A10、そして 1115A12 は無効。";
    let first = extract_ids(noisy);
    let rejoined = first
        .iter()
        .map(|id| id.as_str())
        .collect::<Vec<_>>()
        .join("\n");
    assert_eq!(extract_ids(&rejoined), first);
    let flat: Vec<_> = first.iter().map(|id| id.as_str()).collect();
    assert_eq!(flat, ["115A1", "115A10", "999Z999"]);
}

#[test]
fn merge_twice_yields_identical_results() {
    let baseline = baseline_of(&["115A1", "115A10", "115A2"]);
    let tiers = vec![detailed_tier(
        "notion",
        DataState::NotionExisting,
        &[("115A10", "d")],
    )];
    assert_eq!(merge(&baseline, &tiers), merge(&baseline, &tiers));
}
