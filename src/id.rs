//! Canonical question identifiers and the extractor that finds them in text.
//!
//! An ID is `YYY` + `SECTION` + `NUM`: a 3-digit exam year code, a single
//! uppercase section letter, and a 1-3 digit question number (`115A1`,
//! `119F75`). Extraction is anchored at token boundaries so an ID embedded in
//! a longer digit run never produces a spurious shorter or longer match.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::constants::id::{ID_PATTERN, NUMBER_OFFSET, YEAR_LEN};
use crate::errors::ReconcileError;
use crate::types::{SectionCode, YearCode};

fn extraction_regex() -> &'static Regex {
    static EXTRACTION: OnceLock<Regex> = OnceLock::new();
    EXTRACTION.get_or_init(|| {
        Regex::new(&format!(r"\b{ID_PATTERN}\b")).expect("extraction pattern is valid")
    })
}

fn validation_regex() -> &'static Regex {
    static VALIDATION: OnceLock<Regex> = OnceLock::new();
    VALIDATION
        .get_or_init(|| Regex::new(&format!(r"^{ID_PATTERN}$")).expect("id pattern is valid"))
}

/// Composite identifier uniquely locating one exam question.
///
/// Stored in canonical string form; ordering is lexicographic on that form,
/// which keeps merged output ordering identical to the upstream exports
/// (`115A10` sorts before `115A2`).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(String);

impl QuestionId {
    /// Validate `raw` against the full-match ID pattern.
    pub fn parse(raw: &str) -> Result<Self, ReconcileError> {
        let trimmed = raw.trim();
        if validation_regex().is_match(trimmed) {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(ReconcileError::InvalidId(raw.to_string()))
        }
    }

    /// Canonical string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 3-digit exam year code (`115A1` -> `115`).
    pub fn year(&self) -> &str {
        &self.0[..YEAR_LEN]
    }

    /// Owned year code, for grouping keys.
    pub fn year_code(&self) -> YearCode {
        self.year().to_string()
    }

    /// Section letter (`115A1` -> `A`).
    pub fn section(&self) -> SectionCode {
        // Pattern guarantees an ASCII uppercase letter at this offset.
        self.0.as_bytes()[YEAR_LEN] as char
    }

    /// Question number within the section (`115A1` -> `1`).
    pub fn number(&self) -> u32 {
        self.0[NUMBER_OFFSET..]
            .parse()
            .expect("suffix digits validated on construction")
    }
}

impl FromStr for QuestionId {
    type Err = ReconcileError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::parse(raw)
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Extract the set of distinct question IDs contained in `text`.
///
/// Deduplicated and sorted; idempotent and order independent. Token-boundary
/// anchoring means `1115A12` and `115A1234` contribute nothing.
pub fn extract_ids(text: &str) -> BTreeSet<QuestionId> {
    extraction_regex()
        .find_iter(text)
        .map(|found| QuestionId(found.as_str().to_string()))
        .collect()
}

/// Match positions of every ID occurrence, for block splitting.
///
/// Unlike [`extract_ids`] this preserves duplicates and document order.
pub(crate) fn id_occurrences(text: &str) -> Vec<(QuestionId, std::ops::Range<usize>)> {
    extraction_regex()
        .find_iter(text)
        .map(|found| (QuestionId(found.as_str().to_string()), found.range()))
        .collect()
}
