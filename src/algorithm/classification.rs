//! Respondent classification
//!
//! Derives each respondent's comparison group and marital status from their
//! diary rows. Respondents whose only children are aged 6 to 17 belong to
//! neither group; they are excluded and recorded for audit rather than
//! defaulted into one.

use log::{info, warn};
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::models::{ChildCounts, ChildGroup, DiaryRecord, Respondent};

/// Highest marital status code denoting a currently married respondent
pub const MARRIED_MAX_CODE: i64 = 2;

/// Respondents excluded because they fit neither comparison group
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClassificationAmbiguity {
    /// Case identifiers of excluded respondents, in first-encounter order
    pub case_ids: Vec<String>,
}

impl ClassificationAmbiguity {
    /// Number of excluded respondents
    #[must_use]
    pub fn count(&self) -> usize {
        self.case_ids.len()
    }

    /// Whether no respondent was excluded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.case_ids.is_empty()
    }
}

/// Classify a respondent's comparison group from their child counts
///
/// Returns `None` for a respondent with children, none of them aged 5 or
/// younger.
#[must_use]
pub const fn classify_child_group(counts: &ChildCounts) -> Option<ChildGroup> {
    if counts.has_young_child() {
        Some(ChildGroup::WithYoungChild)
    } else if counts.is_childless() {
        Some(ChildGroup::WithoutYoungChild)
    } else {
        None
    }
}

/// Whether a marital status code denotes a currently married respondent
#[must_use]
pub const fn is_married(marital_status_code: i64) -> bool {
    marital_status_code <= MARRIED_MAX_CODE
}

/// Classified respondents, keyed by case identifier
#[derive(Debug, Clone, Default)]
pub struct ClassifiedRespondents {
    respondents: Vec<Respondent>,
    index: FxHashMap<String, usize>,
    ambiguity: ClassificationAmbiguity,
}

impl ClassifiedRespondents {
    /// Classified respondents in first-encounter order
    #[must_use]
    pub fn respondents(&self) -> &[Respondent] {
        &self.respondents
    }

    /// Position of a respondent in [`Self::respondents`]
    #[must_use]
    pub fn position(&self, case_id: &str) -> Option<usize> {
        self.index.get(case_id).copied()
    }

    /// Look up a classified respondent
    #[must_use]
    pub fn get(&self, case_id: &str) -> Option<&Respondent> {
        self.position(case_id).map(|i| &self.respondents[i])
    }

    /// Respondents excluded from the comparison
    #[must_use]
    pub const fn ambiguity(&self) -> &ClassificationAmbiguity {
        &self.ambiguity
    }

    /// Number of classified respondents
    #[must_use]
    pub fn len(&self) -> usize {
        self.respondents.len()
    }

    /// Whether no respondent was classified
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.respondents.is_empty()
    }
}

/// Classify every respondent appearing in the diary records
///
/// Person-level attributes are taken from a respondent's first row. Later
/// rows that disagree are logged and ignored.
#[must_use]
pub fn classify_respondents(records: &[DiaryRecord]) -> ClassifiedRespondents {
    let mut classified = ClassifiedRespondents::default();
    let mut first_rows: FxHashMap<&str, &DiaryRecord> = FxHashMap::default();
    let mut inconsistent = 0usize;

    for record in records {
        if let Some(first) = first_rows.get(record.case_id.as_str()) {
            if !same_person_attributes(first, record) {
                inconsistent += 1;
            }
            continue;
        }
        first_rows.insert(&record.case_id, record);

        match classify_child_group(&record.child_counts()) {
            Some(child_group) => {
                classified
                    .index
                    .insert(record.case_id.clone(), classified.respondents.len());
                classified.respondents.push(Respondent {
                    case_id: record.case_id.clone(),
                    person_weight: record.person_weight,
                    age: record.age,
                    marital_status_code: record.marital_status,
                    child_group,
                    is_married: is_married(record.marital_status),
                });
            }
            None => classified.ambiguity.case_ids.push(record.case_id.clone()),
        }
    }

    if inconsistent > 0 {
        warn!(
            "{inconsistent} diary rows disagree with their respondent's first row on person attributes; first row kept"
        );
    }
    if !classified.ambiguity.is_empty() {
        warn!(
            "Excluded {} respondents with only children aged 6-17 from the comparison",
            classified.ambiguity.count()
        );
    }
    info!(
        "Classified {} respondents ({} excluded)",
        classified.respondents.len(),
        classified.ambiguity.count()
    );

    classified
}

fn same_person_attributes(a: &DiaryRecord, b: &DiaryRecord) -> bool {
    a.person_weight == b.person_weight
        && a.age == b.age
        && a.marital_status == b.marital_status
        && a.child_counts() == b.child_counts()
}
