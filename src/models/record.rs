//! Respondent-activity record model
//!
//! One row of the survey extract: a single reported activity episode together
//! with the person-level attributes of the respondent who reported it.

use serde::{Deserialize, Serialize};

use super::respondent::ChildCounts;

/// A single diary episode with its respondent's attributes
///
/// Field names are the canonical column names the loader renames the
/// extract's columns to before deserializing with `serde_arrow`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiaryRecord {
    /// Respondent identifier
    pub case_id: String,
    /// Survey person weight
    pub person_weight: f64,
    /// Sex code
    pub sex: i64,
    /// Marital status code (1 and 2 denote currently married)
    pub marital_status: i64,
    /// Age in years
    pub age: i64,
    /// Own children under 1
    pub kids_under_1: i64,
    /// Own children aged 1 to 2
    pub kids_1_to_2: i64,
    /// Own children aged 3 to 5
    pub kids_3_to_5: i64,
    /// Own children under 18
    pub kids_under_18: i64,
    /// Activity classification code in integer text form
    pub activity_code: String,
    /// Episode duration in minutes
    pub duration_minutes: i64,
}

impl DiaryRecord {
    /// Canonical field names, in the order the loader projects them
    pub const FIELDS: [&'static str; 11] = [
        "case_id",
        "person_weight",
        "sex",
        "marital_status",
        "age",
        "kids_under_1",
        "kids_1_to_2",
        "kids_3_to_5",
        "kids_under_18",
        "activity_code",
        "duration_minutes",
    ];

    /// Child counts reported on this row
    #[must_use]
    pub const fn child_counts(&self) -> ChildCounts {
        ChildCounts {
            under_1: self.kids_under_1,
            age_1_to_2: self.kids_1_to_2,
            age_3_to_5: self.kids_3_to_5,
            under_18: self.kids_under_18,
        }
    }
}
