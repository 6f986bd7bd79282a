//! Respondent model
//!
//! A respondent is derived from the diary rows sharing a case identifier.
//! Only respondents that fall cleanly into one of the two comparison groups
//! are represented here; the rest are recorded as classification ambiguities.

use std::fmt;

/// Counts of own household children by age band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChildCounts {
    /// Children under 1
    pub under_1: i64,
    /// Children aged 1 to 2
    pub age_1_to_2: i64,
    /// Children aged 3 to 5
    pub age_3_to_5: i64,
    /// Children under 18
    pub under_18: i64,
}

impl ChildCounts {
    /// Whether any child aged 5 or younger is present
    #[must_use]
    pub const fn has_young_child(&self) -> bool {
        self.under_1 > 0 || self.age_1_to_2 > 0 || self.age_3_to_5 > 0
    }

    /// Whether no child under 18 is present
    #[must_use]
    pub const fn is_childless(&self) -> bool {
        self.under_18 == 0
    }
}

/// Comparison group of a respondent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChildGroup {
    /// No child under 18 in the household
    WithoutYoungChild,
    /// At least one child aged 5 or younger
    WithYoungChild,
}

impl ChildGroup {
    /// Value of the child indicator in the regression design
    #[must_use]
    pub const fn indicator(self) -> f64 {
        match self {
            Self::WithoutYoungChild => 0.0,
            Self::WithYoungChild => 1.0,
        }
    }

    /// Whether this is the young-child group
    #[must_use]
    pub const fn has_young_child(self) -> bool {
        matches!(self, Self::WithYoungChild)
    }
}

impl fmt::Display for ChildGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WithoutYoungChild => write!(f, "without young child"),
            Self::WithYoungChild => write!(f, "with young child"),
        }
    }
}

/// A classified survey respondent
#[derive(Debug, Clone, PartialEq)]
pub struct Respondent {
    /// Respondent identifier
    pub case_id: String,
    /// Survey person weight
    pub person_weight: f64,
    /// Age in years
    pub age: i64,
    /// Raw marital status code
    pub marital_status_code: i64,
    /// Comparison group
    pub child_group: ChildGroup,
    /// Currently married
    pub is_married: bool,
}

impl Respondent {
    /// Whether the respondent has a child aged 5 or younger
    #[must_use]
    pub const fn has_young_child(&self) -> bool {
        self.child_group.has_young_child()
    }
}
