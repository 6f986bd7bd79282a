//! Activity taxonomy
//!
//! Maps raw activity codes onto the fixed outcome categories using a rule
//! table keyed by code length and prefix. Codes no rule matches are
//! unclassified and contribute to no category.

pub mod categories;

pub use categories::Category;

/// How a rule compares against an activity code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeMatch {
    /// Code starts with any of the given prefixes
    Prefix(&'static [&'static str]),
    /// Code equals any of the given codes
    Exact(&'static [&'static str]),
}

impl CodeMatch {
    fn matches(self, code: &str) -> bool {
        match self {
            Self::Prefix(prefixes) => prefixes.iter().any(|p| code.starts_with(p)),
            Self::Exact(codes) => codes.contains(&code),
        }
    }
}

/// A single taxonomy rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivityRule {
    /// Required length of the code in integer text form
    pub code_length: usize,
    /// Match against the code text
    pub matcher: CodeMatch,
    /// Category assigned on match
    pub category: Category,
}

/// Taxonomy rules, tested in order; the first match wins
pub const ACTIVITY_RULES: [ActivityRule; 6] = [
    ActivityRule {
        code_length: 5,
        matcher: CodeMatch::Prefix(&["101"]),
        category: Category::Sleeping,
    },
    ActivityRule {
        code_length: 5,
        matcher: CodeMatch::Prefix(&["201"]),
        category: Category::Housework,
    },
    ActivityRule {
        code_length: 5,
        matcher: CodeMatch::Prefix(&["5"]),
        category: Category::Working,
    },
    ActivityRule {
        code_length: 5,
        matcher: CodeMatch::Prefix(&["301", "302", "303"]),
        category: Category::Childcare,
    },
    ActivityRule {
        code_length: 6,
        matcher: CodeMatch::Exact(&["120303", "120304"]),
        category: Category::Television,
    },
    ActivityRule {
        code_length: 6,
        matcher: CodeMatch::Prefix(&["11"]),
        category: Category::EatingAndDrinking,
    },
];

/// Canonicalize an activity code to its integer text form
///
/// The extract stores codes as integers, so a six-digit code with a leading
/// zero is five digits long once read. Text inputs are brought to the same
/// form; non-numeric codes are only trimmed.
#[must_use]
pub fn canonical_code(raw: &str) -> String {
    let trimmed = raw.trim();
    if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) {
        let stripped = trimmed.trim_start_matches('0');
        if stripped.is_empty() {
            "0".to_string()
        } else {
            stripped.to_string()
        }
    } else {
        trimmed.to_string()
    }
}

/// Classify an activity code, returning `None` when it is unclassified
///
/// # Arguments
/// * `code` - Activity code in integer text form (see [`canonical_code`])
#[must_use]
pub fn classify_activity(code: &str) -> Option<Category> {
    let length = code.len();
    ACTIVITY_RULES
        .iter()
        .filter(|rule| rule.code_length == length)
        .find(|rule| rule.matcher.matches(code))
        .map(|rule| rule.category)
}
