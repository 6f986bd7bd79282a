//! Domain models for the time-use balance analysis
//!
//! Raw diary rows as read from the survey extract, and the respondents
//! derived from them.

pub mod record;
pub mod respondent;

// Re-export commonly used types
pub use record::DiaryRecord;
pub use respondent::{ChildCounts, ChildGroup, Respondent};
