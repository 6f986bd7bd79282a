//! Algorithm implementations for the balance table pipeline
//!
//! The stages run strictly forward: respondent classification, activity
//! taxonomy, duration aggregation, per-category estimation, and table
//! assembly.

pub mod aggregation;
pub mod balance;
pub mod classification;
pub mod estimation;
pub mod taxonomy;
