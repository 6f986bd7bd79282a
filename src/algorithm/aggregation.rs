//! Duration aggregation
//!
//! Builds the complete respondent × category grid of hours in two passes:
//!
//! 1. Sum the minutes of every classified episode per (respondent, category).
//! 2. Materialize every pair of (respondent with at least one classified
//!    episode) × (category encountered), defaulting absent pairs to zero,
//!    and convert minutes to hours.
//!
//! Unclassified episodes and episodes of excluded respondents are dropped in
//! the first pass and never reach the grid.

use log::{debug, info};
use rustc_hash::FxHashMap;

use crate::algorithm::classification::ClassifiedRespondents;
use crate::algorithm::taxonomy::{Category, canonical_code, classify_activity};
use crate::models::{ChildGroup, DiaryRecord, Respondent};

/// Minutes in an hour
pub const MINUTES_PER_HOUR: f64 = 60.0;

/// Respondents per comparison group in the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SampleSizes {
    /// Respondents without a young child
    pub without_child: usize,
    /// Respondents with a young child
    pub with_child: usize,
}

/// One cell of the complete grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DurationCell<'a> {
    /// The respondent
    pub respondent: &'a Respondent,
    /// The outcome category
    pub category: Category,
    /// Total hours spent in the category
    pub hours: f64,
}

/// Complete grid of hours per (respondent, category)
#[derive(Debug, Clone, Default)]
pub struct DurationGrid {
    respondents: Vec<Respondent>,
    categories: Vec<Category>,
    /// Hours per category, aligned with `respondents`
    hours: FxHashMap<Category, Vec<f64>>,
}

impl DurationGrid {
    /// Respondents in the grid
    #[must_use]
    pub fn respondents(&self) -> &[Respondent] {
        &self.respondents
    }

    /// Categories in the order they were first encountered in the diaries
    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Hours for a category, one value per respondent
    #[must_use]
    pub fn durations(&self, category: Category) -> Option<&[f64]> {
        self.hours.get(&category).map(Vec::as_slice)
    }

    /// Hours a respondent spent across all categories
    #[must_use]
    pub fn total_hours(&self, case_id: &str) -> Option<f64> {
        let position = self.respondents.iter().position(|r| r.case_id == case_id)?;
        Some(
            self.categories
                .iter()
                .map(|c| self.hours[c][position])
                .sum(),
        )
    }

    /// Iterate all cells, category-major in encounter order
    pub fn cells(&self) -> impl Iterator<Item = DurationCell<'_>> + '_ {
        self.categories.iter().flat_map(move |&category| {
            self.respondents
                .iter()
                .zip(&self.hours[&category])
                .map(move |(respondent, &hours)| DurationCell {
                    respondent,
                    category,
                    hours,
                })
        })
    }

    /// Count respondents in each comparison group
    #[must_use]
    pub fn sample_sizes(&self) -> SampleSizes {
        self.respondents
            .iter()
            .fold(SampleSizes::default(), |mut sizes, r| {
                match r.child_group {
                    ChildGroup::WithoutYoungChild => sizes.without_child += 1,
                    ChildGroup::WithYoungChild => sizes.with_child += 1,
                }
                sizes
            })
    }

    /// Whether the grid has no cells
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.respondents.is_empty() || self.categories.is_empty()
    }
}

/// Aggregate diary episodes into the complete duration grid
///
/// # Arguments
/// * `records` - Diary rows after sex filtering
/// * `classified` - Respondent classification for those rows
///
/// # Returns
/// The zero-filled grid covering every respondent with a classified episode
#[must_use]
pub fn aggregate_durations(
    records: &[DiaryRecord],
    classified: &ClassifiedRespondents,
) -> DurationGrid {
    let mut minutes: FxHashMap<(usize, Category), i64> = FxHashMap::default();
    let mut categories: Vec<Category> = Vec::new();
    let mut present = vec![false; classified.len()];
    let mut unclassified = 0usize;

    for record in records {
        let Some(position) = classified.position(&record.case_id) else {
            continue;
        };
        let Some(category) = classify_activity(&canonical_code(&record.activity_code)) else {
            unclassified += 1;
            continue;
        };
        if !categories.contains(&category) {
            categories.push(category);
        }
        present[position] = true;
        *minutes.entry((position, category)).or_insert(0) += record.duration_minutes;
    }

    debug!("Dropped {unclassified} unclassified episodes");

    let positions: Vec<usize> = (0..classified.len()).filter(|&i| present[i]).collect();
    let respondents: Vec<Respondent> = positions
        .iter()
        .map(|&i| classified.respondents()[i].clone())
        .collect();

    let hours = categories
        .iter()
        .map(|&category| {
            let column = positions
                .iter()
                .map(|&i| {
                    minutes.get(&(i, category)).copied().unwrap_or(0) as f64 / MINUTES_PER_HOUR
                })
                .collect();
            (category, column)
        })
        .collect();

    info!(
        "Aggregated durations for {} respondents across {} categories",
        respondents.len(),
        categories.len()
    );

    DurationGrid {
        respondents,
        categories,
        hours,
    }
}
