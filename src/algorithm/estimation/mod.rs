//! Per-category estimation
//!
//! For each outcome category two weighted regressions are fit on the
//! complete duration grid, both with survey weights and HC3 errors:
//!
//! - unadjusted: hours on an intercept and the child indicator, giving the
//!   mean without a young child (intercept) and the raw difference (slope);
//! - adjusted: hours on the child indicator, a cubic in age and a married
//!   dummy, giving the difference net of controls.
//!
//! The standard error of the mean with a young child is reported as
//! `sqrt(SE(slope)² − SE(intercept)²)`. That formula ignores the covariance
//! between intercept and slope, which is not zero under dummy coding, and is
//! not a valid standard error for general designs. It is kept because it is
//! the table's published definition. For the two-group design used here the
//! difference of variances equals the HC3 variance of the group mean.

pub mod significance;
pub mod wls;

use log::{debug, info};
use nalgebra::DMatrix;
use rayon::prelude::*;
use smallvec::{SmallVec, smallvec};

use crate::algorithm::aggregation::DurationGrid;
use crate::algorithm::taxonomy::Category;
use crate::config::BalanceConfig;
use crate::error::{BalanceError, Result};
use crate::models::Respondent;
use crate::utils::logging::{create_category_progress_bar, finish_progress_bar};
use wls::{WlsFit, fit_wls_hc3};

/// Design column holding the child indicator in both models
pub const CHILD_COLUMN: usize = 1;

/// Divisor applied to centered age before taking powers
///
/// Centering and scaling keeps the cubic well conditioned and leaves the
/// spanned column space, and so the child coefficient, unchanged.
const AGE_SCALE: f64 = 10.0;

/// Estimates for one outcome category
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryEstimate {
    /// The outcome category
    pub category: Category,
    /// Intercept of the unadjusted model
    pub mean_without_child: f64,
    /// HC3 standard error of the intercept
    pub se_without_child: f64,
    /// Slope of the unadjusted model
    pub difference: f64,
    /// HC3 standard error of the slope
    pub difference_se: f64,
    /// p-value of the slope
    pub difference_p: f64,
    /// Intercept plus slope
    pub mean_with_child: f64,
    /// `sqrt(SE(slope)² − SE(intercept)²)`
    pub se_with_child: f64,
    /// Child coefficient of the adjusted model
    pub adjusted_difference: f64,
    /// HC3 standard error of the adjusted child coefficient
    pub adjusted_se: f64,
    /// p-value of the adjusted child coefficient
    pub adjusted_p: f64,
    /// Observations in both fits
    pub n_obs: usize,
}

/// Design matrices shared by every category
///
/// The grid holds the same respondents for every category, so the designs
/// and weights are built once.
#[derive(Debug, Clone)]
pub struct Designs {
    unadjusted: DMatrix<f64>,
    adjusted: DMatrix<f64>,
    weights: Vec<f64>,
    distinct_groups: usize,
}

impl Designs {
    /// Build both designs for a set of respondents
    #[must_use]
    pub fn from_respondents(respondents: &[Respondent]) -> Self {
        let n = respondents.len();
        let unadjusted = DMatrix::from_fn(n, 2, |i, j| {
            if j == 0 {
                1.0
            } else {
                respondents[i].child_group.indicator()
            }
        });

        // Treatment coding drops a marital level that is absent from the data
        let married = respondents.iter().filter(|r| r.is_married).count();
        let include_marital = married > 0 && married < n;

        let mean_age = if n == 0 {
            0.0
        } else {
            respondents.iter().map(|r| r.age as f64).sum::<f64>() / n as f64
        };

        let rows: Vec<SmallVec<[f64; 6]>> = respondents
            .iter()
            .map(|r| {
                let a = (r.age as f64 - mean_age) / AGE_SCALE;
                let mut row: SmallVec<[f64; 6]> =
                    smallvec![1.0, r.child_group.indicator(), a, a * a, a * a * a];
                if include_marital {
                    row.push(if r.is_married { 1.0 } else { 0.0 });
                }
                row
            })
            .collect();
        let p = if include_marital { 6 } else { 5 };
        let adjusted = DMatrix::from_row_iterator(n, p, rows.iter().flatten().copied());

        let with_child = respondents.iter().filter(|r| r.has_young_child()).count();
        let distinct_groups = usize::from(with_child > 0) + usize::from(with_child < n);

        Self {
            unadjusted,
            adjusted,
            weights: respondents.iter().map(|r| r.person_weight).collect(),
            distinct_groups,
        }
    }

    /// Number of columns in the adjusted design
    #[must_use]
    pub fn adjusted_columns(&self) -> usize {
        self.adjusted.ncols()
    }
}

/// Estimate one category from its hours, one value per respondent
///
/// # Errors
/// Returns an estimation error naming the category if only one comparison
/// group is present or either regression cannot be fit.
pub fn estimate_category(
    category: Category,
    hours: &[f64],
    designs: &Designs,
) -> Result<CategoryEstimate> {
    let name = category.display_name();
    if designs.distinct_groups < 2 {
        return Err(BalanceError::estimation(
            name,
            "fewer than 2 distinct values of the child indicator",
        ));
    }

    let fit = |x: &DMatrix<f64>, model: &str| -> Result<WlsFit> {
        fit_wls_hc3(x, hours, &designs.weights)
            .map_err(|e| BalanceError::estimation(name, format!("{model} model: {e}")))
    };

    let unadjusted = fit(&designs.unadjusted, "unadjusted")?;
    let adjusted = fit(&designs.adjusted, "adjusted")?;

    let missing = || BalanceError::estimation(name, "child coefficient missing from fit");
    let (intercept, intercept_se, _) = unadjusted.term(0).ok_or_else(missing)?;
    let (slope, slope_se, slope_p) = unadjusted.term(CHILD_COLUMN).ok_or_else(missing)?;
    let (adjusted_difference, adjusted_se, adjusted_p) =
        adjusted.term(CHILD_COLUMN).ok_or_else(missing)?;

    debug!(
        "{name}: intercept={intercept:.4} slope={slope:.4} (p={slope_p:.4}) adjusted={adjusted_difference:.4} (p={adjusted_p:.4})"
    );

    Ok(CategoryEstimate {
        category,
        mean_without_child: intercept,
        se_without_child: intercept_se,
        difference: slope,
        difference_se: slope_se,
        difference_p: slope_p,
        mean_with_child: intercept + slope,
        // Negative differences are rounding noise around zero
        se_with_child: (slope_se.powi(2) - intercept_se.powi(2)).max(0.0).sqrt(),
        adjusted_difference,
        adjusted_se,
        adjusted_p,
        n_obs: unadjusted.n_obs,
    })
}

/// Estimate every category of the grid, in category-encounter order
///
/// Categories are independent; with `config.parallel` they are fit on the
/// rayon pool and collected back in encounter order. The first failure
/// aborts the whole run.
pub fn estimate_categories(
    grid: &DurationGrid,
    config: &BalanceConfig,
) -> Result<Vec<CategoryEstimate>> {
    let designs = Designs::from_respondents(grid.respondents());
    let categories = grid.categories();
    let pb = create_category_progress_bar(categories.len() as u64, config.show_progress);

    let estimate = |&category: &Category| -> Result<CategoryEstimate> {
        let hours = grid.durations(category).ok_or_else(|| {
            BalanceError::estimation(category.display_name(), "category missing from grid")
        })?;
        let result = estimate_category(category, hours, &designs);
        pb.inc(1);
        result
    };

    let estimates = if config.parallel {
        categories.par_iter().map(estimate).collect::<Result<Vec<_>>>()
    } else {
        categories.iter().map(estimate).collect::<Result<Vec<_>>>()
    };

    finish_progress_bar(&pb, "estimated");
    let estimates = estimates?;
    info!(
        "Estimated {} categories on {} respondents",
        estimates.len(),
        grid.respondents().len()
    );
    Ok(estimates)
}
