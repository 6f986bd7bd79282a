//! Weighted least squares with HC3 robust covariance.
//!
//! Rows are scaled by √w and the scaled system is solved through a thin QR
//! decomposition, which also yields the leverages `hᵢ = ‖Qᵢ‖²` needed by the
//! HC3 sandwich
//!
//! `V = (X'WX)⁻¹ [Σᵢ x̃ᵢ x̃ᵢ' ẽᵢ² / (1 − hᵢ)²] (X'WX)⁻¹`
//!
//! where `x̃ᵢ = √wᵢ xᵢ` and `ẽᵢ = √wᵢ (yᵢ − xᵢ'β)`.
//!
//! p-values are two-sided and use the normal reference distribution, the
//! usual convention for robust covariance.
//!
//! # References
//!
//! - MacKinnon & White (1985), "Some heteroskedasticity-consistent covariance
//!   matrix estimators with improved finite sample properties."

use nalgebra::{DMatrix, DVector};
use statrs::function::erf::erfc;

/// Leverage above which an observation is treated as fitted exactly
const LEVERAGE_LIMIT: f64 = 1.0 - 1e-10;

/// Reasons a weighted regression cannot be fit
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FitError {
    /// Inputs disagree on the number of observations
    #[error("design has {rows} rows but {outcomes} outcomes and {weights} weights")]
    DimensionMismatch {
        /// Design rows
        rows: usize,
        /// Outcome values
        outcomes: usize,
        /// Weights
        weights: usize,
    },

    /// Fewer observations than parameters
    #[error("{observations} observations cannot identify {parameters} parameters")]
    Underdetermined {
        /// Observations
        observations: usize,
        /// Parameters
        parameters: usize,
    },

    /// A weight is zero, negative or not finite
    #[error("weight {0} at row {1} is not finite and positive")]
    InvalidWeight(f64, usize),

    /// The weighted design matrix is rank deficient
    #[error("weighted design matrix is singular")]
    Singular,

    /// An observation has leverage one, so its HC3 term is undefined
    #[error("observation {0} has leverage 1; HC3 covariance is undefined")]
    UnitLeverage(usize),
}

/// Result of a weighted least squares fit
#[derive(Debug, Clone, PartialEq)]
pub struct WlsFit {
    /// Coefficient estimates, one per design column
    pub coefficients: Vec<f64>,
    /// HC3 standard errors
    pub standard_errors: Vec<f64>,
    /// Two-sided p-values from the normal reference distribution
    pub p_values: Vec<f64>,
    /// Number of observations
    pub n_obs: usize,
}

impl WlsFit {
    /// Coefficient, standard error and p-value of design column `j`
    #[must_use]
    pub fn term(&self, j: usize) -> Option<(f64, f64, f64)> {
        Some((
            *self.coefficients.get(j)?,
            *self.standard_errors.get(j)?,
            *self.p_values.get(j)?,
        ))
    }
}

/// Two-sided normal p-value for a coefficient and its standard error
#[must_use]
pub fn two_sided_p_value(coefficient: f64, standard_error: f64) -> f64 {
    let z = coefficient / standard_error;
    erfc(z.abs() / std::f64::consts::SQRT_2)
}

/// Fit `y` on the columns of `x` by weighted least squares with HC3 errors
///
/// # Arguments
/// * `x` - Design matrix, one row per observation (include an intercept column)
/// * `y` - Outcome values
/// * `weights` - Observation weights
pub fn fit_wls_hc3(x: &DMatrix<f64>, y: &[f64], weights: &[f64]) -> Result<WlsFit, FitError> {
    let n = x.nrows();
    let p = x.ncols();

    if y.len() != n || weights.len() != n {
        return Err(FitError::DimensionMismatch {
            rows: n,
            outcomes: y.len(),
            weights: weights.len(),
        });
    }
    if n < p || p == 0 {
        return Err(FitError::Underdetermined {
            observations: n,
            parameters: p,
        });
    }
    if let Some((i, &w)) = weights
        .iter()
        .enumerate()
        .find(|(_, w)| !(w.is_finite() && **w > 0.0))
    {
        return Err(FitError::InvalidWeight(w, i));
    }

    let sqrt_w: Vec<f64> = weights.iter().map(|w| w.sqrt()).collect();
    let xw = DMatrix::from_fn(n, p, |i, j| x[(i, j)] * sqrt_w[i]);
    let yw = DVector::from_iterator(n, y.iter().zip(&sqrt_w).map(|(v, s)| v * s));

    let qr = xw.clone().qr();
    let q = qr.q();
    let r = qr.r();

    // Rank check on the R diagonal, relative to its largest entry
    let max_diag = (0..p).map(|j| r[(j, j)].abs()).fold(0.0_f64, f64::max);
    let tol = max_diag * n.max(p) as f64 * f64::EPSILON;
    if max_diag == 0.0 || (0..p).any(|j| r[(j, j)].abs() <= tol) {
        return Err(FitError::Singular);
    }

    let r_inv = r
        .solve_upper_triangular(&DMatrix::identity(p, p))
        .ok_or(FitError::Singular)?;
    let beta = &r_inv * (q.transpose() * &yw);
    let residuals = &yw - &xw * &beta;

    // (X'WX)^{-1} = R^{-1} R^{-T}
    let xtx_inv = &r_inv * r_inv.transpose();

    let mut scales = Vec::with_capacity(n);
    for i in 0..n {
        let leverage = q.row(i).norm_squared();
        if leverage >= LEVERAGE_LIMIT {
            return Err(FitError::UnitLeverage(i));
        }
        scales.push(residuals[i] / (1.0 - leverage));
    }
    let scaled = DMatrix::from_fn(n, p, |i, j| xw[(i, j)] * scales[i]);
    let meat = scaled.transpose() * &scaled;
    let covariance = &xtx_inv * meat * &xtx_inv;

    let coefficients: Vec<f64> = beta.iter().copied().collect();
    let standard_errors: Vec<f64> = (0..p)
        .map(|j| covariance[(j, j)].max(0.0).sqrt())
        .collect();
    let p_values = coefficients
        .iter()
        .zip(&standard_errors)
        .map(|(&b, &se)| two_sided_p_value(b, se))
        .collect();

    Ok(WlsFit {
        coefficients,
        standard_errors,
        p_values,
        n_obs: n,
    })
}
