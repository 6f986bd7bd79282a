//! Significance markers and display formatting for table cells.

use std::fmt;

use crate::error::{BalanceError, Result};

/// Decimal places of every numeric table cell
pub const DECIMALS: usize = 3;

/// Significance level a p-value crosses
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SignificanceLevel {
    /// p ≥ .10
    NotSignificant,
    /// p < .10
    TenPercent,
    /// p < .05
    FivePercent,
    /// p < .01
    OnePercent,
}

impl SignificanceLevel {
    /// Classify a p-value; NaN is not significant
    #[must_use]
    pub fn from_p_value(p: f64) -> Self {
        if p < 0.01 {
            Self::OnePercent
        } else if p < 0.05 {
            Self::FivePercent
        } else if p < 0.10 {
            Self::TenPercent
        } else {
            Self::NotSignificant
        }
    }

    /// Marker appended to a coefficient at this level
    #[must_use]
    pub const fn stars(self) -> &'static str {
        match self {
            Self::NotSignificant => "",
            Self::TenPercent => "*",
            Self::FivePercent => "**",
            Self::OnePercent => "***",
        }
    }
}

impl fmt::Display for SignificanceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.stars())
    }
}

/// Append the significance marker for `p` to an already formatted coefficient
#[must_use]
pub fn star_p(p: f64, coefficient: &str) -> String {
    format!("{coefficient}{}", SignificanceLevel::from_p_value(p))
}

/// Format a value to three decimals
///
/// # Errors
/// Returns a format error naming `quantity` if the value is not finite.
pub fn format_value(value: f64, quantity: &str) -> Result<String> {
    if !value.is_finite() {
        return Err(BalanceError::Format {
            quantity: quantity.to_string(),
            value,
        });
    }
    Ok(format!("{value:.prec$}", prec = DECIMALS))
}

/// Format a coefficient to three decimals with its significance marker
pub fn format_coefficient(value: f64, p: f64, quantity: &str) -> Result<String> {
    Ok(star_p(p, &format_value(value, quantity)?))
}

/// Format a standard error to three decimals, wrapped in parentheses
pub fn format_standard_error(value: f64, quantity: &str) -> Result<String> {
    Ok(format!("({})", format_value(value, quantity)?))
}
