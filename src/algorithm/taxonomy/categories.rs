//! Outcome categories for the balance table
//!
//! This module defines the fixed set of time-use outcomes compared between
//! respondents with and without a young child.

use std::fmt;

/// Time-use outcome categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// Sleeping, including sleeplessness
    Sleeping,
    /// Housework (interior cleaning, laundry, storage)
    Housework,
    /// Work and work-related activities
    Working,
    /// Caring for and helping household members
    Childcare,
    /// Watching television
    Television,
    /// Eating and drinking
    EatingAndDrinking,
}

impl Category {
    /// Get the display name for this category
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Sleeping => "Sleeping",
            Self::Housework => "Housework",
            Self::Working => "Working",
            Self::Childcare => "Childcare",
            Self::Television => "Television",
            Self::EatingAndDrinking => "Eating and drinking",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
