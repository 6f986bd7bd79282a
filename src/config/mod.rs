//! Configuration for balance table generation.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BalanceError, Result};
use crate::error::util::safe_open_file;
use crate::utils::{DEFAULT_BATCH_SIZE, get_batch_size};

/// Sex code selecting female respondents in the survey extract
pub const SEX_FEMALE: i64 = 2;

/// Names of the input columns the pipeline reads
///
/// Defaults follow the IPUMS time-use extract dictionary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMap {
    /// Respondent identifier
    pub case_id: String,
    /// Survey person weight
    pub person_weight: String,
    /// Sex code
    pub sex: String,
    /// Marital status code
    pub marital_status: String,
    /// Age in years
    pub age: String,
    /// Count of own children under 1
    pub kids_under_1: String,
    /// Count of own children aged 1 to 2
    pub kids_1_to_2: String,
    /// Count of own children aged 3 to 5
    pub kids_3_to_5: String,
    /// Count of own children under 18
    pub kids_under_18: String,
    /// Activity classification code
    pub activity: String,
    /// Episode duration in minutes
    pub duration: String,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            case_id: "CASEID".to_string(),
            person_weight: "WT06".to_string(),
            sex: "SEX".to_string(),
            marital_status: "MARST".to_string(),
            age: "AGE".to_string(),
            kids_under_1: "KIDUND1".to_string(),
            kids_1_to_2: "KID1TO2".to_string(),
            kids_3_to_5: "KID3TO5".to_string(),
            kids_under_18: "KIDUND18".to_string(),
            activity: "ACTIVITY".to_string(),
            duration: "DURATION".to_string(),
        }
    }
}

impl ColumnMap {
    /// Load a column dictionary from a JSON file
    ///
    /// Keys that are not present keep their default column names.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let file = safe_open_file(path, "reading column dictionary")?;
        serde_json::from_reader(std::io::BufReader::new(file)).map_err(|e| {
            BalanceError::data_source(format!("invalid column dictionary: {e}")).with_path(path)
        })
    }

    /// All required column names, in the order the loader projects them
    #[must_use]
    pub fn required(&self) -> [&str; 11] {
        [
            self.case_id.as_str(),
            self.person_weight.as_str(),
            self.sex.as_str(),
            self.marital_status.as_str(),
            self.age.as_str(),
            self.kids_under_1.as_str(),
            self.kids_1_to_2.as_str(),
            self.kids_3_to_5.as_str(),
            self.kids_under_18.as_str(),
            self.activity.as_str(),
            self.duration.as_str(),
        ]
    }
}

/// Configuration for a balance table run
#[derive(Debug, Clone)]
pub struct BalanceConfig {
    /// Sex code respondents must carry to be included
    pub sex: i64,
    /// Input column dictionary
    pub columns: ColumnMap,
    /// Estimate categories in parallel
    pub parallel: bool,
    /// Show a progress bar while estimating
    pub show_progress: bool,
    /// Rows per record batch when reading input
    pub batch_size: usize,
}

impl Default for BalanceConfig {
    fn default() -> Self {
        Self {
            sex: SEX_FEMALE,
            columns: ColumnMap::default(),
            parallel: true,
            show_progress: false,
            batch_size: get_batch_size().unwrap_or(DEFAULT_BATCH_SIZE),
        }
    }
}

impl BalanceConfig {
    /// Create a configuration with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sex code to select
    #[must_use]
    pub const fn with_sex(mut self, sex: i64) -> Self {
        self.sex = sex;
        self
    }

    /// Set the input column dictionary
    #[must_use]
    pub fn with_columns(mut self, columns: ColumnMap) -> Self {
        self.columns = columns;
        self
    }

    /// Enable or disable parallel per-category estimation
    #[must_use]
    pub const fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Enable or disable the estimation progress bar
    #[must_use]
    pub const fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Set the reader batch size
    #[must_use]
    pub const fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }
}
