use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, Int64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use atus_balance::{Category, classify_activity};
use parquet::arrow::ArrowWriter;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Column header of the default IPUMS extract layout
pub const HEADER: [&str; 11] = [
    "CASEID", "WT06", "SEX", "MARST", "AGE", "KIDUND1", "KID1TO2", "KID3TO5", "KIDUND18",
    "ACTIVITY", "DURATION",
];

/// Activity codes drawn for each category
pub const CATEGORY_CODES: [(Category, &[&str]); 6] = [
    (Category::Sleeping, &["10101", "10102"]),
    (Category::Housework, &["20101", "20102"]),
    (Category::Working, &["50101", "50201"]),
    (Category::Childcare, &["30101", "30201", "30301"]),
    (Category::Television, &["120303", "120304"]),
    (Category::EatingAndDrinking, &["110101", "110201"]),
];

/// Travel code that no category claims
pub const UNCLASSIFIED_CODE: &str = "180101";

/// A respondent of a synthetic extract with their diary episodes
#[derive(Debug, Clone)]
pub struct SyntheticRespondent {
    pub case_id: i64,
    pub weight: f64,
    pub sex: i64,
    pub marital_status: i64,
    pub age: i64,
    /// Under 1, 1 to 2, 3 to 5, under 18
    pub kids: [i64; 4],
    /// (activity code, minutes) in diary order
    pub episodes: Vec<(String, i64)>,
}

impl SyntheticRespondent {
    /// `Some(true)` with a young child, `Some(false)` childless, `None` otherwise
    #[must_use]
    pub fn young_child(&self) -> Option<bool> {
        if self.kids[..3].iter().any(|&k| k > 0) {
            Some(true)
        } else if self.kids[3] == 0 {
            Some(false)
        } else {
            None
        }
    }

    /// Minutes per category over the respondent's classified episodes
    #[must_use]
    pub fn category_minutes(&self, category: Category) -> i64 {
        self.episodes
            .iter()
            .filter(|(code, _)| classify_activity(code) == Some(category))
            .map(|(_, minutes)| minutes)
            .sum()
    }

    /// Whether any episode falls in a category
    #[must_use]
    pub fn has_classified_episode(&self) -> bool {
        self.episodes
            .iter()
            .any(|(code, _)| classify_activity(code).is_some())
    }

    /// Whether the respondent reaches the duration grid for a given sex
    #[must_use]
    pub fn in_grid(&self, sex: i64) -> bool {
        self.sex == sex && self.young_child().is_some() && self.has_classified_episode()
    }
}

/// Generate a reproducible extract of `n` respondents
///
/// Group membership cycles with the case index, so every extract of six or
/// more respondents has both sexes and all three child situations.
#[must_use]
pub fn synthetic_respondents(n: usize, seed: u64) -> Vec<SyntheticRespondent> {
    let mut rng = StdRng::seed_from_u64(seed);

    (0..n)
        .map(|i| {
            let kids = match i % 3 {
                0 => [0, 0, 0, 0],
                1 => {
                    let mut kids = [0, 0, 0, 0];
                    kids[rng.random_range(0..3)] = 1;
                    kids[3] = 1 + rng.random_range(0..2);
                    kids
                }
                _ => [0, 0, 0, 1 + rng.random_range(0..3)],
            };

            let offset = rng.random_range(0..CATEGORY_CODES.len());
            let mut episodes = Vec::new();
            for k in 0..CATEGORY_CODES.len() {
                let (_, codes) = CATEGORY_CODES[(k + offset) % CATEGORY_CODES.len()];
                if i < 12 || rng.random_bool(0.8) {
                    let code = codes[rng.random_range(0..codes.len())];
                    episodes.push((code.to_string(), rng.random_range(15..=600)));
                }
                if rng.random_bool(0.2) {
                    episodes.push((UNCLASSIFIED_CODE.to_string(), rng.random_range(5..=90)));
                }
            }

            SyntheticRespondent {
                case_id: 20_030_100_013_000 + i as i64,
                weight: rng.random_range(500.0..5000.0),
                sex: 1 + (i % 2) as i64,
                marital_status: if rng.random_bool(0.5) { 1 } else { 1 + rng.random_range(2..6) },
                age: rng.random_range(18..=64),
                kids,
                episodes,
            }
        })
        .collect()
}

/// Write an extract as CSV with the default IPUMS header
pub fn write_csv(path: &Path, respondents: &[SyntheticRespondent]) -> PathBuf {
    write_csv_with_header(path, respondents, &HEADER)
}

/// Write an extract as CSV with custom column names
pub fn write_csv_with_header(
    path: &Path,
    respondents: &[SyntheticRespondent],
    header: &[&str; 11],
) -> PathBuf {
    let mut file = File::create(path).expect("create CSV");
    writeln!(file, "{}", header.join(",")).expect("write header");
    for r in respondents {
        for (code, minutes) in &r.episodes {
            writeln!(
                file,
                "{},{},{},{},{},{},{},{},{},{},{}",
                r.case_id,
                r.weight,
                r.sex,
                r.marital_status,
                r.age,
                r.kids[0],
                r.kids[1],
                r.kids[2],
                r.kids[3],
                code,
                minutes
            )
            .expect("write row");
        }
    }
    path.to_path_buf()
}

/// Write an extract as Parquet with integer identifiers and codes
pub fn write_parquet(path: &Path, respondents: &[SyntheticRespondent]) -> PathBuf {
    let rows: Vec<(&SyntheticRespondent, &(String, i64))> = respondents
        .iter()
        .flat_map(|r| r.episodes.iter().map(move |e| (r, e)))
        .collect();
    let int_column = |f: &dyn Fn(&SyntheticRespondent, &(String, i64)) -> i64| -> ArrayRef {
        Arc::new(Int64Array::from_iter_values(rows.iter().map(|(r, e)| f(r, e))))
    };

    let fields: Vec<Field> = HEADER
        .iter()
        .map(|name| {
            let data_type = if *name == "WT06" {
                DataType::Float64
            } else {
                DataType::Int64
            };
            Field::new(*name, data_type, false)
        })
        .collect();
    let columns: Vec<ArrayRef> = vec![
        int_column(&|r, _| r.case_id),
        Arc::new(Float64Array::from_iter_values(rows.iter().map(|(r, _)| r.weight))),
        int_column(&|r, _| r.sex),
        int_column(&|r, _| r.marital_status),
        int_column(&|r, _| r.age),
        int_column(&|r, _| r.kids[0]),
        int_column(&|r, _| r.kids[1]),
        int_column(&|r, _| r.kids[2]),
        int_column(&|r, _| r.kids[3]),
        int_column(&|_, e| e.0.parse().expect("numeric code")),
        int_column(&|_, e| e.1),
    ];
    let schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new(Arc::clone(&schema), columns).expect("build batch");

    let file = File::create(path).expect("create Parquet");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Parquet writer");
    writer.write(&batch).expect("write batch");
    writer.close().expect("close writer");
    path.to_path_buf()
}

/// Categories in the order their first classified episode appears for `sex`
#[must_use]
pub fn expected_category_order(respondents: &[SyntheticRespondent], sex: i64) -> Vec<Category> {
    let mut order = Vec::new();
    for r in respondents.iter().filter(|r| r.in_grid(sex)) {
        for (code, _) in &r.episodes {
            if let Some(category) = classify_activity(code) {
                if !order.contains(&category) {
                    order.push(category);
                }
            }
        }
    }
    order
}

/// Weighted mean hours of a category within one comparison group
#[must_use]
pub fn weighted_mean_hours(
    respondents: &[SyntheticRespondent],
    sex: i64,
    category: Category,
    young_child: bool,
) -> f64 {
    let (total, weight) = respondents
        .iter()
        .filter(|r| r.in_grid(sex) && r.young_child() == Some(young_child))
        .fold((0.0, 0.0), |(total, weight), r| {
            let hours = r.category_minutes(category) as f64 / 60.0;
            (total + r.weight * hours, weight + r.weight)
        });
    total / weight
}
