use atus_balance::algorithm::balance::RowKind;
use atus_balance::error::BalanceError;
use atus_balance::{
    BalanceConfig, DiaryRecord, OutputFormat, aggregate_durations, classify_respondents,
    load_diary_records, pipeline,
};
use proptest::prelude::*;

use crate::utils::{
    expected_category_order, synthetic_respondents, weighted_mean_hours, write_csv,
};

const FEMALE: i64 = 2;

#[test]
fn test_end_to_end_table_shape() {
    let dir = tempfile::tempdir().unwrap();
    let respondents = synthetic_respondents(120, 42);
    let csv = write_csv(&dir.path().join("extract.csv"), &respondents);

    let outcome = pipeline::run(&csv, &BalanceConfig::new()).unwrap();
    let order = expected_category_order(&respondents, FEMALE);

    assert_eq!(outcome.table.rows.len(), 2 * order.len() + 1);
    let labels: Vec<&str> = outcome.table.category_labels().collect();
    let expected: Vec<&str> = order.iter().map(|c| c.display_name()).collect();
    assert_eq!(labels, expected);

    for pair in outcome.table.rows[..2 * order.len()].chunks(2) {
        assert_eq!(pair[0].kind, RowKind::Mean);
        assert_eq!(pair[1].kind, RowKind::StandardError);
        assert_eq!(pair[0].label, pair[1].label);
        assert!(pair[1].cells.iter().all(|c| c.starts_with('(') && c.ends_with(')')));
    }

    let without = respondents
        .iter()
        .filter(|r| r.in_grid(FEMALE) && r.young_child() == Some(false))
        .count();
    let with = respondents
        .iter()
        .filter(|r| r.in_grid(FEMALE) && r.young_child() == Some(true))
        .count();
    let n_row = outcome.table.rows.last().unwrap();
    assert_eq!(n_row.kind, RowKind::SampleSize);
    assert_eq!(n_row.label, "N");
    assert_eq!(
        n_row.cells,
        [without.to_string(), with.to_string(), "-".to_string(), "-".to_string()]
    );

    let ambiguous = respondents
        .iter()
        .filter(|r| r.sex == FEMALE && r.young_child().is_none() && !r.episodes.is_empty())
        .count();
    assert_eq!(outcome.ambiguity.count(), ambiguous);
}

#[test]
fn test_unadjusted_model_reproduces_weighted_group_means() {
    let dir = tempfile::tempdir().unwrap();
    let respondents = synthetic_respondents(90, 2024);
    let csv = write_csv(&dir.path().join("extract.csv"), &respondents);

    let outcome = pipeline::run(&csv, &BalanceConfig::new()).unwrap();
    for estimate in &outcome.estimates {
        let without = weighted_mean_hours(&respondents, FEMALE, estimate.category, false);
        let with = weighted_mean_hours(&respondents, FEMALE, estimate.category, true);
        assert!((estimate.mean_without_child - without).abs() < 1e-9);
        assert!((estimate.mean_with_child - with).abs() < 1e-9);
        assert!((estimate.difference - (with - without)).abs() < 1e-9);
        assert!(estimate.se_with_child >= 0.0);
        assert!(estimate.adjusted_se > 0.0);
    }
}

#[test]
fn test_grid_hours_match_classified_minutes() {
    let dir = tempfile::tempdir().unwrap();
    let respondents = synthetic_respondents(60, 99);
    let csv = write_csv(&dir.path().join("extract.csv"), &respondents);

    let records = load_diary_records(&csv, &BalanceConfig::new()).unwrap();
    let grid = aggregate_durations(&records, &classify_respondents(&records));

    for r in respondents.iter().filter(|r| r.in_grid(FEMALE)) {
        let minutes: i64 = grid
            .categories()
            .iter()
            .map(|&c| r.category_minutes(c))
            .sum();
        let total = grid.total_hours(&r.case_id.to_string()).unwrap();
        assert!((total * 60.0 - minutes as f64).abs() < 1e-9);
    }
    let expected_cells = grid.respondents().len() * grid.categories().len();
    assert_eq!(grid.cells().count(), expected_cells);
}

#[test]
fn test_repeated_runs_are_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let respondents = synthetic_respondents(90, 1);
    let csv = write_csv(&dir.path().join("extract.csv"), &respondents);

    for format in [OutputFormat::Latex, OutputFormat::Csv, OutputFormat::Json] {
        let first = dir.path().join(format!("first.{format}"));
        let second = dir.path().join(format!("second.{format}"));
        pipeline::run_to_file(&csv, &first, format, &BalanceConfig::new()).unwrap();
        pipeline::run_to_file(
            &csv,
            &second,
            format,
            &BalanceConfig::new().with_parallel(false),
        )
        .unwrap();
        assert_eq!(
            std::fs::read(&first).unwrap(),
            std::fs::read(&second).unwrap()
        );
    }
}

#[test]
fn test_latex_document_layout() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_csv(&dir.path().join("extract.csv"), &synthetic_respondents(90, 8));
    let out = dir.path().join("balance.tex");
    pipeline::run_to_file(&csv, &out, OutputFormat::Latex, &BalanceConfig::new()).unwrap();

    let tex = std::fs::read_to_string(&out).unwrap();
    assert!(tex.starts_with("\\begin{tabular}{lllll}\n\\toprule\n"));
    assert!(tex.contains(
        "{} & Mean without kids & Mean with kids & Difference (hours) & Difference with controls \\\\"
    ));
    assert!(tex.contains("\nN & "));
    assert!(tex.ends_with("\\bottomrule\n\\end{tabular}\n"));
}

#[test]
fn test_failed_run_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    // Only childless respondents: the child indicator never varies
    let respondents: Vec<_> = synthetic_respondents(60, 5)
        .into_iter()
        .filter(|r| r.young_child() == Some(false))
        .collect();
    let csv = write_csv(&dir.path().join("extract.csv"), &respondents);
    let out = dir.path().join("balance.tex");

    let err = pipeline::run_to_file(&csv, &out, OutputFormat::Latex, &BalanceConfig::new())
        .unwrap_err();
    assert!(matches!(err, BalanceError::Estimation { .. }));
    assert!(!out.exists());
}

#[test]
fn test_missing_output_directory_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_csv(&dir.path().join("extract.csv"), &synthetic_respondents(90, 8));
    let out = dir.path().join("missing").join("balance.tex");

    let err = pipeline::run_to_file(&csv, &out, OutputFormat::Latex, &BalanceConfig::new())
        .unwrap_err();
    assert!(matches!(err, BalanceError::Io(_)));
}

fn arb_record() -> impl Strategy<Value = DiaryRecord> {
    (
        0..8usize,
        0..3i64,
        0..2i64,
        prop::sample::select(vec!["10101", "20101", "50101", "30101", "120303", "110101", "180101"]),
        0..600i64,
    )
        .prop_map(|(case, young, older, code, minutes)| DiaryRecord {
            case_id: case.to_string(),
            person_weight: 1.0 + case as f64,
            sex: FEMALE,
            marital_status: 1 + (case % 5) as i64,
            age: 20 + case as i64,
            kids_under_1: 0,
            kids_1_to_2: 0,
            kids_3_to_5: young,
            kids_under_18: young + older,
            activity_code: code.to_string(),
            duration_minutes: minutes,
        })
}

proptest! {
    #[test]
    fn prop_grid_is_complete_and_non_negative(records in prop::collection::vec(arb_record(), 0..60)) {
        let classified = classify_respondents(&records);
        let grid = aggregate_durations(&records, &classified);

        prop_assert_eq!(
            grid.cells().count(),
            grid.respondents().len() * grid.categories().len()
        );
        prop_assert!(grid.cells().all(|c| c.hours >= 0.0));
        prop_assert!(grid.respondents().iter().all(|r| classified.get(&r.case_id).is_some()));

        let sizes = grid.sample_sizes();
        prop_assert_eq!(sizes.without_child + sizes.with_child, grid.respondents().len());
    }
}
