use assert_cmd::Command;
use predicates::prelude::*;

use crate::utils::{synthetic_respondents, write_csv};

#[test]
fn test_cli_writes_table_and_echoes_arguments() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_csv(&dir.path().join("extract.csv"), &synthetic_respondents(90, 17));
    let out = dir.path().join("balance-female.tex");

    Command::cargo_bin("balance-analysis")
        .unwrap()
        .args(["-s", "2", "-i"])
        .arg(&csv)
        .arg("-o")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Sex is 2"))
        .stdout(predicate::str::contains("Mean without kids"))
        .stdout(predicate::str::contains("Difference with controls"));

    let tex = std::fs::read_to_string(&out).unwrap();
    assert!(tex.starts_with("\\begin{tabular}"));
}

#[test]
fn test_cli_format_flag_overrides_extension() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_csv(&dir.path().join("extract.csv"), &synthetic_respondents(90, 23));
    let out = dir.path().join("balance.out");

    Command::cargo_bin("balance-analysis")
        .unwrap()
        .arg("--ifile")
        .arg(&csv)
        .arg("--ofile")
        .arg(&out)
        .args(["--format", "json", "--no-parallel"])
        .assert()
        .success();

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(value["columns"][0], "Mean without kids");
}

#[test]
fn test_cli_reports_missing_input() {
    let dir = tempfile::tempdir().unwrap();

    Command::cargo_bin("balance-analysis")
        .unwrap()
        .arg("-i")
        .arg(dir.path().join("absent.csv"))
        .arg("-o")
        .arg(dir.path().join("balance.tex"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("absent.csv"));
}
