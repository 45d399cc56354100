//! Integration tests for the kbcbe-statement CLI.
//!
//! These tests run the actual binary and verify output against expected CSV files.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

/// Get path to test data file
fn test_data_path(filename: &str) -> String {
    format!("tests/data/{}", filename)
}

/// Run the binary with the given input file and return stdout
fn run_parser(input_file: &str) -> String {
    let mut cmd = Command::cargo_bin("kbcbe-statement").unwrap();
    let assert = cmd.arg(input_file).assert().success();
    String::from_utf8(assert.get_output().stdout.clone()).unwrap()
}

/// Trim lines and drop blank ones; order is kept since it is part of the contract.
fn normalize_csv(csv: &str) -> Vec<String> {
    csv.lines()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect()
}

#[test]
fn test_sample_a_mixed_transactions() {
    let output = run_parser(&test_data_path("sample_a.csv"));
    let expected = fs::read_to_string(test_data_path("expected_a.csv")).unwrap();

    assert_eq!(normalize_csv(&output), normalize_csv(&expected));
}

#[test]
fn test_sample_d_whitespace_and_quoting() {
    let output = run_parser(&test_data_path("sample_d_whitespace.csv"));
    let expected = fs::read_to_string(test_data_path("expected_d.csv")).unwrap();

    assert_eq!(normalize_csv(&output), normalize_csv(&expected));
}

#[test]
fn test_currency_mismatch_fails_without_output() {
    let mut cmd = Command::cargo_bin("kbcbe-statement").unwrap();
    cmd.arg(test_data_path("sample_b_currency.csv"))
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Currency does not match"))
        .stderr(predicate::str::contains("Line 3 has USD but file started with EUR"));
}

#[test]
fn test_bad_savings_memo_fails() {
    let mut cmd = Command::cargo_bin("kbcbe-statement").unwrap();
    cmd.arg(test_data_path("sample_c_savings_bad.csv"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot parse savings info in line 2"))
        .stderr(predicate::str::contains(
            "(AUTOMATISCH SPAREN NAAR BE12 1234 5678 9012)",
        ));
}

#[test]
fn test_missing_file_error() {
    let mut cmd = Command::cargo_bin("kbcbe-statement").unwrap();
    cmd.arg("nonexistent.csv")
        .assert()
        .failure()
        .stderr(predicate::str::contains("I/O error"));
}

#[test]
fn test_missing_argument_error() {
    let mut cmd = Command::cargo_bin("kbcbe-statement").unwrap();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Missing input file"));
}

#[test]
fn test_output_has_correct_header() {
    let output = run_parser(&test_data_path("sample_a.csv"));
    assert!(output.starts_with("date,amount,payee,bank_account_to,memo"));
}
