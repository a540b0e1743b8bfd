//! Integration tests for the betting settlement CLI.
//!
//! These tests run the actual binary and verify output against expected text files.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

/// Get path to test data file
fn test_data_path(filename: &str) -> String {
    format!("tests/data/{}", filename)
}

/// Run the binary with the given input file and return stdout
fn run_settlement(input_file: &str) -> String {
    let mut cmd = Command::cargo_bin("betting-settlement").unwrap();
    let assert = cmd.arg(input_file).assert().success();
    String::from_utf8(assert.get_output().stdout.clone()).unwrap()
}

/// Normalize text for comparison (trim line endings and surrounding blank lines)
fn normalize(text: &str) -> Vec<String> {
    text.trim()
        .lines()
        .map(|l| l.trim_end().to_string())
        .collect()
}

fn assert_matches_expected(sample: &str, expected: &str) {
    let output = run_settlement(&test_data_path(sample));
    let expected = fs::read_to_string(test_data_path(expected)).unwrap();

    assert_eq!(normalize(&output), normalize(&expected));
}

#[test]
fn test_sample_a_single_winner() {
    assert_matches_expected("sample_a.csv", "expected_a.txt");
}

#[test]
fn test_sample_b_rounds_cancel_out() {
    let output = run_settlement(&test_data_path("sample_b_even.csv"));
    assert_eq!(output.trim(), "No transfers required.");
}

#[test]
fn test_sample_c_whitespace_handling() {
    assert_matches_expected("sample_c_whitespace.csv", "expected_c.txt");
}

#[test]
fn test_sample_d_edge_cases() {
    assert_matches_expected("sample_d_edge_cases.csv", "expected_d.txt");
}

#[test]
fn test_missing_file_error() {
    let mut cmd = Command::cargo_bin("betting-settlement").unwrap();
    cmd.arg("nonexistent.csv")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_missing_argument_error() {
    let mut cmd = Command::cargo_bin("betting-settlement").unwrap();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Missing input file"));
}

#[test]
fn test_too_few_players_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("solo.csv");
    fs::write(&path, "round,winner,loser,amount\n1,Ann,Ann,10\n").unwrap();

    let mut cmd = Command::cargo_bin("betting-settlement").unwrap();
    cmd.arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("At least 2 players"));
}

#[test]
fn test_output_uses_thousands_separators() {
    let output = run_settlement(&test_data_path("sample_d_edge_cases.csv"));
    assert!(output.contains("1,500,000"));
    assert!(!output.contains("1500000"));
}
