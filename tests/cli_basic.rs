//! Integration tests for basic CLI behavior.
//!
//! Tests that the binary exists, accepts standard flags, each subcommand
//! responds to `--help`, and exit codes separate usage errors (2) from
//! processing failures (1) and empty-but-successful runs (0).

#![allow(deprecated)] // cargo_bin deprecation — replacement not yet stable

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::NamedTempFile;

/// Helper: get a Command for the `rowsift` binary.
fn rowsift() -> Command {
    let mut cmd = Command::cargo_bin("rowsift").expect("binary 'rowsift' should be built");
    // Keep the user's own config out of the picture
    cmd.env("XDG_CONFIG_HOME", std::env::temp_dir().join("rowsift-tests-no-config"));
    cmd.env("HOME", std::env::temp_dir().join("rowsift-tests-no-home"));
    cmd
}

fn json_file(content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".json")
        .tempfile()
        .expect("create temp file");
    file.write_all(content.as_bytes()).expect("write temp file");
    file
}

const RESULTS_DUMP: &str = r##"{"pages": [
  [
    {"text": "Results", "x": 260, "y": 700},
    {"text": "ALPHA", "x": 10, "y": 700},
    {"text": "DIVISION", "x": 60, "y": 700},
    {"text": "--", "x": 110, "y": 700},
    {"text": "Overall", "x": 140, "y": 700},
    {"text": "Stage", "x": 200, "y": 700.3},
    {"text": "Stage 1", "x": 10, "y": 680},
    {"text": "# PTS TIME", "x": 10, "y": 660},
    {"text": "1 71 8.27 8.5852 75.0000 100.00 118", "x": 10, "y": 640},
    {"text": "Wan, Chun Yin", "x": 300, "y": 639.8}
  ],
  [
    {"text": "2 75 9.04 8.2965 72.4772 96.64 62 Lam, Ho Yin", "x": 10, "y": 700}
  ]
]}"##;

// ─── Top-level flags ─────────────────────────────────────────────────────────

#[test]
fn help_flag_shows_usage() {
    rowsift()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: rowsift"))
        .stdout(predicate::str::contains("lines"))
        .stdout(predicate::str::contains("rows"))
        .stdout(predicate::str::contains("results"));
}

#[test]
fn version_flag_shows_semver() {
    rowsift()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^rowsift \d+\.\d+\.\d+\n$").unwrap());
}

#[test]
fn no_args_is_usage_error() {
    rowsift()
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Usage: rowsift"));
}

#[test]
fn missing_input_is_usage_error() {
    rowsift()
        .arg("lines")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("<INPUT>"));
}

#[test]
fn rows_help_lists_formats() {
    rowsift()
        .args(["rows", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--format"))
        .stdout(predicate::str::contains("jsonl"));
}

// ─── Runs ────────────────────────────────────────────────────────────────────

#[test]
fn unreadable_input_is_processing_failure() {
    rowsift()
        .args(["lines", "/nonexistent/fragments.json"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Fragment source unavailable"));
}

#[test]
fn corrupt_input_is_processing_failure() {
    let file = json_file("{ not json");
    rowsift()
        .arg("lines")
        .arg(file.path())
        .assert()
        .code(1);
}

#[test]
fn empty_document_succeeds_with_empty_output() {
    let file = json_file("[]");
    rowsift()
        .arg("lines")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn lines_prints_only_data_rows() {
    let file = json_file(RESULTS_DUMP);
    rowsift()
        .arg("lines")
        .arg(file.path())
        .assert()
        .success()
        .stdout(
            "1 71 8.27 8.5852 75.0000 100.00 118 Wan, Chun Yin\n\
             2 75 9.04 8.2965 72.4772 96.64 62 Lam, Ho Yin\n",
        );
}

#[test]
fn rows_jsonl_includes_context_updates() {
    let file = json_file(RESULTS_DUMP);
    let output = rowsift()
        .args(["rows", "--format", "jsonl"])
        .arg(file.path())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let records: Vec<serde_json::Value> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(records.len(), 4);
    assert_eq!(records[0]["type"], "context_update");
    assert_eq!(records[0]["value"], "ALPHA DIVISION");
    assert_eq!(records[1]["value"], "Stage 1");
    assert_eq!(records[3]["section"], "ALPHA DIVISION");
    assert_eq!(records[3]["stage"], "Stage 1");
    assert_eq!(records[3]["page"], 2);
}

#[test]
fn results_prints_csv() {
    let file = json_file(RESULTS_DUMP);
    rowsift()
        .arg("results")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "competitor_number,competitor_name,stage,division",
        ))
        .stdout(predicate::str::contains(
            "118,\"Wan, Chun Yin\",1,ALPHA DIVISION,71,8.27,8.5852,75.0000,100.00",
        ))
        .stdout(predicate::str::contains("62,\"Lam, Ho Yin\",1,ALPHA DIVISION"));
}

#[test]
fn null_coordinates_do_not_abort_the_run() {
    let file = json_file(
        r#"[{"text": "1 John", "x": null, "y": 700, "page": 1},
            {"text": "Smith", "x": 40, "y": null, "page": 1},
            {"text": "2 Jane Doe", "x": 0, "y": "n/a", "page": 2}]"#,
    );
    rowsift()
        .arg("lines")
        .arg(file.path())
        .assert()
        .success()
        .stdout("1 John\nSmith\n2 Jane Doe\n");
}

#[test]
fn huge_page_number_is_processing_failure() {
    let file = json_file(r#"[{"text": "x", "x": 1, "y": 1, "page": 1000000000}]"#);
    rowsift()
        .arg("lines")
        .arg(file.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("page limit"));
}

#[test]
fn invalid_line_pitch_fails() {
    let file = json_file("[]");
    rowsift()
        .args(["lines", "--line-pitch", "0"])
        .arg(file.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("line_pitch"));
}

#[test]
fn custom_rules_from_config() {
    let dump = json_file(
        r#"[{"text": "Heat 2", "x": 0, "y": 10, "page": 1},
            {"text": "4 Ann Lee 31.20", "x": 0, "y": 5, "page": 1}]"#,
    );
    let mut config = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    config
        .write_all(
            br#"
[[rules]]
name = "heat"
pattern = '^Heat\s+(\d+)'
action = "stage"
capture = 1
"#,
        )
        .unwrap();

    rowsift()
        .arg("--config")
        .arg(config.path())
        .args(["rows", "--format", "jsonl"])
        .arg(dump.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""value":"2""#))
        .stdout(predicate::str::contains(r#""stage":"2""#));
}
