//! End-to-end tests for the retrofit binary.
//!
//! Runs the real binary over temporary files and checks what it writes.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

fn setup() -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    fs::write(dir.path().join("vectors.txt"), "3 2\nA 1 0\nB 0 1\nC 1 1\n")
        .expect("Failed to write vectors");
    fs::write(dir.path().join("lexicon.txt"), "A B\nC\nA unknown\n")
        .expect("Failed to write lexicon");
    dir
}

fn parse_output(text: &str) -> Vec<(String, Vec<f64>)> {
    text.lines()
        .map(|line| {
            let mut parts = line.split_whitespace();
            let word = parts.next().unwrap().to_string();
            let values = parts.map(|p| p.parse().unwrap()).collect();
            (word, values)
        })
        .collect()
}

#[test]
fn test_help_lists_commands() {
    let mut cmd = Command::cargo_bin("retrofit").unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("run").and(predicate::str::contains("lexicon")));
}

#[test]
fn test_run_end_to_end() {
    let dir = setup();
    let out = dir.path().join("out.txt");

    let mut cmd = Command::cargo_bin("retrofit").unwrap();
    cmd.current_dir(dir.path())
        .args(["run", "-i", "vectors.txt", "-l", "lexicon.txt", "-o"])
        .arg(&out)
        .args(["-n", "1"]);
    cmd.assert().success();

    let rows = parse_output(&fs::read_to_string(&out).unwrap());
    let words: Vec<&str> = rows.iter().map(|(w, _)| w.as_str()).collect();
    assert_eq!(words, vec!["A", "B", "C"]);

    // A after one pass: (A + B) / 2 with A, B normalized
    assert_eq!(rows[0].1, vec![0.5, 0.5]);
    // C is not in the lexicon graph
    assert_eq!(rows[2].1, vec![0.7071, 0.7071]);
}

#[test]
fn test_run_zero_iterations_writes_normalized_input() {
    let dir = setup();
    let out = dir.path().join("out.txt");

    let mut cmd = Command::cargo_bin("retrofit").unwrap();
    cmd.current_dir(dir.path())
        .args(["-q", "run", "-i", "vectors.txt", "-l", "lexicon.txt", "-o"])
        .arg(&out)
        .args(["-n", "0"]);
    cmd.assert().success();

    let text = fs::read_to_string(&out).unwrap();
    assert_eq!(text, "A 1.0000 0.0000\nB 0.0000 1.0000\nC 0.7071 0.7071\n");
}

#[test]
fn test_run_with_config_file() {
    let dir = setup();
    let out = dir.path().join("out.txt");
    fs::write(
        dir.path().join("retrofit.toml"),
        "iterations = 0\nprecision = 2\nwrite_header = true\n",
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("retrofit").unwrap();
    cmd.current_dir(dir.path())
        .args(["run", "-i", "vectors.txt", "-l", "lexicon.txt", "-c", "retrofit.toml", "-o"])
        .arg(&out);
    cmd.assert().success();

    let text = fs::read_to_string(&out).unwrap();
    assert_eq!(text, "3 2\nA 1.00 0.00\nB 0.00 1.00\nC 0.71 0.71\n");
}

#[test]
fn test_run_missing_vectors_fails() {
    let dir = setup();

    let mut cmd = Command::cargo_bin("retrofit").unwrap();
    cmd.current_dir(dir.path())
        .args(["run", "-i", "missing.txt", "-l", "lexicon.txt", "-o", "out.txt"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read vectors"));
    assert!(!dir.path().join("out.txt").exists());
}

#[test]
fn test_run_dimension_mismatch_fails() {
    let dir = setup();
    fs::write(dir.path().join("bad.txt"), "A 1 0\nB 0 1 0\n").unwrap();

    let mut cmd = Command::cargo_bin("retrofit").unwrap();
    cmd.current_dir(dir.path())
        .args(["run", "-i", "bad.txt", "-l", "lexicon.txt", "-o", "out.txt"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Dimension mismatch at line 2"));
}

#[test]
fn test_run_negative_iterations_rejected() {
    let dir = setup();

    let mut cmd = Command::cargo_bin("retrofit").unwrap();
    cmd.current_dir(dir.path()).args([
        "run", "-i", "vectors.txt", "-l", "lexicon.txt", "-o", "out.txt", "-n", "-3",
    ]);
    cmd.assert().failure();
}

#[test]
fn test_lexicon_command() {
    let dir = setup();
    fs::write(dir.path().join("names.txt"), "Tokyo 1 0\nOsaka 0 1\n").unwrap();
    fs::write(
        dir.path().join("dump.xml"),
        "<page>\n<title>Tokyo</title>\n<text>[[Category:Cities]]</text>\n</page>\n\
         <page>\n<title>Osaka</title>\n<text>[[Category:Cities]]</text>\n</page>\n",
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("retrofit").unwrap();
    cmd.current_dir(dir.path()).args([
        "lexicon", "--dump", "dump.xml", "--vectors", "names.txt", "-o", "cats.txt",
    ]);
    cmd.assert().success();

    let text = fs::read_to_string(dir.path().join("cats.txt")).unwrap();
    assert_eq!(text, "Tokyo Osaka\n");
}

#[test]
fn test_completions() {
    let mut cmd = Command::cargo_bin("retrofit").unwrap();
    cmd.args(["completions", "bash"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("retrofit"));
}
