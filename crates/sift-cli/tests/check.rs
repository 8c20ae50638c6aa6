use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;

fn write_transcript(dir: &TempDir, value: &serde_json::Value) -> std::path::PathBuf {
    let path = dir.path().join("chat.json");
    std::fs::write(&path, serde_json::to_string_pretty(value).unwrap()).unwrap();
    path
}

#[test]
fn test_check_counts_messages_by_role() {
    let dir = TempDir::new().unwrap();
    let path = write_transcript(
        &dir,
        &json!([
            {"message": "find config loaders", "role": "user"},
            {"message": "Found **3** files", "role": "assistant"},
            {"message": "open the first", "role": "user", "disableAnimation": true},
        ]),
    );

    cargo_bin_cmd!("sift")
        .env("SIFT_HOME", dir.path())
        .args(["check", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("3 messages (2 user, 1 assistant)"));
}

#[test]
fn test_check_accepts_empty_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("chat.json");
    std::fs::write(&path, "").unwrap();

    cargo_bin_cmd!("sift")
        .env("SIFT_HOME", dir.path())
        .args(["check", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("0 messages"));
}

#[test]
fn test_check_notes_partial_keys() {
    let dir = TempDir::new().unwrap();
    let path = write_transcript(
        &dir,
        &json!([
            {"message": "hi", "role": "user", "key": "m1"},
            {"message": "hello", "role": "assistant"},
        ]),
    );

    cargo_bin_cmd!("sift")
        .env("SIFT_HOME", dir.path())
        .args(["check", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 of 2 messages carry a key"));
}

#[test]
fn test_check_rejects_unknown_role() {
    let dir = TempDir::new().unwrap();
    let path = write_transcript(&dir, &json!([{"message": "hi", "role": "system"}]));

    cargo_bin_cmd!("sift")
        .env("SIFT_HOME", dir.path())
        .args(["check", path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse transcript"));
}

#[test]
fn test_check_missing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing.json");

    cargo_bin_cmd!("sift")
        .env("SIFT_HOME", dir.path())
        .args(["check", path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read transcript"));
}
