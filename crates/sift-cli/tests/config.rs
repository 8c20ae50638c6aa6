use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

#[test]
fn test_config_path_uses_sift_home() {
    let dir = TempDir::new().unwrap();
    let expected = dir.path().join("config.toml");

    cargo_bin_cmd!("sift")
        .env("SIFT_HOME", dir.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(expected.to_string_lossy().as_ref()));
}

#[test]
fn test_config_init_writes_default_config() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("config.toml");

    cargo_bin_cmd!("sift")
        .env("SIFT_HOME", dir.path())
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created config at"));

    let contents = std::fs::read_to_string(&config_path).unwrap();
    assert!(contents.contains("[reveal]"));
    assert!(contents.contains("[scroll]"));
}

#[test]
fn test_config_init_refuses_to_overwrite() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("config.toml");
    std::fs::write(&config_path, "# mine\n").unwrap();

    cargo_bin_cmd!("sift")
        .env("SIFT_HOME", dir.path())
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    assert_eq!(std::fs::read_to_string(&config_path).unwrap(), "# mine\n");
}

#[test]
fn test_invalid_config_is_reported() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("config.toml"), "[reveal\n").unwrap();

    cargo_bin_cmd!("sift")
        .env("SIFT_HOME", dir.path())
        .args(["config", "path"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config"));
}
