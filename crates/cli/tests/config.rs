use assert_cmd::prelude::*;
use predicates::str::contains;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

#[test]
fn init_writes_defaults_once() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempdir()?;
    let path = tmp
        .path()
        .join(".config")
        .join("arranger")
        .join("config.toml");

    Command::cargo_bin("arranger")?
        .env("HOME", tmp.path())
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(contains("Wrote"));
    let content = fs::read_to_string(&path)?;
    assert!(content.contains("[arrangement]"));
    assert!(content.contains("snap_to_lines = true"));
    assert!(content.contains("format = \"text\""));

    Command::cargo_bin("arranger")?
        .env("HOME", tmp.path())
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(contains("--force"));

    Command::cargo_bin("arranger")?
        .env("HOME", tmp.path())
        .args(["config", "init", "--force"])
        .assert()
        .success();
    Ok(())
}

#[test]
fn show_prints_the_effective_config() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempdir()?;
    let dir = tmp.path().join(".config").join("arranger");
    fs::create_dir_all(&dir)?;
    fs::write(
        dir.join("config.toml"),
        "[arrangement]\ngrouping_rules = [\"dependent-methods\"]\n",
    )?;

    Command::cargo_bin("arranger")?
        .env("HOME", tmp.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(contains("dependent-methods"))
        .stdout(contains("snap_to_lines = true"))
        .stdout(contains("format = \"text\""));
    Ok(())
}

#[test]
fn broken_config_is_reported() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempdir()?;
    let dir = tmp.path().join(".config").join("arranger");
    fs::create_dir_all(&dir)?;
    fs::write(dir.join("config.toml"), "[arrangement\n")?;
    let file = tmp.path().join("A.java");
    fs::write(&file, "class A {}")?;

    Command::cargo_bin("arranger")?
        .env("HOME", tmp.path())
        .arg("entries")
        .arg(&file)
        .assert()
        .failure()
        .stderr(contains("failed to load configuration"));
    Ok(())
}
