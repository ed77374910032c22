#![cfg(unix)]

use assert_cmd::prelude::*;
use std::fs;
use std::os::unix::fs as unix_fs;
use std::process::Command;

#[test]
fn directory_walk_skips_symlinks() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let project = dir.path().join("project");
    fs::create_dir(&project)?;
    fs::write(project.join("A.java"), "class A {}")?;
    let outside = dir.path().join("Outside.java");
    fs::write(&outside, "class Outside {}")?;
    unix_fs::symlink(&outside, project.join("Link.java"))?;

    let output = Command::cargo_bin("arranger")?
        .env("HOME", dir.path())
        .arg("entries")
        .arg(&project)
        .args(["--format", "json", "--quiet"])
        .output()?;
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    let files: Vec<&str> = json
        .as_array()
        .map(|reports| reports.iter().filter_map(|r| r["file"].as_str()).collect())
        .unwrap_or_default();
    assert_eq!(files.len(), 1);
    assert!(files[0].ends_with("A.java"));
    Ok(())
}
