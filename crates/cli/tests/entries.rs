use assert_cmd::prelude::*;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;

const SHAPES: &str = "class Shape {
    private int sides;
    public int getSides() { return sides; }
    public void setSides(int v) { sides = v; }
    void draw() { getSides(); }
}
";

fn arranger(home: &Path) -> Result<Command, Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("arranger")?;
    cmd.env("HOME", home).env("APPDATA", home);
    Ok(cmd)
}

fn json_stdout(cmd: &mut Command) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
    let output = cmd.output()?;
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    Ok(serde_json::from_slice(&output.stdout)?)
}

fn entry_names(report: &serde_json::Value) -> Vec<String> {
    report["entries"]
        .as_array()
        .map(|entries| {
            entries
                .iter()
                .filter_map(|e| e["name"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

#[test]
fn json_output_lists_entries() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempdir()?;
    let file = tmp.path().join("Shape.java");
    fs::write(&file, SHAPES)?;

    let json = json_stdout(
        arranger(tmp.path())?
            .arg("entries")
            .arg(&file)
            .args(["--format", "json", "--quiet"]),
    )?;
    let reports = json.as_array().expect("array of reports");
    assert_eq!(reports.len(), 1);
    assert_eq!(
        entry_names(&reports[0]),
        vec!["Shape", "sides", "getSides", "setSides", "draw"]
    );
    assert_eq!(reports[0]["roots"], serde_json::json!([0]));
    let edges = reports[0]["edges"].as_array().expect("edges");
    assert!(edges.iter().any(|e| e["kind"] == "MethodCall"));
    assert!(reports[0].get("properties").is_none());
    Ok(())
}

#[test]
fn lines_limit_collected_entries() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempdir()?;
    let file = tmp.path().join("Shape.java");
    fs::write(&file, SHAPES)?;

    let json = json_stdout(
        arranger(tmp.path())?
            .arg("entries")
            .arg(&file)
            .args(["--lines", "3-4", "--format", "json", "--quiet"]),
    )?;
    assert_eq!(
        entry_names(&json[0]),
        vec!["Shape", "getSides", "setSides"]
    );
    Ok(())
}

#[test]
fn grouping_rules_come_from_the_config_file() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempdir()?;
    let config_dir = tmp.path().join(".config").join("arranger");
    fs::create_dir_all(&config_dir)?;
    fs::write(
        config_dir.join("config.toml"),
        "[arrangement]\ngrouping_rules = [\"getters-and-setters\"]\n\n[output]\nformat = \"json\"\n",
    )?;
    let file = tmp.path().join("Shape.java");
    fs::write(&file, SHAPES)?;

    let json = json_stdout(arranger(tmp.path())?.arg("entries").arg(&file).arg("--quiet"))?;
    let properties = json[0]["properties"].as_array().expect("properties");
    assert_eq!(properties.len(), 1);
    assert_eq!(properties[0]["property"], "Sides");
    assert_eq!(properties[0]["owner"], "Shape");
    assert!(json[0].get("dependency_roots").is_none());

    let json = json_stdout(
        arranger(tmp.path())?
            .arg("entries")
            .arg(&file)
            .args(["--group", "dependent-methods", "--quiet"]),
    )?;
    assert!(json[0]["properties"].is_array());
    assert!(json[0]["dependency_roots"].is_array());
    Ok(())
}

#[test]
fn directory_walk_honours_excludes() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempdir()?;
    let src = tmp.path().join("project").join("src");
    let generated = tmp.path().join("project").join("gen");
    fs::create_dir_all(&src)?;
    fs::create_dir_all(&generated)?;
    fs::write(src.join("A.java"), "class A {}")?;
    fs::write(src.join("notes.txt"), "class N {}")?;
    fs::write(generated.join("B.java"), "class B {}")?;

    let json = json_stdout(
        arranger(tmp.path())?
            .arg("entries")
            .arg(tmp.path().join("project"))
            .args(["--exclude", "**/gen/", "--format", "json", "--quiet"]),
    )?;
    let reports = json.as_array().expect("array of reports");
    assert_eq!(reports.len(), 1);
    assert!(reports[0]["file"].as_str().unwrap_or_default().ends_with("A.java"));
    Ok(())
}

#[test]
fn dot_output_describes_the_graph() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempdir()?;
    let file = tmp.path().join("Shape.java");
    fs::write(&file, SHAPES)?;

    arranger(tmp.path())?
        .arg("entries")
        .arg(&file)
        .args(["--format", "dot", "--quiet"])
        .assert()
        .success()
        .stdout(
            contains("digraph Arrangement {")
                .and(contains("CLASS Shape"))
                .and(contains("label=\"call\"")),
        );
    Ok(())
}

#[test]
fn text_output_and_logs() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempdir()?;
    let file = tmp.path().join("Shape.java");
    fs::write(&file, SHAPES)?;

    arranger(tmp.path())?
        .arg("entries")
        .arg(&file)
        .assert()
        .success()
        .stdout(contains("CLASS").and(contains("draw -> getSides (calls)")))
        .stderr(
            contains("Collection started")
                .and(contains("Files queued"))
                .and(contains("Collection completed")),
        );

    arranger(tmp.path())?
        .arg("entries")
        .arg(&file)
        .arg("--quiet")
        .assert()
        .success()
        .stderr(contains("Files queued").not());
    Ok(())
}

#[test]
fn scope_needs_a_single_file() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempdir()?;
    fs::write(tmp.path().join("A.java"), "class A {}")?;
    fs::write(tmp.path().join("B.java"), "class B {}")?;

    arranger(tmp.path())?
        .arg("entries")
        .arg(tmp.path())
        .args(["--lines", "1"])
        .assert()
        .failure()
        .stderr(contains("single file"));
    Ok(())
}

#[test]
fn scope_outside_the_file_fails() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempdir()?;
    let file = tmp.path().join("A.java");
    fs::write(&file, "class A {}\n")?;

    arranger(tmp.path())?
        .arg("entries")
        .arg(&file)
        .args(["--lines", "5-9", "--quiet"])
        .assert()
        .failure()
        .stderr(contains("outside the file"));
    Ok(())
}

#[test]
fn invalid_arguments_are_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempdir()?;
    let file = tmp.path().join("A.java");
    fs::write(&file, "class A {}")?;

    arranger(tmp.path())?
        .arg("entries")
        .arg(&file)
        .args(["--group", "alphabetical"])
        .assert()
        .failure()
        .stderr(contains("getters-and-setters"));

    arranger(tmp.path())?
        .arg("entries")
        .arg(&file)
        .args(["--range", "9..3"])
        .assert()
        .failure()
        .stderr(contains("after end"));

    arranger(tmp.path())?
        .arg("entries")
        .arg(&file)
        .args(["--format", "yaml"])
        .assert()
        .failure();

    arranger(tmp.path())?
        .arg("entries")
        .arg(&file)
        .args(["--threads", "0"])
        .assert()
        .failure()
        .stderr(contains("threads must be greater than 0"));
    Ok(())
}

#[test]
fn unsupported_input_fails() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempdir()?;
    let file = tmp.path().join("notes.txt");
    fs::write(&file, "class A {}")?;

    arranger(tmp.path())?
        .arg("entries")
        .arg(&file)
        .assert()
        .failure()
        .stderr(contains("Unsupported file type").and(contains("no file could be processed")));

    let empty = tmp.path().join("empty");
    fs::create_dir(&empty)?;
    arranger(tmp.path())?
        .arg("entries")
        .arg(&empty)
        .assert()
        .failure()
        .stderr(contains("no Java sources found"));
    Ok(())
}

#[test]
fn syntax_errors_are_not_fatal() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempdir()?;
    let file = tmp.path().join("Broken.java");
    fs::write(&file, "class Broken {\n    int a\n    void m() {}\n}\n")?;

    arranger(tmp.path())?
        .arg("entries")
        .arg(&file)
        .assert()
        .success()
        .stdout(contains("Broken"))
        .stderr(contains("Syntax errors"));
    Ok(())
}
