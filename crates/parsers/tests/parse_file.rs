use ir::{NodeKind, SourceTree};
use parsers::{detect_type, parse_file, ParserMetrics};
use tempfile::tempdir;

#[test]
fn parses_java_files_and_counts_them() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("Sample.java");
    std::fs::write(&path, "package demo;\n\npublic class Sample {\n    private int count;\n}\n").unwrap();

    let mut metrics = ParserMetrics::default();
    let unit = parse_file(&path, Some(&mut metrics)).unwrap().unwrap();
    assert_eq!(metrics.files_parsed, 1);
    assert_eq!(metrics.parse_errors, 0);
    assert_eq!(unit.tree.name(unit.tree.root()), Some("demo"));
    assert!(unit.file_path.ends_with("Sample.java"));
    assert!(unit
        .tree
        .nodes()
        .iter()
        .any(|n| n.kind == NodeKind::Field && n.name.as_deref() == Some("count")));
}

#[test]
fn broken_files_are_kept_and_counted() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("Broken.java");
    std::fs::write(&path, "class Broken {\n    void m( {\n}\n").unwrap();

    let mut metrics = ParserMetrics::default();
    let unit = parse_file(&path, Some(&mut metrics)).unwrap().unwrap();
    assert!(unit.has_errors);
    assert_eq!(metrics.parse_errors, 1);
    assert_eq!(metrics.files_parsed, 0);
}

#[test]
fn skips_unsupported_files() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    std::fs::write(&path, "class A {}").unwrap();
    assert_eq!(detect_type(&path), None);
    assert!(parse_file(&path, None).unwrap().is_none());
}

#[test]
fn missing_files_report_the_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("Gone.java");
    let err = parse_file(&path, None).unwrap_err();
    assert!(format!("{err:#}").contains("Gone.java"));
}
