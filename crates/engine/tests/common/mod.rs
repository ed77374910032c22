#![allow(dead_code)]

use engine::{collect_entries, ArrangementParseInfo, ArrangementSettings};
use ir::{ArrangementEntry, EntryId, EntryType, TextRange};
use parsers::{parse_str, ParsedUnit};

/// Routes engine logs to the test harness; `RUST_LOG=trace` shows scope decisions.
pub fn init_logs() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn parse(code: &str) -> ParsedUnit {
    init_logs();
    parse_str(code, "A.java").expect("parse java snippet")
}

/// Entries of `code` over the whole file, without line snapping.
pub fn collect(code: &str, settings: &ArrangementSettings) -> ArrangementParseInfo {
    collect_in(code, &[TextRange::new(0, code.len())], settings)
}

pub fn collect_in(
    code: &str,
    ranges: &[TextRange],
    settings: &ArrangementSettings,
) -> ArrangementParseInfo {
    let unit = parse(code);
    let resolver = unit.resolver();
    collect_entries(&unit.tree, &resolver, None, ranges, settings)
}

pub fn collect_snapped(code: &str) -> ArrangementParseInfo {
    let unit = parse(code);
    let resolver = unit.resolver();
    let document = unit.document();
    collect_entries(
        &unit.tree,
        &resolver,
        Some(&document),
        &[TextRange::new(0, code.len())],
        &ArrangementSettings::new(),
    )
}

pub fn named<'a>(info: &'a ArrangementParseInfo, kind: EntryType, name: &str) -> &'a ArrangementEntry {
    info.entries()
        .iter()
        .find(|e| e.kind == kind && e.name.as_deref() == Some(name))
        .unwrap_or_else(|| panic!("no {kind} entry named {name}"))
}

pub fn child_names(info: &ArrangementParseInfo, id: EntryId) -> Vec<String> {
    info.children(id)
        .iter()
        .filter_map(|&c| info.entry(c))
        .map(|e| match &e.name {
            Some(name) => format!("{} {}", e.kind, name),
            None => e.kind.to_string(),
        })
        .collect()
}

pub fn range_of(code: &str, needle: &str) -> TextRange {
    let start = code.find(needle).unwrap_or_else(|| panic!("{needle} not in code"));
    TextRange::new(start, start + needle.len())
}
