//! Front ends that turn source files into the syntax trees consumed by the
//! arrangement engine.

use anyhow::{Context, Result};
use ir::{Document, SyntaxTree};
use serde::Serialize;
use std::{fs, path::Path};
use tracing::debug;

pub mod languages;
pub use languages::*;

#[derive(Debug, Default, Serialize)]
pub struct ParserMetrics {
    pub files_parsed: usize,
    pub parse_errors: usize,
}

/// A lowered source unit together with its text.
#[derive(Debug, Clone)]
pub struct ParsedUnit {
    pub file_path: String,
    pub source: String,
    pub tree: SyntaxTree,
    /// The front end met syntax errors; affected regions are `Error` nodes.
    pub has_errors: bool,
}

impl ParsedUnit {
    /// Line view of the source, for snapping entries to whole lines.
    pub fn document(&self) -> Document {
        Document::new(self.source.as_str())
    }

    pub fn resolver(&self) -> JavaResolver<'_> {
        JavaResolver::new(&self.tree)
    }
}

/// Determines the supported file type from the extension.
///
/// # Example
/// ```
/// use parsers::detect_type;
/// assert_eq!(detect_type(std::path::Path::new("src/Main.java")), Some("java"));
/// assert_eq!(detect_type(std::path::Path::new("README.md")), None);
/// ```
pub fn detect_type(path: &Path) -> Option<&'static str> {
    let ext = path.extension().map(|e| e.to_string_lossy().to_lowercase());
    let detected = match ext.as_deref() {
        Some("java") => Some("java"),
        _ => None,
    };
    if let Some(t) = detected {
        debug!(file = %path.display(), file_type = t, "File type detected");
    } else {
        debug!(file = %path.display(), "Unsupported file type");
    }
    detected
}

/// Parses Java source held in memory.
///
/// # Example
/// ```
/// use ir::SourceTree;
/// use parsers::parse_str;
/// let unit = parse_str("package p; class A {}", "A.java").unwrap();
/// assert_eq!(unit.tree.name(unit.tree.root()), Some("p"));
/// assert!(!unit.has_errors);
/// ```
pub fn parse_str(content: &str, file_path: &str) -> Result<ParsedUnit> {
    java::parse_java(content, file_path)
}

/// Reads and parses a file. Returns `Ok(None)` for unsupported file types.
///
/// # Example
/// ```
/// use parsers::parse_file;
/// let path = std::env::temp_dir().join("ParseFileExample.java");
/// std::fs::write(&path, "class A { int i; }").unwrap();
/// let unit = parse_file(&path, None).unwrap().unwrap();
/// assert!(unit.source.contains("int i;"));
/// ```
pub fn parse_file(path: &Path, metrics: Option<&mut ParserMetrics>) -> Result<Option<ParsedUnit>> {
    debug!(file = %path.display(), "Detecting file type");
    let Some(ftype) = detect_type(path) else {
        return Ok(None);
    };
    debug!(file = %path.display(), file_type = ftype, "Parsing file");
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    let file_path = path.to_string_lossy().into_owned();
    let unit = match java::parse_java(&content, &file_path) {
        Ok(unit) => unit,
        Err(e) => {
            if let Some(m) = metrics {
                m.parse_errors += 1;
            }
            return Err(e);
        }
    };
    if let Some(m) = metrics {
        if unit.has_errors {
            m.parse_errors += 1;
        } else {
            m.files_parsed += 1;
        }
    }
    Ok(Some(unit))
}
