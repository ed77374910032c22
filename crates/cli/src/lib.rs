//! Shared helpers for the `arranger` command line.
use regex::Regex;
use std::fs;
use std::path::Path;

pub mod args;
pub mod config;
pub mod output;
pub mod run;
mod walk;

pub use walk::collect_sources;

/// Files larger than this are skipped during directory walks: 2 MiB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 2 * 1024 * 1024;

/// Converts a basic glob pattern to a regular expression.
///
/// `*` stays inside one path segment, `**` crosses segments and `?` matches
/// a single character. Character classes are rejected.
///
/// # Example
///
/// ```
/// use arranger::glob_to_regex;
/// let re = glob_to_regex("src/*.java").unwrap();
/// assert!(re.is_match("src/Main.java"));
/// assert!(!re.is_match("src/a/Main.java"));
/// ```
pub fn glob_to_regex(pat: &str) -> Result<Regex, regex::Error> {
    if pat.contains('[') || pat.contains(']') {
        return Regex::new("[");
    }
    let mut regex = String::from("^");
    let mut chars = pat.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '*' if chars.peek() == Some(&'*') => {
                chars.next();
                regex.push_str(".*");
            }
            '*' => regex.push_str("[^/]*"),
            '?' => regex.push('.'),
            '.' | '(' | ')' | '+' | '|' | '^' | '$' | '{' | '}' | '\\' => {
                regex.push('\\');
                regex.push(c);
            }
            _ => regex.push(c),
        }
    }
    regex.push('$');
    Regex::new(&regex)
}

/// Parses an `--exclude` value. A trailing slash excludes everything below
/// the directory.
///
/// # Example
///
/// ```
/// use arranger::parse_exclude;
/// let re = parse_exclude("**/generated/").unwrap();
/// assert!(re.is_match("src/generated/Model.java"));
/// ```
pub fn parse_exclude(s: &str) -> Result<Regex, String> {
    let glob = match s.strip_suffix('/') {
        Some(dir) => format!("{dir}/**"),
        None => s.to_string(),
    };
    glob_to_regex(&glob).map_err(|e| e.to_string())
}

/// Build output and VCS metadata never hold sources worth arranging.
pub fn default_excludes() -> Vec<Regex> {
    ["**/.git/**", "**/target/**", "**/build/**", "**/out/**"]
        .into_iter()
        .filter_map(|p| parse_exclude(p).ok())
        .collect()
}

/// Whether `path` matches one of `patterns` or is a file above
/// `max_file_size` bytes (0 disables the size check). Separators are
/// normalised so Windows paths match the same globs.
///
/// # Example
///
/// ```
/// use arranger::{is_excluded, parse_exclude};
/// use std::path::Path;
/// let patterns = vec![parse_exclude("gen/**").unwrap()];
/// assert!(is_excluded(Path::new("gen/A.java"), &patterns, 0));
/// assert!(!is_excluded(Path::new("src/A.java"), &patterns, 0));
/// ```
pub fn is_excluded(path: &Path, patterns: &[Regex], max_file_size: u64) -> bool {
    let path_str = path.to_string_lossy().replace('\\', "/");
    if patterns.iter().any(|re| re.is_match(&path_str)) {
        return true;
    }
    max_file_size > 0
        && fs::metadata(path)
            .map(|meta| meta.is_file() && meta.len() > max_file_size)
            .unwrap_or(false)
}
