use clap::{Args as ClapArgs, Parser, Subcommand};
use engine::GroupingRule;
use ir::TextRange;
use regex::Regex;
use std::path::PathBuf;

use crate::output::Format;
use crate::DEFAULT_MAX_FILE_SIZE;

fn default_threads() -> usize {
    std::thread::available_parallelism().map_or(1, |n| n.get())
}

fn parse_threads(s: &str) -> Result<usize, String> {
    let v: usize = s
        .parse()
        .map_err(|e: std::num::ParseIntError| e.to_string())?;
    if v == 0 {
        Err("threads must be greater than 0".into())
    } else {
        Ok(v)
    }
}

/// 1-based inclusive line span, `7` or `7-12`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSpan {
    pub first: usize,
    pub last: usize,
}

fn parse_lines(s: &str) -> Result<LineSpan, String> {
    let (first, last) = s.split_once('-').unwrap_or((s, s));
    let parse = |v: &str| {
        v.trim()
            .parse::<usize>()
            .map_err(|e| format!("invalid line '{v}': {e}"))
    };
    let (first, last) = (parse(first)?, parse(last)?);
    if first == 0 || first > last {
        return Err(format!("invalid line span '{s}'"));
    }
    Ok(LineSpan { first, last })
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Builds the arrangement entry graph of Java sources",
    long_about = "arranger reads Java sources and reports the declarations a code \
arranger may reorder: classes, fields, initializers, methods and constructors, \
nested the way they appear in the source, together with the ordering \
dependencies between them (initializer order, overrides, calls, accessor pairs).

Examples:
  arranger entries src/                          # every Java file below src/
  arranger entries A.java --lines 10-40          # only declarations on lines 10-40
  arranger entries A.java --format dot | dot -Tsvg > a.svg
  arranger entries A.java --group dependent-methods --format json
  arranger config init                           # write the default config file",
    subcommand_required = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build and print arrangement entries for files or directories
    Entries(EntriesArgs),
    /// Inspect or create the configuration file
    #[command(subcommand)]
    Config(ConfigCmd),
}

#[derive(ClapArgs)]
pub struct EntriesArgs {
    /// Java files or directories to process
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,
    /// Only collect declarations touching these byte ranges (`start..end`)
    #[arg(long = "range", value_parser = clap::value_parser!(TextRange))]
    pub ranges: Vec<TextRange>,
    /// Only collect declarations touching these lines (`7` or `7-12`)
    #[arg(long = "lines", value_parser = parse_lines)]
    pub lines: Vec<LineSpan>,
    /// Enable a grouping rule; repeatable, adds to the configured rules
    #[arg(long = "group", value_parser = clap::value_parser!(GroupingRule))]
    pub groups: Vec<GroupingRule>,
    /// Keep raw declaration ranges instead of expanding them to whole lines
    #[arg(long = "no-snap")]
    pub no_snap: bool,
    /// Output format; defaults to the configured one
    #[arg(long, value_enum)]
    pub format: Option<Format>,
    /// Number of parallel threads to use
    #[arg(long, default_value_t = default_threads(), value_parser = parse_threads)]
    pub threads: usize,
    /// Skip paths matching these globs when walking directories
    #[arg(long, value_parser = crate::parse_exclude, value_delimiter = ',')]
    pub exclude: Vec<Regex>,
    /// Don't use default exclusion patterns
    #[arg(long)]
    pub no_default_exclude: bool,
    /// Maximum file size to read (in bytes)
    #[arg(long, default_value_t = DEFAULT_MAX_FILE_SIZE)]
    pub max_file_size: u64,
    /// Enable debug output
    #[arg(long)]
    pub debug: bool,
    /// Suppress non-essential output
    #[arg(long)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum ConfigCmd {
    /// Print the effective configuration
    Show,
    /// Write the default configuration file
    Init {
        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },
}

pub fn parse_cli() -> Cli {
    Cli::parse()
}
