//! The `entries` command: walk inputs, build one entry graph per file in
//! parallel and print the results.

use anyhow::{bail, Context, Result};
use engine::{collect_entries, ArrangementSettings};
use ir::{Document, TextRange};
use parsers::ParserMetrics;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::level_filters::LevelFilter;
use tracing::{debug, error, info, warn};

use crate::args::{EntriesArgs, LineSpan};
use crate::config::load_config;
use crate::output::{self, FileEntries};
use crate::{collect_sources, default_excludes, is_excluded};

mod config_cmd;
pub use config_cmd::handle_config;

fn init_tracing(debug: bool, quiet: bool) {
    let level = if quiet {
        LevelFilter::OFF
    } else if debug {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Byte ranges to collect in `doc`: explicit ranges plus line spans, or the
/// whole text when neither is given.
pub fn requested_ranges(
    doc: &Document,
    ranges: &[TextRange],
    lines: &[LineSpan],
) -> Result<Vec<TextRange>> {
    if ranges.is_empty() && lines.is_empty() {
        return Ok(vec![TextRange::new(0, doc.len())]);
    }
    let mut out = Vec::with_capacity(ranges.len() + lines.len());
    for range in ranges {
        if range.end > doc.len() {
            bail!("range {range} exceeds the file length {}", doc.len());
        }
        out.push(*range);
    }
    for span in lines {
        let range = doc.lines_range(span.first, span.last).with_context(|| {
            format!(
                "lines {}-{} outside the file ({} lines)",
                span.first,
                span.last,
                doc.line_count()
            )
        })?;
        out.push(range);
    }
    Ok(out)
}

struct FileJob<'a> {
    ranges: &'a [TextRange],
    lines: &'a [LineSpan],
    settings: &'a ArrangementSettings,
    snap: bool,
}

impl FileJob<'_> {
    fn run(&self, path: &Path, metrics: &mut ParserMetrics) -> Result<Option<FileEntries>> {
        let Some(unit) = parsers::parse_file(path, Some(metrics))? else {
            return Ok(None);
        };
        if unit.has_errors {
            warn!(file = %path.display(), "Syntax errors, entries may be incomplete");
        }
        let doc = unit.document();
        let ranges = requested_ranges(&doc, self.ranges, self.lines)
            .with_context(|| format!("invalid scope for {}", path.display()))?;
        let resolver = unit.resolver();
        let info = collect_entries(
            &unit.tree,
            &resolver,
            self.snap.then_some(&doc),
            &ranges,
            self.settings,
        );
        debug!(file = %path.display(), entries = info.len(), "File processed");
        Ok(Some(FileEntries {
            path: path.display().to_string(),
            info,
            has_errors: unit.has_errors,
        }))
    }
}

pub fn run_entries(args: EntriesArgs) -> Result<()> {
    init_tracing(args.debug, args.quiet);
    if args.debug && !args.quiet {
        debug!("Debug mode enabled");
    }

    let config = load_config().context("failed to load configuration")?;
    let settings = config.arrangement.settings(&args.groups);
    let format = args.format.unwrap_or(config.output.format);
    let snap = config.arrangement.snap_to_lines && !args.no_snap;
    debug!(rules = ?settings, ?format, snap, "Effective settings");

    if let Err(e) = rayon::ThreadPoolBuilder::new()
        .num_threads(args.threads)
        .build_global()
    {
        error!("Failed to build global thread pool: {e}");
    }

    let mut patterns = args.exclude.clone();
    if !args.no_default_exclude {
        patterns.extend(default_excludes());
    }
    let mut files: Vec<PathBuf> = Vec::new();
    for path in &args.paths {
        info!(target = %path.display(), "Collection started");
        files.extend(collect_sources(path, &|p| {
            is_excluded(p, &patterns, args.max_file_size)
        })?);
    }
    info!(files = files.len(), "Files queued");
    if files.is_empty() {
        bail!("no Java sources found");
    }
    if (!args.ranges.is_empty() || !args.lines.is_empty()) && files.len() != 1 {
        bail!("--range and --lines apply to a single file, {} queued", files.len());
    }

    let job = FileJob {
        ranges: &args.ranges,
        lines: &args.lines,
        settings: &settings,
        snap,
    };
    let results: Vec<(PathBuf, ParserMetrics, Result<Option<FileEntries>>)> = files
        .into_par_iter()
        .map(|path| {
            let mut metrics = ParserMetrics::default();
            let result = job.run(&path, &mut metrics);
            (path, metrics, result)
        })
        .collect();

    let mut processed = Vec::with_capacity(results.len());
    let mut totals = ParserMetrics::default();
    let mut failed = 0usize;
    for (path, metrics, result) in results {
        totals.files_parsed += metrics.files_parsed;
        totals.parse_errors += metrics.parse_errors;
        match result {
            Ok(Some(entries)) => processed.push(entries),
            Ok(None) => warn!(file = %path.display(), "Unsupported file type"),
            Err(e) => {
                // A bad scope on the only file is a usage error.
                if !args.ranges.is_empty() || !args.lines.is_empty() {
                    return Err(e);
                }
                error!(file = %path.display(), error = %format!("{e:#}"), "File failed");
                failed += 1;
            }
        }
    }

    output::print_entries(&processed, format, &settings)?;
    info!(
        files = processed.len(),
        failed,
        parsed = totals.files_parsed,
        parse_errors = totals.parse_errors,
        "Collection completed"
    );
    if processed.is_empty() {
        bail!("no file could be processed");
    }
    Ok(())
}
