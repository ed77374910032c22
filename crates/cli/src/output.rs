use anyhow::{Context, Result};
use clap::ValueEnum;
use colored::*;
use engine::{to_dot, to_mermaid, ArrangementParseInfo, ArrangementReport, ArrangementSettings};
use ir::{ArrangementEntry, DependencyKind, EntryId};
use serde::{Deserialize, Serialize};
use std::io::{self, Write};

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Text,
    Json,
    Dot,
    Mermaid,
}

/// Entries collected from one source file.
#[derive(Debug)]
pub struct FileEntries {
    pub path: String,
    pub info: ArrangementParseInfo,
    pub has_errors: bool,
}

pub fn render(files: &[FileEntries], fmt: Format, settings: &ArrangementSettings) -> Result<String> {
    match fmt {
        Format::Text => Ok(files
            .iter()
            .map(|f| render_text(f, settings))
            .collect::<Vec<_>>()
            .join("\n")),
        Format::Json => {
            let reports: Vec<ArrangementReport> = files
                .iter()
                .map(|f| ArrangementReport::new(f.path.as_str(), &f.info, settings))
                .collect();
            serde_json::to_string_pretty(&reports).context("failed to serialize report")
        }
        Format::Dot => Ok(files
            .iter()
            .map(|f| format!("// {}\n{}\n", f.path, to_dot(&f.info)))
            .collect()),
        Format::Mermaid => Ok(files
            .iter()
            .map(|f| format!("%% {}\n{}", f.path, to_mermaid(&f.info)))
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

pub fn print_entries(files: &[FileEntries], fmt: Format, settings: &ArrangementSettings) -> Result<()> {
    let out = render(files, fmt, settings)?;
    let mut stdout = io::stdout().lock();
    stdout.write_all(out.as_bytes())?;
    if !out.ends_with('\n') {
        writeln!(stdout)?;
    }
    Ok(())
}

fn display_name(info: &ArrangementParseInfo, id: EntryId) -> String {
    match info.entry(id) {
        Some(entry) => match &entry.name {
            Some(name) => name.clone(),
            None => format!("<{} #{}>", entry.kind.to_string().to_lowercase(), id.0),
        },
        None => format!("#{}", id.0),
    }
}

fn edge_kind(kind: DependencyKind) -> &'static str {
    match kind {
        DependencyKind::SyntheticInitializerOrder => "initializer order",
        DependencyKind::MethodOverride => "overrides",
        DependencyKind::MethodCall => "calls",
        DependencyKind::Getter => "getter",
        DependencyKind::Setter => "setter",
    }
}

fn entry_line(entry: &ArrangementEntry, depth: usize) -> String {
    let mut line = format!(
        "{}{}",
        "  ".repeat(depth + 1),
        entry.kind.to_string().cyan()
    );
    if let Some(name) = &entry.name {
        line.push_str(&format!(" {}", name.bright_white().bold()));
    }
    line.push_str(&format!(" {}", format!("[{}]", entry.range).dimmed()));
    let modifiers: Vec<String> = entry.modifiers.iter().map(|m| m.to_string()).collect();
    if !modifiers.is_empty() {
        line.push_str(&format!(" {}", modifiers.join(" ")));
    }
    if !entry.can_be_arranged {
        line.push_str(&format!(" {}", "(fixed)".yellow()));
    }
    line
}

fn push_tree(out: &mut String, info: &ArrangementParseInfo, id: EntryId, depth: usize) {
    let Some(entry) = info.entry(id) else {
        return;
    };
    out.push_str(&entry_line(entry, depth));
    out.push('\n');
    for &child in info.children(id) {
        push_tree(out, info, child, depth + 1);
    }
}

fn push_dependency_node(
    out: &mut String,
    info: &ArrangementParseInfo,
    node: &engine::DependencyNode,
    depth: usize,
) {
    out.push_str(&format!(
        "{}{}\n",
        "  ".repeat(depth + 2),
        display_name(info, node.entry)
    ));
    for child in &node.dependents {
        push_dependency_node(out, info, child, depth + 1);
    }
}

fn render_text(file: &FileEntries, settings: &ArrangementSettings) -> String {
    let info = &file.info;
    let mut out = format!(
        "{} {}\n",
        file.path.bright_blue().bold(),
        format!("({} entries)", info.len()).dimmed()
    );
    if file.has_errors {
        out.push_str(&format!("  {}\n", "syntax errors, entries may be incomplete".yellow()));
    }
    for &root in info.roots() {
        push_tree(&mut out, info, root, 0);
    }

    let report = ArrangementReport::new(file.path.as_str(), info, settings);
    if !report.edges.is_empty() {
        out.push_str(&format!("  {}\n", "Dependencies:".bright_cyan().bold()));
        for edge in &report.edges {
            out.push_str(&format!(
                "    {} -> {} ({})\n",
                display_name(info, edge.dependent),
                display_name(info, edge.dependency),
                edge_kind(edge.kind)
            ));
        }
    }
    if !report.properties.is_empty() {
        out.push_str(&format!("  {}\n", "Properties:".bright_cyan().bold()));
        for property in &report.properties {
            let accessor = |id: Option<EntryId>| {
                id.map(|id| display_name(info, id))
                    .unwrap_or_else(|| "-".to_string())
            };
            out.push_str(&format!(
                "    {} of {}: get {}, set {}\n",
                property.property,
                property.owner,
                accessor(property.getter),
                accessor(property.setter)
            ));
        }
    }
    if !report.overridden_methods.is_empty() {
        out.push_str(&format!("  {}\n", "Overridden methods:".bright_cyan().bold()));
        for group in &report.overridden_methods {
            let methods: Vec<String> = group
                .methods
                .iter()
                .map(|&id| display_name(info, id))
                .collect();
            out.push_str(&format!(
                "    {}: {}\n",
                group.class_name.as_deref().unwrap_or(engine::NO_CONTENT),
                methods.join(", ")
            ));
        }
    }
    if !report.dependency_roots.is_empty() {
        out.push_str(&format!("  {}\n", "Dependent methods:".bright_cyan().bold()));
        for root in &report.dependency_roots {
            push_dependency_node(&mut out, info, root, 0);
        }
    }
    out
}
