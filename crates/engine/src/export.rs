//! Serializable views of an [`ArrangementParseInfo`].

use crate::collector::{ArrangementParseInfo, DependencyNode, OverriddenMethods};
use crate::settings::{ArrangementSettings, GroupingRule};
use ir::{ArrangementEntry, DependencyEdge, DependencyKind, EntryId};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyReport {
    pub property: String,
    pub owner: String,
    pub getter: Option<EntryId>,
    pub setter: Option<EntryId>,
}

/// Everything collected for one source unit. Grouping sections are only
/// filled when the matching rule is enabled.
#[derive(Debug, Clone, Serialize)]
pub struct ArrangementReport {
    pub file: String,
    pub roots: Vec<EntryId>,
    pub entries: Vec<ArrangementEntry>,
    pub edges: Vec<DependencyEdge>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<PropertyReport>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub overridden_methods: Vec<OverriddenMethods>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dependency_roots: Vec<DependencyNode>,
}

impl ArrangementReport {
    pub fn new(
        file: impl Into<String>,
        info: &ArrangementParseInfo,
        settings: &ArrangementSettings,
    ) -> Self {
        let properties = info
            .properties()
            .iter()
            .map(|((property, owner), accessors)| PropertyReport {
                property: property.clone(),
                owner: owner.clone(),
                getter: accessors.getter,
                setter: accessors.setter,
            })
            .collect();
        let overridden_methods = if settings.has_rule(GroupingRule::OverriddenMethods) {
            info.overridden_methods()
        } else {
            Vec::new()
        };
        let dependency_roots = if settings.has_rule(GroupingRule::DependentMethods) {
            info.method_dependency_roots()
        } else {
            Vec::new()
        };
        Self {
            file: file.into(),
            roots: info.roots().to_vec(),
            entries: info.entries().to_vec(),
            edges: info.dependency_edges(),
            properties,
            overridden_methods,
            dependency_roots,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn entry_label(entry: &ArrangementEntry) -> String {
    let mut label = entry.kind.to_string();
    if let Some(name) = &entry.name {
        label.push(' ');
        label.push_str(name);
    }
    label.push_str(&format!(" [{}]", entry.range));
    label
}

fn edge_label(kind: DependencyKind) -> &'static str {
    match kind {
        DependencyKind::SyntheticInitializerOrder => "init",
        DependencyKind::MethodOverride => "override",
        DependencyKind::MethodCall => "call",
        DependencyKind::Getter => "getter",
        DependencyKind::Setter => "setter",
    }
}

/// Graphviz export: nesting as solid edges, dependencies dashed from the
/// dependent entry to its dependency.
pub fn to_dot(info: &ArrangementParseInfo) -> String {
    let mut out = String::from("digraph Arrangement {\n");
    for entry in info.entries() {
        let style = if entry.can_be_arranged { "solid" } else { "dotted" };
        out.push_str(&format!(
            "    {} [label=\"{}\", style={}];\n",
            entry.id.0,
            entry_label(entry),
            style
        ));
        for child in &entry.children {
            out.push_str(&format!("    {} -> {};\n", entry.id.0, child.0));
        }
    }
    for edge in info.dependency_edges() {
        out.push_str(&format!(
            "    {} -> {} [style=dashed, label=\"{}\"];\n",
            edge.dependent.0,
            edge.dependency.0,
            edge_label(edge.kind)
        ));
    }
    out.push('}');
    out
}

pub fn to_mermaid(info: &ArrangementParseInfo) -> String {
    let mut out = String::from("graph TD\n");
    for entry in info.entries() {
        out.push_str(&format!("    {}[\"{}\"]\n", entry.id.0, entry_label(entry)));
        for child in &entry.children {
            out.push_str(&format!("    {} --> {}\n", entry.id.0, child.0));
        }
    }
    for edge in info.dependency_edges() {
        out.push_str(&format!(
            "    {} -.->|{}| {}\n",
            edge.dependent.0,
            edge_label(edge.kind),
            edge.dependency.0
        ));
    }
    out
}
