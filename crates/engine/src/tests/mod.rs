use super::*;
use ir::{ArrangementEntry, DependencyKind, EntryId, EntryType, NodeId};

fn method_entry(info: &mut ArrangementParseInfo, node: usize, start: usize) -> EntryId {
    let entry = ArrangementEntry::new(
        NodeId(node),
        None,
        TextRange::new(start, start + 5),
        EntryType::Method,
        Some(format!("m{node}")),
        true,
    );
    let id = info.add_entry(entry);
    info.on_method_entry_created(NodeId(node), id);
    id
}

fn shape(node: &DependencyNode) -> String {
    if node.dependents.is_empty() {
        return node.entry.0.to_string();
    }
    let inner: Vec<String> = node.dependents.iter().map(shape).collect();
    format!("{}({})", node.entry.0, inner.join(","))
}

#[test]
fn add_entry_links_parent_and_roots() {
    let mut info = ArrangementParseInfo::new();
    let class = info.add_entry(ArrangementEntry::new(
        NodeId(1),
        None,
        TextRange::new(0, 40),
        EntryType::Class,
        Some("A".into()),
        true,
    ));
    let field = info.add_entry(ArrangementEntry::new(
        NodeId(2),
        Some(class),
        TextRange::new(10, 16),
        EntryType::Field,
        Some("i".into()),
        true,
    ));
    assert_eq!(info.roots(), &[class]);
    assert_eq!(info.children(class), &[field]);
    assert_eq!(info.entry(field).map(|e| e.id), Some(field));
    assert_eq!(info.entry_for(NodeId(2)).map(|e| e.id), Some(field));
    assert_eq!(info.len(), 2);
}

#[test]
fn dependency_roots_follow_call_chains() {
    let mut info = ArrangementParseInfo::new();
    let a = method_entry(&mut info, 1, 0);
    let b = method_entry(&mut info, 2, 10);
    let c = method_entry(&mut info, 3, 20);
    let d = method_entry(&mut info, 4, 30);
    info.register_dependency(NodeId(2), NodeId(3));
    info.register_dependency(NodeId(1), NodeId(2));
    info.register_dependency(NodeId(1), NodeId(4));
    info.register_dependency(NodeId(1), NodeId(2));

    let roots = info.method_dependency_roots();
    assert_eq!(roots.len(), 1);
    assert_eq!(roots[0].entry, a);
    assert_eq!(
        shape(&roots[0]),
        format!("{}({}({}),{})", a.0, b.0, c.0, d.0)
    );
}

#[test]
fn cyclic_dependency_root_is_dropped() {
    let mut info = ArrangementParseInfo::new();
    method_entry(&mut info, 1, 0);
    method_entry(&mut info, 2, 10);
    method_entry(&mut info, 3, 20);
    let lone = method_entry(&mut info, 4, 30);
    method_entry(&mut info, 5, 40);
    info.register_dependency(NodeId(1), NodeId(2));
    info.register_dependency(NodeId(2), NodeId(3));
    info.register_dependency(NodeId(3), NodeId(2));
    info.register_dependency(NodeId(4), NodeId(5));

    let roots = info.method_dependency_roots();
    assert_eq!(roots.len(), 1);
    assert_eq!(roots[0].entry, lone);
}

#[test]
fn callees_without_entries_are_skipped() {
    let mut info = ArrangementParseInfo::new();
    let a = method_entry(&mut info, 1, 0);
    info.register_dependency(NodeId(1), NodeId(9));
    let roots = info.method_dependency_roots();
    assert_eq!(roots.len(), 1);
    assert_eq!(roots[0].entry, a);
    assert!(roots[0].dependents.is_empty());
    assert!(info
        .dependency_edges()
        .iter()
        .all(|e| e.kind != DependencyKind::MethodCall));
}

#[test]
fn overridden_methods_follow_base_order() {
    let mut info = ArrangementParseInfo::new();
    let second = method_entry(&mut info, 10, 0);
    let first = method_entry(&mut info, 11, 10);
    let other = method_entry(&mut info, 12, 20);
    for (base, offset, class, name, overriding) in [
        (1, 50, 100, "p.Base", 10),
        (2, 30, 100, "p.Base", 11),
        (3, 10, 200, "p.Other", 12),
        (4, 5, 300, "p.Gone", 99),
    ] {
        info.on_overridden_method(OverriddenMethod {
            base: NodeId(base),
            base_offset: offset,
            class: Some(NodeId(class)),
            class_name: Some(name.to_string()),
            overriding: NodeId(overriding),
        });
    }

    let groups = info.overridden_methods();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].class_name.as_deref(), Some("p.Base"));
    assert_eq!(groups[0].methods, vec![first, second]);
    assert_eq!(groups[1].class_name.as_deref(), Some("p.Other"));
    assert_eq!(groups[1].methods, vec![other]);
}

#[test]
fn property_edge_points_from_later_accessor() {
    let mut info = ArrangementParseInfo::new();
    let setter = method_entry(&mut info, 1, 0);
    let getter = method_entry(&mut info, 2, 10);
    info.register_setter("Name", "p.C", setter);
    info.register_getter("Name", "p.C", getter);
    info.register_getter("Lone", "p.C", getter);

    let info_for = info.property("Name", "p.C").cloned();
    assert_eq!(
        info_for,
        Some(PropertyInfo {
            getter: Some(getter),
            setter: Some(setter)
        })
    );
    let edges: Vec<_> = info
        .dependency_edges()
        .into_iter()
        .filter(|e| matches!(e.kind, DependencyKind::Getter | DependencyKind::Setter))
        .collect();
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0].dependent, getter);
    assert_eq!(edges[0].dependency, setter);
    assert_eq!(edges[0].kind, DependencyKind::Getter);
}

#[test]
fn grouping_rules_parse_from_config_names() {
    assert_eq!(
        "getters-and-setters".parse::<GroupingRule>(),
        Ok(GroupingRule::GettersAndSetters)
    );
    assert_eq!(
        " Dependent-Methods ".parse::<GroupingRule>(),
        Ok(GroupingRule::DependentMethods)
    );
    let err = "alphabetical".parse::<GroupingRule>().unwrap_err();
    assert!(err.contains("overridden-methods"));

    let settings: ArrangementSettings =
        serde_json::from_str(r#"{"grouping_rules":["overridden-methods"]}"#).unwrap();
    assert!(settings.has_rule(GroupingRule::OverriddenMethods));
    assert!(!settings.has_rule(GroupingRule::GettersAndSetters));
    let empty: ArrangementSettings = serde_json::from_str("{}").unwrap();
    assert_eq!(empty, ArrangementSettings::new());
}

#[test]
fn exports_show_nesting_and_dependencies() {
    let mut info = ArrangementParseInfo::new();
    let class = info.add_entry(ArrangementEntry::new(
        NodeId(1),
        None,
        TextRange::new(0, 40),
        EntryType::Class,
        Some("A".into()),
        true,
    ));
    let mut first = ArrangementEntry::new(
        NodeId(2),
        Some(class),
        TextRange::new(10, 20),
        EntryType::Field,
        None,
        true,
    );
    first.add_dependency(class);
    let init = info.add_entry(first);

    let dot = to_dot(&info);
    assert!(dot.starts_with("digraph Arrangement {"));
    assert!(dot.contains("0 [label=\"CLASS A [0..40]\", style=solid];"));
    assert!(dot.contains("0 -> 1;"));
    assert!(dot.contains(&format!("{} -> {} [style=dashed, label=\"init\"];", init.0, class.0)));

    let mermaid = to_mermaid(&info);
    assert!(mermaid.contains("1[\"FIELD [10..20]\"]"));
    assert!(mermaid.contains("1 -.->|init| 0"));

    let report = ArrangementReport::new("A.java", &info, &ArrangementSettings::new());
    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    assert_eq!(json["file"], "A.java");
    assert_eq!(json["entries"][1]["kind"], "Field");
    assert_eq!(json["edges"][0]["kind"], "SyntheticInitializerOrder");
    assert!(json.get("dependency_roots").is_none());
}
