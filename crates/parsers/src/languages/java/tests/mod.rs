use crate::{parse_str, ParsedUnit};
use ir::{NodeId, NodeKind, SourceTree};


fn parse(code: &str) -> ParsedUnit {
    parse_str(code, "<mem>").expect("parse java snippet")
}

fn find(unit: &ParsedUnit, kind: NodeKind, name: &str) -> NodeId {
    find_all(unit, kind, name)
        .first()
        .copied()
        .unwrap_or_else(|| panic!("no {kind:?} named {name}"))
}

fn find_all(unit: &ParsedUnit, kind: NodeKind, name: &str) -> Vec<NodeId> {
    unit.tree
        .nodes()
        .iter()
        .filter(|n| n.kind == kind && n.name.as_deref() == Some(name))
        .map(|n| n.id)
        .collect()
}

/// Method `name` declared directly in class `class`.
fn method_in(unit: &ParsedUnit, class: &str, name: &str) -> NodeId {
    find_all(unit, NodeKind::Method, name)
        .into_iter()
        .find(|&m| {
            unit.tree
                .enclosing_class(m)
                .and_then(|c| unit.tree.name(c))
                == Some(class)
        })
        .unwrap_or_else(|| panic!("no method {class}.{name}"))
}

fn text(unit: &ParsedUnit, id: NodeId) -> &str {
    let span = unit.tree.span(id).expect("span");
    &unit.source[span.start..span.end]
}
