//! Recognition of trivial getters and setters.

use ir::{NodeId, NodeKind, SourceTree, SymbolResolver};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Accessor {
    Getter(String),
    Setter(String),
}

/// Classifies `method` as a simple accessor of a field of its own class.
///
/// Getters are `getX()` returning anything but `void`, or `isX()`
/// returning `boolean`, whose body is only `return x;`. Setters are
/// `void setX(p)` whose body is only `x = p;`. Either form may qualify the
/// field with `this.`.
pub fn detect_accessor<T, R>(tree: &T, resolver: &R, method: NodeId) -> Option<Accessor>
where
    T: SourceTree,
    R: SymbolResolver,
{
    if tree.kind(method) != NodeKind::Method {
        return None;
    }
    let name = tree.name(method)?;
    let return_type = tree.detail(method).unwrap_or("void");
    let params = parameters(tree, method);

    if let Some(property) = property_suffix(name, "get")
        .filter(|_| return_type != "void")
        .or_else(|| property_suffix(name, "is").filter(|_| return_type == "boolean"))
    {
        if !params.is_empty() {
            return None;
        }
        let statement = single_statement(tree, method)?;
        if tree.kind(statement) != NodeKind::ReturnStatement {
            return None;
        }
        let [value] = significant_children(tree, statement)[..] else {
            return None;
        };
        return own_field(tree, resolver, method, value).then(|| Accessor::Getter(property));
    }

    let property = property_suffix(name, "set")?;
    let [param] = params[..] else {
        return None;
    };
    if return_type != "void" {
        return None;
    }
    let statement = single_statement(tree, method)?;
    if tree.kind(statement) != NodeKind::ExpressionStatement {
        return None;
    }
    let [assignment] = significant_children(tree, statement)[..] else {
        return None;
    };
    if tree.kind(assignment) != NodeKind::Assignment || tree.detail(assignment) != Some("=") {
        return None;
    }
    let [target, value] = significant_children(tree, assignment)[..] else {
        return None;
    };
    let assigns_param = tree.kind(value) == NodeKind::Reference
        && resolver.resolve_reference(value) == Some(param);
    (assigns_param && own_field(tree, resolver, method, target)).then(|| Accessor::Setter(property))
}

fn property_suffix(name: &str, prefix: &str) -> Option<String> {
    let suffix = name.strip_prefix(prefix)?;
    let first = suffix.chars().next()?;
    (!first.is_lowercase()).then(|| suffix.to_string())
}

fn parameters<T: SourceTree>(tree: &T, method: NodeId) -> Vec<NodeId> {
    tree.children(method)
        .iter()
        .copied()
        .filter(|&c| tree.kind(c) == NodeKind::ParameterList)
        .flat_map(|list| tree.children(list).iter().copied())
        .filter(|&p| tree.kind(p) == NodeKind::Parameter)
        .collect()
}

/// Children that are neither trivia nor punctuation.
fn significant_children<T: SourceTree>(tree: &T, node: NodeId) -> Vec<NodeId> {
    tree.children(node)
        .iter()
        .copied()
        .filter(|&c| {
            let kind = tree.kind(c);
            !kind.is_trivia() && !matches!(kind, NodeKind::Token(_))
        })
        .collect()
}

fn single_statement<T: SourceTree>(tree: &T, method: NodeId) -> Option<NodeId> {
    let body = tree.body(method)?;
    match significant_children(tree, body)[..] {
        [statement] => Some(statement),
        _ => None,
    }
}

/// `reference` names a field of the class declaring `method`, with the
/// same static-ness as the method.
fn own_field<T, R>(tree: &T, resolver: &R, method: NodeId, reference: NodeId) -> bool
where
    T: SourceTree,
    R: SymbolResolver,
{
    if tree.kind(reference) != NodeKind::Reference {
        return false;
    }
    let Some(field) = resolver.resolve_reference(reference) else {
        return false;
    };
    tree.kind(field) == NodeKind::Field
        && tree.enclosing_class(field) == tree.enclosing_class(method)
        && tree.has_modifier(field, "static") == tree.has_modifier(method, "static")
}
