//! Name resolution limited to a single Java source unit.
//!
//! Types are matched by simple name. Calls pick overloads by argument
//! count, then by the types literals and declared variables give their
//! arguments; overrides match normalized parameter types. Anything declared
//! outside the unit stays unresolved.

use super::parser::normalize_type;
use ir::{NodeId, NodeKind, SourceTree, SymbolResolver, SyntaxTree};
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::trace;

const PRIMITIVES: [&str; 8] = [
    "boolean", "byte", "short", "char", "int", "long", "float", "double",
];

const BOXES: [(&str, &str); 8] = [
    ("Boolean", "boolean"),
    ("Byte", "byte"),
    ("Short", "short"),
    ("Character", "char"),
    ("Integer", "int"),
    ("Long", "long"),
    ("Float", "float"),
    ("Double", "double"),
];

/// Parameter types a `String` argument can be passed to.
const STRING_TARGETS: [&str; 4] = ["String", "CharSequence", "Comparable", "Serializable"];

pub struct JavaResolver<'t> {
    tree: &'t SyntaxTree,
    /// Named type declarations by simple name.
    classes: HashMap<String, Vec<NodeId>>,
}

impl<'t> JavaResolver<'t> {
    pub fn new(tree: &'t SyntaxTree) -> Self {
        let mut classes: HashMap<String, Vec<NodeId>> = HashMap::new();
        for node in tree.nodes() {
            if let (NodeKind::Type(_), Some(name)) = (node.kind, node.name.as_ref()) {
                classes.entry(name.clone()).or_default().push(node.id);
            }
        }
        Self { tree, classes }
    }

    fn class_named(&self, name: &str) -> Option<NodeId> {
        self.classes.get(name).and_then(|ids| ids.first().copied())
    }

    /// Member declarations of a named or anonymous class.
    fn members(&self, class: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let body = self
            .tree
            .body(class)
            .filter(|&b| self.tree.kind(b) == NodeKind::ClassBody);
        body.into_iter()
            .flat_map(move |b| self.tree.children(b).iter().copied())
    }

    fn supertypes(&self, class: NodeId) -> Vec<NodeId> {
        self.tree
            .node(class)
            .map(|n| {
                n.supertypes
                    .iter()
                    .filter_map(|name| self.class_named(name))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// `class` followed by all its supertypes known to the unit, breadth first.
    fn hierarchy(&self, class: NodeId) -> Vec<NodeId> {
        let mut seen = HashSet::new();
        let mut order = Vec::new();
        let mut queue = VecDeque::from([class]);
        while let Some(current) = queue.pop_front() {
            if !seen.insert(current) {
                continue;
            }
            order.push(current);
            queue.extend(self.supertypes(current));
        }
        order
    }

    fn parameters(&self, method: NodeId) -> Vec<NodeId> {
        self.tree
            .children(method)
            .iter()
            .copied()
            .find(|&c| self.tree.kind(c) == NodeKind::ParameterList)
            .map(|list| {
                self.tree
                    .children(list)
                    .iter()
                    .copied()
                    .filter(|&p| self.tree.kind(p) == NodeKind::Parameter)
                    .collect()
            })
            .unwrap_or_default()
    }

    fn parameter_types(&self, method: NodeId) -> Vec<String> {
        self.parameters(method)
            .into_iter()
            .map(|p| normalize_type(self.tree.detail(p).unwrap_or("")))
            .collect()
    }

    fn accepts(&self, method: NodeId, arg_count: usize) -> bool {
        let params = self.parameters(method);
        let varargs = params
            .last()
            .and_then(|&p| self.tree.detail(p))
            .is_some_and(|ty| ty.ends_with("..."));
        if varargs {
            arg_count + 1 >= params.len()
        } else {
            arg_count == params.len()
        }
    }

    /// Argument expressions of a call, without separators.
    fn arguments(&self, call: NodeId) -> Vec<NodeId> {
        self.tree
            .children(call)
            .iter()
            .copied()
            .find(|&c| self.tree.kind(c) == NodeKind::ArgumentList)
            .map(|args| {
                self.tree
                    .children(args)
                    .iter()
                    .copied()
                    .filter(|&a| {
                        !matches!(
                            self.tree.kind(a),
                            NodeKind::Token(_)
                                | NodeKind::Whitespace
                                | NodeKind::Comment
                                | NodeKind::Error
                        )
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Static type of an argument when it is a literal or names a declared
    /// variable. `null` reads as `"null"`.
    fn argument_type(&self, arg: NodeId) -> Option<String> {
        let node = self.tree.node(arg)?;
        let text = node.detail.as_deref().unwrap_or("");
        let ty = match node.label.as_str() {
            "string_literal" | "text_block" => "String",
            "character_literal" => "char",
            "decimal_integer_literal"
            | "hex_integer_literal"
            | "octal_integer_literal"
            | "binary_integer_literal" => {
                if text.ends_with(['l', 'L']) {
                    "long"
                } else {
                    "int"
                }
            }
            "decimal_floating_point_literal" | "hex_floating_point_literal" => {
                if text.ends_with(['f', 'F']) {
                    "float"
                } else {
                    "double"
                }
            }
            "true" | "false" => "boolean",
            "null_literal" => "null",
            _ if node.kind == NodeKind::Reference => {
                let declared = self.resolve_reference(arg)?;
                let ty = normalize_type(self.tree.detail(declared)?);
                return (ty != "var").then_some(ty);
            }
            _ => return None,
        };
        Some(ty.to_string())
    }

    /// Whether every typed argument fits the parameters of `method`, or
    /// with `exact` matches them without conversion.
    fn fits(&self, method: NodeId, args: &[Option<String>], exact: bool) -> bool {
        let params = self.parameter_types(method);
        let varargs = self
            .parameters(method)
            .last()
            .and_then(|&p| self.tree.detail(p))
            .is_some_and(|ty| ty.ends_with("..."));
        args.iter().enumerate().all(|(i, arg)| {
            let Some(arg) = arg.as_deref() else {
                return true;
            };
            let fits_param = |param: &str| {
                if exact {
                    param == arg
                } else {
                    accepts_argument(param, arg)
                }
            };
            match params.get(i) {
                _ if varargs && i + 1 >= params.len() => params.last().is_some_and(|last| {
                    fits_param(last) || fits_param(last.trim_end_matches("[]"))
                }),
                Some(param) => fits_param(param),
                None => false,
            }
        })
    }

    /// Resolves `name` among the members of `classes` for `call`. Overloads
    /// with the right arity are narrowed by argument types; a call that
    /// still matches several stays unresolved.
    fn find_method(&self, classes: &[NodeId], kind: NodeKind, name: &str, call: NodeId) -> Option<NodeId> {
        let args: Vec<Option<String>> = self
            .arguments(call)
            .into_iter()
            .map(|a| self.argument_type(a))
            .collect();
        let mut signatures = HashSet::new();
        let mut candidates = Vec::new();
        for &class in classes {
            for m in self.members(class) {
                // an override hides the method it overrides
                if self.tree.kind(m) == kind
                    && self.tree.name(m) == Some(name)
                    && self.accepts(m, args.len())
                    && signatures.insert(self.parameter_types(m))
                {
                    candidates.push(m);
                }
            }
        }
        if candidates.len() <= 1 {
            return candidates.first().copied();
        }
        let fitting: Vec<NodeId> = candidates
            .into_iter()
            .filter(|&m| self.fits(m, &args, false))
            .collect();
        let chosen = match fitting.as_slice() {
            [only] => Some(*only),
            _ => {
                let exact: Vec<NodeId> = fitting
                    .iter()
                    .copied()
                    .filter(|&m| self.fits(m, &args, true))
                    .collect();
                match exact.as_slice() {
                    [only] => Some(*only),
                    _ => None,
                }
            }
        };
        if chosen.is_none() {
            trace!(call = call.0, name, "Ambiguous overload left unresolved");
        }
        chosen
    }

    fn find_field(&self, class: NodeId, name: &str) -> Option<NodeId> {
        self.hierarchy(class).into_iter().find_map(|c| {
            self.members(c)
                .find(|&m| self.tree.kind(m) == NodeKind::Field && self.tree.name(m) == Some(name))
        })
    }

    /// Locals declared before `reference` in enclosing blocks, then
    /// parameters, then fields of the enclosing classes inside out.
    fn resolve_name(&self, reference: NodeId, name: &str) -> Option<NodeId> {
        let offset = self.tree.span(reference)?.start;
        let mut current = self.tree.parent(reference);
        while let Some(node) = current {
            match self.tree.kind(node) {
                NodeKind::Block => {
                    let local = self
                        .tree
                        .children(node)
                        .iter()
                        .copied()
                        .filter(|&s| self.tree.kind(s) == NodeKind::DeclarationStatement)
                        .filter(|&s| self.tree.span(s).is_some_and(|r| r.start < offset))
                        .flat_map(|s| self.tree.children(s).iter().copied())
                        .filter(|&v| {
                            self.tree.kind(v) == NodeKind::LocalVariable
                                && self.tree.name(v) == Some(name)
                        })
                        .last();
                    if local.is_some() {
                        return local;
                    }
                }
                NodeKind::Method | NodeKind::Constructor => {
                    let param = self
                        .parameters(node)
                        .into_iter()
                        .find(|&p| self.tree.name(p) == Some(name));
                    if param.is_some() {
                        return param;
                    }
                }
                kind if kind.is_class_like() => {
                    if let Some(field) = self.find_field(node, name) {
                        return Some(field);
                    }
                }
                _ => {}
            }
            current = self.tree.parent(node);
        }
        None
    }

    /// `this(...)` targets the enclosing class, `super(...)` its supertypes.
    fn resolve_constructor_call(&self, call: NodeId, keyword: &str) -> Option<NodeId> {
        let class = self.tree.enclosing_class(call)?;
        let targets = match keyword {
            "this" => vec![class],
            _ => self.supertypes(class),
        };
        targets.into_iter().find_map(|target| {
            let name = self.tree.name(target)?;
            self.find_method(&[target], NodeKind::Constructor, name, call)
        })
    }
}

impl SymbolResolver for JavaResolver<'_> {
    fn resolve_reference(&self, reference: NodeId) -> Option<NodeId> {
        if self.tree.kind(reference) != NodeKind::Reference {
            return None;
        }
        let name = self.tree.name(reference)?;
        let qualifier = self.tree.node(reference)?.qualifier;
        match qualifier.map(|q| self.tree.kind(q)) {
            None => self.resolve_name(reference, name),
            Some(NodeKind::This) => {
                let class = self.tree.enclosing_class(reference)?;
                self.find_field(class, name)
            }
            _ => None,
        }
    }

    fn resolve_call(&self, call: NodeId) -> Option<NodeId> {
        if self.tree.kind(call) != NodeKind::MethodCall {
            return None;
        }
        let name = self.tree.name(call)?;
        let node = self.tree.node(call)?;
        if node.label == "explicit_constructor_invocation" {
            return self.resolve_constructor_call(call, name);
        }
        match node.qualifier.map(|q| (q, self.tree.kind(q))) {
            None => {
                let mut class = self.tree.enclosing_class(call);
                while let Some(c) = class {
                    let found = self.find_method(&self.hierarchy(c), NodeKind::Method, name, call);
                    if found.is_some() {
                        return found;
                    }
                    class = self.tree.enclosing_class(c);
                }
                None
            }
            Some((_, NodeKind::This)) => {
                let class = self.tree.enclosing_class(call)?;
                self.find_method(&self.hierarchy(class), NodeKind::Method, name, call)
            }
            Some((_, NodeKind::Super)) => {
                let class = self.tree.enclosing_class(call)?;
                let supers: Vec<NodeId> = self
                    .supertypes(class)
                    .into_iter()
                    .flat_map(|s| self.hierarchy(s))
                    .collect();
                self.find_method(&supers, NodeKind::Method, name, call)
            }
            Some((q, NodeKind::Reference)) => {
                let qualifier = self.tree.node(q)?;
                if qualifier.qualifier.is_some() {
                    return None;
                }
                let type_name = qualifier.name.as_deref()?;
                // a variable of the same name shadows the type
                if self.resolve_name(q, type_name).is_some() {
                    return None;
                }
                let class = self.class_named(type_name)?;
                self.find_method(&self.hierarchy(class), NodeKind::Method, name, call)
            }
            _ => None,
        }
    }

    fn find_super_method(&self, method: NodeId) -> Option<NodeId> {
        if self.tree.kind(method) != NodeKind::Method
            || self.tree.has_modifier(method, "static")
            || self.tree.has_modifier(method, "private")
        {
            return None;
        }
        let name = self.tree.name(method)?;
        let signature = self.parameter_types(method);
        let class = self.tree.enclosing_class(method)?;
        self.hierarchy(class).into_iter().skip(1).find_map(|base| {
            self.members(base).find(|&m| {
                self.tree.kind(m) == NodeKind::Method
                    && self.tree.name(m) == Some(name)
                    && !self.tree.has_modifier(m, "private")
                    && !self.tree.has_modifier(m, "static")
                    && self.parameter_types(m) == signature
            })
        })
    }
}

fn primitive_of(ty: &str) -> Option<&'static str> {
    PRIMITIVES
        .iter()
        .copied()
        .find(|&p| p == ty)
        .or_else(|| BOXES.iter().find(|(boxed, _)| *boxed == ty).map(|(_, p)| *p))
}

/// Widening primitive conversion, or identity.
fn widens(from: &str, to: &str) -> bool {
    const NUMERIC: [&str; 6] = ["byte", "short", "int", "long", "float", "double"];
    if from == to {
        return true;
    }
    let rank = |ty: &str| NUMERIC.iter().position(|&n| n == ty);
    let from_rank = if from == "char" { rank("int") } else { rank(from) };
    matches!((from_rank, rank(to)), (Some(f), Some(t)) if t >= f)
}

/// Whether an argument of static type `arg` can be passed to a parameter
/// of type `param`. Class types the unit cannot relate are accepted.
fn accepts_argument(param: &str, arg: &str) -> bool {
    if param == arg || param == "Object" {
        return true;
    }
    if arg == "null" {
        return !PRIMITIVES.contains(&param);
    }
    if arg == "String" {
        return STRING_TARGETS.contains(&param);
    }
    let Some(arg_primitive) = primitive_of(arg) else {
        return primitive_of(param).is_none() && param != "String";
    };
    if PRIMITIVES.contains(&param) {
        return widens(arg_primitive, param);
    }
    match primitive_of(param) {
        Some(boxed) => boxed == arg_primitive,
        None => param != "String",
    }
}
