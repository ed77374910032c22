use crate::ParsedUnit;
use anyhow::{Context, Result};
use ir::{
    ModifierList, NodeId, NodeKind, SourceTree, SyntaxNode, SyntaxTree, TextRange, TokenKind,
    TypeKind, PACKAGE_LOCAL,
};
use tracing::{debug, warn};
use tree_sitter::Node;

/// Grammar nodes kept as opaque leaves.
const LEAF_KINDS: &[&str] = &[
    "type_identifier",
    "scoped_type_identifier",
    "generic_type",
    "array_type",
    "integral_type",
    "floating_point_type",
    "boolean_type",
    "void_type",
    "type_parameters",
    "type_arguments",
    "superclass",
    "super_interfaces",
    "extends_interfaces",
    "permits",
    "throws",
    "dimensions",
    "marker_annotation",
    "annotation",
    "package_declaration",
    "import_declaration",
    "scoped_identifier",
    "text_block",
    "true",
    "false",
];

const COMMENT_KINDS: &[&str] = &["comment", "line_comment", "block_comment"];

/// Grammar nodes lowered as [`NodeKind::Statement`] besides `*_statement`.
const STATEMENT_KINDS: &[&str] = &[
    "catch_clause",
    "finally_clause",
    "switch_expression",
    "switch_block",
    "switch_block_statement_group",
    "switch_rule",
];

/// Parses Java source and lowers the tree-sitter tree into a [`SyntaxTree`].
///
/// Syntax errors do not fail the call: the unit is flagged and the broken
/// regions become [`NodeKind::Error`] leaves.
pub fn parse_java(content: &str, file_path: &str) -> Result<ParsedUnit> {
    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(tree_sitter_java::language())
        .context("load java grammar")?;
    let tree = parser
        .parse(content, None)
        .with_context(|| format!("failed to parse java source: {file_path}"))?;
    let root = tree.root_node();
    let has_errors = root.has_error() || root.is_error();
    if has_errors {
        warn!("java source contains parse errors: {}", file_path);
    }

    let mut lowering = Lowering::new(content, file_path);
    lowering.lower_program(root);
    let mut syntax = lowering.tree;
    syntax.fill_gaps(content);
    debug!(file = file_path, nodes = syntax.len(), "Lowered java source");

    Ok(ParsedUnit {
        file_path: file_path.to_string(),
        source: content.to_string(),
        tree: syntax,
        has_errors,
    })
}

/// Simple name of a type as written: generics, whitespace and package
/// qualifiers are dropped and varargs read as arrays.
///
/// ```text
/// java.util.List<String>  ->  List
/// String...               ->  String[]
/// ```
pub(crate) fn normalize_type(text: &str) -> String {
    let mut out = String::new();
    let mut depth = 0usize;
    for ch in text.chars() {
        match ch {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            c if depth == 0 && !c.is_whitespace() => out.push(c),
            _ => {}
        }
    }
    let out = out.replace("...", "[]");
    match out.rfind('.') {
        Some(idx) => out[idx + 1..].to_string(),
        None => out,
    }
}

fn children_of(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    let children = node.children(&mut cursor).collect();
    children
}

fn is_declaration(kind: &str) -> bool {
    matches!(
        kind,
        "class_declaration"
            | "record_declaration"
            | "interface_declaration"
            | "annotation_type_declaration"
            | "enum_declaration"
            | "enum_constant"
            | "field_declaration"
            | "constant_declaration"
            | "method_declaration"
            | "annotation_type_element_declaration"
            | "constructor_declaration"
            | "compact_constructor_declaration"
            | "static_initializer"
            | "block"
    )
}

fn decl_start(node: Node<'_>, doc: Option<Node<'_>>) -> usize {
    doc.map_or(node.start_byte(), |d| d.start_byte())
}

/// Modifiers the language grants `decl` without them being written.
fn implied_modifiers(
    decl: &str,
    owner: Option<&str>,
    has_body: bool,
    explicit: &ModifierList,
) -> Vec<&'static str> {
    let nested = owner.is_some();
    let in_interface = matches!(
        owner,
        Some("interface_declaration" | "annotation_type_declaration")
    );
    let mut out = Vec::new();
    match decl {
        "interface_declaration" | "annotation_type_declaration" => {
            out.push("abstract");
            if nested {
                out.push("static");
            }
        }
        "enum_declaration" | "record_declaration" => {
            out.push("final");
            if nested {
                out.push("static");
            }
        }
        "enum_constant" => out.extend(["public", "static", "final"]),
        "constructor_declaration" | "compact_constructor_declaration"
            if owner == Some("enum_declaration")
                && explicit.has_modifier_property(PACKAGE_LOCAL) =>
        {
            out.push("private");
        }
        _ => {}
    }
    if in_interface {
        if !explicit.has_modifier_property("private") {
            out.push("public");
        }
        match decl {
            "field_declaration" | "constant_declaration" => out.extend(["static", "final"]),
            "method_declaration" | "annotation_type_element_declaration" if !has_body => {
                out.push("abstract")
            }
            "class_declaration" | "record_declaration" | "enum_declaration"
            | "interface_declaration" | "annotation_type_declaration" => out.push("static"),
            _ => {}
        }
    }
    out
}

struct Lowering<'s> {
    src: &'s str,
    tree: SyntaxTree,
}

impl<'s> Lowering<'s> {
    fn new(src: &'s str, file_path: &str) -> Self {
        Self {
            src,
            tree: SyntaxTree::new(file_path, TextRange::new(0, src.len())),
        }
    }

    fn text(&self, node: Node<'_>) -> &'s str {
        node.utf8_text(self.src.as_bytes()).unwrap_or("")
    }

    fn push(&mut self, parent: NodeId, kind: NodeKind, node: Node<'_>, start: usize) -> NodeId {
        let end = node.end_byte().max(start);
        self.tree
            .push(parent, kind, node.kind(), TextRange::new(start, end))
    }

    fn leaf(&mut self, parent: NodeId, kind: NodeKind, node: Node<'_>) -> NodeId {
        self.push(parent, kind, node, node.start_byte())
    }

    fn update(&mut self, id: NodeId, f: impl FnOnce(&mut SyntaxNode)) {
        if let Some(node) = self.tree.node_mut(id) {
            f(node);
        }
    }

    fn set_name(&mut self, id: NodeId, name: Option<Node<'_>>) {
        let name = name.map(|n| self.text(n).to_string());
        self.update(id, |node| node.name = name);
    }

    fn container(&mut self, node: Node<'_>, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = self.leaf(parent, kind, node);
        self.lower_children(node, id);
        id
    }

    /// Grammar label of the declaration owning `parent` when `parent` is a
    /// class body.
    fn owner_label(&self, parent: NodeId) -> Option<String> {
        if self.tree.kind(parent) != NodeKind::ClassBody {
            return None;
        }
        let owner = self.tree.parent(parent)?;
        self.tree.node(owner).map(|n| n.label.clone())
    }

    fn owner_name(&self, parent: NodeId) -> Option<String> {
        let owner = self.tree.parent(parent)?;
        self.tree.name(owner).map(str::to_string)
    }

    fn modifier_list(&self, node: Node<'_>) -> ModifierList {
        let keywords: Vec<String> = children_of(node)
            .into_iter()
            .find(|c| c.kind() == "modifiers")
            .map(|m| {
                children_of(m)
                    .into_iter()
                    .filter(|c| !c.is_named())
                    .map(|c| c.kind().to_string())
                    .collect()
            })
            .unwrap_or_default();
        ModifierList::new(keywords)
    }

    fn declared_modifiers(&self, node: Node<'_>, parent: NodeId, has_body: bool) -> ModifierList {
        let mut modifiers = self.modifier_list(node);
        let owner = self.owner_label(parent);
        for keyword in implied_modifiers(node.kind(), owner.as_deref(), has_body, &modifiers) {
            modifiers.add_implicit(keyword);
        }
        modifiers
    }

    fn supertypes(&self, node: Node<'_>) -> Vec<String> {
        let mut out = Vec::new();
        for child in children_of(node) {
            if matches!(
                child.kind(),
                "superclass" | "super_interfaces" | "extends_interfaces"
            ) {
                self.collect_type_names(child, &mut out);
            }
        }
        out
    }

    fn collect_type_names(&self, node: Node<'_>, out: &mut Vec<String>) {
        for child in children_of(node) {
            match child.kind() {
                "type_list" => self.collect_type_names(child, out),
                "type_identifier" | "scoped_type_identifier" | "generic_type" => {
                    out.push(normalize_type(self.text(child)))
                }
                _ => {}
            }
        }
    }

    fn is_doc_comment(&self, node: Node<'_>) -> bool {
        COMMENT_KINDS.contains(&node.kind()) && self.text(node).starts_with("/**")
    }

    fn lower_program(&mut self, root: Node<'_>) {
        let file = self.tree.root();
        let package = children_of(root)
            .into_iter()
            .find(|c| c.kind() == "package_declaration")
            .and_then(|p| {
                children_of(p)
                    .into_iter()
                    .find(|n| matches!(n.kind(), "scoped_identifier" | "identifier"))
            });
        self.set_name(file, package);
        self.lower_children(root, file);
    }

    /// Lowers the children of `node` under `parent`. In files and class
    /// bodies a doc comment directly in front of a declaration becomes the
    /// first child of that declaration.
    fn lower_children(&mut self, node: Node<'_>, parent: NodeId) {
        let attach_docs = matches!(
            self.tree.kind(parent),
            NodeKind::File | NodeKind::ClassBody
        );
        let mut doc: Option<Node<'_>> = None;
        for child in children_of(node) {
            if attach_docs && self.is_doc_comment(child) {
                if let Some(prev) = doc.replace(child) {
                    self.lower(prev, parent, None);
                }
                continue;
            }
            match doc.take() {
                Some(d)
                    if is_declaration(child.kind())
                        && self
                            .src
                            .get(d.end_byte()..child.start_byte())
                            .is_some_and(|gap| gap.trim().is_empty()) =>
                {
                    self.lower(child, parent, Some(d));
                }
                Some(d) => {
                    self.lower(d, parent, None);
                    self.lower(child, parent, None);
                }
                None => self.lower(child, parent, None),
            }
        }
        if let Some(d) = doc {
            self.lower(d, parent, None);
        }
    }

    fn lower(&mut self, node: Node<'_>, parent: NodeId, doc: Option<Node<'_>>) {
        if !self.lower_declaration(node, parent, doc) {
            self.lower_code(node, parent);
        }
    }

    /// Lowers types, members and class bodies. These nest only as deep as
    /// the declarations of the file, so they recurse. Returns false when
    /// `node` is anything else.
    fn lower_declaration(&mut self, node: Node<'_>, parent: NodeId, doc: Option<Node<'_>>) -> bool {
        if node.is_missing() || node.is_error() {
            return false;
        }
        match node.kind() {
            "class_declaration" | "record_declaration" => {
                self.lower_type(node, parent, TypeKind::Class, doc)
            }
            "interface_declaration" | "annotation_type_declaration" => {
                self.lower_type(node, parent, TypeKind::Interface, doc)
            }
            "enum_declaration" => self.lower_type(node, parent, TypeKind::Enum, doc),
            "class_body" | "interface_body" | "enum_body" | "annotation_type_body" => {
                self.container(node, parent, NodeKind::ClassBody);
            }
            "enum_body_declarations" => self.lower_children(node, parent),
            "enum_constant" => self.lower_enum_constant(node, parent, doc),
            "field_declaration" | "constant_declaration" => self.lower_field(node, parent, doc),
            "method_declaration" | "annotation_type_element_declaration" => {
                self.lower_method(node, parent, NodeKind::Method, doc)
            }
            "constructor_declaration" | "compact_constructor_declaration" => {
                self.lower_method(node, parent, NodeKind::Constructor, doc)
            }
            "static_initializer" => self.lower_initializer(node, parent, doc),
            "block" if self.tree.kind(parent) == NodeKind::ClassBody => {
                self.lower_initializer(node, parent, doc)
            }
            _ => return false,
        }
        true
    }

    /// Lowers statements and expressions with an explicit work stack.
    /// Expression chains can nest tens of thousands of levels deep.
    fn lower_code<'t>(&mut self, node: Node<'t>, parent: NodeId) {
        let mut pending = vec![Task::Lower(node, parent)];
        let mut next = Vec::new();
        while let Some(task) = pending.pop() {
            match task {
                Task::Lower(node, parent) => {
                    if !self.lower_declaration(node, parent, None) {
                        self.lower_step(node, parent, &mut next);
                    }
                }
                Task::Name(node, parent) => {
                    let ident = self.leaf(parent, NodeKind::Identifier, node);
                    self.set_name(ident, Some(node));
                }
                Task::Local(node, parent, detail) => {
                    let var = self.leaf(parent, NodeKind::LocalVariable, node);
                    let name = node.child_by_field_name("name");
                    self.set_name(var, name);
                    self.update(var, |n| n.detail = detail);
                    let value = node.child_by_field_name("value");
                    schedule_parts(node, var, name, value, Slot::Body, &mut next);
                }
                Task::Mark(owner, slot) => {
                    let last = self.tree.last_child(owner);
                    self.update(owner, |n| match slot {
                        Slot::Body => n.body = last,
                        Slot::Qualifier => n.qualifier = last,
                    });
                }
            }
            // Children run before later siblings, keeping source order.
            pending.extend(next.drain(..).rev());
        }
    }

    /// Pushes the node for one statement or expression and schedules its
    /// children.
    fn lower_step<'t>(&mut self, node: Node<'t>, parent: NodeId, out: &mut Vec<Task<'t>>) {
        if node.is_missing() || node.is_error() {
            self.leaf(parent, NodeKind::Error, node);
            return;
        }
        let kind = node.kind();
        let id = match kind {
            "block" | "constructor_body" => self.leaf(parent, NodeKind::Block, node),
            "expression_statement" => self.leaf(parent, NodeKind::ExpressionStatement, node),
            "return_statement" => self.leaf(parent, NodeKind::ReturnStatement, node),
            "argument_list" => self.leaf(parent, NodeKind::ArgumentList, node),
            "assignment_expression" => {
                let id = self.leaf(parent, NodeKind::Assignment, node);
                let operator = node
                    .child_by_field_name("operator")
                    .map(|op| self.text(op).to_string());
                self.update(id, |n| n.detail = operator);
                id
            }
            "local_variable_declaration" => return self.lower_local(node, parent, out),
            "object_creation_expression" => return self.lower_new(node, parent, out),
            "method_invocation" => return self.lower_call(node, parent, out),
            "explicit_constructor_invocation" => {
                return self.lower_constructor_call(node, parent, out)
            }
            "field_access" => return self.lower_field_access(node, parent, out),
            "identifier" => {
                let id = self.leaf(parent, NodeKind::Reference, node);
                self.set_name(id, Some(node));
                return;
            }
            _ => {
                if let Some(leaf) = leaf_kind(node) {
                    let id = self.leaf(parent, leaf, node);
                    if kind.ends_with("_literal") {
                        let literal = self.text(node).to_string();
                        self.update(id, |n| n.detail = Some(literal));
                    }
                    return;
                }
                let container = if kind.ends_with("_statement") || STATEMENT_KINDS.contains(&kind) {
                    NodeKind::Statement
                } else {
                    NodeKind::Other
                };
                self.leaf(parent, container, node)
            }
        };
        out.extend(children_of(node).into_iter().map(|child| Task::Lower(child, id)));
    }

    fn lower_type(&mut self, node: Node<'_>, parent: NodeId, kind: TypeKind, doc: Option<Node<'_>>) {
        let modifiers = self.declared_modifiers(node, parent, true);
        let supertypes = self.supertypes(node);
        let id = self.push(parent, NodeKind::Type(kind), node, decl_start(node, doc));
        if let Some(d) = doc {
            self.leaf(id, NodeKind::Comment, d);
        }
        let name = node.child_by_field_name("name");
        self.set_name(id, name);
        let mut body = None;
        for child in children_of(node) {
            if Some(child) == name {
                let ident = self.leaf(id, NodeKind::Identifier, child);
                self.set_name(ident, Some(child));
            } else {
                self.lower(child, id, None);
                if Some(child) == node.child_by_field_name("body") {
                    body = self.tree.last_child(id);
                }
            }
        }
        self.update(id, |n| {
            n.modifiers = Some(modifiers);
            n.supertypes = supertypes;
            n.body = body;
        });
    }

    fn lower_enum_constant(&mut self, node: Node<'_>, parent: NodeId, doc: Option<Node<'_>>) {
        let modifiers = self.declared_modifiers(node, parent, false);
        let enum_name = self.owner_name(parent);
        let id = self.push(parent, NodeKind::Field, node, decl_start(node, doc));
        if let Some(d) = doc {
            self.leaf(id, NodeKind::Comment, d);
        }
        let name = node.child_by_field_name("name");
        self.set_name(id, name);
        let arguments = node.child_by_field_name("arguments");
        let class_body = node.child_by_field_name("body");

        let mut init = None;
        if let Some(first) = arguments.or(class_body) {
            let span = TextRange::new(first.start_byte(), node.end_byte());
            init = Some(
                self.tree
                    .push(id, NodeKind::Other, "enum_constant_initializer", span),
            );
        }
        for child in children_of(node) {
            match init {
                Some(init) if Some(child) == class_body => {
                    let anon = self.tree.push(
                        init,
                        NodeKind::AnonymousClass,
                        "anonymous_class",
                        TextRange::new(child.start_byte(), child.end_byte()),
                    );
                    let supertypes: Vec<String> = enum_name.iter().cloned().collect();
                    self.update(anon, |n| n.supertypes = supertypes);
                    self.lower(child, anon, None);
                    let body = self.tree.last_child(anon);
                    self.update(anon, |n| n.body = body);
                }
                Some(init) if Some(child) == arguments => self.lower(child, init, None),
                _ if Some(child) == name => {
                    let ident = self.leaf(id, NodeKind::Identifier, child);
                    self.set_name(ident, Some(child));
                }
                _ => self.lower(child, id, None),
            }
        }
        self.update(id, |n| {
            n.modifiers = Some(modifiers);
            n.detail = enum_name;
            n.body = init;
        });
    }

    /// Splits a field declaration into one `Field` node per declarator.
    ///
    /// The first node also holds the modifiers and the type, commas become
    /// siblings and the terminating semicolon belongs to the last node.
    fn lower_field(&mut self, node: Node<'_>, parent: NodeId, doc: Option<Node<'_>>) {
        let modifiers = self.declared_modifiers(node, parent, false);
        let type_text = node
            .child_by_field_name("type")
            .map(|t| self.text(t).to_string());
        let mut header: Vec<Node<'_>> = Vec::new();
        let mut current: Option<NodeId> = None;
        let mut seen_first = false;

        for child in children_of(node) {
            if child.kind() == "variable_declarator" && !child.is_missing() {
                let start = if seen_first {
                    child.start_byte()
                } else {
                    decl_start(node, doc)
                };
                let id = self.push(parent, NodeKind::Field, child, start);
                if !seen_first {
                    if let Some(d) = doc {
                        self.leaf(id, NodeKind::Comment, d);
                    }
                    for h in header.drain(..) {
                        self.lower(h, id, None);
                    }
                }
                self.lower_declarator(child, id);
                let (modifiers, detail) = (modifiers.clone(), type_text.clone());
                self.update(id, |n| {
                    n.modifiers = Some(modifiers);
                    n.detail = detail;
                });
                current = Some(id);
                seen_first = true;
                continue;
            }
            match current {
                Some(_) if child.kind() == "," && !child.is_missing() => {
                    self.leaf(parent, NodeKind::Token(TokenKind::Comma), child);
                    current = None;
                }
                Some(field) => {
                    self.lower(child, field, None);
                    self.tree.extend_to(field, child.end_byte());
                }
                None if seen_first => self.lower(child, parent, None),
                None => header.push(child),
            }
        }
        for h in header {
            self.lower(h, parent, None);
        }
    }

    /// Lowers a variable declarator into `owner`, recording its name and
    /// initializer.
    fn lower_declarator(&mut self, declarator: Node<'_>, owner: NodeId) {
        let name = declarator.child_by_field_name("name");
        let value = declarator.child_by_field_name("value");
        self.set_name(owner, name);
        let mut body = None;
        for child in children_of(declarator) {
            if Some(child) == name {
                let ident = self.leaf(owner, NodeKind::Identifier, child);
                self.set_name(ident, Some(child));
            } else {
                self.lower(child, owner, None);
                if Some(child) == value {
                    body = self.tree.last_child(owner);
                }
            }
        }
        self.update(owner, |n| n.body = body);
    }

    fn lower_method(&mut self, node: Node<'_>, parent: NodeId, kind: NodeKind, doc: Option<Node<'_>>) {
        let body_node = node.child_by_field_name("body");
        let modifiers = self.declared_modifiers(node, parent, body_node.is_some());
        let return_type = node
            .child_by_field_name("type")
            .map(|t| self.text(t).to_string());
        let id = self.push(parent, kind, node, decl_start(node, doc));
        if let Some(d) = doc {
            self.leaf(id, NodeKind::Comment, d);
        }
        let name = node.child_by_field_name("name");
        self.set_name(id, name);
        let mut body = None;
        for child in children_of(node) {
            if Some(child) == name {
                let ident = self.leaf(id, NodeKind::Identifier, child);
                self.set_name(ident, Some(child));
            } else if child.kind() == "formal_parameters" {
                self.lower_parameters(child, id);
            } else {
                self.lower(child, id, None);
                if Some(child) == body_node {
                    body = self.tree.last_child(id);
                }
            }
        }
        self.update(id, |n| {
            n.modifiers = Some(modifiers);
            n.detail = return_type;
            n.body = body;
        });
    }

    fn lower_parameters(&mut self, node: Node<'_>, method: NodeId) {
        let list = self.leaf(method, NodeKind::ParameterList, node);
        for child in children_of(node) {
            match child.kind() {
                "formal_parameter" => {
                    let param = self.leaf(list, NodeKind::Parameter, child);
                    self.set_name(param, child.child_by_field_name("name"));
                    let ty = child
                        .child_by_field_name("type")
                        .map(|t| self.text(t).to_string());
                    self.update(param, |n| n.detail = ty);
                }
                "spread_parameter" => {
                    let param = self.leaf(list, NodeKind::Parameter, child);
                    let parts = children_of(child);
                    let name = parts
                        .iter()
                        .find(|c| c.kind() == "variable_declarator")
                        .and_then(|d| d.child_by_field_name("name"));
                    self.set_name(param, name);
                    let ty = parts
                        .iter()
                        .find(|c| c.is_named() && !matches!(c.kind(), "modifiers" | "variable_declarator"))
                        .map(|t| format!("{}...", self.text(*t)));
                    self.update(param, |n| n.detail = ty);
                }
                _ => self.lower(child, list, None),
            }
        }
    }

    fn lower_initializer(&mut self, node: Node<'_>, parent: NodeId, doc: Option<Node<'_>>) {
        let id = self.push(parent, NodeKind::Initializer, node, decl_start(node, doc));
        if let Some(d) = doc {
            self.leaf(id, NodeKind::Comment, d);
        }
        let mut modifiers = ModifierList::default();
        let body = if node.kind() == "static_initializer" {
            modifiers = ModifierList::new(["static"]);
            for child in children_of(node) {
                if child.kind() == "static" {
                    self.leaf(id, NodeKind::ModifierList, child);
                } else {
                    self.lower(child, id, None);
                }
            }
            self.tree
                .children(id)
                .iter()
                .copied()
                .find(|&c| self.tree.kind(c) == NodeKind::Block)
        } else {
            Some(self.container(node, id, NodeKind::Block))
        };
        self.update(id, |n| {
            n.modifiers = Some(modifiers);
            n.body = body;
        });
    }

    fn lower_local<'t>(&mut self, node: Node<'t>, parent: NodeId, out: &mut Vec<Task<'t>>) {
        let stmt = self.leaf(parent, NodeKind::DeclarationStatement, node);
        let type_text = node
            .child_by_field_name("type")
            .map(|t| self.text(t).to_string());
        for child in children_of(node) {
            if child.kind() == "variable_declarator" && !child.is_missing() {
                out.push(Task::Local(child, stmt, type_text.clone()));
            } else {
                out.push(Task::Lower(child, stmt));
            }
        }
    }

    /// Object creation. With a class body, the anonymous class spans from
    /// the instantiated type to the closing brace.
    fn lower_new<'t>(&mut self, node: Node<'t>, parent: NodeId, out: &mut Vec<Task<'t>>) {
        let id = self.leaf(parent, NodeKind::NewExpression, node);
        let children = children_of(node);
        let class_body = children.iter().copied().find(|c| c.kind() == "class_body");
        let Some(class_body) = class_body else {
            out.extend(children.into_iter().map(|child| Task::Lower(child, id)));
            return;
        };
        let base = node.child_by_field_name("type");
        let start = base.map_or(class_body.start_byte(), |t| t.start_byte());
        let anon = self.tree.push(
            id,
            NodeKind::AnonymousClass,
            "anonymous_class",
            TextRange::new(start, node.end_byte()),
        );
        let base_text = base.map(|t| self.text(t).to_string());
        let supertypes: Vec<String> = base_text.iter().map(|t| normalize_type(t)).collect();
        self.update(anon, |n| {
            n.detail = base_text;
            n.supertypes = supertypes;
        });
        for child in children {
            if child.start_byte() >= start {
                out.push(Task::Lower(child, anon));
                if child == class_body {
                    out.push(Task::Mark(anon, Slot::Body));
                }
            } else {
                out.push(Task::Lower(child, id));
            }
        }
    }

    fn lower_call<'t>(&mut self, node: Node<'t>, parent: NodeId, out: &mut Vec<Task<'t>>) {
        let id = self.leaf(parent, NodeKind::MethodCall, node);
        let name = node.child_by_field_name("name");
        self.set_name(id, name);
        let object = node.child_by_field_name("object");
        schedule_parts(node, id, name, object, Slot::Qualifier, out);
    }

    /// `this(...)` and `super(...)` become a statement holding a call named
    /// after the keyword.
    fn lower_constructor_call<'t>(
        &mut self,
        node: Node<'t>,
        parent: NodeId,
        out: &mut Vec<Task<'t>>,
    ) {
        let stmt = self.leaf(parent, NodeKind::ExpressionStatement, node);
        let keyword = node.child_by_field_name("constructor");
        let object = node.child_by_field_name("object");
        let end = node
            .child_by_field_name("arguments")
            .map_or(node.end_byte(), |a| a.end_byte());
        let call = self.tree.push(
            stmt,
            NodeKind::MethodCall,
            node.kind(),
            TextRange::new(node.start_byte(), end),
        );
        self.set_name(call, keyword);
        for child in children_of(node) {
            if child.start_byte() >= end {
                out.push(Task::Lower(child, stmt));
                continue;
            }
            out.push(Task::Lower(child, call));
            if Some(child) == object {
                out.push(Task::Mark(call, Slot::Qualifier));
            }
        }
    }

    fn lower_field_access<'t>(&mut self, node: Node<'t>, parent: NodeId, out: &mut Vec<Task<'t>>) {
        let id = self.leaf(parent, NodeKind::Reference, node);
        let field = node.child_by_field_name("field");
        self.set_name(id, field);
        let object = node.child_by_field_name("object");
        schedule_parts(node, id, field, object, Slot::Qualifier, out);
    }
}

/// Unit of work for [`Lowering::lower_code`].
enum Task<'t> {
    Lower(Node<'t>, NodeId),
    /// Identifier leaf naming its parent.
    Name(Node<'t>, NodeId),
    /// Local variable declarator and the declared type.
    Local(Node<'t>, NodeId, Option<String>),
    /// Records the current last child of the node, run once the subtree
    /// scheduled before it is lowered.
    Mark(NodeId, Slot),
}

#[derive(Clone, Copy)]
enum Slot {
    Body,
    Qualifier,
}

/// Schedules the children of `node` under `id`. `name` becomes an
/// identifier leaf and the node lowered from `marked` lands in `slot`.
fn schedule_parts<'t>(
    node: Node<'t>,
    id: NodeId,
    name: Option<Node<'t>>,
    marked: Option<Node<'t>>,
    slot: Slot,
    out: &mut Vec<Task<'t>>,
) {
    for child in children_of(node) {
        if Some(child) == name {
            out.push(Task::Name(child, id));
            continue;
        }
        out.push(Task::Lower(child, id));
        if Some(child) == marked {
            out.push(Task::Mark(id, slot));
        }
    }
}

/// Node kind for grammar nodes lowered without children.
fn leaf_kind(node: Node<'_>) -> Option<NodeKind> {
    let kind = node.kind();
    let leaf = match kind {
        "this" => NodeKind::This,
        "super" => NodeKind::Super,
        "modifiers" => NodeKind::ModifierList,
        "{" => NodeKind::Token(TokenKind::LBrace),
        "}" => NodeKind::Token(TokenKind::RBrace),
        "," => NodeKind::Token(TokenKind::Comma),
        ";" => NodeKind::Token(TokenKind::Semicolon),
        _ if COMMENT_KINDS.contains(&kind) => NodeKind::Comment,
        _ if !node.is_named() => NodeKind::Token(TokenKind::Other),
        _ if kind.ends_with("_literal") || LEAF_KINDS.contains(&kind) => NodeKind::Other,
        _ => return None,
    };
    Some(leaf)
}
