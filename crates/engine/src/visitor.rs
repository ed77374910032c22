//! Walks a source tree and reports arrangement entries to a collector.

use crate::body::MethodBodyScanner;
use crate::collector::{ArrangementCollector, OverriddenMethod, NO_CONTENT};
use crate::properties::{detect_accessor, Accessor};
use crate::settings::{ArrangementSettings, GroupingRule};
use ir::{
    ArrangementEntry, Document, EntryId, EntryType, Modifier, NodeId, NodeKind, SourceTree,
    SymbolResolver, TextRange, TokenKind, TypeKind, PACKAGE_LOCAL,
};
use std::collections::HashMap;
use tracing::trace;

/// Modifier keywords and the entry modifier each one maps to.
const MODIFIERS: &[(&str, Modifier)] = &[
    ("public", Modifier::Public),
    ("protected", Modifier::Protected),
    ("private", Modifier::Private),
    (PACKAGE_LOCAL, Modifier::PackagePrivate),
    ("static", Modifier::Static),
    ("final", Modifier::Final),
    ("transient", Modifier::Transient),
    ("volatile", Modifier::Volatile),
    ("synchronized", Modifier::Synchronized),
    ("abstract", Modifier::Abstract),
];

/// Builds the entry forest of one source unit.
///
/// Only declarations whose span intersects one of `ranges` get an entry;
/// their subtrees are skipped otherwise. With a [`Document`], arrangeable
/// entries are grown to whole lines and flagged as not arrangeable when
/// they share a line with other code.
pub struct EntryGraphBuilder<'a, T, R, C>
where
    T: SourceTree,
    R: SymbolResolver,
    C: ArrangementCollector,
{
    tree: &'a T,
    resolver: &'a R,
    collector: &'a mut C,
    document: Option<&'a Document>,
    ranges: &'a [TextRange],
    settings: &'a ArrangementSettings,
    /// Entries whose bodies are being walked, innermost last.
    stack: Vec<EntryId>,
    entries: HashMap<NodeId, EntryId>,
    created: usize,
}

impl<'a, T, R, C> EntryGraphBuilder<'a, T, R, C>
where
    T: SourceTree,
    R: SymbolResolver,
    C: ArrangementCollector,
{
    pub fn new(
        tree: &'a T,
        resolver: &'a R,
        collector: &'a mut C,
        document: Option<&'a Document>,
        ranges: &'a [TextRange],
        settings: &'a ArrangementSettings,
    ) -> Self {
        Self {
            tree,
            resolver,
            collector,
            document,
            ranges,
            settings,
            stack: Vec::new(),
            entries: HashMap::new(),
            created: 0,
        }
    }

    /// Walks the whole tree. Returns the number of entries created.
    pub fn build(mut self) -> usize {
        let root = self.tree.root();
        self.visit(root);
        debug_assert!(self.stack.is_empty(), "entry stack not empty after walk");
        self.created
    }

    fn visit(&mut self, node: NodeId) {
        let tree = self.tree;
        match tree.kind(node) {
            NodeKind::File => {
                for &child in tree.children(node) {
                    if matches!(tree.kind(child), NodeKind::Type(_)) {
                        self.visit(child);
                    }
                }
            }
            NodeKind::Type(kind) => self.visit_type(node, kind),
            NodeKind::AnonymousClass => self.visit_anonymous_class(node),
            NodeKind::ClassBody => self.visit_children(node),
            NodeKind::Field => self.visit_field(node),
            NodeKind::Initializer => self.visit_initializer(node),
            NodeKind::Method | NodeKind::Constructor => self.visit_method(node),
            NodeKind::ExpressionStatement | NodeKind::ReturnStatement => {
                if let Some(expression) = self.significant_children(node).first() {
                    self.visit_children(*expression);
                }
            }
            // nested statements only lead to the anonymous and local classes inside
            NodeKind::Statement | NodeKind::Block => self.visit_children(node),
            NodeKind::NewExpression => {
                let anonymous = tree
                    .children(node)
                    .iter()
                    .copied()
                    .find(|&c| tree.kind(c) == NodeKind::AnonymousClass);
                if let Some(anonymous) = anonymous {
                    self.visit_anonymous_class(anonymous);
                }
            }
            NodeKind::ArgumentList => {
                for expression in self.significant_children(node) {
                    self.visit_children(expression);
                }
            }
            NodeKind::DeclarationStatement => {
                for &child in tree.children(node) {
                    if tree.kind(child) == NodeKind::LocalVariable {
                        self.visit_children(child);
                    }
                }
            }
            _ => {}
        }
    }

    fn visit_children(&mut self, node: NodeId) {
        let tree = self.tree;
        for &child in tree.children(node) {
            self.visit(child);
        }
    }

    fn visit_type(&mut self, node: NodeId, kind: TypeKind) {
        let tree = self.tree;
        let local = !matches!(
            tree.parent(node).map(|p| tree.kind(p)),
            Some(NodeKind::ClassBody | NodeKind::File)
        );
        let entry_type = match kind {
            TypeKind::Class => EntryType::Class,
            TypeKind::Interface => EntryType::Interface,
            TypeKind::Enum => EntryType::Enum,
        };
        let Some(range) = tree.span(node) else {
            return;
        };
        let name = tree.name(node).map(str::to_string);
        let Some(mut entry) = self.new_entry(node, range, entry_type, name, !local) else {
            return;
        };
        self.parse_modifiers(node, &mut entry);
        let id = self.register(entry, &[node]);
        self.descend(id, tree.body(node));
    }

    fn visit_anonymous_class(&mut self, node: NodeId) {
        let tree = self.tree;
        let Some(range) = tree.span(node) else {
            return;
        };
        let Some(entry) = self.new_entry(node, range, EntryType::Class, None, false) else {
            return;
        };
        let id = self.register(entry, &[node]);
        self.descend(id, tree.body(node));
    }

    fn visit_field(&mut self, node: NodeId) {
        let tree = self.tree;
        // `int i, j;` yields one entry, created for `i`
        let mut prev = tree.prev_sibling(node);
        while let Some(p) = prev {
            match tree.kind(p) {
                kind if kind.is_trivia() => prev = tree.prev_sibling(p),
                NodeKind::Token(TokenKind::Comma) => return,
                _ => break,
            }
        }
        let Some(mut range) = tree.span(node) else {
            return;
        };
        let mut covered = vec![node];
        if !self.ends_declaration(node) {
            let mut joined = false;
            let mut next = tree.next_sibling(node);
            while let Some(n) = next {
                match tree.kind(n) {
                    kind if kind.is_trivia() => {}
                    NodeKind::Token(TokenKind::Comma) => joined = true,
                    NodeKind::Field if joined => {
                        joined = false;
                        covered.push(n);
                        if let Some(span) = tree.span(n) {
                            range = range.union(&span);
                        }
                        if self.ends_declaration(n) {
                            break;
                        }
                    }
                    NodeKind::Token(TokenKind::Semicolon) => {
                        if let Some(span) = tree.span(n) {
                            range = range.union(&span);
                        }
                        break;
                    }
                    _ => break,
                }
                next = tree.next_sibling(n);
            }
        }
        let name = tree.name(node).map(str::to_string);
        let Some(mut entry) = self.new_entry(node, range, EntryType::Field, name, true) else {
            return;
        };
        self.parse_modifiers(node, &mut entry);
        let id = self.register(entry, &covered);
        self.descend(id, tree.body(node));
    }

    /// Field that carries the terminating semicolon, or is cut short by a
    /// syntax error.
    fn ends_declaration(&self, field: NodeId) -> bool {
        self.tree.last_child(field).is_some_and(|last| {
            matches!(
                self.tree.kind(last),
                NodeKind::Token(TokenKind::Semicolon) | NodeKind::Error
            )
        })
    }

    fn visit_initializer(&mut self, node: NodeId) {
        let tree = self.tree;
        let Some(range) = tree.span(node) else {
            return;
        };
        let Some(mut entry) = self.new_entry(node, range, EntryType::Field, None, true) else {
            return;
        };
        // stays after whatever entry directly precedes it
        let mut prev = tree.prev_sibling(node);
        while let Some(p) = prev {
            let owner = if tree.kind(p) == NodeKind::Token(TokenKind::LBrace) {
                tree.parent(p).and_then(|body| tree.parent(body)).unwrap_or(p)
            } else {
                p
            };
            if let Some(&dependency) = self.entries.get(&owner) {
                entry.add_dependency(dependency);
            }
            if !tree.kind(p).is_trivia() {
                break;
            }
            prev = tree.prev_sibling(p);
        }
        self.parse_modifiers(node, &mut entry);
        let id = self.register(entry, &[node]);
        self.descend(id, tree.body(node));
    }

    fn visit_method(&mut self, node: NodeId) {
        let tree = self.tree;
        let Some(range) = tree.span(node) else {
            return;
        };
        let kind = if tree.kind(node) == NodeKind::Constructor {
            EntryType::Constructor
        } else {
            EntryType::Method
        };
        let name = tree.name(node).map(str::to_string);
        let Some(mut entry) = self.new_entry(node, range, kind, name, true) else {
            return;
        };
        self.parse_modifiers(node, &mut entry);
        let id = self.register(entry, &[node]);
        self.descend(id, tree.body(node));

        if self.settings.has_rule(GroupingRule::GettersAndSetters) {
            self.parse_properties(node, id);
        }
        self.collector.on_method_entry_created(node, id);
        if let Some(base) = self.resolver.find_super_method(node) {
            let class = tree.enclosing_class(base);
            self.collector.on_overridden_method(OverriddenMethod {
                base,
                base_offset: tree.span(base).map_or(0, |s| s.start),
                class,
                class_name: class.and_then(|c| tree.qualified_name(c)),
                overriding: node,
            });
        }
        for target in MethodBodyScanner::new(tree, self.resolver).calls(node) {
            self.collector.register_dependency(node, target);
        }
    }

    fn parse_properties(&mut self, method: NodeId, entry: EntryId) {
        let Some(accessor) = detect_accessor(self.tree, self.resolver, method) else {
            return;
        };
        let owner = self
            .tree
            .enclosing_class(method)
            .and_then(|class| self.tree.qualified_name(class))
            .unwrap_or_else(|| NO_CONTENT.to_string());
        match &accessor {
            Accessor::Getter(property) => self.collector.register_getter(property, &owner, entry),
            Accessor::Setter(property) => self.collector.register_setter(property, &owner, entry),
        }
    }

    /// Entry for `node` unless `range` lies outside every scope range.
    fn new_entry(
        &self,
        node: NodeId,
        range: TextRange,
        kind: EntryType,
        name: Option<String>,
        can_arrange: bool,
    ) -> Option<ArrangementEntry> {
        if !self.ranges.iter().any(|scope| scope.intersects(&range)) {
            trace!(node = node.0, %range, "Declaration outside arrangement ranges");
            return None;
        }
        let (range, arrangeable) = match (can_arrange, self.document) {
            (false, _) => (range, false),
            (true, None) => (range, true),
            (true, Some(document)) => match document.expand_to_line(range) {
                Some(expanded) => (expanded, true),
                None => {
                    trace!(node = node.0, %range, "Declaration shares a line with other code");
                    (range, false)
                }
            },
        };
        let parent = self.stack.last().copied();
        Some(ArrangementEntry::new(
            node,
            parent,
            range,
            kind,
            name,
            arrangeable,
        ))
    }

    /// Hands `entry` to the collector and remembers it for each of `nodes`.
    fn register(&mut self, entry: ArrangementEntry, nodes: &[NodeId]) -> EntryId {
        let id = self.collector.add_entry(entry);
        self.created += 1;
        for &node in nodes {
            self.entries.insert(node, id);
        }
        id
    }

    fn parse_modifiers(&self, node: NodeId, entry: &mut ArrangementEntry) {
        if self.tree.modifier_list(node).is_none() {
            return;
        }
        for (keyword, modifier) in MODIFIERS {
            if self.tree.has_modifier(node, keyword) {
                entry.add_modifier(*modifier);
            }
        }
    }

    /// Walks the children of `root` with `entry` as the enclosing entry.
    fn descend(&mut self, entry: EntryId, root: Option<NodeId>) {
        let Some(root) = root else {
            return;
        };
        self.stack.push(entry);
        let depth = self.stack.len();
        self.visit_children(root);
        debug_assert_eq!(self.stack.len(), depth, "unbalanced entry stack");
        self.stack.pop();
    }

    fn significant_children(&self, node: NodeId) -> Vec<NodeId> {
        self.tree
            .children(node)
            .iter()
            .copied()
            .filter(|&c| {
                let kind = self.tree.kind(c);
                !kind.is_trivia() && !matches!(kind, NodeKind::Token(_))
            })
            .collect()
    }
}
