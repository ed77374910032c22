//! Aggregation of everything the entry builder reports.

use ir::{ArrangementEntry, DependencyEdge, DependencyKind, EntryId, NodeId};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::trace;

/// Owner key used for accessors of classes without a qualified name.
pub const NO_CONTENT: &str = "no content";

/// A method found to override `base`, declared in `class`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverriddenMethod {
    pub base: NodeId,
    /// Start offset of `base`, used to keep base declaration order.
    pub base_offset: usize,
    pub class: Option<NodeId>,
    pub class_name: Option<String>,
    pub overriding: NodeId,
}

/// Receives entries and enrichment facts while a unit is being walked.
pub trait ArrangementCollector {
    /// Stores `entry`, links it under its parent and returns its id.
    fn add_entry(&mut self, entry: ArrangementEntry) -> EntryId;
    fn register_getter(&mut self, property: &str, owner: &str, entry: EntryId);
    fn register_setter(&mut self, property: &str, owner: &str, entry: EntryId);
    /// `caller` invokes `callee`; both are method or constructor nodes.
    fn register_dependency(&mut self, caller: NodeId, callee: NodeId);
    fn on_overridden_method(&mut self, method: OverriddenMethod);
    fn on_method_entry_created(&mut self, method: NodeId, entry: EntryId);
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PropertyInfo {
    pub getter: Option<EntryId>,
    pub setter: Option<EntryId>,
}

/// Overriding methods of one base class, in base declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverriddenMethods {
    pub class_name: Option<String>,
    pub methods: Vec<EntryId>,
}

/// A method and the methods it calls, recursively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyNode {
    pub entry: EntryId,
    pub dependents: Vec<DependencyNode>,
}

impl DependencyNode {
    fn from_arena(arena: &[(EntryId, Vec<usize>)], idx: usize) -> Self {
        let (entry, children) = &arena[idx];
        Self {
            entry: *entry,
            dependents: children
                .iter()
                .map(|&child| Self::from_arena(arena, child))
                .collect(),
        }
    }
}

#[derive(Debug, Clone)]
struct OverrideGroup {
    class: NodeId,
    class_name: Option<String>,
    methods: Vec<OverriddenMethod>,
}

/// Default [`ArrangementCollector`]: an entry arena plus the side tables
/// downstream grouping needs.
#[derive(Debug, Clone, Default)]
pub struct ArrangementParseInfo {
    entries: Vec<ArrangementEntry>,
    roots: Vec<EntryId>,
    properties: BTreeMap<(String, String), PropertyInfo>,
    method_entries: HashMap<NodeId, EntryId>,
    overridden: Vec<OverrideGroup>,
    overrides: Vec<(NodeId, NodeId)>,
    method_dependencies: BTreeMap<NodeId, Vec<NodeId>>,
    dependency_roots: Vec<NodeId>,
    dependent_methods: HashSet<NodeId>,
}

impl ArrangementParseInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[ArrangementEntry] {
        &self.entries
    }

    pub fn roots(&self) -> &[EntryId] {
        &self.roots
    }

    pub fn entry(&self, id: EntryId) -> Option<&ArrangementEntry> {
        self.entries.get(id.0)
    }

    pub fn children(&self, id: EntryId) -> &[EntryId] {
        self.entry(id).map_or(&[], |e| e.children.as_slice())
    }

    /// Entry created for a tree node, if any.
    pub fn entry_for(&self, node: NodeId) -> Option<&ArrangementEntry> {
        self.entries.iter().find(|e| e.node == node)
    }

    pub fn method_entry(&self, method: NodeId) -> Option<EntryId> {
        self.method_entries.get(&method).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Accessors keyed by `(property, owner)`.
    pub fn properties(&self) -> &BTreeMap<(String, String), PropertyInfo> {
        &self.properties
    }

    pub fn property(&self, property: &str, owner: &str) -> Option<&PropertyInfo> {
        self.properties
            .get(&(property.to_string(), owner.to_string()))
    }

    /// Overriding methods grouped by the class declaring the base method.
    /// Groups keep registration order; within a group methods follow the
    /// declaration order of their base methods. Overriding methods without
    /// an entry are left out, as are groups left empty.
    pub fn overridden_methods(&self) -> Vec<OverriddenMethods> {
        self.overridden
            .iter()
            .filter_map(|group| {
                let mut pairs = group.methods.clone();
                pairs.sort_by_key(|m| m.base_offset);
                let methods: Vec<EntryId> = pairs
                    .iter()
                    .filter_map(|m| self.method_entry(m.overriding))
                    .collect();
                (!methods.is_empty()).then(|| OverriddenMethods {
                    class_name: group.class_name.clone(),
                    methods,
                })
            })
            .collect()
    }

    /// Call trees rooted at methods no other method calls.
    ///
    /// A root whose expansion reaches an already expanded method is
    /// dropped, so cyclic call chains produce no tree.
    pub fn method_dependency_roots(&self) -> Vec<DependencyNode> {
        self.dependency_roots
            .iter()
            .filter_map(|&root| self.dependency_tree(root))
            .collect()
    }

    fn dependency_tree(&self, root: NodeId) -> Option<DependencyNode> {
        let entry = self.method_entry(root)?;
        let mut arena: Vec<(EntryId, Vec<usize>)> = vec![(entry, Vec::new())];
        let mut pending = vec![(root, 0usize)];
        let mut used = HashSet::new();
        while let Some((method, idx)) = pending.pop() {
            let Some(callees) = self.method_dependencies.get(&method) else {
                continue;
            };
            used.insert(method);
            for &callee in callees {
                if used.contains(&callee) {
                    trace!(root = root.0, callee = callee.0, "Cyclic method dependency");
                    return None;
                }
                let Some(callee_entry) = self.method_entry(callee) else {
                    continue;
                };
                arena.push((callee_entry, Vec::new()));
                let child = arena.len() - 1;
                arena[idx].1.push(child);
                pending.push((callee, child));
            }
        }
        Some(DependencyNode::from_arena(&arena, 0))
    }

    /// Every ordering hint between existing entries.
    pub fn dependency_edges(&self) -> Vec<DependencyEdge> {
        let mut edges = Vec::new();
        for entry in &self.entries {
            edges.extend(entry.dependencies.iter().map(|&dependency| DependencyEdge {
                dependent: entry.id,
                dependency,
                kind: DependencyKind::SyntheticInitializerOrder,
            }));
        }
        for &(base, overriding) in &self.overrides {
            if let (Some(dependency), Some(dependent)) =
                (self.method_entry(base), self.method_entry(overriding))
            {
                edges.push(DependencyEdge {
                    dependent,
                    dependency,
                    kind: DependencyKind::MethodOverride,
                });
            }
        }
        for (caller, callees) in &self.method_dependencies {
            let Some(dependent) = self.method_entry(*caller) else {
                continue;
            };
            edges.extend(
                callees
                    .iter()
                    .filter_map(|callee| self.method_entry(*callee))
                    .map(|dependency| DependencyEdge {
                        dependent,
                        dependency,
                        kind: DependencyKind::MethodCall,
                    }),
            );
        }
        for info in self.properties.values() {
            let (Some(getter), Some(setter)) = (info.getter, info.setter) else {
                continue;
            };
            let getter_first = match (self.entry(getter), self.entry(setter)) {
                (Some(g), Some(s)) => g.range.start <= s.range.start,
                _ => true,
            };
            edges.push(if getter_first {
                DependencyEdge {
                    dependent: setter,
                    dependency: getter,
                    kind: DependencyKind::Setter,
                }
            } else {
                DependencyEdge {
                    dependent: getter,
                    dependency: setter,
                    kind: DependencyKind::Getter,
                }
            });
        }
        edges
    }

    fn property_mut(&mut self, property: &str, owner: &str) -> &mut PropertyInfo {
        self.properties
            .entry((property.to_string(), owner.to_string()))
            .or_default()
    }
}

impl ArrangementCollector for ArrangementParseInfo {
    fn add_entry(&mut self, mut entry: ArrangementEntry) -> EntryId {
        let id = EntryId(self.entries.len());
        entry.id = id;
        match entry.parent {
            Some(parent) => {
                debug_assert!(parent.0 < self.entries.len(), "unknown parent entry");
                if let Some(p) = self.entries.get_mut(parent.0) {
                    p.children.push(id);
                }
            }
            None => self.roots.push(id),
        }
        self.entries.push(entry);
        id
    }

    fn register_getter(&mut self, property: &str, owner: &str, entry: EntryId) {
        self.property_mut(property, owner).getter = Some(entry);
    }

    fn register_setter(&mut self, property: &str, owner: &str, entry: EntryId) {
        self.property_mut(property, owner).setter = Some(entry);
    }

    fn register_dependency(&mut self, caller: NodeId, callee: NodeId) {
        self.dependency_roots.retain(|&m| m != callee);
        if !self.dependent_methods.contains(&caller) && !self.dependency_roots.contains(&caller) {
            self.dependency_roots.push(caller);
        }
        self.dependent_methods.insert(callee);
        let callees = self.method_dependencies.entry(caller).or_default();
        if !callees.contains(&callee) {
            callees.push(callee);
        }
    }

    fn on_overridden_method(&mut self, method: OverriddenMethod) {
        self.overrides.push((method.base, method.overriding));
        let Some(class) = method.class else {
            return;
        };
        match self.overridden.iter_mut().find(|g| g.class == class) {
            Some(group) => group.methods.push(method),
            None => self.overridden.push(OverrideGroup {
                class,
                class_name: method.class_name.clone(),
                methods: vec![method],
            }),
        }
    }

    fn on_method_entry_created(&mut self, method: NodeId, entry: EntryId) {
        self.method_entries.insert(method, entry);
    }
}
