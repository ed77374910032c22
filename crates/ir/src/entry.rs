//! Arrangement entries: one record per arrangeable (or tracked)
//! declaration of a source unit.

use crate::{NodeId, TextRange};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryType {
    Class,
    Interface,
    Enum,
    Field,
    Method,
    Constructor,
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EntryType::Class => "CLASS",
            EntryType::Interface => "INTERFACE",
            EntryType::Enum => "ENUM",
            EntryType::Field => "FIELD",
            EntryType::Method => "METHOD",
            EntryType::Constructor => "CONSTRUCTOR",
        };
        f.write_str(s)
    }
}

/// Modifier vocabulary, declared in match order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Modifier {
    Public,
    Protected,
    Private,
    PackagePrivate,
    Static,
    Final,
    Transient,
    Volatile,
    Synchronized,
    Abstract,
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Modifier::Public => "public",
            Modifier::Protected => "protected",
            Modifier::Private => "private",
            Modifier::PackagePrivate => "package-private",
            Modifier::Static => "static",
            Modifier::Final => "final",
            Modifier::Transient => "transient",
            Modifier::Volatile => "volatile",
            Modifier::Synchronized => "synchronized",
            Modifier::Abstract => "abstract",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArrangementEntry {
    pub id: EntryId,
    /// Tree node the entry was created for.
    pub node: NodeId,
    pub parent: Option<EntryId>,
    pub children: Vec<EntryId>,
    pub range: TextRange,
    pub kind: EntryType,
    pub name: Option<String>,
    pub modifiers: BTreeSet<Modifier>,
    /// Anonymous and local constructs, and entries sharing a line with
    /// other code, are tracked but must not be moved.
    pub can_be_arranged: bool,
    /// Entries this one must stay after (initializer order).
    #[serde(default)]
    pub dependencies: Vec<EntryId>,
}

impl ArrangementEntry {
    /// Creates a detached entry. The collector assigns `id` when it is added.
    pub fn new(
        node: NodeId,
        parent: Option<EntryId>,
        range: TextRange,
        kind: EntryType,
        name: Option<String>,
        can_be_arranged: bool,
    ) -> Self {
        Self {
            id: EntryId(usize::MAX),
            node,
            parent,
            children: Vec::new(),
            range,
            kind,
            name,
            modifiers: BTreeSet::new(),
            can_be_arranged,
            dependencies: Vec::new(),
        }
    }

    pub fn add_modifier(&mut self, modifier: Modifier) {
        self.modifiers.insert(modifier);
    }

    pub fn add_dependency(&mut self, dependency: EntryId) {
        self.dependencies.push(dependency);
    }

    pub fn has_modifier(&self, modifier: Modifier) -> bool {
        self.modifiers.contains(&modifier)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DependencyKind {
    SyntheticInitializerOrder,
    MethodOverride,
    MethodCall,
    Getter,
    Setter,
}

/// Ordering hint: `dependent` should stay after `dependency`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DependencyEdge {
    pub dependent: EntryId,
    pub dependency: EntryId,
    pub kind: DependencyKind,
}
