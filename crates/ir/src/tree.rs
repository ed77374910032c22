//! Capabilities the entry graph builder needs from a parsed source unit.
//!
//! Front ends implement [`SourceTree`] for their syntax tree and
//! [`SymbolResolver`] for whatever name resolution they can offer. The
//! arena [`SyntaxTree`](crate::SyntaxTree) is the stock implementation.

use crate::TextRange;
use serde::{Deserialize, Serialize};

/// Opaque handle of a syntax tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeKind {
    Class,
    Interface,
    Enum,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    LBrace,
    RBrace,
    Comma,
    Semicolon,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    File,
    /// Named type declaration.
    Type(TypeKind),
    /// Body of an object creation expression or enum constant.
    AnonymousClass,
    /// Braces and members of a type.
    ClassBody,
    Field,
    Initializer,
    Method,
    Constructor,
    ParameterList,
    Parameter,
    Block,
    DeclarationStatement,
    LocalVariable,
    ExpressionStatement,
    ReturnStatement,
    Statement,
    NewExpression,
    MethodCall,
    ArgumentList,
    Assignment,
    Reference,
    This,
    Super,
    Identifier,
    ModifierList,
    Comment,
    Whitespace,
    Token(TokenKind),
    Error,
    Other,
}

impl NodeKind {
    pub fn is_class_like(self) -> bool {
        matches!(self, NodeKind::Type(_) | NodeKind::AnonymousClass)
    }

    pub fn is_method_like(self) -> bool {
        matches!(self, NodeKind::Method | NodeKind::Constructor)
    }

    /// Whitespace and comments.
    pub fn is_trivia(self) -> bool {
        matches!(self, NodeKind::Whitespace | NodeKind::Comment)
    }
}

/// Keyword of the package-private pseudo modifier.
pub const PACKAGE_LOCAL: &str = "packageLocal";

/// Modifier keywords attached to a declaration.
///
/// `implicit` holds the modifiers the language grants without them being
/// written, e.g. `public` on interface methods.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifierList {
    pub explicit: Vec<String>,
    #[serde(default)]
    pub implicit: Vec<String>,
}

impl ModifierList {
    pub fn new<I, S>(explicit: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            explicit: explicit.into_iter().map(Into::into).collect(),
            implicit: Vec::new(),
        }
    }

    pub fn add_implicit(&mut self, keyword: &str) {
        if !self.has_modifier_property(keyword) {
            self.implicit.push(keyword.to_string());
        }
    }

    /// Whether the declaration carries `keyword`, explicitly or implicitly.
    ///
    /// # Example
    /// ```
    /// use ir::{ModifierList, PACKAGE_LOCAL};
    /// let list = ModifierList::new(["static", "final"]);
    /// assert!(list.has_modifier_property("final"));
    /// assert!(list.has_modifier_property(PACKAGE_LOCAL));
    /// ```
    pub fn has_modifier_property(&self, keyword: &str) -> bool {
        if keyword == PACKAGE_LOCAL {
            return !["public", "protected", "private"]
                .iter()
                .any(|access| self.has_modifier_property(access));
        }
        self.explicit
            .iter()
            .chain(self.implicit.iter())
            .any(|m| m == keyword)
    }
}

pub trait SourceTree {
    fn root(&self) -> NodeId;
    fn kind(&self, node: NodeId) -> NodeKind;
    /// `None` when the front end cannot place the node in the text.
    fn span(&self, node: NodeId) -> Option<TextRange>;
    fn parent(&self, node: NodeId) -> Option<NodeId>;
    fn children(&self, node: NodeId) -> &[NodeId];
    /// Declared or referenced name.
    fn name(&self, node: NodeId) -> Option<&str>;
    /// Front end detail: declared type of variables, return type of
    /// methods, operator of assignments.
    fn detail(&self, node: NodeId) -> Option<&str>;
    fn modifier_list(&self, node: NodeId) -> Option<&ModifierList>;
    /// Class body, method body or variable initializer of a declaration.
    fn body(&self, node: NodeId) -> Option<NodeId>;

    /// Position of `node` among its parent's children. Trees that store it
    /// should override the linear search.
    fn sibling_index(&self, node: NodeId) -> Option<usize> {
        self.children(self.parent(node)?)
            .iter()
            .position(|&c| c == node)
    }

    fn prev_sibling(&self, node: NodeId) -> Option<NodeId> {
        let idx = self.sibling_index(node)?.checked_sub(1)?;
        self.children(self.parent(node)?).get(idx).copied()
    }

    fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        let idx = self.sibling_index(node)?;
        self.children(self.parent(node)?).get(idx + 1).copied()
    }

    fn last_child(&self, node: NodeId) -> Option<NodeId> {
        self.children(node).last().copied()
    }

    /// Innermost named or anonymous class strictly containing `node`.
    fn enclosing_class(&self, node: NodeId) -> Option<NodeId> {
        let mut current = self.parent(node);
        while let Some(n) = current {
            if self.kind(n).is_class_like() {
                return Some(n);
            }
            current = self.parent(n);
        }
        None
    }

    /// Dotted name of a class, prefixed by the package name stored on the
    /// file node. Anonymous and local classes have none.
    fn qualified_name(&self, class: NodeId) -> Option<String> {
        if !matches!(self.kind(class), NodeKind::Type(_)) {
            return None;
        }
        let mut names = vec![self.name(class)?.to_string()];
        let mut current = self.parent(class);
        while let Some(node) = current {
            match self.kind(node) {
                NodeKind::ClassBody => {}
                NodeKind::Type(_) => names.push(self.name(node)?.to_string()),
                NodeKind::File => {
                    if let Some(package) = self.name(node) {
                        names.push(package.to_string());
                    }
                    break;
                }
                _ => return None,
            }
            current = self.parent(node);
        }
        names.reverse();
        Some(names.join("."))
    }

    fn has_modifier(&self, node: NodeId, keyword: &str) -> bool {
        self.modifier_list(node)
            .is_some_and(|m| m.has_modifier_property(keyword))
    }
}

/// Best-effort name resolution within a source unit.
pub trait SymbolResolver {
    /// Declaration a reference expression points to (field, parameter, local).
    fn resolve_reference(&self, reference: NodeId) -> Option<NodeId>;
    /// Method or constructor a call expression invokes.
    fn resolve_call(&self, call: NodeId) -> Option<NodeId>;
    /// First method in a supertype that `method` overrides.
    fn find_super_method(&self, method: NodeId) -> Option<NodeId>;
}

/// Resolver that never resolves anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoResolver;

impl SymbolResolver for NoResolver {
    fn resolve_reference(&self, _reference: NodeId) -> Option<NodeId> {
        None
    }

    fn resolve_call(&self, _call: NodeId) -> Option<NodeId> {
        None
    }

    fn find_super_method(&self, _method: NodeId) -> Option<NodeId> {
        None
    }
}
