//! Arena syntax tree.
//!
//! Front ends lower their concrete parse trees into a [`SyntaxTree`], which
//! keeps the shape the entry builder expects: punctuation tokens and
//! whitespace are nodes, co-declared variables are separate siblings and
//! declarations carry their names and modifiers.

use crate::tree::{ModifierList, NodeId, NodeKind, SourceTree, TokenKind};
use crate::TextRange;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyntaxNode {
    pub id: NodeId,
    pub parent: Option<NodeId>,
    pub kind: NodeKind,
    /// Node kind as named by the front end grammar.
    pub label: String,
    pub span: TextRange,
    pub children: Vec<NodeId>,
    /// Position among the children of `parent`.
    #[serde(default)]
    pub index: usize,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub modifiers: Option<ModifierList>,
    #[serde(default)]
    pub body: Option<NodeId>,
    /// Receiver of a call or field access.
    #[serde(default)]
    pub qualifier: Option<NodeId>,
    /// Simple names of extended and implemented types.
    #[serde(default)]
    pub supertypes: Vec<String>,
}

impl SyntaxNode {
    fn new(
        id: NodeId,
        parent: Option<NodeId>,
        kind: NodeKind,
        label: String,
        span: TextRange,
    ) -> Self {
        Self {
            id,
            parent,
            kind,
            label,
            span,
            children: Vec::new(),
            index: 0,
            name: None,
            detail: None,
            modifiers: None,
            body: None,
            qualifier: None,
            supertypes: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyntaxTree {
    pub file_path: String,
    nodes: Vec<SyntaxNode>,
}

impl SyntaxTree {
    /// Creates a tree holding only its [`NodeKind::File`] root.
    ///
    /// # Example
    /// ```
    /// use ir::{NodeKind, SourceTree, SyntaxTree, TextRange};
    /// let mut tree = SyntaxTree::new("A.java", TextRange::new(0, 10));
    /// let root = tree.root();
    /// let class = tree.push(root, NodeKind::Other, "class_declaration", TextRange::new(0, 10));
    /// assert_eq!(tree.parent(class), Some(root));
    /// assert_eq!(tree.children(root), &[class]);
    /// ```
    pub fn new(file_path: impl Into<String>, span: TextRange) -> Self {
        let root = SyntaxNode::new(NodeId(0), None, NodeKind::File, "file".into(), span);
        Self {
            file_path: file_path.into(),
            nodes: vec![root],
        }
    }

    /// Appends a node as the last child of `parent`.
    pub fn push(
        &mut self,
        parent: NodeId,
        kind: NodeKind,
        label: impl Into<String>,
        span: TextRange,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        let mut node = SyntaxNode::new(id, Some(parent), kind, label.into(), span);
        if let Some(p) = self.nodes.get_mut(parent.0) {
            node.index = p.children.len();
            p.children.push(id);
        }
        self.nodes.push(node);
        id
    }

    pub fn node(&self, id: NodeId) -> Option<&SyntaxNode> {
        self.nodes.get(id.0)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut SyntaxNode> {
        self.nodes.get_mut(id.0)
    }

    pub fn nodes(&self) -> &[SyntaxNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Moves the end of a node span, e.g. after a trailing token is attached.
    pub fn extend_to(&mut self, id: NodeId, end: usize) {
        if let Some(node) = self.nodes.get_mut(id.0) {
            node.span.end = node.span.end.max(end);
        }
    }

    /// Inserts [`NodeKind::Whitespace`] nodes into the gaps between
    /// consecutive children. Gaps holding anything but whitespace become
    /// [`TokenKind::Other`] tokens so sibling scans never see through them.
    pub fn fill_gaps(&mut self, source: &str) {
        for idx in 0..self.nodes.len() {
            let children = self.nodes[idx].children.clone();
            if children.len() < 2 {
                continue;
            }
            let mut rebuilt = Vec::with_capacity(children.len() * 2);
            for pair in children.windows(2) {
                rebuilt.push(pair[0]);
                let gap_start = self.nodes[pair[0].0].span.end;
                let gap_end = self.nodes[pair[1].0].span.start;
                if gap_start >= gap_end {
                    continue;
                }
                let text = source.get(gap_start..gap_end).unwrap_or("");
                let kind = if text.trim().is_empty() {
                    NodeKind::Whitespace
                } else {
                    NodeKind::Token(TokenKind::Other)
                };
                let gap = NodeId(self.nodes.len());
                self.nodes.push(SyntaxNode::new(
                    gap,
                    Some(NodeId(idx)),
                    kind,
                    "gap".into(),
                    TextRange::new(gap_start, gap_end),
                ));
                rebuilt.push(gap);
            }
            if let Some(last) = children.last() {
                rebuilt.push(*last);
            }
            for (index, child) in rebuilt.iter().enumerate() {
                self.nodes[child.0].index = index;
            }
            self.nodes[idx].children = rebuilt;
        }
    }
}

impl SourceTree for SyntaxTree {
    fn root(&self) -> NodeId {
        NodeId(0)
    }

    fn kind(&self, node: NodeId) -> NodeKind {
        self.node(node).map_or(NodeKind::Error, |n| n.kind)
    }

    fn span(&self, node: NodeId) -> Option<TextRange> {
        self.node(node).map(|n| n.span)
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).and_then(|n| n.parent)
    }

    fn children(&self, node: NodeId) -> &[NodeId] {
        self.node(node).map_or(&[], |n| n.children.as_slice())
    }

    fn name(&self, node: NodeId) -> Option<&str> {
        self.node(node).and_then(|n| n.name.as_deref())
    }

    fn detail(&self, node: NodeId) -> Option<&str> {
        self.node(node).and_then(|n| n.detail.as_deref())
    }

    fn modifier_list(&self, node: NodeId) -> Option<&ModifierList> {
        self.node(node).and_then(|n| n.modifiers.as_ref())
    }

    fn body(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).and_then(|n| n.body)
    }

    fn sibling_index(&self, node: NodeId) -> Option<usize> {
        let node = self.node(node)?;
        node.parent.map(|_| node.index)
    }
}
