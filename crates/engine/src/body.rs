use ir::{NodeId, NodeKind, SourceTree, SymbolResolver};

/// Finds the methods and constructors a method body calls.
pub struct MethodBodyScanner<'a, T: SourceTree, R: SymbolResolver> {
    tree: &'a T,
    resolver: &'a R,
}

impl<'a, T: SourceTree, R: SymbolResolver> MethodBodyScanner<'a, T, R> {
    pub fn new(tree: &'a T, resolver: &'a R) -> Self {
        Self { tree, resolver }
    }

    /// Call targets inside `method`, in source order.
    ///
    /// At a call only the argument list is searched further: calls in the
    /// receiver expression are not reported. Targets that do not resolve to
    /// a method or constructor of the unit are ignored.
    pub fn calls(&self, method: NodeId) -> Vec<NodeId> {
        let mut targets = Vec::new();
        let mut pending: Vec<NodeId> = self.tree.children(method).iter().rev().copied().collect();
        while let Some(node) = pending.pop() {
            match self.tree.kind(node) {
                NodeKind::MethodCall => {
                    if let Some(target) = self.resolver.resolve_call(node) {
                        if self.tree.kind(target).is_method_like() {
                            targets.push(target);
                        }
                    }
                    pending.extend(
                        self.tree
                            .children(node)
                            .iter()
                            .rev()
                            .copied()
                            .filter(|&c| self.tree.kind(c) == NodeKind::ArgumentList),
                    );
                }
                _ => pending.extend(self.tree.children(node).iter().rev().copied()),
            }
        }
        targets
    }
}
